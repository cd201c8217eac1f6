//! Common type definitions shared between the API, catalog and database layers.
//!
//! # ID Types
//!
//! - [`UserId`]: database-generated (or client-supplied) user identifier
//! - [`VillagerId`]: upstream villager identifier, e.g. `"cat00"`
//! - [`GyroidName`]: upstream gyroid name, which doubles as its display name
//!
//! # Catalog enumerations
//!
//! [`Species`] and [`Personality`] are the closed sets accepted by the villager filters. They
//! parse case-insensitively and render in lowercase, which is also how they are stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub type UserId = i64;
pub type VillagerId = String;
pub type GyroidName = String;

/// Native fruits a town can start with, in display order.
pub const NATIVE_FRUITS: [&str; 5] = ["Apple", "Cherry", "Orange", "Pear", "Peach"];

/// Error returned when a species or personality string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Generates a lowercase string enum with case-insensitive parsing.
macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $(
                #[schema(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

catalog_enum! {
    /// Villager species as listed by the reference catalog
    Species, "species" {
        Alligator => "alligator",
        Anteater => "anteater",
        Bear => "bear",
        BearCub => "bear cub",
        Bird => "bird",
        Bull => "bull",
        Cat => "cat",
        Cub => "cub",
        Chicken => "chicken",
        Cow => "cow",
        Deer => "deer",
        Dog => "dog",
        Duck => "duck",
        Eagle => "eagle",
        Elephant => "elephant",
        Frog => "frog",
        Goat => "goat",
        Gorilla => "gorilla",
        Hamster => "hamster",
        Hippo => "hippo",
        Horse => "horse",
        Koala => "koala",
        Kangaroo => "kangaroo",
        Lion => "lion",
        Monkey => "monkey",
        Mouse => "mouse",
        Octopus => "octopus",
        Ostrich => "ostrich",
        Penguin => "penguin",
        Pig => "pig",
        Rabbit => "rabbit",
        Rhino => "rhino",
        Rhinoceros => "rhinoceros",
        Sheep => "sheep",
        Squirrel => "squirrel",
        Tiger => "tiger",
        Wolf => "wolf",
    }
}

catalog_enum! {
    /// Villager personality types
    Personality, "personality" {
        BigSister => "big sister",
        Cranky => "cranky",
        Jock => "jock",
        Lazy => "lazy",
        Normal => "normal",
        Peppy => "peppy",
        Sisterly => "sisterly",
        Smug => "smug",
        Snooty => "snooty",
    }
}

/// Returns the canonical spelling of a native fruit, matching case-insensitively.
pub fn canonical_fruit(value: &str) -> Option<&'static str> {
    let value = value.trim();
    NATIVE_FRUITS.iter().copied().find(|fruit| fruit.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_parse_is_case_insensitive() {
        assert_eq!("Cat".parse::<Species>().unwrap(), Species::Cat);
        assert_eq!("BEAR CUB".parse::<Species>().unwrap(), Species::BearCub);
        assert_eq!(" wolf ".parse::<Species>().unwrap(), Species::Wolf);
    }

    #[test]
    fn test_unknown_personality_is_rejected() {
        let err = "grumpy".parse::<Personality>().unwrap_err();
        assert_eq!(err.kind, "personality");
        assert_eq!(err.value, "grumpy");
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Personality::BigSister).unwrap(), "\"big sister\"");
        let parsed: Species = serde_json::from_str("\"Kangaroo\"").unwrap();
        assert_eq!(parsed, Species::Kangaroo);
    }

    #[test]
    fn test_variant_counts() {
        assert_eq!(Species::ALL.len(), 37);
        assert_eq!(Personality::ALL.len(), 9);
    }

    #[test]
    fn test_canonical_fruit() {
        assert_eq!(canonical_fruit("peach"), Some("Peach"));
        assert_eq!(canonical_fruit(" CHERRY "), Some("Cherry"));
        assert_eq!(canonical_fruit("Coconut"), None);
    }
}
