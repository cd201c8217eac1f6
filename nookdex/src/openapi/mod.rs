//! OpenAPI documentation for the HTTP API.
//!
//! [`ApiDoc`] is served as JSON at `/openapi.json` and rendered with Scalar at `/docs`.

use crate::api;
use crate::types::{Personality, Species};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::villagers::query_villagers,
        api::handlers::villagers::sync_villagers,
        api::handlers::villagers::list_stored_villagers,
        api::handlers::villagers::delete_villager,
        api::handlers::gyroids::list_gyroids,
        api::handlers::gyroids::sync_gyroids,
        api::handlers::gyroids::list_stored_gyroids,
        api::handlers::gyroids::delete_gyroid,
        api::handlers::fruit::list_fruit,
        api::handlers::users::list_users,
        api::handlers::users::create_user,
        api::handlers::users::get_user,
        api::handlers::users::update_user,
        api::handlers::users::delete_user,
        api::handlers::collections::list_user_villagers,
        api::handlers::collections::add_villager_to_user,
        api::handlers::collections::switch_user_villager,
        api::handlers::collections::remove_villager_from_user,
        api::handlers::collections::list_user_gyroids,
        api::handlers::collections::add_gyroid_to_user,
        api::handlers::collections::remove_gyroid_from_user,
    ),
    components(
        schemas(
            Species,
            Personality,
            api::models::users::UserCreate,
            api::models::users::UserUpdate,
            api::models::users::UserResponse,
            api::models::villagers::VillagerResponse,
            api::models::villagers::CollectedVillagerResponse,
            api::models::gyroids::GyroidResponse,
            api::models::gyroids::CollectedGyroidResponse,
            api::models::catalog::SyncResponse,
        )
    ),
    tags(
        (name = "villagers", description = "Villager queries against the upstream catalog"),
        (name = "gyroids", description = "Gyroid listing from the upstream catalog"),
        (name = "fruit", description = "Native fruits"),
        (name = "catalog", description = "The local mirror of the upstream catalog"),
        (name = "users", description = "User management"),
        (name = "collections", description = "The villagers and gyroids each user owns"),
    ),
    info(
        title = "nookdex API",
        version = "0.1.0",
        description = "Collection tracker for Animal Crossing villagers and gyroids.

## Errors

Errors are returned as JSON with a human-readable `detail` field:

```json
{ \"detail\": \"Villager with ID cat00 not found\" }
```

When the upstream catalog API rejects a request, its status code is returned unchanged.",
    ),
)]
pub struct ApiDoc;
