use crate::types::NATIVE_FRUITS;
use axum::response::Json;

/// The fixed list of native fruits, in display order.
#[utoipa::path(
    get,
    path = "/fruit",
    tag = "fruit",
    summary = "List native fruits",
    responses(
        (status = 200, description = "Native fruits", body = Vec<String>),
    )
)]
pub async fn list_fruit() -> Json<Vec<&'static str>> {
    Json(NATIVE_FRUITS.to_vec())
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_test_app;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_fruit(pool: PgPool) {
        let app = create_test_app(pool).await;

        let fruit: Vec<String> = app.get("/fruit").await.json();
        assert_eq!(fruit, vec!["Apple", "Cherry", "Orange", "Pear", "Peach"]);
    }
}
