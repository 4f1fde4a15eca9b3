use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    recipes::{
        best_recipes, create_recipe, delete_recipe, get_recipe, list_recipes, list_user_recipes,
        update_recipe,
    },
    reviews::{delete_review, get_my_review, list_reviews, submit_review},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route("/api/recipes/best", get(best_recipes))
        .route(
            "/api/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/api/recipes/:id/reviews", get(list_reviews).put(submit_review))
        .route("/api/recipes/:id/reviews/mine", get(get_my_review))
        .route("/api/reviews/:id", delete(delete_review))
        .route("/api/users/:id/recipes", get(list_user_recipes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::USER_ID_HEADER;
    use crate::config::AppConfig;
    use crate::store::InMemoryStore;
    use crate::test_support::recipe;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(store: Arc<InMemoryStore>) -> Router {
        let state = AppState::new(store.clone(), store, &AppConfig::new());
        create_router(Arc::new(state))
    }

    fn seeded() -> Arc<InMemoryStore> {
        let store = InMemoryStore::with_recipes(vec![recipe("r1"), recipe("r2"), recipe("r3")]);
        Arc::new(store)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn submit_request(recipe_id: &str, user_id: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("PUT")
            .uri(format!("/api/recipes/{recipe_id}/reviews"))
            .header("content-type", "application/json");
        if let Some(user_id) = user_id {
            builder = builder.header(USER_ID_HEADER, user_id);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_best_recipes_ranked_and_limited() {
        let store = seeded();
        for (recipe_id, user_id, rating) in [
            ("r1", "a", 5),
            ("r1", "b", 4),
            ("r2", "a", 3),
            ("r3", "a", 5),
        ] {
            let request = submit_request(recipe_id, Some(user_id), &format!(r#"{{"rating":{rating}}}"#));
            let (status, _) = send(app(store.clone()), request).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(app(store), get_request("/api/recipes/best?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["items"][0]["id"], "r3");
        assert_eq!(body["items"][0]["averageRating"], 5.0);
        assert_eq!(body["items"][1]["id"], "r1");
        assert_eq!(body["items"][1]["reviewCount"], 2);
    }

    #[tokio::test]
    async fn test_recipe_detail_carries_rating() {
        let store = seeded();
        for (user_id, rating) in [("a", 4), ("b", 5)] {
            let request = submit_request("r1", Some(user_id), &format!(r#"{{"rating":{rating}}}"#));
            send(app(store.clone()), request).await;
        }

        let (status, body) = send(app(store), get_request("/api/recipes/r1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["averageRating"], 4.5);
        assert_eq!(body["reviewCount"], 2);
        assert_eq!(body["imageUrl"], crate::domain::PLACEHOLDER_IMAGE);
    }

    #[tokio::test]
    async fn test_unknown_recipe_is_404() {
        let (status, _) = send(app(seeded()), get_request("/api/recipes/ghost")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = submit_request("ghost", Some("a"), r#"{"rating":3}"#);
        let (status, _) = send(app(seeded()), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_review_requires_caller_and_valid_rating() {
        let store = seeded();

        let (status, _) = send(app(store.clone()), submit_request("r1", None, r#"{"rating":3}"#)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(app(store.clone()), submit_request("r1", Some("a"), r#"{"rating":9}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(app(store), get_request("/api/recipes/r1/reviews")).await;
        assert_eq!(body, Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_500() {
        let store = seeded();
        store.fail_with("backend offline");

        let (status, _) = send(app(store), get_request("/api/recipes/best")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
