use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::domain::User;
use crate::errors::{ServiceError, StoreError};
use crate::services::{RankingService, RecipeService, ReviewService};
use crate::store::{RecipeStore, ReviewStore};

pub mod recipes;
pub mod reviews;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

pub struct AppState {
    pub recipes: RecipeService,
    pub reviews: ReviewService,
    pub ranking: RankingService,
}

impl AppState {
    pub fn new(
        recipe_store: Arc<dyn RecipeStore>,
        review_store: Arc<dyn ReviewStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            recipes: RecipeService::new(recipe_store.clone(), config),
            reviews: ReviewService::new(review_store.clone(), recipe_store.clone(), config),
            ranking: RankingService::new(recipe_store, review_store, config),
        }
    }
}

#[derive(Deserialize)]
pub struct BestRecipesParams {
    pub limit: Option<usize>,
}

/// Caller identity as forwarded by the auth provider in front of the API
pub fn caller_from_headers(headers: &HeaderMap) -> Option<User> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Some(User {
        id: header(USER_ID_HEADER)?,
        email: header(USER_EMAIL_HEADER),
        display_name: header(USER_NAME_HEADER),
    })
}

pub fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Sign in required").into_response()
}

pub fn error_response(err: ServiceError) -> Response {
    match &err {
        ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        ServiceError::Forbidden(_) => (StatusCode::FORBIDDEN, err.to_string()).into_response(),
        ServiceError::Store(store_err) => store_error_response(store_err),
    }
}

pub fn store_error_response(err: &StoreError) -> Response {
    match err {
        StoreError::RecipeNotFound(_) | StoreError::ReviewNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        StoreError::Timeout { .. } => {
            log::error!("Store timeout: {}", err);
            (StatusCode::GATEWAY_TIMEOUT, err.to_string()).into_response()
        }
        StoreError::Backend(e) => {
            log::error!("Store failure: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Store Error: {}", e)).into_response()
        }
    }
}
