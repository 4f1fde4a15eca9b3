use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{caller_from_headers, error_response, unauthorized, AppState};
use crate::domain::ReviewSubmission;

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
) -> impl IntoResponse {
    match state.reviews.reviews_for_recipe(&recipe_id).await {
        Ok(reviews) => Json(reviews).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_my_review(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(author) = caller_from_headers(&headers) else {
        return unauthorized();
    };

    match state.reviews.user_review(&recipe_id, &author.id).await {
        Ok(Some(review)) => Json(review).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
    headers: HeaderMap,
    Json(submission): Json<ReviewSubmission>,
) -> impl IntoResponse {
    let Some(author) = caller_from_headers(&headers) else {
        return unauthorized();
    };

    match state.reviews.submit_review(&author, &recipe_id, submission).await {
        Ok(review) => Json(review).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(author) = caller_from_headers(&headers) else {
        return unauthorized();
    };

    match state.reviews.delete_review(&author, &review_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
