use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{caller_from_headers, error_response, store_error_response, unauthorized, AppState, BestRecipesParams};
use crate::api::models::{BestRecipesResponse, RecipeDetail};
use crate::domain::RecipeDraft;

pub async fn list_recipes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.recipes.all_recipes().await {
        Ok(recipes) => Json(recipes).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn best_recipes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BestRecipesParams>,
) -> impl IntoResponse {
    match state.ranking.best_recipes(params.limit).await {
        Ok(items) => Json(BestRecipesResponse {
            total: items.len(),
            items,
        })
        .into_response(),
        Err(e) => store_error_response(&e),
    }
}

pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
) -> impl IntoResponse {
    let recipe = match state.recipes.recipe(&recipe_id).await {
        Ok(recipe) => recipe,
        Err(e) => return error_response(e),
    };

    let rating = match state.reviews.average_rating_for_recipe(&recipe_id).await {
        Ok(rating) => rating,
        Err(e) => return error_response(e),
    };

    Json(RecipeDetail {
        image_url: recipe.image_or_placeholder().to_string(),
        recipe,
        average_rating: rating.average_rating,
        review_count: rating.review_count,
    })
    .into_response()
}

pub async fn list_user_recipes(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> impl IntoResponse {
    match state.recipes.recipes_by_owner(&owner_id).await {
        Ok(recipes) => Json(recipes).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<RecipeDraft>,
) -> impl IntoResponse {
    let Some(owner) = caller_from_headers(&headers) else {
        return unauthorized();
    };

    match state.recipes.create_recipe(&owner, draft).await {
        Ok(recipe) => (StatusCode::CREATED, Json(recipe)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
    headers: HeaderMap,
    Json(draft): Json<RecipeDraft>,
) -> impl IntoResponse {
    let Some(owner) = caller_from_headers(&headers) else {
        return unauthorized();
    };

    match state.recipes.update_recipe(&owner, &recipe_id, draft).await {
        Ok(recipe) => Json(recipe).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(owner) = caller_from_headers(&headers) else {
        return unauthorized();
    };

    match state.recipes.delete_recipe(&owner, &recipe_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
