use serde::Serialize;

use crate::domain::Recipe;
use crate::rating::RankedRecipe;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestRecipesResponse {
    pub items: Vec<RankedRecipe>,
    pub total: usize,
}

/// Recipe page payload: the recipe plus its current rating
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub image_url: String,
    pub average_rating: f64,
    pub review_count: usize,
}
