use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::{Recipe, RecipeId, Review};

use super::aggregate::aggregate;
use super::types::{RankedRecipe, RatingFilter};

pub const DEFAULT_BEST_RECIPES_LIMIT: usize = 5;

/// Partitions a bulk review read by the recipe each review rates
pub fn group_by_recipe(reviews: Vec<Review>) -> HashMap<RecipeId, Vec<Review>> {
    let mut grouped: HashMap<RecipeId, Vec<Review>> = HashMap::new();
    for review in reviews {
        grouped.entry(review.recipe_id.clone()).or_default().push(review);
    }
    grouped
}

/// Ranks recipes by average rating, best first.
///
/// Recipes without a positive average are left out. Ties on the average go
/// to the recipe with more ratings, then to the lower id.
pub fn rank(
    recipes: &[Recipe],
    reviews_by_recipe: &HashMap<RecipeId, Vec<Review>>,
    limit: usize,
    filter: RatingFilter,
) -> Vec<RankedRecipe> {
    let mut ranked: Vec<RankedRecipe> = recipes
        .iter()
        .map(|recipe| rate_recipe(recipe, reviews_by_recipe, filter))
        .filter(|entry| entry.average_rating > 0.0)
        .collect();

    ranked.sort_by(compare_ranked);
    ranked.truncate(limit);
    ranked
}

fn rate_recipe(
    recipe: &Recipe,
    reviews_by_recipe: &HashMap<RecipeId, Vec<Review>>,
    filter: RatingFilter,
) -> RankedRecipe {
    let reviews = reviews_by_recipe
        .get(&recipe.id)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    RankedRecipe::new(recipe.clone(), aggregate(reviews, filter))
}

fn compare_ranked(a: &RankedRecipe, b: &RankedRecipe) -> Ordering {
    b.average_rating
        .total_cmp(&a.average_rating)
        .then_with(|| b.review_count.cmp(&a.review_count))
        .then_with(|| a.recipe.id.cmp(&b.recipe.id))
}
