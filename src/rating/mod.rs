pub mod aggregate;
pub mod ranking;
pub mod types;

pub use aggregate::aggregate;
pub use ranking::{group_by_recipe, rank, DEFAULT_BEST_RECIPES_LIMIT};
pub use types::{AggregateRating, RankedRecipe, RatingFilter};
