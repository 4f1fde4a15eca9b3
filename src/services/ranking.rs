use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::config::{AppConfig, RankingSettings};
use crate::errors::StoreResult;
use crate::rating::{self, RankedRecipe};
use crate::store::{with_timeout, RecipeStore, ReviewStore};

/// Serves the "best recipes" view
pub struct RankingService {
    recipes: Arc<dyn RecipeStore>,
    reviews: Arc<dyn ReviewStore>,
    settings: RankingSettings,
    read_timeout: Duration,
}

impl RankingService {
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        reviews: Arc<dyn ReviewStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            recipes,
            reviews,
            settings: config.ranking.clone(),
            read_timeout: config.store.read_timeout(),
        }
    }

    /// Best rated recipes, recomputed from a fresh read of both stores.
    ///
    /// Any failed read fails the whole call; a partial ranking is never returned.
    pub async fn best_recipes(&self, limit: Option<usize>) -> StoreResult<Vec<RankedRecipe>> {
        let limit = limit.unwrap_or(self.settings.default_limit);

        let recipes = with_timeout(
            "list recipes",
            self.read_timeout,
            self.recipes.list_all_recipes(),
        )
        .await?;
        let reviews = with_timeout(
            "list reviews",
            self.read_timeout,
            self.reviews.list_all_reviews(),
        )
        .await?;
        debug!(
            "Ranking {} recipes from {} reviews ({} filter)",
            recipes.len(),
            reviews.len(),
            self.settings.rating_filter.as_str()
        );

        let grouped = rating::group_by_recipe(reviews);
        Ok(rating::rank(
            &recipes,
            &grouped,
            limit,
            self.settings.rating_filter,
        ))
    }
}
