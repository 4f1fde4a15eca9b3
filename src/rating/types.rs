use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Recipe;

pub type RatingValue = i32;

/// Average star rating of one recipe plus the number of ratings behind it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    pub average_rating: f64,
    pub review_count: usize,
}

/// Recipe enriched with its aggregate rating. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub average_rating: f64,
    pub review_count: usize,
}

impl RankedRecipe {
    pub fn new(recipe: Recipe, aggregate: AggregateRating) -> Self {
        Self {
            recipe,
            average_rating: aggregate.average_rating,
            review_count: aggregate.review_count,
        }
    }
}

/// Decides which stored ratings count towards an average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingFilter {
    /// Absent and zero ratings both mean "not rated"
    #[default]
    Truthy,
    /// Only absent ratings are skipped; a stored zero counts
    Strict,
}

impl RatingFilter {
    pub fn accept(&self, rating: Option<RatingValue>) -> Option<RatingValue> {
        match self {
            RatingFilter::Truthy => rating.filter(|&value| value != 0),
            RatingFilter::Strict => rating,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RatingFilter::Truthy => "truthy",
            RatingFilter::Strict => "strict",
        }
    }
}

impl FromStr for RatingFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "truthy" => Ok(RatingFilter::Truthy),
            "strict" => Ok(RatingFilter::Strict),
            other => anyhow::bail!("Unknown rating filter: {}", other),
        }
    }
}
