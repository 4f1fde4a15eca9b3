use crate::domain::Review;

use super::types::{AggregateRating, RatingFilter, RatingValue};

/// Averages the qualifying ratings of one recipe's reviews.
///
/// The caller partitions reviews by recipe; nothing here checks `recipe_id`.
/// Reviews rejected by `filter` are skipped rather than counted as zero. The
/// mean is rounded to one decimal place, half away from zero.
pub fn aggregate(reviews: &[Review], filter: RatingFilter) -> AggregateRating {
    let ratings = extract_ratings(reviews, filter);

    if ratings.is_empty() {
        return AggregateRating::default();
    }

    AggregateRating {
        average_rating: round_to_one_decimal(calculate_mean(&ratings)),
        review_count: ratings.len(),
    }
}

fn extract_ratings(reviews: &[Review], filter: RatingFilter) -> Vec<RatingValue> {
    reviews
        .iter()
        .filter_map(|review| filter.accept(review.rating))
        .collect()
}

fn calculate_mean(ratings: &[RatingValue]) -> f64 {
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    sum as f64 / ratings.len() as f64
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
