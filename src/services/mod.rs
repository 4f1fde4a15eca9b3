pub mod ranking;
pub mod recipes;
pub mod reviews;
pub mod server;

pub use ranking::RankingService;
pub use recipes::RecipeService;
pub use reviews::ReviewService;
