pub mod connection;
pub mod recipes;
pub mod reviews;
pub mod setup;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
