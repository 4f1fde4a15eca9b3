pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod rating;
pub mod services;
pub mod store;

#[cfg(test)]
pub mod test_support;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use log::info;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::services::server::ServerService;
use crate::services::{RankingService, ReviewService};
use crate::store::SqliteStore;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env()?;
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init(reset: bool) -> Result<()> {
    let config = AppConfig::from_env()?;
    let pool = database::create_pool(&config.store.database_path)?;
    let mut conn = database::get_connection(&pool)?;

    if reset {
        database::setup::reset_database(&mut conn)?;
        info!("Reset database {}", config.store.database_path);
    } else {
        database::setup::init_database(&mut conn)?;
        info!("Initialized database {}", config.store.database_path);
    }
    Ok(())
}

pub fn handle_best(limit: Option<usize>) -> Result<()> {
    let config = AppConfig::from_env()?;
    let store = open_store(&config)?;
    let service = RankingService::new(store.clone(), store, &config);

    let runtime = tokio::runtime::Runtime::new()?;
    let ranked = runtime.block_on(service.best_recipes(limit))?;

    if ranked.is_empty() {
        println!("{}", "No rated recipes yet".yellow());
        return Ok(());
    }

    for (position, entry) in ranked.iter().enumerate() {
        println!(
            "{:>2}. {} {} ({} reviews)",
            position + 1,
            entry.recipe.title.bold(),
            format!("{:.1}", entry.average_rating).green(),
            entry.review_count
        );
    }
    Ok(())
}

pub fn handle_rating(recipe_id: &str) -> Result<()> {
    let config = AppConfig::from_env()?;
    let store = open_store(&config)?;
    let service = ReviewService::new(store.clone(), store, &config);

    let runtime = tokio::runtime::Runtime::new()?;
    let aggregate = runtime.block_on(service.average_rating_for_recipe(recipe_id))?;

    if aggregate.review_count == 0 {
        println!("{} has no ratings", recipe_id.bold());
    } else {
        println!(
            "{} {} ({} reviews)",
            recipe_id.bold(),
            format!("{:.1}", aggregate.average_rating).green(),
            aggregate.review_count
        );
    }
    Ok(())
}

/// Opens the configured database, creating the schema on first use
fn open_store(config: &AppConfig) -> Result<Arc<SqliteStore>> {
    let pool = database::create_pool(&config.store.database_path)?;
    {
        let mut conn = database::get_connection(&pool)?;
        database::setup::init_database(&mut conn)?;
    }
    Ok(Arc::new(SqliteStore::new(pool)))
}
