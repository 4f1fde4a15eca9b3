use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::rating::{RatingFilter, DEFAULT_BEST_RECIPES_LIMIT};

#[derive(Debug, Clone)]
pub struct RankingSettings {
    pub default_limit: usize,
    pub rating_filter: RatingFilter,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_BEST_RECIPES_LIMIT,
            rating_filter: RatingFilter::Truthy,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub database_path: String,
    pub read_timeout_secs: u64,
}

impl StoreSettings {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: "recipes.db".to_string(),
            read_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ranking: RankingSettings,
    pub store: StoreSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            ranking: RankingSettings::default(),
            store: StoreSettings::default(),
        }
    }

    /// Defaults overridden by whichever variables are set in the environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(path) = lookup("DATABASE_PATH") {
            config.store.database_path = path;
        }
        if let Some(secs) = parse_var(&lookup, "STORE_READ_TIMEOUT_SECS")? {
            if secs == 0 {
                anyhow::bail!("Invalid value for STORE_READ_TIMEOUT_SECS: must be at least 1");
            }
            config.store.read_timeout_secs = secs;
        }
        if let Some(limit) = parse_var(&lookup, "RANKING_DEFAULT_LIMIT")? {
            config.ranking.default_limit = limit;
        }
        if let Some(filter) = parse_var(&lookup, "RANKING_RATING_FILTER")? {
            config.ranking.rating_filter = filter;
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{}", e))
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}
