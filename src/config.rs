use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::api_connection::endpoints::SPOONACULAR_BASE_URL;
use crate::recipe_query::{QueryConfig, DEFAULT_RESULT_LIMIT};

pub const API_KEY_ENV_VAR: &str = "SPOONACULAR_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "SPOONACULAR_BASE_URL";
pub const RESULT_LIMIT_ENV_VAR: &str = "RECIPE_RESULT_LIMIT";
pub const REQUEST_TIMEOUT_ENV_VAR: &str = "RECIPE_REQUEST_TIMEOUT_SECS";
pub const STORE_PATH_ENV_VAR: &str = "FRIDGE_STORE_PATH";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORE_PATH: &str = "fridge.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(&'static str),
    #[error("Invalid value for {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub result_limit: u32,
    pub request_timeout: Duration,
    pub store_path: PathBuf,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_ENV_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_ENV_VAR))?;

        Ok(Self {
            api_key,
            base_url: lookup(BASE_URL_ENV_VAR).unwrap_or_else(|| SPOONACULAR_BASE_URL.to_string()),
            result_limit: parse_number(&lookup, RESULT_LIMIT_ENV_VAR, DEFAULT_RESULT_LIMIT)?,
            request_timeout: Duration::from_secs(parse_number(
                &lookup,
                REQUEST_TIMEOUT_ENV_VAR,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            store_path: lookup(STORE_PATH_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
        })
    }

    pub fn query_config(&self) -> QueryConfig {
        QueryConfig::new(self.api_key.clone(), self.result_limit)
    }
}

fn parse_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
