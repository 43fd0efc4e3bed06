use tracing::debug;

use crate::error::FridgeError;
use crate::fridge::Fridge;

pub const DEFAULT_RESULT_LIMIT: u32 = 5;

/// Settings every recipe query is built with.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    api_key: String,
    result_limit: u32,
}

impl QueryConfig {
    pub fn new(api_key: impl Into<String>, result_limit: u32) -> Self {
        Self {
            api_key: api_key.into(),
            result_limit,
        }
    }

    pub fn result_limit(&self) -> u32 {
        self.result_limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    ingredients: Vec<String>,
    result_limit: u32,
    api_key: String,
}

impl RecipeQuery {
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn result_limit(&self) -> u32 {
        self.result_limit
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Comma-separated ingredient list as the recipe API expects it.
    pub fn ingredients_param(&self) -> String {
        self.ingredients.join(",")
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ingredients", self.ingredients_param()),
            ("number", self.result_limit.to_string()),
            ("apiKey", self.api_key.clone()),
        ]
    }
}

/// An empty fridge is rejected here rather than sent upstream.
pub fn build_query(fridge: &Fridge, config: &QueryConfig) -> Result<RecipeQuery, FridgeError> {
    if fridge.is_empty() {
        return Err(FridgeError::FridgeEmpty);
    }

    let ingredients: Vec<String> = fridge.iter().map(|i| i.as_str().to_string()).collect();
    debug!(
        ingredients = ingredients.len(),
        result_limit = config.result_limit,
        "Built recipe query"
    );

    Ok(RecipeQuery {
        ingredients,
        result_limit: config.result_limit,
        api_key: config.api_key.clone(),
    })
}
