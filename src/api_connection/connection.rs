use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::endpoints::FIND_BY_INGREDIENTS_PATH;
use crate::config::AppConfig;
use crate::recipe_query::RecipeQuery;

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key is missing for the recipe query")]
    MissingApiKey,
    /// Built with the request URL stripped, since the query string carries the API key.
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

/// Anything that can answer a recipe query with the raw response body.
pub trait RecipeLookup: Send + Sync {
    fn find_by_ingredients(
        &self,
        query: &RecipeQuery,
    ) -> impl Future<Output = Result<String, ApiConnectionError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SpoonacularClient {
    client: Client,
    base_url: String,
}

impl SpoonacularClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiConnectionError> {
        let client = Client::builder().timeout(timeout).build().map_err(redacted)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiConnectionError> {
        Self::new(&config.base_url, config.request_timeout)
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, FIND_BY_INGREDIENTS_PATH)
    }
}

impl RecipeLookup for SpoonacularClient {
    async fn find_by_ingredients(&self, query: &RecipeQuery) -> Result<String, ApiConnectionError> {
        if query.api_key().trim().is_empty() {
            return Err(ApiConnectionError::MissingApiKey);
        }

        let url = self.endpoint_url();
        debug!(%url, ingredients = query.ingredients().len(), "Requesting recipes");

        let response = self
            .client
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(redacted)?;

        if response.status().is_success() {
            Ok(response.text().await.map_err(redacted)?)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            warn!(%status, "Recipe API rejected the request");
            Err(ApiConnectionError::ApiError { status, error_body })
        }
    }
}

fn redacted(err: reqwest::Error) -> ApiConnectionError {
    ApiConnectionError::NetworkError(err.without_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fridge::Fridge;
    use crate::recipe_query::{build_query, QueryConfig};

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let client = SpoonacularClient::new("https://api.example.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint_url(),
            "https://api.example.com/recipes/findByIngredients"
        );
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_network_error() {
        let client = SpoonacularClient::new("not a url", Duration::from_secs(1)).unwrap();
        let fridge = Fridge::from_names(["milk"]);
        let query = build_query(&fridge, &QueryConfig::new("key", 5)).unwrap();

        let result = client.find_by_ingredients(&query).await;
        assert!(matches!(result, Err(ApiConnectionError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_network_error_does_not_expose_api_key() {
        // Nothing listens on port 1, so the connection is refused.
        let client = SpoonacularClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let fridge = Fridge::from_names(["egg"]);
        let query = build_query(&fridge, &QueryConfig::new("SUPERSECRET", 5)).unwrap();

        let err = client.find_by_ingredients(&query).await.unwrap_err();
        assert!(matches!(err, ApiConnectionError::NetworkError(_)));
        assert!(!err.to_string().contains("SUPERSECRET"), "{}", err);
        assert!(!format!("{:?}", err).contains("SUPERSECRET"));
    }

    #[tokio::test]
    async fn test_blank_api_key_is_rejected_before_request() {
        let client = SpoonacularClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let fridge = Fridge::from_names(["egg"]);
        let query = build_query(&fridge, &QueryConfig::new("  ", 5)).unwrap();

        let result = client.find_by_ingredients(&query).await;
        assert!(matches!(result, Err(ApiConnectionError::MissingApiKey)));
    }
}
