//! Trello API client
//!
//! Provides a typed HTTP client for interacting with the Trello REST API.
//! Authentication is Trello-style: `key` and `token` query parameters are
//! appended to every request URL.

use crate::access_control::BoardLookup;
use crate::config::TrelloConfig;
use crate::error::{AppError, ConfigError, TrelloError, TrelloResult};
use crate::trello::types::{Board, Card, TrelloList};
use crate::util::SecretString;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Trello API client
pub struct TrelloClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    token: SecretString,
    max_retries: u32,
}

impl TrelloClient {
    /// Create a new Trello client from configuration
    pub fn new(config: &TrelloConfig) -> Result<Self, AppError> {
        let api_key = config.api_key.clone().ok_or(ConfigError::Missing {
            field: "trello.api_key".to_string(),
        })?;
        let token = config.token.clone().ok_or(ConfigError::Missing {
            field: "trello.token".to_string(),
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(format!("trello-mcp/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TrelloError::Request)?;

        Ok(Self {
            http,
            base_url: config.api_url(),
            api_key,
            token,
            max_retries: config.max_retries,
        })
    }

    /// Build a URL for an API endpoint, appending the auth query parameters
    fn url(&self, endpoint: &str) -> String {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}key={}&token={}",
            self.base_url,
            endpoint,
            sep,
            urlencoding::encode(self.api_key.expose_secret()),
            urlencoding::encode(self.token.expose_secret()),
        )
    }

    /// Execute a request with retries
    async fn execute(&self, request: RequestBuilder) -> TrelloResult<Response> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
                debug!("Retrying request (attempt {})", attempt + 1);
            }

            let req = request
                .try_clone()
                .ok_or_else(|| TrelloError::InvalidResponse("Cannot clone request".to_string()))?;

            match req.send().await {
                Ok(response) => {
                    return self.handle_response(response).await;
                }
                Err(e) => {
                    warn!("Request failed: {}", e);
                    last_error = Some(TrelloError::Request(e));

                    // Only retry on connection/timeout errors
                    if !is_retryable(last_error.as_ref().unwrap()) {
                        break;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| TrelloError::InvalidResponse("Unknown error".to_string())))
    }

    /// Handle API response
    async fn handle_response(&self, response: Response) -> TrelloResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            // Trello rate-limit windows are 10 seconds per token
            return Err(TrelloError::RateLimited { retry_after: 10 });
        }

        Err(TrelloError::from_response(status.as_u16(), &body))
    }

    /// Make a GET request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> TrelloResult<T> {
        let request = self.http.get(self.url(endpoint));

        let response = self.execute(request).await?;
        let data = response.json().await.map_err(|e| {
            TrelloError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        Ok(data)
    }

    /// Make a POST request
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> TrelloResult<T> {
        let request = self.http.post(self.url(endpoint)).json(body);

        let response = self.execute(request).await?;
        let data = response.json().await.map_err(|e| {
            TrelloError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        Ok(data)
    }

    /// Make a PUT request
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> TrelloResult<T> {
        let request = self.http.put(self.url(endpoint)).json(body);

        let response = self.execute(request).await?;
        let data = response.json().await.map_err(|e| {
            TrelloError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        Ok(data)
    }

    /// Make a DELETE request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn delete(&self, endpoint: &str) -> TrelloResult<()> {
        let request = self.http.delete(self.url(endpoint));

        self.execute(request).await?;
        Ok(())
    }
}

/// Entity lookups consumed by the access gate.
///
/// Trello accepts either a short link or the canonical id in the path
/// segment; the response body always carries the canonical `id`.
#[async_trait]
impl BoardLookup for TrelloClient {
    async fn board(&self, id: &str) -> TrelloResult<Board> {
        self.get(&format!("/boards/{}", urlencoding::encode(id)))
            .await
    }

    async fn card(&self, id: &str) -> TrelloResult<Card> {
        self.get(&format!("/cards/{}", urlencoding::encode(id)))
            .await
    }

    async fn list(&self, id: &str) -> TrelloResult<TrelloList> {
        self.get(&format!("/lists/{}", urlencoding::encode(id)))
            .await
    }
}

/// Check if an error is retryable.
///
/// Only transport-level failures (connect, timeout) are retried. Once the
/// server has answered, the status is mapped by `handle_response` and
/// returned to the caller immediately.
fn is_retryable(error: &TrelloError) -> bool {
    match error {
        TrelloError::Request(e) => e.is_timeout() || e.is_connect(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_creds() -> TrelloClient {
        let config = TrelloConfig {
            api_key: Some(SecretString::new("test-key")),
            token: Some(SecretString::new("test-token")),
            ..Default::default()
        };
        TrelloClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_appends_auth_params() {
        let client = client_with_creds();
        let url = client.url("/boards/abc123");
        assert_eq!(
            url,
            "https://api.trello.com/1/boards/abc123?key=test-key&token=test-token"
        );
    }

    #[test]
    fn test_url_with_existing_query() {
        let client = client_with_creds();
        let url = client.url("/boards/abc123/lists?filter=open");
        assert!(url.contains("?filter=open&key=test-key&token=test-token"));
    }

    #[test]
    fn test_new_requires_credentials() {
        let config = TrelloConfig::default();
        assert!(TrelloClient::new(&config).is_err());
    }

    #[test]
    fn test_is_retryable_rejects_server_answers() {
        // Anything handle_response produced means the server answered; the
        // error goes straight back to the caller
        assert!(!is_retryable(&TrelloError::RateLimited { retry_after: 10 }));
        assert!(!is_retryable(&TrelloError::Api {
            status: 503,
            message: "Service unavailable".to_string()
        }));
        assert!(!is_retryable(&TrelloError::Api {
            status: 400,
            message: "Bad request".to_string()
        }));
        assert!(!is_retryable(&TrelloError::Unauthorized));
    }
}
