//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// Non-success statuses are returned as responses, not errors; only
    /// transport failures produce `Err`.
    fn get(&self, url: &str) -> Result<HttpResponse, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("everylot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e.without_url())))?;

        let status = response.status().as_u16();

        // Read response body
        let body = response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e.without_url())))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock HTTP client for testing.
    ///
    /// Answers requests with canned responses in order and records every URL.
    pub struct MockHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, ProviderError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(responses: Vec<Result<HttpResponse, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// A client with no canned responses; every request fails.
        pub fn empty() -> Self {
            Self::new(Vec::new())
        }

        /// URLs requested so far.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::HttpError("No canned response".to_string())))
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::new(vec![Ok(HttpResponse::ok(vec![1, 2, 3, 4]))]);

        let result = mock.get("http://example.com");
        assert!(result.is_ok());
        assert_eq!(result.unwrap().body, vec![1, 2, 3, 4]);
        assert_eq!(mock.requests(), vec!["http://example.com".to_string()]);
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::new(vec![Err(ProviderError::HttpError(
            "Test error".to_string(),
        ))]);

        let result = mock.get("http://example.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_mock_client_runs_dry() {
        let mock = MockHttpClient::empty();
        assert!(mock.get("http://example.com").is_err());
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::ok(Vec::new()).is_success());
        let not_found = HttpResponse {
            status: 404,
            body: Vec::new(),
        };
        assert!(!not_found.is_success());
        let redirect = HttpResponse {
            status: 302,
            body: Vec::new(),
        };
        assert!(!redirect.is_success());
    }
}
