use std::fmt;

use async_trait::async_trait;

use super::types::Movie;

/// Errors that can occur while searching the movie database.
/// Every variant is recoverable: the screen keeps its previous results.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Client misconfigured (bad base URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The service answered with an error status or an error payload.
    Api { status: u16, message: String },
    /// The response body was not a search payload.
    Parse(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Config(msg) => write!(f, "config error: {msg}"),
            SearchError::Network(msg) => write!(f, "network error: {msg}"),
            SearchError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            SearchError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for SearchError {}

#[async_trait]
pub trait MovieSearch: Send + Sync {
    /// Returns the name of the backing service.
    fn name(&self) -> &str;

    /// Searches titles matching `query`. The query is sent verbatim, empty included.
    async fn search(&self, query: &str) -> Result<Vec<Movie>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_display() {
        let err = SearchError::Api {
            status: 401,
            message: "Invalid API key!".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 401): Invalid API key!");
        assert_eq!(
            SearchError::Network("refused".into()).to_string(),
            "network error: refused"
        );
    }
}
