use serde::{Deserialize, Serialize};

/// Value OMDb puts in `Poster` when a title has no artwork.
pub const POSTER_PLACEHOLDER: &str = "N/A";

/// Error text OMDb returns for a query with zero matches.
pub const NOT_FOUND_ERROR: &str = "Movie not found!";

/// A single search hit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster", default = "placeholder_poster")]
    pub poster: String,
}

fn placeholder_poster() -> String {
    POSTER_PLACEHOLDER.to_string()
}

impl Movie {
    /// The poster URL, or `None` when OMDb reported the placeholder.
    pub fn poster_url(&self) -> Option<&str> {
        let poster = self.poster.trim();
        if poster.is_empty() || poster == POSTER_PLACEHOLDER {
            None
        } else {
            Some(poster)
        }
    }
}

/// Body of `GET /?s=...`.
///
/// Success: `{"Search": [...], "totalResults": "42", "Response": "True"}`
/// Failure: `{"Response": "False", "Error": "Movie not found!"}`
#[derive(Deserialize, Debug, Default)]
pub struct SearchResponse {
    #[serde(rename = "Search")]
    pub search: Option<Vec<Movie>>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Whether the body looks like an OMDb answer at all. Gateways and
    /// proxies can return arbitrary JSON that carries neither field.
    pub fn is_recognized(&self) -> bool {
        self.response.is_some() || self.search.is_some()
    }

    pub fn is_success(&self) -> bool {
        match self.response.as_deref() {
            Some(r) => r.eq_ignore_ascii_case("true"),
            None => self.search.is_some(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.error.as_deref() == Some(NOT_FOUND_ERROR)
    }
}
