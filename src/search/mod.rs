pub mod omdb;
pub mod provider;
pub mod types;

pub use omdb::OmdbClient;
pub use provider::{MovieSearch, SearchError};
pub use types::{Movie, SearchResponse, POSTER_PLACEHOLDER};
