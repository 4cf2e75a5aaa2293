//! Literature database sources.
//!
//! A [`Source`] exposes the two operations the pipeline needs from a remote
//! literature database: searching for record identifiers and fetching a
//! single record. [`PubMedSource`] talks to NCBI E-utilities; [`MockSource`]
//! serves canned data for tests.

mod mock;
mod pubmed;
pub mod xml;

pub use mock::MockSource;
pub use pubmed::{PubMedSource, PUBMED_DEFAULT_BASE_URL};

use crate::models::ArticleRecord;
use async_trait::async_trait;

/// Interface to a remote literature database
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Identifiers of records matching `query`, in the order the service returns them
    async fn search(&self, query: &str) -> Result<Vec<String>, FetchError>;

    /// Fetch the full record for one identifier
    async fn fetch_record(&self, id: &str) -> Result<ArticleRecord, FetchError>;
}

/// Errors that can occur when talking to a source
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the response body could not be read
    #[error("Network error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response is not well-formed XML or has an unusable shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(String),
}

impl FetchError {
    /// Whether this is a transport-level failure (network fault or non-2xx status)
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}
