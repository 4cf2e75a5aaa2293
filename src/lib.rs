//! # PubMed Affiliations
//!
//! Searches PubMed, fetches the matching records and flags papers with
//! pharmaceutical or biotech author affiliations, exporting a CSV summary.
//!
//! ## Architecture
//!
//! - [`sources`]: literature database access (NCBI E-utilities) behind the [`Source`] trait
//! - [`classify`]: ordered keyword rules classifying author affiliations
//! - [`models`]: extracted records and per-paper summaries
//! - [`pipeline`]: sequential search → fetch → classify → export flow
//! - [`output`]: CSV export
//! - [`config`]: configuration management
//! - [`utils`]: HTTP client

pub mod classify;
pub mod config;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use classify::Classifier;
pub use models::PaperSummary;
pub use pipeline::{Fetcher, RunOutcome};
pub use sources::{PubMedSource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
