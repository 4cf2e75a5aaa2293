//! Search, fetch, classify and export.
//!
//! [`Fetcher`] runs the whole flow strictly sequentially: one search, then
//! one record fetch per identifier in the order the search returned them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify::Classifier;
use crate::models::PaperSummary;
use crate::output::{write_csv, OutputError};
use crate::sources::{FetchError, Source};

/// What to do when a single record cannot be fetched or parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole batch on the first bad record
    #[default]
    Abort,
    /// Log the failure and continue with the next identifier
    Skip,
}

/// Errors that end a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to search for \"{query}\": {source}")]
    Search {
        query: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to fetch PubMed ID {id}: {source}")]
    Fetch {
        id: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to write results: {0}")]
    Output(#[from] OutputError),
}

/// How a run ended when no error occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Summaries were written to `path`
    Written { path: PathBuf, count: usize },
    /// The search matched nothing; no records were fetched or written
    NoIdentifiers,
    /// Identifiers were found but no summary was produced; nothing was written
    NoPapers,
}

/// Drives a [`Source`] through search, detail fetches and classification
#[derive(Debug)]
pub struct Fetcher<S> {
    source: S,
    classifier: Classifier,
    policy: FailurePolicy,
}

impl<S: Source> Fetcher<S> {
    /// Create a fetcher with the default classifier that aborts on the first bad record
    pub fn new(source: S) -> Self {
        Self {
            source,
            classifier: Classifier::default(),
            policy: FailurePolicy::Abort,
        }
    }

    /// Use a custom classifier
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the per-record failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Identifiers matching `query`, in service order
    pub async fn search(&self, query: &str) -> Result<Vec<String>, FetchError> {
        tracing::info!(source = self.source.name(), %query, "Searching");
        self.source.search(query).await
    }

    /// Fetch and summarize each identifier, in input order.
    ///
    /// With [`FailurePolicy::Abort`] the first failure is returned and no
    /// summaries are produced; with [`FailurePolicy::Skip`] failing records
    /// are logged and left out.
    pub async fn fetch_details(&self, ids: &[String]) -> Result<Vec<PaperSummary>, PipelineError> {
        let mut papers = Vec::with_capacity(ids.len());
        let mut skipped = 0usize;

        for id in ids {
            match self.source.fetch_record(id).await {
                Ok(record) => papers.push(self.classifier.summarize(id.as_str(), record)),
                Err(err) => {
                    let transport = err.is_transport();
                    match self.policy {
                        FailurePolicy::Abort => {
                            tracing::error!(
                                pubmed_id = %id,
                                transport,
                                error = %err,
                                "Failed to fetch record"
                            );
                            return Err(PipelineError::Fetch {
                                id: id.clone(),
                                source: err,
                            });
                        }
                        FailurePolicy::Skip => {
                            tracing::warn!(pubmed_id = %id, transport, error = %err, "Skipping record");
                            skipped += 1;
                        }
                    }
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, fetched = papers.len(), "Some records were skipped");
        }

        Ok(papers)
    }

    /// Search, fetch every match and write the summaries to `output`.
    ///
    /// Nothing is written when the search matches nothing, when no summary is
    /// produced, or when any step fails.
    pub async fn run(&self, query: &str, output: &Path) -> Result<RunOutcome, PipelineError> {
        let ids = self.search(query).await.map_err(|source| {
            tracing::error!(%query, error = %source, "Search failed");
            PipelineError::Search {
                query: query.to_string(),
                source,
            }
        })?;

        if ids.is_empty() {
            tracing::warn!(%query, "No paper IDs found for the query. Please check your search terms.");
            return Ok(RunOutcome::NoIdentifiers);
        }
        tracing::info!(count = ids.len(), "Found paper(s)");

        let papers = self.fetch_details(&ids).await?;
        if papers.is_empty() {
            tracing::warn!(%query, "No papers found with valid details.");
            return Ok(RunOutcome::NoPapers);
        }
        tracing::info!(count = papers.len(), "Found papers with valid details");

        write_csv(output, &papers)?;

        Ok(RunOutcome::Written {
            path: output.to_path_buf(),
            count: papers.len(),
        })
    }
}
