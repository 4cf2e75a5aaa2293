//! CSV export of paper summaries.

use serde::Serialize;
use std::path::Path;

use crate::models::PaperSummary;

/// File written when no output path is given
pub const DEFAULT_OUTPUT_FILE: &str = "papers.csv";

/// Header row of the exported file
pub const CSV_HEADER: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Errors that can occur while writing the export
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One exported row, with placeholders substituted for missing fields
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    pubmed_id: &'a str,
    title: &'a str,
    publication_date: &'a str,
    non_academic_authors: String,
    company_affiliations: String,
    corresponding_author_email: &'a str,
}

impl<'a> From<&'a PaperSummary> for CsvRow<'a> {
    fn from(paper: &'a PaperSummary) -> Self {
        Self {
            pubmed_id: &paper.pubmed_id,
            title: paper.title_or_sentinel(),
            publication_date: paper.publication_year_or_sentinel(),
            non_academic_authors: paper.non_academic_authors_joined(),
            company_affiliations: paper.company_affiliations_joined(),
            corresponding_author_email: paper.email_or_sentinel(),
        }
    }
}

/// Write `papers` to `path` as CSV, replacing any existing file.
///
/// The header row is always written, followed by one row per paper in the
/// given order.
pub fn write_csv(path: &Path, papers: &[PaperSummary]) -> Result<(), OutputError> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(CSV_HEADER)?;
    for paper in papers {
        writer.serialize(CsvRow::from(paper))?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = papers.len(), "Results saved");
    Ok(())
}
