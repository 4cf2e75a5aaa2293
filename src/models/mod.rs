//! Core data models for fetched records and paper summaries.

mod paper;
mod record;

pub use paper::{PaperSummary, MULTI_VALUE_SEPARATOR, NO_DATE, NO_EMAIL, NO_TITLE};
pub use record::{ArticleRecord, AuthorRecord, NO_AFFILIATION, UNKNOWN_AUTHOR};
