//! Per-paper summary produced by affiliation classification.

/// Title written when the record has none
pub const NO_TITLE: &str = "No Title";

/// Publication date written when the record has none
pub const NO_DATE: &str = "No Date";

/// Email written when the record names no corresponding author email
pub const NO_EMAIL: &str = "No Email";

/// Separator used when a multi-valued field is rendered as a single string
pub const MULTI_VALUE_SEPARATOR: &str = "; ";

/// Summary of one fetched PubMed record.
///
/// `company_affiliations` behaves as an insertion-ordered set: it never holds
/// the same affiliation twice and keeps the order in which affiliations were
/// first seen. `non_academic_authors` keeps author order and may repeat names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperSummary {
    /// PubMed identifier (PMID)
    pub pubmed_id: String,

    pub title: Option<String>,

    /// Year component of the journal issue's publication date
    pub publication_year: Option<String>,

    /// Authors whose affiliation is neither academic nor a company
    pub non_academic_authors: Vec<String>,

    /// Distinct pharmaceutical/biotech affiliation strings
    pub company_affiliations: Vec<String>,

    pub corresponding_author_email: Option<String>,
}

impl PaperSummary {
    /// Create a summary with only the identifier set
    pub fn new(pubmed_id: impl Into<String>) -> Self {
        Self {
            pubmed_id: pubmed_id.into(),
            ..Self::default()
        }
    }

    /// Record a company affiliation unless it is already present
    pub fn add_company_affiliation(&mut self, affiliation: &str) {
        if !self.company_affiliations.iter().any(|a| a == affiliation) {
            self.company_affiliations.push(affiliation.to_string());
        }
    }

    /// Record a non-academic author
    pub fn add_non_academic_author(&mut self, name: impl Into<String>) {
        self.non_academic_authors.push(name.into());
    }

    pub fn title_or_sentinel(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_TITLE)
    }

    pub fn publication_year_or_sentinel(&self) -> &str {
        self.publication_year.as_deref().unwrap_or(NO_DATE)
    }

    pub fn email_or_sentinel(&self) -> &str {
        self.corresponding_author_email.as_deref().unwrap_or(NO_EMAIL)
    }

    /// Non-academic authors joined with [`MULTI_VALUE_SEPARATOR`]
    pub fn non_academic_authors_joined(&self) -> String {
        self.non_academic_authors.join(MULTI_VALUE_SEPARATOR)
    }

    /// Company affiliations joined with [`MULTI_VALUE_SEPARATOR`]
    pub fn company_affiliations_joined(&self) -> String {
        self.company_affiliations.join(MULTI_VALUE_SEPARATOR)
    }
}
