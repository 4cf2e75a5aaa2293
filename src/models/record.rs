//! Raw bibliographic fields extracted from a single PubMed record.

/// Display name used when an author lacks a last or fore name
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Affiliation text used when an author has no affiliation
pub const NO_AFFILIATION: &str = "No Affiliation";

/// One author node of a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorRecord {
    /// Family name
    pub last_name: Option<String>,

    /// Given name(s)
    pub fore_name: Option<String>,

    /// Raw institutional affiliation
    pub affiliation: Option<String>,
}

impl AuthorRecord {
    /// Create an author with both name parts and an optional affiliation
    pub fn new(
        last_name: impl Into<String>,
        fore_name: impl Into<String>,
        affiliation: Option<&str>,
    ) -> Self {
        Self {
            last_name: Some(last_name.into()),
            fore_name: Some(fore_name.into()),
            affiliation: affiliation.map(str::to_string),
        }
    }

    /// `"<last> <fore>"`, or [`UNKNOWN_AUTHOR`] when either part is missing
    pub fn display_name(&self) -> String {
        match (&self.last_name, &self.fore_name) {
            (Some(last), Some(fore)) => format!("{} {}", last, fore),
            _ => UNKNOWN_AUTHOR.to_string(),
        }
    }

    /// The raw affiliation, or [`NO_AFFILIATION`] when absent
    pub fn affiliation_text(&self) -> &str {
        self.affiliation.as_deref().unwrap_or(NO_AFFILIATION)
    }
}

/// Fields looked up in a fetched record, before affiliation classification.
///
/// Every optional field is `None` when its path is absent from the record;
/// placeholder strings are only substituted when the summary is written out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: Option<String>,
    pub publication_year: Option<String>,
    pub corresponding_author_email: Option<String>,
    pub authors: Vec<AuthorRecord>,
}

impl ArticleRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the article title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the publication year
    pub fn publication_year(mut self, year: impl Into<String>) -> Self {
        self.publication_year = Some(year.into());
        self
    }

    /// Set the corresponding author's email
    pub fn corresponding_author_email(mut self, email: impl Into<String>) -> Self {
        self.corresponding_author_email = Some(email.into());
        self
    }

    /// Append an author
    pub fn author(mut self, author: AuthorRecord) -> Self {
        self.authors.push(author);
        self
    }
}
