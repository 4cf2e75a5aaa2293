//! Author affiliation classification.
//!
//! Affiliations are classified with an ordered list of keyword rules. Each
//! rule matches when the lower-cased affiliation contains any of its
//! keywords; the first matching rule decides the class and authors matching
//! no rule get the fallback class.
//!
//! The default rules are:
//!
//! 1. `pharma`, `biotech` → [`AffiliationClass::Company`]
//! 2. `university`, `lab` → [`AffiliationClass::Academic`]
//! 3. anything else → [`AffiliationClass::NonAcademic`]
//!
//! Company keywords are checked first, so `"University Biotech Lab"` is a
//! company affiliation.
//!
//! ```rust
//! use pubmed_affiliations::classify::{AffiliationClass, Classifier};
//!
//! let classifier = Classifier::default();
//! assert_eq!(classifier.classify("Acme Pharma Inc."), AffiliationClass::Company);
//! assert_eq!(classifier.classify("City University Lab"), AffiliationClass::Academic);
//! assert_eq!(classifier.classify("Ministry of Health"), AffiliationClass::NonAcademic);
//! ```

use crate::config::ClassifierConfig;
use crate::models::{ArticleRecord, PaperSummary};

/// Kind of institution an affiliation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffiliationClass {
    /// Pharmaceutical or biotech company
    Company,
    /// University or research lab
    Academic,
    /// Neither academic nor a recognized company
    NonAcademic,
}

/// A keyword rule mapping matching affiliations to a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationRule {
    class: AffiliationClass,
    keywords: Vec<String>,
}

impl AffiliationRule {
    /// Create a rule; keywords are matched case-insensitively
    pub fn new<I, S>(class: AffiliationClass, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            class,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// `affiliation` must already be lower-cased
    fn matches_lowercase(&self, affiliation: &str) -> bool {
        self.keywords.iter().any(|k| affiliation.contains(k.as_str()))
    }
}

/// Priority-ordered affiliation classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<AffiliationRule>,
    fallback: AffiliationClass,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl Classifier {
    /// Create a classifier from an ordered rule list and a fallback class
    pub fn new(rules: Vec<AffiliationRule>, fallback: AffiliationClass) -> Self {
        Self { rules, fallback }
    }

    /// Company rule first, then the academic rule, falling back to non-academic
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            vec![
                AffiliationRule::new(AffiliationClass::Company, &config.company_keywords),
                AffiliationRule::new(AffiliationClass::Academic, &config.academic_keywords),
            ],
            AffiliationClass::NonAcademic,
        )
    }

    pub fn rules(&self) -> &[AffiliationRule] {
        &self.rules
    }

    /// Classify a raw affiliation string
    pub fn classify(&self, affiliation: &str) -> AffiliationClass {
        let lowered = affiliation.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches_lowercase(&lowered))
            .map(|rule| rule.class)
            .unwrap_or(self.fallback)
    }

    /// Build the summary for a fetched record, classifying authors in order.
    ///
    /// Company authors contribute their raw affiliation string, non-academic
    /// authors their display name, and academic authors nothing. An author
    /// without an affiliation is classified by the "No Affiliation" text.
    pub fn summarize(&self, pubmed_id: impl Into<String>, record: ArticleRecord) -> PaperSummary {
        let mut summary = PaperSummary::new(pubmed_id);

        for author in &record.authors {
            let affiliation = author.affiliation_text();
            match self.classify(affiliation) {
                AffiliationClass::Company => summary.add_company_affiliation(affiliation),
                AffiliationClass::NonAcademic => {
                    summary.add_non_academic_author(author.display_name())
                }
                AffiliationClass::Academic => {}
            }
        }

        summary.title = record.title;
        summary.publication_year = record.publication_year;
        summary.corresponding_author_email = record.corresponding_author_email;
        summary
    }
}
