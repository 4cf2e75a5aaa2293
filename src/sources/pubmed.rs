//! PubMed source implementation using the E-utilities API.

use async_trait::async_trait;
use std::sync::Arc;

use super::xml::{parse_document, Element};
use super::{FetchError, Source};
use crate::config::{HttpConfig, PubMedConfig};
use crate::models::{ArticleRecord, AuthorRecord};
use crate::utils::HttpClient;

/// Default E-utilities base URL
pub const PUBMED_DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

const ESEARCH_ENDPOINT: &str = "esearch.fcgi";
const EFETCH_ENDPOINT: &str = "efetch.fcgi";

/// PubMed research source
///
/// Uses NCBI E-utilities: `esearch` for identifiers and `efetch` for one
/// full record per request.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    base_url: String,
    max_results: usize,
}

impl PubMedSource {
    /// Create a new PubMed source with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::from_config(&PubMedConfig::default(), &HttpConfig::default())
    }

    /// Create a source from endpoint and HTTP settings
    pub fn from_config(pubmed: &PubMedConfig, http: &HttpConfig) -> Result<Self, FetchError> {
        Ok(Self::with_client(
            Arc::new(HttpClient::with_config(http)?),
            &pubmed.base_url,
            pubmed.max_results,
        ))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>, base_url: &str, max_results: usize) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_results,
        }
    }

    /// Build the E-utilities search URL
    fn build_search_url(&self, query: &str) -> String {
        let params = [
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmode", "xml".to_string()),
            ("retmax", self.max_results.to_string()),
        ];
        self.endpoint_url(ESEARCH_ENDPOINT, &params)
    }

    /// Build the E-utilities fetch URL for a single PubMed ID
    fn build_fetch_url(&self, id: &str) -> String {
        let params = [
            ("db", "pubmed".to_string()),
            ("id", id.to_string()),
            ("retmode", "xml".to_string()),
        ];
        self.endpoint_url(EFETCH_ENDPOINT, &params)
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/{}?{}", self.base_url, endpoint, query)
    }

    /// Parse an esearch response into its identifiers
    fn parse_search_response(xml: &str) -> Result<Vec<String>, FetchError> {
        let root = parse_document(xml)?;

        if let Some(message) = root.child("ERROR").and_then(Element::text) {
            tracing::warn!(%message, "PubMed search reported an error");
        }

        Ok(root.descendants("Id").filter_map(Element::text).collect())
    }

    /// Parse an efetch response into the fields of its record
    fn parse_fetch_response(xml: &str) -> Result<ArticleRecord, FetchError> {
        let root = parse_document(xml)?;

        if let Some(message) = root.child("ERROR").and_then(Element::text) {
            return Err(FetchError::Parse(format!(
                "PubMed fetch reported an error: {}",
                message
            )));
        }

        Ok(ArticleRecord {
            title: root.find_text(&["ArticleTitle"]),
            publication_year: root.find_text(&["PubDate", "Year"]),
            corresponding_author_email: root.find_text(&["CorrespondingAuthor", "Email"]),
            authors: root.descendants("Author").map(parse_author).collect(),
        })
    }
}

/// Name parts and affiliation of one `<Author>` node.
///
/// Older records carry `<Affiliation>` directly under the author, current
/// ones nest it in `<AffiliationInfo>`; the first affiliation wins.
fn parse_author(author: &Element) -> AuthorRecord {
    AuthorRecord {
        last_name: child_text(author, &["LastName"]),
        fore_name: child_text(author, &["ForeName"]),
        affiliation: child_text(author, &["Affiliation"])
            .or_else(|| child_text(author, &["AffiliationInfo", "Affiliation"])),
    }
}

fn child_text(element: &Element, path: &[&str]) -> Option<String> {
    element.child_path(path).and_then(Element::text)
}

#[async_trait]
impl Source for PubMedSource {
    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, FetchError> {
        let url = self.build_search_url(query);
        tracing::debug!(%url, "Searching PubMed");

        let xml = self.client.get_text(&url).await?;
        tracing::trace!(body = %xml, "PubMed search response");

        let ids = Self::parse_search_response(&xml)?;
        tracing::debug!(count = ids.len(), "PubMed search returned identifiers");
        Ok(ids)
    }

    async fn fetch_record(&self, id: &str) -> Result<ArticleRecord, FetchError> {
        let url = self.build_fetch_url(id);
        tracing::debug!(pubmed_id = %id, %url, "Fetching PubMed record");

        let xml = self.client.get_text(&url).await?;
        tracing::trace!(pubmed_id = %id, body = %xml, "PubMed fetch response");

        Self::parse_fetch_response(&xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd">
<eSearchResult>
  <Count>3</Count><RetMax>3</RetMax><RetStart>0</RetStart>
  <IdList>
    <Id>39000003</Id>
    <Id>39000001</Id>
    <Id>39000002</Id>
  </IdList>
</eSearchResult>"#;

    const FETCH_XML: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">39000001</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate><Year>2024</Year><Month>Mar</Month></PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>Kinase inhibitors in <i>vivo</i>.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <ForeName>John</ForeName>
            <AffiliationInfo><Affiliation>Acme Pharma Inc., Boston, MA.</Affiliation></AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Doe</LastName>
            <Affiliation>Harvard University</Affiliation>
          </Author>
          <Author ValidYN="Y">
            <CollectiveName>Study Group</CollectiveName>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
    <CorrespondingAuthor><Email>john.smith@acme.example</Email></CorrespondingAuthor>
  </PubmedArticle>
</PubmedArticleSet>"#;

    fn source() -> PubMedSource {
        PubMedSource::new().unwrap()
    }

    #[test]
    fn test_build_search_url() {
        let url = source().build_search_url("machine learning");

        assert!(url.starts_with("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi?"));
        assert!(url.contains("db=pubmed"));
        assert!(url.contains("term=machine%20learning"));
        assert!(url.contains("retmax=100"));
        assert!(url.contains("retmode=xml"));
    }

    #[test]
    fn test_build_search_url_empty_query() {
        let url = source().build_search_url("");
        assert!(url.contains("term=&"));
    }

    #[test]
    fn test_build_fetch_url() {
        let pubmed = PubMedConfig {
            base_url: "http://localhost:8080/eutils/".to_string(),
            max_results: 10,
        };
        let source = PubMedSource::from_config(&pubmed, &HttpConfig::default()).unwrap();
        let url = source.build_fetch_url("12345");

        assert_eq!(
            url,
            "http://localhost:8080/eutils/efetch.fcgi?db=pubmed&id=12345&retmode=xml"
        );
    }

    #[test]
    fn test_build_search_url_uses_configured_max_results() {
        let pubmed = PubMedConfig {
            base_url: "http://localhost:8080/eutils".to_string(),
            max_results: 10,
        };
        let source = PubMedSource::from_config(&pubmed, &HttpConfig::default()).unwrap();
        let url = source.build_search_url("cancer");

        assert_eq!(
            url,
            "http://localhost:8080/eutils/esearch.fcgi?db=pubmed&term=cancer&retmode=xml&retmax=10"
        );
    }

    #[test]
    fn test_parse_search_response_keeps_service_order() {
        let ids = PubMedSource::parse_search_response(SEARCH_XML).unwrap();
        assert_eq!(ids, vec!["39000003", "39000001", "39000002"]);
    }

    #[test]
    fn test_parse_search_response_no_matches() {
        let xml = "<eSearchResult><Count>0</Count><IdList/></eSearchResult>";
        assert!(PubMedSource::parse_search_response(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_response_service_error_is_empty() {
        let xml = "<eSearchResult><ERROR>Empty term and query_key - nothing todo</ERROR></eSearchResult>";
        assert!(PubMedSource::parse_search_response(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_response_malformed() {
        let err = PubMedSource::parse_search_response("<eSearchResult><IdList>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_parse_fetch_response_fields() {
        let record = PubMedSource::parse_fetch_response(FETCH_XML).unwrap();

        assert_eq!(record.title.as_deref(), Some("Kinase inhibitors in vivo."));
        assert_eq!(record.publication_year.as_deref(), Some("2024"));
        assert_eq!(
            record.corresponding_author_email.as_deref(),
            Some("john.smith@acme.example")
        );
        assert_eq!(record.authors.len(), 3);

        assert_eq!(record.authors[0].display_name(), "Smith John");
        assert_eq!(
            record.authors[0].affiliation_text(),
            "Acme Pharma Inc., Boston, MA."
        );
        assert_eq!(record.authors[1].display_name(), "Unknown");
        assert_eq!(record.authors[1].affiliation_text(), "Harvard University");
        assert_eq!(record.authors[2].display_name(), "Unknown");
        assert_eq!(record.authors[2].affiliation_text(), "No Affiliation");
    }

    #[test]
    fn test_parse_fetch_response_missing_fields() {
        let record =
            PubMedSource::parse_fetch_response("<PubmedArticleSet><PubmedArticle/></PubmedArticleSet>")
                .unwrap();

        assert_eq!(record, ArticleRecord::default());
    }

    #[test]
    fn test_parse_fetch_response_service_error() {
        let xml = "<eFetchResult><ERROR>ID list is empty!</ERROR></eFetchResult>";
        let err = PubMedSource::parse_fetch_response(xml).unwrap_err();
        assert!(err.to_string().contains("ID list is empty!"));
    }

    #[test]
    fn test_parse_fetch_response_malformed() {
        let err = PubMedSource::parse_fetch_response("<html><body>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
