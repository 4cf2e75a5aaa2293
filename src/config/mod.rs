//! Configuration management.
//!
//! Settings come from built-in defaults, an optional TOML file and
//! `PUBMED_AFFILIATIONS__*` environment variables, in increasing priority.
//!
//! ```toml
//! [pubmed]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! max_results = 100
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [classifier]
//! company_keywords = ["pharma", "biotech"]
//! academic_keywords = ["university", "lab"]
//!
//! [output]
//! default_path = "papers.csv"
//!
//! [fetch]
//! on_record_error = "abort"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::output::DEFAULT_OUTPUT_FILE;
use crate::pipeline::FailurePolicy;
use crate::sources::PUBMED_DEFAULT_BASE_URL;

/// Prefix of environment variable overrides (e.g. `PUBMED_AFFILIATIONS__HTTP__TIMEOUT_SECS`)
pub const ENV_PREFIX: &str = "PUBMED_AFFILIATIONS";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pubmed: PubMedConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub fetch: FetchConfig,
}

/// E-utilities endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubMedConfig {
    /// Base URL that `esearch.fcgi` and `efetch.fcgi` are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum number of identifiers requested from a search (`retmax`)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_results: default_max_results(),
        }
    }
}

fn default_base_url() -> String {
    PUBMED_DEFAULT_BASE_URL.to_string()
}

fn default_max_results() -> usize {
    100
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User agent override; defaults to `<crate name>/<version>`
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Keyword lists of the affiliation classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Checked first; a match marks a company affiliation
    #[serde(default = "default_company_keywords")]
    pub company_keywords: Vec<String>,

    /// Checked second; a match marks an academic affiliation
    #[serde(default = "default_academic_keywords")]
    pub academic_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            company_keywords: default_company_keywords(),
            academic_keywords: default_academic_keywords(),
        }
    }
}

fn default_company_keywords() -> Vec<String> {
    vec!["pharma".to_string(), "biotech".to_string()]
}

fn default_academic_keywords() -> Vec<String> {
    vec!["university".to_string(), "lab".to_string()]
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// CSV path used when none is given on the command line
    #[serde(default = "default_output_path")]
    pub default_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

/// Detail fetch settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    /// What to do when a single record cannot be fetched or parsed
    #[serde(default)]
    pub on_record_error: FailurePolicy,
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Environment variables are process-wide; tests that load config hold this lock
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let result = f();
        for (key, _) in vars {
            std::env::remove_var(key);
        }
        result
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pubmed.max_results, 100);
        assert_eq!(
            config.pubmed.base_url,
            "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
        );
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert_eq!(config.http.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.output.default_path, PathBuf::from("papers.csv"));
        assert_eq!(config.fetch.on_record_error, FailurePolicy::Abort);
        assert_eq!(config.classifier.company_keywords, vec!["pharma", "biotech"]);
        assert_eq!(config.classifier.academic_keywords, vec!["university", "lab"]);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();

        let toml_content = r#"
[pubmed]
base_url = "http://localhost:9999/eutils"
max_results = 25

[http]
timeout_secs = 5

[classifier]
company_keywords = ["pharma", "biotech", "therapeutics"]

[output]
default_path = "/tmp/out.csv"

[fetch]
on_record_error = "skip"
"#;

        let path = write_config(dir.path(), toml_content);
        let config = with_env(&[], || load_config(Some(path.as_path()))).unwrap();

        assert_eq!(config.pubmed.base_url, "http://localhost:9999/eutils");
        assert_eq!(config.pubmed.max_results, 25);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(
            config.classifier.company_keywords,
            vec!["pharma", "biotech", "therapeutics"]
        );
        assert_eq!(config.classifier.academic_keywords, vec!["university", "lab"]);
        assert_eq!(config.output.default_path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(config.fetch.on_record_error, FailurePolicy::Skip);
    }

    #[test]
    fn test_load_config_nonexistent_file() {
        let path = PathBuf::from("/nonexistent/config.toml");
        assert!(with_env(&[], || load_config(Some(path.as_path()))).is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(with_env(&[], || load_config(Some(path.as_path()))).is_err());
    }

    #[test]
    fn test_env_overrides_without_file() {
        let config = with_env(
            &[
                ("PUBMED_AFFILIATIONS__PUBMED__MAX_RESULTS", "25"),
                ("PUBMED_AFFILIATIONS__HTTP__CONNECT_TIMEOUT_SECS", "3"),
                ("PUBMED_AFFILIATIONS__FETCH__ON_RECORD_ERROR", "skip"),
            ],
            || load_config(None),
        )
        .unwrap();

        assert_eq!(config.pubmed.max_results, 25);
        assert_eq!(config.http.connect_timeout_secs, 3);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.fetch.on_record_error, FailurePolicy::Skip);
    }

    #[test]
    fn test_env_overrides_take_precedence_over_file() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[pubmed]\nmax_results = 25\nbase_url = \"http://file.example/eutils\"\n",
        );

        let config = with_env(
            &[("PUBMED_AFFILIATIONS__PUBMED__MAX_RESULTS", "7")],
            || load_config(Some(path.as_path())),
        )
        .unwrap();

        assert_eq!(config.pubmed.max_results, 7);
        assert_eq!(config.pubmed.base_url, "http://file.example/eutils");
    }

    #[test]
    fn test_invalid_env_override_is_an_error() {
        let result = with_env(
            &[
                ("PUBMED_AFFILIATIONS__PUBMED__MAX_RESULTS", "25"),
                ("PUBMED_AFFILIATIONS__HTTP__TIMEOUT_SECS", "abc"),
            ],
            || load_config(None),
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("timeout_secs"), "{}", err);
    }
}
