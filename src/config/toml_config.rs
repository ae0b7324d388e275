use crate::adapters::http::SessionSettings;
use crate::core::fetcher::RetryPolicy;
use crate::utils::error::{CrawlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

/// Built-in configuration shipped with the crate: the AAD telegram queries for 1973-1979.
const BUILTIN_CONFIG: &str = include_str!("../../config/aad-cables.toml");

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    #[serde(default)]
    pub http: HttpConfig,
    /// Year -> pre-built search URL. Keys are years as strings (`"1977"`).
    pub years: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
    #[serde(default = "default_server_error_delay_ms")]
    pub server_error_delay_ms: u64,
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
    #[serde(default = "default_download_retry_delay_ms")]
    pub download_retry_delay_ms: u64,
}

fn default_server_error_delay_ms() -> u64 {
    5_000
}

fn default_refresh_delay_ms() -> u64 {
    1_000
}

fn default_download_retry_delay_ms() -> u64 {
    20_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_seconds: None,
            server_error_delay_ms: default_server_error_delay_ms(),
            refresh_delay_ms: default_refresh_delay_ms(),
            download_retry_delay_ms: default_download_retry_delay_ms(),
        }
    }
}

impl CrawlerConfig {
    /// 內建的年份查詢表
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONFIG)
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${CABLE_CRAWLER_USER_AGENT})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.years.is_empty() {
            return Err(CrawlError::MissingConfigError {
                field: "years".to_string(),
            });
        }

        for (year, url) in &self.years {
            if year.parse::<u16>().is_err() {
                return Err(CrawlError::config(format!(
                    "years: '{}' is not a year",
                    year
                )));
            }
            validate_url(&format!("years.{}", year), url)?;
        }

        if let Some(user_agent) = &self.http.user_agent {
            validate_non_empty_string("http.user_agent", user_agent)?;
        }

        Ok(())
    }

    /// Start URL of the search for `year`.
    pub fn start_url(&self, year: u16) -> Result<Url> {
        let url = self.years.get(&year.to_string()).ok_or_else(|| {
            CrawlError::config(format!(
                "No search URL configured for year {} (configured: {})",
                year,
                self.year_list()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        Ok(Url::parse(url)?)
    }

    pub fn year_list(&self) -> Vec<u16> {
        self.years.keys().filter_map(|y| y.parse().ok()).collect()
    }

    /// Session settings; a non-empty `user_agent` argument wins over the file.
    pub fn session_settings(&self, user_agent: Option<&str>) -> SessionSettings {
        SessionSettings {
            user_agent: user_agent
                .map(str::to_owned)
                .or_else(|| self.http.user_agent.clone()),
            timeout: self.http.timeout_seconds.map(Duration::from_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            server_error_delay: Duration::from_millis(self.http.server_error_delay_ms),
            refresh_delay: Duration::from_millis(self.http.refresh_delay_ms),
            download_retry_delay: Duration::from_millis(self.http.download_retry_delay_ms),
        }
    }
}

impl Validate for CrawlerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_config_covers_1973_to_1979() {
        let config = CrawlerConfig::builtin().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.year_list(), (1973..=1979).collect::<Vec<u16>>());

        let url = config.start_url(1977).unwrap();
        assert_eq!(url.host_str(), Some("aad.archives.gov"));
        assert!(url.query().unwrap().contains("txt_27552=01%2F01%2F1977"));

        let policy = config.retry_policy();
        assert_eq!(policy.server_error_delay, Duration::from_secs(5));
        assert_eq!(policy.refresh_delay, Duration::from_secs(1));
        assert_eq!(policy.download_retry_delay, Duration::from_secs(20));
    }

    #[test]
    fn test_unknown_year_is_config_error() {
        let config = CrawlerConfig::builtin().unwrap();
        let err = config.start_url(1980).unwrap_err();
        assert!(matches!(err, CrawlError::ConfigError { .. }));
        assert!(err.to_string().contains("1980"));
    }

    #[test]
    fn test_http_section_is_optional() {
        let toml_content = r#"
[years]
1977 = "https://archive.example.com/search?q=cables"
"#;

        let config = CrawlerConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.server_error_delay_ms, 5_000);
        assert!(config.session_settings(None).user_agent.is_none());
        assert!(config.session_settings(None).timeout.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CABLE_CRAWLER_TEST_UA", "ArchiveBot/0.1");

        let toml_content = r#"
[http]
user_agent = "${CABLE_CRAWLER_TEST_UA}"
timeout_seconds = 30

[years]
1977 = "https://archive.example.com/search"
"#;

        let config = CrawlerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.http.user_agent.as_deref(), Some("ArchiveBot/0.1"));

        let settings = config.session_settings(None);
        assert_eq!(settings.user_agent.as_deref(), Some("ArchiveBot/0.1"));
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));

        let overridden = config.session_settings(Some("Override/1.0"));
        assert_eq!(overridden.user_agent.as_deref(), Some("Override/1.0"));

        std::env::remove_var("CABLE_CRAWLER_TEST_UA");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = CrawlerConfig::from_toml_str(
            r#"
[years]
1977 = "not-a-url"
"#,
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let bad_year = CrawlerConfig::from_toml_str(
            r#"
[years]
seventies = "https://archive.example.com/search"
"#,
        )
        .unwrap();
        assert!(matches!(
            bad_year.validate(),
            Err(CrawlError::ConfigError { .. })
        ));

        let empty = CrawlerConfig::from_toml_str("[years]\n").unwrap();
        assert!(matches!(
            empty.validate(),
            Err(CrawlError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[http]
refresh_delay_ms = 10

[years]
1975 = "https://archive.example.com/search?year=1975"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = CrawlerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.year_list(), vec![1975]);
        assert_eq!(config.retry_policy().refresh_delay, Duration::from_millis(10));
    }
}
