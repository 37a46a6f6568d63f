use serde::Deserialize;
use std::collections::HashSet;

/// Browser identity sent with every request; some sites reject default agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "de-DE,de;q=0.9";

/// Main configuration structure for Link-Warden
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Link classification policy, shared read-only by the classifier
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Email addresses that count as valid `mailto:` targets
    #[serde(rename = "valid-email-addresses", default)]
    pub valid_email_addresses: HashSet<String>,

    /// Exact URLs that are trusted without being fetched
    #[serde(rename = "skip-check-urls", default)]
    pub skip_check_urls: HashSet<String>,

    /// Substrings marking URLs that are trusted without being fetched
    #[serde(rename = "skip-check-url-patterns", default)]
    pub skip_check_url_patterns: Vec<String>,
}

/// Checker behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Maximum number of link checks in flight at once
    #[serde(rename = "max-concurrent-checks")]
    pub max_concurrent_checks: usize,

    /// Total timeout of a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Delay before each sitemap page fetch (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Lower bound of the random delay before each link fetch (milliseconds)
    #[serde(rename = "link-delay-min-ms")]
    pub link_delay_min_ms: u64,

    /// Upper bound of the random delay before each link fetch (milliseconds)
    #[serde(rename = "link-delay-max-ms")]
    pub link_delay_max_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_checks: 8,
            request_timeout_secs: 30,
            max_redirects: 10,
            page_delay_ms: 1000,
            link_delay_min_ms: 500,
            link_delay_max_ms: 1500,
        }
    }
}

/// Request header configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the markdown report is written to
    #[serde(rename = "report-dir")]
    pub report_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: "reports".to_string(),
        }
    }
}
