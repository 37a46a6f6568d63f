use crate::config::AuditConfig;
use std::collections::HashSet;

/// Why a URL was trusted without being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Exact match in the skip-URL list
    Url,
    /// Contains one of the skip patterns
    Pattern,
}

/// Skip-and-trust policy built from the audit configuration
///
/// Exact URLs are checked before patterns, so a URL listed in both is
/// reported as [`SkipReason::Url`].
#[derive(Debug, Clone, Default)]
pub struct SkipPolicy {
    urls: HashSet<String>,
    patterns: Vec<String>,
}

impl SkipPolicy {
    pub fn new(urls: HashSet<String>, patterns: Vec<String>) -> Self {
        Self { urls, patterns }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(
            config.skip_check_urls.clone(),
            config.skip_check_url_patterns.clone(),
        )
    }

    /// Returns the reason `url` should not be fetched, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use link_warden::url::{SkipPolicy, SkipReason};
    ///
    /// let policy = SkipPolicy::new(
    ///     ["https://example.com/private".to_string()].into_iter().collect(),
    ///     vec!["linkedin.com/share".to_string()],
    /// );
    ///
    /// assert_eq!(policy.check("https://example.com/private"), Some(SkipReason::Url));
    /// assert_eq!(
    ///     policy.check("https://www.linkedin.com/shareArticle?url=x"),
    ///     Some(SkipReason::Pattern)
    /// );
    /// assert_eq!(policy.check("https://example.com/"), None);
    /// ```
    pub fn check(&self, url: &str) -> Option<SkipReason> {
        if self.urls.contains(url) {
            return Some(SkipReason::Url);
        }

        if self.patterns.iter().any(|pattern| url.contains(pattern.as_str())) {
            return Some(SkipReason::Pattern);
        }

        None
    }
}
