//! Link record definitions shared by the cache, the classifier and the report

use crate::url::LinkCategory;
use std::collections::BTreeSet;
use std::fmt;

/// One of the three mutually exclusive classification outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Reachable, or trusted by the skip policy
    Working,
    /// Reachable through at least one redirect hop
    Redirected,
    /// Unreachable, disallowed status, or invalid email address
    Broken,
}

impl Bucket {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Redirected => "redirected",
            Self::Broken => "broken",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status marker recorded alongside a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    /// HTTP status code (for redirects: the first hop's code)
    Code(u16),
    /// Trusted via the exact skip-URL list, never fetched
    SkipUrl,
    /// Trusted via a skip pattern, never fetched
    SkipPattern,
    /// Transport-level failure
    Error,
    /// No status applies (email and telephone references)
    Blank,
}

impl LinkStatus {
    /// Returns true if the link was filed without a network request
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::SkipUrl | Self::SkipPattern)
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::SkipUrl => f.write_str("SKIP-URL"),
            Self::SkipPattern => f.write_str("SKIP-PATTERN"),
            Self::Error => f.write_str("ERROR"),
            Self::Blank => Ok(()),
        }
    }
}

/// A resolved link together with every page it was found on
///
/// Identity is the URL alone; the category is the one seen first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub url: String,
    pub category: LinkCategory,
    pub found_in: BTreeSet<String>,
    pub status: LinkStatus,
}

impl LinkRecord {
    /// Creates a record discovered on a single page
    pub fn new(
        url: impl Into<String>,
        category: LinkCategory,
        origin: impl Into<String>,
        status: LinkStatus,
    ) -> Self {
        let mut found_in = BTreeSet::new();
        found_in.insert(origin.into());
        Self {
            url: url.into(),
            category,
            found_in,
            status,
        }
    }
}

/// The three final buckets, each in first-discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditBuckets {
    pub working: Vec<LinkRecord>,
    pub redirected: Vec<LinkRecord>,
    pub broken: Vec<LinkRecord>,
}
