//! Reference resolution
//!
//! Turns a raw `href`/`src` value plus the page it was found on into the
//! absolute form used as the cache key. Rewriting is plain string
//! concatenation against the origin page or the root, so the cache keys
//! match what a reader sees in the report.

use crate::url::LinkCategory;
use url::Url;

/// Outcome of resolving a raw reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A target that must be classified
    Target(ResolvedTarget),
    /// Nothing to check (empty attribute, `javascript:` or `data:` URI)
    Skip,
}

/// Canonical form of a discovered reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Absolute URL, or `mailto:<address>` / `tel:<number>`
    pub url: String,

    /// Final category; resolution overrides the extraction tag
    pub category: LinkCategory,

    /// Bare address for email targets
    pub address: Option<String>,
}

impl ResolvedTarget {
    fn new(url: String, category: LinkCategory) -> Self {
        Self {
            url,
            category,
            address: None,
        }
    }
}

/// Resolves a raw reference found on `origin` against the audit root
///
/// # Rules (applied in order)
///
/// | Reference | Result |
/// |-----------|--------|
/// | empty | `Skip` |
/// | `mailto:a@b.com?subject=x` | email target, address `a@b.com` |
/// | `tel:+49...` | telephone target |
/// | `javascript:...`, `data:...` | `Skip` |
/// | `#frag` | `origin + "#frag"` |
/// | `//cdn.host/x` | root scheme + reference |
/// | `/path` | `root + "/path"` |
/// | absolute (`https://...`) | unchanged |
/// | anything else | `origin + reference` |
///
/// A lone `"#"` resolves to `origin + "#"`.
///
/// # Examples
///
/// ```
/// use link_warden::url::{resolve, LinkCategory, Resolution};
///
/// let resolution = resolve("https://site.com/x", "/about", "https://site.com", LinkCategory::Link);
/// match resolution {
///     Resolution::Target(target) => assert_eq!(target.url, "https://site.com/about"),
///     Resolution::Skip => unreachable!(),
/// }
/// ```
pub fn resolve(origin: &str, raw: &str, root: &str, category: LinkCategory) -> Resolution {
    let reference = raw.trim();

    if reference.is_empty() {
        return Resolution::Skip;
    }

    if let Some(rest) = strip_scheme(reference, "mailto:") {
        let address = rest.split('?').next().unwrap_or_default().trim().to_string();
        return Resolution::Target(ResolvedTarget {
            url: format!("mailto:{}", address),
            category: LinkCategory::Email,
            address: Some(address),
        });
    }

    if strip_scheme(reference, "tel:").is_some() {
        return Resolution::Target(ResolvedTarget::new(
            reference.to_string(),
            LinkCategory::Telephone,
        ));
    }

    if strip_scheme(reference, "javascript:").is_some() || strip_scheme(reference, "data:").is_some()
    {
        return Resolution::Skip;
    }

    let url = if reference.starts_with('#') {
        format!("{}{}", origin, reference)
    } else if reference.starts_with("//") {
        format!("{}:{}", root_scheme(root), reference)
    } else if reference.starts_with('/') {
        format!("{}{}", root, reference)
    } else if is_absolute(reference) {
        reference.to_string()
    } else {
        format!("{}{}", origin, reference)
    };

    Resolution::Target(ResolvedTarget::new(url, category))
}

/// Case-insensitive scheme prefix strip
fn strip_scheme<'a>(reference: &'a str, scheme: &str) -> Option<&'a str> {
    let head = reference.get(..scheme.len())?;
    if head.eq_ignore_ascii_case(scheme) {
        reference.get(scheme.len()..)
    } else {
        None
    }
}

fn is_absolute(reference: &str) -> bool {
    Url::parse(reference).is_ok()
}

fn root_scheme(root: &str) -> &str {
    match root.split_once("://") {
        Some((scheme, _)) => scheme,
        None => "https",
    }
}
