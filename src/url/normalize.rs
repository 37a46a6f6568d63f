use crate::UrlError;
use url::Url;

/// Normalizes the root URL of an audit
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `https://` when no HTTP(S) scheme is given
/// 3. Parse the URL; reject if malformed, non-HTTP(S), or hostless
/// 4. Drop any fragment
/// 5. Remove trailing slashes, so sitemap paths can be appended directly
///
/// # Examples
///
/// ```
/// use link_warden::url::normalize_root_url;
///
/// assert_eq!(normalize_root_url("example.com").unwrap(), "https://example.com");
/// assert_eq!(normalize_root_url("http://Example.com/").unwrap(), "http://example.com");
/// ```
pub fn normalize_root_url(input: &str) -> Result<String, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("root URL cannot be empty".to_string()));
    }

    let lowered = trimmed.to_ascii_lowercase();
    let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::Parse(format!("{} has no host", candidate)));
    }

    url.set_fragment(None);

    Ok(url.as_str().trim_end_matches('/').to_string())
}
