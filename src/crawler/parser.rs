//! HTML and sitemap parsing
//!
//! This module extracts raw references from fetched documents:
//! - Anchors, scripts, images and `<link>` elements from HTML pages
//! - `<loc>` entries from sitemap XML
//!
//! Values are returned exactly as written; resolution happens elsewhere.

use crate::url::LinkCategory;
use scraper::{Html, Selector};
use std::borrow::Cow;

/// Raw reference values found on one page, grouped by element kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageReferences {
    /// `href` of every `<a>` element
    pub links: Vec<String>,
    /// `src` of every `<script>` element
    pub scripts: Vec<String>,
    /// `src` of every `<img>` element
    pub images: Vec<String>,
    /// `href` of every `<link>` element
    pub other_links: Vec<String>,
}

impl PageReferences {
    pub fn len(&self) -> usize {
        self.links.len() + self.scripts.len() + self.images.len() + self.other_links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every reference with its category, in check order
    ///
    /// Links come first, then scripts, images and other links, each in
    /// document order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkCategory, &str)> {
        tagged(LinkCategory::Link, &self.links)
            .chain(tagged(LinkCategory::Script, &self.scripts))
            .chain(tagged(LinkCategory::Image, &self.images))
            .chain(tagged(LinkCategory::OtherLink, &self.other_links))
    }
}

fn tagged(
    category: LinkCategory,
    values: &[String],
) -> impl Iterator<Item = (LinkCategory, &str)> + '_ {
    values.iter().map(move |value| (category, value.as_str()))
}

/// Extracts every reference from an HTML page
///
/// Elements missing the relevant attribute are ignored. No filtering by
/// scheme happens here, so `mailto:` and `tel:` anchors are kept.
///
/// # Example
///
/// ```
/// use link_warden::crawler::extract_references;
///
/// let html = r#"<a href="/about">About</a><img src="/logo.png">"#;
/// let refs = extract_references(html);
/// assert_eq!(refs.links, vec!["/about"]);
/// assert_eq!(refs.images, vec!["/logo.png"]);
/// ```
pub fn extract_references(html: &str) -> PageReferences {
    let document = Html::parse_document(html);

    PageReferences {
        links: select_attribute(&document, "a[href]", "href"),
        scripts: select_attribute(&document, "script[src]", "src"),
        images: select_attribute(&document, "img[src]", "src"),
        other_links: select_attribute(&document, "link[href]", "href"),
    }
}

/// Collects one attribute from every element matching a selector
fn select_attribute(document: &Html, selector: &str, attribute: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attribute))
        .map(str::to_string)
        .collect()
}

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Extracts the text of every `<loc>` element in a sitemap document
///
/// Works for both `<urlset>` sitemaps and `<sitemapindex>` files, with or
/// without a namespace prefix. CDATA-wrapped entries are unwrapped. Entries
/// are trimmed and empty ones dropped.
pub fn extract_sitemap_locs(xml: &str) -> Vec<String> {
    let document = Html::parse_document(&unwrap_cdata(xml));

    let Ok(selector) = Selector::parse("*") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| is_loc(element.value().name()))
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Matches `loc` and prefixed forms such as `sm:loc`
fn is_loc(name: &str) -> bool {
    name.rsplit(':').next() == Some("loc")
}

/// Replaces CDATA sections with their contents, escaped as character data
fn unwrap_cdata(xml: &str) -> Cow<'_, str> {
    if !xml.contains(CDATA_OPEN) {
        return Cow::Borrowed(xml);
    }

    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(start) = rest.find(CDATA_OPEN) {
        out.push_str(&rest[..start]);
        let section = &rest[start + CDATA_OPEN.len()..];

        match section.find(CDATA_CLOSE) {
            Some(end) => {
                out.push_str(&section[..end].replace('&', "&amp;").replace('<', "&lt;"));
                rest = &section[end + CDATA_CLOSE.len()..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}
