//! Sitemap discovery
//!
//! Pages are enumerated from `/sitemap.xml`, falling back to
//! `/sitemap-index.xml` and the sub-sitemaps it lists.

use crate::cache::LinkStatus;
use crate::crawler::fetcher::{fetch_with_cancel, Fetcher};
use crate::crawler::parser::extract_sitemap_locs;
use crate::AuditError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const SITEMAP_PATH: &str = "/sitemap.xml";
pub const SITEMAP_INDEX_PATH: &str = "/sitemap-index.xml";

/// A sub-sitemap listed in the index that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreachableSitemap {
    pub url: String,
    /// Final status code, or `Error` for a transport failure
    pub status: LinkStatus,
}

/// Result of sitemap discovery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapListing {
    /// Page URLs in encounter order, exactly as listed
    pub pages: Vec<String>,
    pub unreachable_sitemaps: Vec<UnreachableSitemap>,
}

impl SitemapListing {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Finds the pages a site advertises through its sitemap files
pub struct SitemapLocator {
    fetcher: Arc<dyn Fetcher>,
}

impl SitemapLocator {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Enumerates the site's pages
    ///
    /// # Lookup Order
    ///
    /// 1. `root/sitemap.xml`: if it answers 200, its `<loc>` entries are the pages
    /// 2. `root/sitemap-index.xml`: if it does not answer 200, the site has no pages
    /// 3. every sub-sitemap listed in the index, in order
    ///
    /// # Arguments
    ///
    /// * `root_url` - Normalized root URL without a trailing slash
    /// * `cancel` - Token checked before each fetch
    ///
    /// # Returns
    ///
    /// * `Ok(SitemapListing)` - Pages found, possibly none
    /// * `Err(AuditError::SubSitemapMissing)` - A listed sub-sitemap returned 404
    /// * `Err(AuditError::Cancelled)` - The run was cancelled
    pub async fn locate(
        &self,
        root_url: &str,
        cancel: &CancellationToken,
    ) -> Result<SitemapListing, AuditError> {
        let sitemap_url = format!("{}{}", root_url, SITEMAP_PATH);
        if let Some(body) = self.fetch_ok(&sitemap_url, cancel).await? {
            let pages = extract_sitemap_locs(&body);
            tracing::info!("Found {} pages in {}", pages.len(), sitemap_url);
            return Ok(SitemapListing {
                pages,
                unreachable_sitemaps: Vec::new(),
            });
        }

        let index_url = format!("{}{}", root_url, SITEMAP_INDEX_PATH);
        let Some(index_body) = self.fetch_ok(&index_url, cancel).await? else {
            tracing::warn!("No sitemap found at {} or {}", sitemap_url, index_url);
            return Ok(SitemapListing::default());
        };

        let sub_sitemaps = extract_sitemap_locs(&index_body);
        tracing::info!(
            "Sitemap index {} lists {} sub-sitemaps",
            index_url,
            sub_sitemaps.len()
        );

        let mut listing = SitemapListing::default();

        for sub_sitemap in sub_sitemaps {
            match fetch_with_cancel(self.fetcher.as_ref(), &sub_sitemap, cancel).await? {
                Ok(response) if response.is_ok() => {
                    let pages = extract_sitemap_locs(&response.body);
                    tracing::debug!("Found {} pages in {}", pages.len(), sub_sitemap);
                    listing.pages.extend(pages);
                }
                Ok(response) if response.status == 404 => {
                    tracing::error!("Sub-sitemap {} returned 404", sub_sitemap);
                    return Err(AuditError::SubSitemapMissing { url: sub_sitemap });
                }
                Ok(response) => {
                    tracing::warn!(
                        "Sub-sitemap {} returned {}, skipping",
                        sub_sitemap,
                        response.status
                    );
                    listing.unreachable_sitemaps.push(UnreachableSitemap {
                        url: sub_sitemap,
                        status: LinkStatus::Code(response.status),
                    });
                }
                Err(e) => {
                    tracing::warn!("Sub-sitemap {} unreachable: {}", sub_sitemap, e);
                    listing.unreachable_sitemaps.push(UnreachableSitemap {
                        url: sub_sitemap,
                        status: LinkStatus::Error,
                    });
                }
            }
        }

        Ok(listing)
    }

    /// Fetches a well-known sitemap location, returning the body only on 200
    async fn fetch_ok(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, AuditError> {
        match fetch_with_cancel(self.fetcher.as_ref(), url, cancel).await? {
            Ok(response) if response.is_ok() => Ok(Some(response.body)),
            Ok(response) => {
                tracing::debug!("{} returned {}", url, response.status);
                Ok(None)
            }
            Err(e) => {
                tracing::debug!("{} unreachable: {}", url, e);
                Ok(None)
            }
        }
    }
}
