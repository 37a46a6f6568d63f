//! Crawler module for sitemap discovery and link checking
//!
//! This module contains the core audit logic, including:
//! - HTTP fetching with manual redirect tracking
//! - HTML and sitemap parsing
//! - Sitemap discovery
//! - Per-link classification
//! - Overall audit coordination

mod classifier;
mod coordinator;
mod fetcher;
mod parser;
mod sitemap;
#[cfg(test)]
mod testing;

pub use classifier::{classify_response, DelayRange, LinkClassifier, Verdict, ACCEPTED_STATUSES};
pub use coordinator::{
    AuditReport, Auditor, MAIN_URL_ORIGIN, SITEMAP_INDEX_ORIGIN, SITEMAP_ORIGIN,
};
pub use fetcher::{
    build_http_client, check_with_cancel, fetch_with_cancel, FetchResponse, Fetcher, HttpFetcher,
};
pub use parser::{extract_references, extract_sitemap_locs, PageReferences};
pub use sitemap::{SitemapListing, SitemapLocator, UnreachableSitemap};

use crate::AuditError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Sleeps for `duration` unless the run is cancelled first
pub(crate) async fn pause(duration: Duration, cancel: &CancellationToken) -> Result<(), AuditError> {
    if cancel.is_cancelled() {
        return Err(AuditError::Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AuditError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
