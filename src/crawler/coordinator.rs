//! Audit coordinator - main audit orchestration logic
//!
//! This module drives a complete audit run:
//! - Verifying the root URL answers
//! - Enumerating pages from the sitemap
//! - Fetching each page and extracting its references
//! - Resolving, deduplicating and classifying every reference
//! - Producing the final report

use crate::cache::{AuditBuckets, Bucket, Claim, ClassificationCache, LinkRecord, LinkStatus};
use crate::config::Config;
use crate::crawler::classifier::{DelayRange, LinkClassifier};
use crate::crawler::fetcher::{check_with_cancel, fetch_with_cancel, Fetcher, HttpFetcher};
use crate::crawler::parser::{extract_references, PageReferences};
use crate::crawler::pause;
use crate::crawler::sitemap::SitemapLocator;
use crate::url::{normalize_root_url, resolve, LinkCategory, Resolution, ResolvedTarget};
use crate::AuditError;
use chrono::{DateTime, Local};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Found-in label for the root URL
pub const MAIN_URL_ORIGIN: &str = "Main URL";
/// Found-in label for pages listed in a sitemap
pub const SITEMAP_ORIGIN: &str = "Sitemap";
/// Found-in label for sub-sitemaps listed in the sitemap index
pub const SITEMAP_INDEX_ORIGIN: &str = "Sitemap Index";

/// Result of a completed audit
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub root_url: String,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Pages listed by the sitemap
    pub pages_listed: usize,
    /// Pages fetched successfully and scanned for references
    pub pages_audited: usize,
    pub working: Vec<LinkRecord>,
    pub redirected: Vec<LinkRecord>,
    pub broken: Vec<LinkRecord>,
}

impl AuditReport {
    /// Total number of distinct URLs classified
    pub fn total_links(&self) -> usize {
        self.working.len() + self.redirected.len() + self.broken.len()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Share of classified URLs that are working, as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_links();
        if total == 0 {
            return 0.0;
        }
        (self.working.len() as f64 / total as f64) * 100.0
    }

    /// Finds a record by URL across all buckets
    pub fn find(&self, url: &str) -> Option<(Bucket, &LinkRecord)> {
        [
            (Bucket::Working, &self.working),
            (Bucket::Redirected, &self.redirected),
            (Bucket::Broken, &self.broken),
        ]
        .into_iter()
        .find_map(|(bucket, records)| {
            records
                .iter()
                .find(|record| record.url == url)
                .map(|record| (bucket, record))
        })
    }
}

/// Main audit coordinator
///
/// One `Auditor` performs one run; [`run`](Self::run) consumes it.
pub struct Auditor {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
    classifier: LinkClassifier,
    cache: ClassificationCache,
}

impl Auditor {
    /// Creates an auditor backed by an HTTP fetcher built from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Auditor)` - Ready to run
    /// * `Err(AuditError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, AuditError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Creates an auditor using the given fetcher for every request
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        let classifier = LinkClassifier::new(
            Arc::new(config.audit.clone()),
            Arc::clone(&fetcher),
            DelayRange::from_config(&config.checker),
        );

        Self {
            config: Arc::new(config),
            fetcher,
            classifier,
            cache: ClassificationCache::new(),
        }
    }

    /// Runs a complete audit of the site at `root_url`
    ///
    /// # Run Phases
    ///
    /// 1. Verify the root answers 200, otherwise abort
    /// 2. Enumerate pages through the sitemap files
    /// 3. For each page, in sitemap order:
    ///    a. wait the configured page delay
    ///    b. fetch the page and file it
    ///    c. extract, resolve and claim every reference
    ///    d. classify the claimed references concurrently
    /// 4. Collect the buckets into a report
    ///
    /// # Arguments
    ///
    /// * `root_url` - Site root; a missing scheme defaults to https
    /// * `cancel` - Token that aborts the run at the next fetch or delay
    ///
    /// # Returns
    ///
    /// * `Ok(AuditReport)` - The audit completed
    /// * `Err(AuditError::RootUnreachable)` - The root did not answer 200
    /// * `Err(AuditError::SubSitemapMissing)` - A listed sub-sitemap returned 404
    /// * `Err(AuditError::Cancelled)` - The token was cancelled
    ///
    /// # Example
    ///
    /// ```no_run
    /// use link_warden::{Auditor, Config};
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let auditor = Auditor::new(Config::default())?;
    /// let report = auditor.run("example.com", CancellationToken::new()).await?;
    /// println!("{} broken links", report.broken.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(
        self,
        root_url: &str,
        cancel: CancellationToken,
    ) -> Result<AuditReport, AuditError> {
        let root_url = normalize_root_url(root_url)?;
        let started_at = Local::now();
        let start_time = std::time::Instant::now();

        tracing::info!("Starting audit of {}", root_url);

        self.verify_root(&root_url, &cancel).await?;

        let listing = SitemapLocator::new(Arc::clone(&self.fetcher))
            .locate(&root_url, &cancel)
            .await?;

        for sitemap in &listing.unreachable_sitemaps {
            self.record_page(
                &sitemap.url,
                Bucket::Broken,
                sitemap.status,
                SITEMAP_INDEX_ORIGIN,
            )?;
        }

        let pages_listed = listing.pages.len();
        let mut pages_audited = 0;

        for (index, page_url) in listing.pages.iter().enumerate() {
            tracing::info!(
                "Checking sitemap page {}/{}: {}",
                index + 1,
                pages_listed,
                page_url
            );

            if self.audit_page(page_url, &root_url, &cancel).await? {
                pages_audited += 1;
            }

            if (index + 1) % 10 == 0 {
                let (working, redirected, broken) = self.cache.counts();
                tracing::info!(
                    "Progress: {}/{} pages, {} working, {} redirected, {} broken",
                    index + 1,
                    pages_listed,
                    working,
                    redirected,
                    broken
                );
            }
        }

        let AuditBuckets {
            working,
            redirected,
            broken,
        } = self.cache.into_buckets();

        tracing::info!(
            "Audit of {} completed: {} pages, {} links in {:?}",
            root_url,
            pages_audited,
            working.len() + redirected.len() + broken.len(),
            start_time.elapsed()
        );

        Ok(AuditReport {
            root_url,
            started_at,
            finished_at: Local::now(),
            pages_listed,
            pages_audited,
            working,
            redirected,
            broken,
        })
    }

    /// Confirms the root answers 200 and files it as working
    async fn verify_root(&self, root_url: &str, cancel: &CancellationToken) -> Result<(), AuditError> {
        match check_with_cancel(self.fetcher.as_ref(), root_url, cancel).await? {
            Ok(response) if response.is_ok() => {
                self.record_page(
                    root_url,
                    Bucket::Working,
                    LinkStatus::Code(response.status),
                    MAIN_URL_ORIGIN,
                )?;
                Ok(())
            }
            Ok(response) => {
                tracing::error!("Root URL {} returned {}", root_url, response.status);
                Err(AuditError::RootUnreachable {
                    url: root_url.to_string(),
                    status: response.status.to_string(),
                })
            }
            Err(e) => {
                tracing::error!("Root URL {} unreachable: {}", root_url, e);
                Err(AuditError::RootUnreachable {
                    url: root_url.to_string(),
                    status: e.to_string(),
                })
            }
        }
    }

    /// Fetches one sitemap page and checks everything it references
    ///
    /// Returns true if the page answered 200 and was scanned.
    async fn audit_page(
        &self,
        page_url: &str,
        root_url: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, AuditError> {
        pause(
            Duration::from_millis(self.config.checker.page_delay_ms),
            cancel,
        )
        .await?;

        let response = match fetch_with_cancel(self.fetcher.as_ref(), page_url, cancel).await? {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch page {}: {}", page_url, e);
                self.record_page(page_url, Bucket::Broken, LinkStatus::Error, SITEMAP_ORIGIN)?;
                return Ok(false);
            }
        };

        if !response.is_ok() {
            tracing::warn!("Page {} returned {}", page_url, response.status);
            self.record_page(
                page_url,
                Bucket::Broken,
                LinkStatus::Code(response.status),
                SITEMAP_ORIGIN,
            )?;
            return Ok(false);
        }

        self.record_page(
            page_url,
            Bucket::Working,
            LinkStatus::Code(response.status),
            SITEMAP_ORIGIN,
        )?;

        let references = extract_references(&response.body);
        tracing::debug!("Found {} references on {}", references.len(), page_url);

        self.check_references(page_url, root_url, &references, cancel)
            .await?;

        Ok(true)
    }

    /// Resolves and claims every reference, then classifies the new ones
    ///
    /// All claims happen before any classification starts, so a reference
    /// repeated on the same page is fetched once and shares one record.
    async fn check_references(
        &self,
        page_url: &str,
        root_url: &str,
        references: &PageReferences,
        cancel: &CancellationToken,
    ) -> Result<(), AuditError> {
        let owned: Vec<ResolvedTarget> = references
            .iter()
            .filter_map(|(category, raw)| match resolve(page_url, raw, root_url, category) {
                Resolution::Target(target) => Some(target),
                Resolution::Skip => None,
            })
            .filter(|target| {
                self.cache.claim(&target.url, target.category, page_url) == Claim::Owner
            })
            .collect();

        tracing::debug!("{} new targets to classify from {}", owned.len(), page_url);

        stream::iter(owned)
            .map(|target| async move {
                let verdict = self.classifier.classify(&target, cancel).await?;
                self.cache.file(&target.url, verdict.bucket, verdict.status)?;
                Ok::<(), AuditError>(())
            })
            .buffer_unordered(self.config.checker.max_concurrent_checks)
            .try_collect::<Vec<()>>()
            .await?;

        Ok(())
    }

    /// Files a sitemap-derived URL, or merges its origin if already known
    fn record_page(
        &self,
        url: &str,
        bucket: Bucket,
        status: LinkStatus,
        origin: &str,
    ) -> Result<(), AuditError> {
        match self.cache.claim(url, LinkCategory::Link, origin) {
            Claim::Owner => self.cache.file(url, bucket, status)?,
            Claim::Known => tracing::debug!("{} already known, added origin {}", url, origin),
        }
        Ok(())
    }
}
