//! Link classification
//!
//! Decides the bucket and status marker for a single resolved target. Skip
//! policy, email and telephone targets are settled without any network
//! traffic; everything else is fetched once after a randomized delay.

use crate::cache::{Bucket, LinkStatus};
use crate::config::{AuditConfig, CheckerConfig};
use crate::crawler::fetcher::{check_with_cancel, FetchResponse, Fetcher};
use crate::crawler::pause;
use crate::url::{LinkCategory, ResolvedTarget, SkipPolicy, SkipReason};
use crate::AuditError;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Final status codes that count as reachable
///
/// 400 and 403 are returned by sites that reject automated clients; 999 is
/// LinkedIn's bot response.
pub const ACCEPTED_STATUSES: [u16; 4] = [200, 400, 403, 999];

/// Classification outcome for one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub bucket: Bucket,
    pub status: LinkStatus,
}

impl Verdict {
    pub fn working(status: LinkStatus) -> Self {
        Self {
            bucket: Bucket::Working,
            status,
        }
    }

    pub fn redirected(status: LinkStatus) -> Self {
        Self {
            bucket: Bucket::Redirected,
            status,
        }
    }

    pub fn broken(status: LinkStatus) -> Self {
        Self {
            bucket: Bucket::Broken,
            status,
        }
    }
}

/// Classifies a completed HTTP exchange
///
/// # Rules
///
/// | Final status | Redirect history | Verdict |
/// |--------------|------------------|---------|
/// | not accepted | any | broken, final status |
/// | accepted | non-empty | redirected, first hop status |
/// | accepted | empty | working, final status |
pub fn classify_response(response: &FetchResponse) -> Verdict {
    if !ACCEPTED_STATUSES.contains(&response.status) {
        return Verdict::broken(LinkStatus::Code(response.status));
    }

    match response.redirect_history.first() {
        Some(first_hop) => Verdict::redirected(LinkStatus::Code(*first_hop)),
        None => Verdict::working(LinkStatus::Code(response.status)),
    }
}

/// Inclusive range the per-link delay is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min_ms: u64,
    max_ms: u64,
}

impl DelayRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    pub fn from_config(checker: &CheckerConfig) -> Self {
        Self::new(checker.link_delay_min_ms, checker.link_delay_max_ms)
    }

    pub fn sample(&self) -> Duration {
        Duration::from_millis(fastrand::u64(self.min_ms..=self.max_ms))
    }
}

/// Classifies resolved targets against the audit policy
pub struct LinkClassifier {
    config: Arc<AuditConfig>,
    policy: SkipPolicy,
    fetcher: Arc<dyn Fetcher>,
    delay: DelayRange,
}

impl LinkClassifier {
    pub fn new(config: Arc<AuditConfig>, fetcher: Arc<dyn Fetcher>, delay: DelayRange) -> Self {
        let policy = SkipPolicy::from_config(&config);
        Self {
            config,
            policy,
            fetcher,
            delay,
        }
    }

    /// Verdict reachable without a network request, if any
    ///
    /// Skip-URL is checked before skip-pattern, and both before the
    /// category rules for email and telephone targets.
    pub fn offline_verdict(&self, target: &ResolvedTarget) -> Option<Verdict> {
        match self.policy.check(&target.url) {
            Some(SkipReason::Url) => return Some(Verdict::working(LinkStatus::SkipUrl)),
            Some(SkipReason::Pattern) => return Some(Verdict::working(LinkStatus::SkipPattern)),
            None => {}
        }

        if !target.category.is_offline() {
            return None;
        }

        match target.category {
            LinkCategory::Email => {
                let address = target
                    .address
                    .as_deref()
                    .or_else(|| target.url.strip_prefix("mailto:"))
                    .unwrap_or_default();

                if self.config.valid_email_addresses.contains(address) {
                    Some(Verdict::working(LinkStatus::Blank))
                } else {
                    Some(Verdict::broken(LinkStatus::Blank))
                }
            }
            _ => Some(Verdict::working(LinkStatus::Blank)),
        }
    }

    /// Classifies a target, fetching it if policy does not settle it
    ///
    /// # Returns
    ///
    /// * `Ok(Verdict)` - The bucket and status marker to file
    /// * `Err(AuditError::Cancelled)` - The run was cancelled during the delay or fetch
    pub async fn classify(
        &self,
        target: &ResolvedTarget,
        cancel: &CancellationToken,
    ) -> Result<Verdict, AuditError> {
        if let Some(verdict) = self.offline_verdict(target) {
            tracing::debug!("{} settled without fetch: {}", target.url, verdict.bucket);
            return Ok(verdict);
        }

        pause(self.delay.sample(), cancel).await?;

        let verdict = match check_with_cancel(self.fetcher.as_ref(), &target.url, cancel).await? {
            Ok(response) => classify_response(&response),
            Err(e) => {
                tracing::debug!("Fetch failed for {}: {}", target.url, e);
                Verdict::broken(LinkStatus::Error)
            }
        };

        tracing::debug!(
            "{} {} -> {} ({})",
            target.category,
            target.url,
            verdict.bucket,
            verdict.status
        );

        Ok(verdict)
    }
}
