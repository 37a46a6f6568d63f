//! Mutex-guarded claim table backing the three buckets

use crate::cache::record::{AuditBuckets, Bucket, LinkRecord, LinkStatus};
use crate::url::LinkCategory;
use crate::CacheError;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of claiming a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// First sighting; the caller must classify the URL and [`file`] it
    ///
    /// [`file`]: ClassificationCache::file
    Owner,
    /// Already claimed or filed; the origin was merged, nothing to fetch
    Known,
}

#[derive(Debug)]
enum EntryState {
    Pending,
    Filed { bucket: Bucket, status: LinkStatus },
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    category: LinkCategory,
    found_in: BTreeSet<String>,
    state: EntryState,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

impl CacheInner {
    fn push(&mut self, url: String, category: LinkCategory, found_in: BTreeSet<String>, state: EntryState) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            url,
            Entry {
                seq,
                category,
                found_in,
                state,
            },
        );
    }
}

/// Deduplicating store of classified links, keyed by resolved URL
///
/// Every URL lives in at most one bucket. [`claim`](Self::claim) performs the
/// lookup and the insert under one lock, so concurrent workers never fetch
/// the same URL twice: the first caller owns the URL, later callers only
/// contribute their origin page.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    inner: Mutex<CacheInner>,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically looks up `url` and claims it if unseen
    ///
    /// Known URLs get `origin` merged into their found-in set.
    pub fn claim(&self, url: &str, category: LinkCategory, origin: &str) -> Claim {
        let mut inner = self.lock();

        if let Some(entry) = inner.entries.get_mut(url) {
            entry.found_in.insert(origin.to_string());
            return Claim::Known;
        }

        let mut found_in = BTreeSet::new();
        found_in.insert(origin.to_string());
        inner.push(url.to_string(), category, found_in, EntryState::Pending);
        Claim::Owner
    }

    /// Files a claimed URL into its bucket
    pub fn file(&self, url: &str, bucket: Bucket, status: LinkStatus) -> Result<(), CacheError> {
        let mut inner = self.lock();

        let entry = inner
            .entries
            .get_mut(url)
            .ok_or_else(|| CacheError::NotClaimed {
                url: url.to_string(),
            })?;

        match entry.state {
            EntryState::Pending => {
                entry.state = EntryState::Filed { bucket, status };
                Ok(())
            }
            EntryState::Filed { .. } => Err(CacheError::AlreadyPresent {
                url: url.to_string(),
            }),
        }
    }

    /// Inserts an already classified record
    ///
    /// The URL must not be present in any bucket or claimed.
    pub fn insert(&self, bucket: Bucket, record: LinkRecord) -> Result<(), CacheError> {
        let mut inner = self.lock();

        if inner.entries.contains_key(&record.url) {
            return Err(CacheError::AlreadyPresent { url: record.url });
        }

        let LinkRecord {
            url,
            category,
            found_in,
            status,
        } = record;
        inner.push(url, category, found_in, EntryState::Filed { bucket, status });
        Ok(())
    }

    /// Returns a snapshot of a filed record
    pub fn lookup(&self, url: &str) -> Option<(Bucket, LinkRecord)> {
        let inner = self.lock();
        let entry = inner.entries.get(url)?;

        match entry.state {
            EntryState::Filed { bucket, status } => Some((
                bucket,
                LinkRecord {
                    url: url.to_string(),
                    category: entry.category,
                    found_in: entry.found_in.clone(),
                    status,
                },
            )),
            EntryState::Pending => None,
        }
    }

    /// Returns true if `url` is claimed or filed
    pub fn contains(&self, url: &str) -> bool {
        self.lock().entries.contains_key(url)
    }

    /// Adds `origin` to the found-in set of a known URL
    ///
    /// Returns false if the URL is unknown.
    pub fn merge_origin(&self, url: &str, origin: &str) -> bool {
        match self.lock().entries.get_mut(url) {
            Some(entry) => {
                entry.found_in.insert(origin.to_string());
                true
            }
            None => false,
        }
    }

    /// Number of known URLs, pending claims included
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of filed records per bucket
    pub fn counts(&self) -> (usize, usize, usize) {
        let inner = self.lock();
        inner
            .entries
            .values()
            .fold((0, 0, 0), |(working, redirected, broken), entry| {
                match entry.state {
                    EntryState::Filed {
                        bucket: Bucket::Working,
                        ..
                    } => (working + 1, redirected, broken),
                    EntryState::Filed {
                        bucket: Bucket::Redirected,
                        ..
                    } => (working, redirected + 1, broken),
                    EntryState::Filed {
                        bucket: Bucket::Broken,
                        ..
                    } => (working, redirected, broken + 1),
                    EntryState::Pending => (working, redirected, broken),
                }
            })
    }

    /// Consumes the cache and returns the buckets in first-discovery order
    ///
    /// Claims that were never filed (only after cancellation) are dropped.
    pub fn into_buckets(self) -> AuditBuckets {
        let inner = self.inner.into_inner().unwrap_or_else(PoisonError::into_inner);

        let mut entries: Vec<(String, Entry)> = inner.entries.into_iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);

        let mut buckets = AuditBuckets::default();
        for (url, entry) in entries {
            let EntryState::Filed { bucket, status } = entry.state else {
                tracing::debug!("Dropping unfiled claim for {}", url);
                continue;
            };

            let record = LinkRecord {
                url,
                category: entry.category,
                found_in: entry.found_in,
                status,
            };

            match bucket {
                Bucket::Working => buckets.working.push(record),
                Bucket::Redirected => buckets.redirected.push(record),
                Bucket::Broken => buckets.broken.push(record),
            }
        }

        buckets
    }
}
