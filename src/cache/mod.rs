//! Classification cache for Link-Warden
//!
//! This module is the single source of truth for "already checked".
//!
//! # Components
//!
//! - `ClassificationCache`: the deduplicating store, keyed by resolved URL
//! - `LinkRecord`: a classified link and the pages it was found on
//! - `Bucket` / `LinkStatus`: the classification outcome and its marker

mod record;
mod store;

// Re-export main types
pub use record::{AuditBuckets, Bucket, LinkRecord, LinkStatus};
pub use store::{Claim, ClassificationCache};
