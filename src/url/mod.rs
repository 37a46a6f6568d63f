//! URL handling module for Link-Warden
//!
//! This module provides reference resolution, root URL normalization, and
//! the skip-and-trust policy applied before any link is fetched.

mod matcher;
mod normalize;
mod resolve;

use std::fmt;

// Re-export main functions
pub use matcher::{SkipPolicy, SkipReason};
pub use normalize::normalize_root_url;
pub use resolve::{resolve, Resolution, ResolvedTarget};

/// Where a reference was discovered, or what it turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkCategory {
    /// `<a href>`
    Link,
    /// `<script src>`
    Script,
    /// `<img src>`
    Image,
    /// `<link href>` (stylesheets, icons, canonical, ...)
    OtherLink,
    /// `mailto:` reference
    Email,
    /// `tel:` reference
    Telephone,
}

impl LinkCategory {
    /// Returns the human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Link => "Link",
            Self::Script => "Script",
            Self::Image => "Image",
            Self::OtherLink => "Other Link",
            Self::Email => "Email",
            Self::Telephone => "Telephone",
        }
    }

    /// Returns true if references of this category are never fetched
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Email | Self::Telephone)
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
