//! Configuration module for Link-Warden
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use link_warden::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("link-warden.toml")).unwrap();
//! println!("Trusted addresses: {:?}", config.audit.valid_email_addresses);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AuditConfig, CheckerConfig, Config, OutputConfig, UserAgentConfig, DEFAULT_ACCEPT_LANGUAGE,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
