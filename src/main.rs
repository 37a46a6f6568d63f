//! Link-Warden main entry point
//!
//! This is the command-line interface for the Link-Warden website health checker.

use clap::Parser;
use link_warden::config::{load_config_with_hash, Config};
use link_warden::output::{print_statistics, write_markdown_report};
use link_warden::{normalize_root_url, Auditor};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Link-Warden: a sitemap-driven website health checker
///
/// Link-Warden reads a site's sitemap, visits every listed page, and checks
/// each link, script, image and stylesheet it finds. Every distinct URL is
/// reported once as working, redirected, or broken.
#[derive(Parser, Debug)]
#[command(name = "link-warden")]
#[command(version = "1.0.0")]
#[command(about = "A sitemap-driven website health checker", long_about = None)]
struct Cli {
    /// Root URL of the website to audit (https is assumed if no scheme is given)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory the report is written to (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be audited without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(output) = &cli.output {
        config.output.report_dir = output.display().to_string();
    }

    let root_url = normalize_root_url(&cli.url)?;

    if cli.dry_run {
        handle_dry_run(&config, &root_url);
        return Ok(());
    }

    handle_audit(config, &root_url, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_warden=info,warn"),
            1 => EnvFilter::new("link_warden=debug,info"),
            2 => EnvFilter::new("link_warden=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, root_url: &str) {
    println!("=== Link-Warden Dry Run ===\n");

    println!("Target:");
    println!("  Root URL: {}", root_url);

    println!("\nChecker Configuration:");
    println!(
        "  Max concurrent checks: {}",
        config.checker.max_concurrent_checks
    );
    println!("  Request timeout: {}s", config.checker.request_timeout_secs);
    println!("  Max redirects: {}", config.checker.max_redirects);
    println!("  Page delay: {}ms", config.checker.page_delay_ms);
    println!(
        "  Link delay: {}-{}ms",
        config.checker.link_delay_min_ms, config.checker.link_delay_max_ms
    );

    println!("\nUser Agent:");
    println!("  User-Agent: {}", config.user_agent.user_agent);
    println!("  Accept-Language: {}", config.user_agent.accept_language);

    println!("\nOutput:");
    println!("  Report directory: {}", config.output.report_dir);

    let mut emails: Vec<_> = config.audit.valid_email_addresses.iter().collect();
    emails.sort();
    println!("\nValid Email Addresses ({}):", emails.len());
    for email in emails {
        println!("  - {}", email);
    }

    let mut skip_urls: Vec<_> = config.audit.skip_check_urls.iter().collect();
    skip_urls.sort();
    println!("\nSkipped URLs ({}):", skip_urls.len());
    for url in skip_urls {
        println!("  - {}", url);
    }

    println!(
        "\nSkipped URL Patterns ({}):",
        config.audit.skip_check_url_patterns.len()
    );
    for pattern in &config.audit.skip_check_url_patterns {
        println!("  - {}", pattern);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would audit {} through its sitemap", root_url);
}

/// Handles the main audit operation
async fn handle_audit(
    config: Config,
    root_url: &str,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let report_dir = PathBuf::from(&config.output.report_dir);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping audit");
            interrupt.cancel();
        }
    });

    let auditor = Auditor::new(config)?;

    let report = match auditor.run(root_url, cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Audit failed: {}", e);
            return Err(e.into());
        }
    };

    let path = write_markdown_report(&report, &report_dir)?;

    if !quiet {
        print_statistics(&report);
        println!("\n✓ Report written to: {}", path.display());
    }

    Ok(())
}
