//! Statistics derived from a completed audit
//!
//! This module provides functionality for summarizing an audit report and
//! printing the summary to stdout.

use crate::cache::LinkStatus;
use crate::crawler::AuditReport;
use std::collections::HashMap;

/// Audit statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStatistics {
    /// Total number of distinct URLs classified
    pub total_links: usize,

    pub working: usize,
    pub redirected: usize,
    pub broken: usize,

    /// Working links trusted by the skip policy without a fetch
    pub skipped: usize,

    /// Broken links per status marker, most frequent first
    pub broken_by_status: Vec<(String, usize)>,

    /// All classified links per category label, most frequent first
    pub links_by_category: Vec<(String, usize)>,
}

/// Collects statistics from a report
pub fn collect_statistics(report: &AuditReport) -> LinkStatistics {
    let skipped = report
        .working
        .iter()
        .filter(|record| record.status.is_skip())
        .count();

    let broken_by_status = sorted_counts(report.broken.iter().map(|record| match record.status {
        LinkStatus::Blank => "invalid email".to_string(),
        status => status.to_string(),
    }));

    let links_by_category = sorted_counts(
        report
            .working
            .iter()
            .chain(&report.redirected)
            .chain(&report.broken)
            .map(|record| record.category.to_string()),
    );

    LinkStatistics {
        total_links: report.total_links(),
        working: report.working.len(),
        redirected: report.redirected.len(),
        broken: report.broken.len(),
        skipped,
        broken_by_status,
        links_by_category,
    }
}

/// Counts occurrences, sorted by count descending then key ascending
fn sorted_counts(keys: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The completed audit to summarize
pub fn print_statistics(report: &AuditReport) {
    let stats = collect_statistics(report);

    println!("=== Health Check Statistics ===\n");

    println!("Overview:");
    println!("  Root URL: {}", report.root_url);
    println!(
        "  Pages audited: {} of {}",
        report.pages_audited, report.pages_listed
    );
    println!("  Total links checked: {}", stats.total_links);
    println!("  Duration: {} seconds", report.duration_seconds());
    println!();

    println!("Links by Bucket:");
    for (label, count) in [
        ("Broken", stats.broken),
        ("Redirected", stats.redirected),
        ("Working", stats.working),
    ] {
        let percentage = if stats.total_links > 0 {
            (count as f64 / stats.total_links as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    if stats.skipped > 0 {
        println!("  (of which {} trusted without checking)", stats.skipped);
    }
    println!();

    if !stats.links_by_category.is_empty() {
        println!("Links by Type:");
        for (category, count) in &stats.links_by_category {
            println!("  {}: {}", category, count);
        }
        println!();
    }

    if !stats.broken_by_status.is_empty() {
        println!("Broken Links by Status:");
        for (status, count) in &stats.broken_by_status {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} links working)",
        report.success_rate(),
        stats.working,
        stats.total_links
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LinkRecord;
    use crate::url::LinkCategory;
    use chrono::Local;

    fn record(url: &str, category: LinkCategory, status: LinkStatus) -> LinkRecord {
        LinkRecord::new(url, category, "https://example.com/", status)
    }

    fn create_test_report() -> AuditReport {
        let now = Local::now();
        AuditReport {
            root_url: "https://example.com".to_string(),
            started_at: now,
            finished_at: now,
            pages_listed: 1,
            pages_audited: 1,
            working: vec![
                record("https://example.com/a", LinkCategory::Link, LinkStatus::Code(200)),
                record("https://example.com/b", LinkCategory::Link, LinkStatus::SkipUrl),
            ],
            redirected: vec![record(
                "https://example.com/old",
                LinkCategory::Link,
                LinkStatus::Code(301),
            )],
            broken: vec![
                record("https://example.com/x.png", LinkCategory::Image, LinkStatus::Code(404)),
                record("https://example.com/y.png", LinkCategory::Image, LinkStatus::Code(404)),
                record("mailto:typo@example.com", LinkCategory::Email, LinkStatus::Blank),
                record("https://down.example/", LinkCategory::Script, LinkStatus::Error),
            ],
        }
    }

    #[test]
    fn test_collect_statistics() {
        let stats = collect_statistics(&create_test_report());

        assert_eq!(stats.total_links, 7);
        assert_eq!(stats.working, 2);
        assert_eq!(stats.redirected, 1);
        assert_eq!(stats.broken, 4);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_broken_by_status_ordering() {
        let stats = collect_statistics(&create_test_report());

        assert_eq!(
            stats.broken_by_status,
            vec![
                ("404".to_string(), 2),
                ("ERROR".to_string(), 1),
                ("invalid email".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_links_by_category() {
        let stats = collect_statistics(&create_test_report());

        assert_eq!(stats.links_by_category[0], ("Link".to_string(), 3));
        assert_eq!(stats.links_by_category[1], ("Image".to_string(), 2));
    }
}
