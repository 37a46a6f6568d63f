//! Markdown report generation
//!
//! The report lists every classified URL grouped by bucket, broken links
//! first, together with its category, status marker and the pages it was
//! found on.

use crate::cache::LinkRecord;
use crate::crawler::AuditReport;
use crate::output::OutputResult;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name for a report finished at the report's `finished_at` time
///
/// Format: `<YYYYmmdd-HHMM>_health_check_report.md`
pub fn report_file_name(report: &AuditReport) -> String {
    format!(
        "{}_health_check_report.md",
        report.finished_at.format("%Y%m%d-%H%M")
    )
}

/// Writes the markdown report into `output_dir`
///
/// The directory is created if missing.
///
/// # Arguments
///
/// * `report` - The completed audit
/// * `output_dir` - Directory the report file is written to
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written report
/// * `Err(OutputError)` - Failed to create the directory or write the file
pub fn write_markdown_report(report: &AuditReport, output_dir: &Path) -> OutputResult<PathBuf> {
    let markdown = format_markdown_report(report)?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_file_name(report));

    tracing::info!("Writing report to file: {}", path.display());

    let mut file = File::create(&path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(path)
}

/// Formats an audit report as markdown
pub fn format_markdown_report(report: &AuditReport) -> OutputResult<String> {
    let mut md = String::new();

    md.push_str("# Health Check Report\n\n");

    md.push_str(&format!("- **Root URL**: {}\n", report.root_url));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        report.finished_at.format("%Y-%m-%d %H:%M")
    ));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        report.duration_seconds()
    ));
    md.push_str(&format!(
        "- **Pages Audited**: {} of {}\n\n",
        report.pages_audited, report.pages_listed
    ));

    md.push_str("## Summary\n\n");
    md.push_str("| Total Links | Broken Links | Redirected Links | Working Links |\n");
    md.push_str("|-------------|--------------|------------------|---------------|\n");
    md.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        report.total_links(),
        report.broken.len(),
        report.redirected.len(),
        report.working.len()
    ));

    push_section(&mut md, "Broken Links", &report.broken)?;
    push_section(&mut md, "Redirected Links", &report.redirected)?;
    push_section(&mut md, "Working Links", &report.working)?;

    Ok(md)
}

/// Appends one bucket as a heading and a table
fn push_section(md: &mut String, title: &str, records: &[LinkRecord]) -> OutputResult<()> {
    writeln!(md, "## {} - {}\n", title, records.len())?;

    if records.is_empty() {
        md.push_str("_None_\n\n");
        return Ok(());
    }

    md.push_str("| URL | Type | Status | Found In |\n");
    md.push_str("|-----|------|--------|----------|\n");

    for record in records {
        let found_in: Vec<String> = record.found_in.iter().map(|page| found_in_cell(page)).collect();
        writeln!(
            md,
            "| {} | {} | {} | {} |",
            escape_cell(&record.url),
            record.category,
            record.status,
            found_in.join("<br>")
        )?;
    }
    md.push('\n');

    Ok(())
}

/// Renders a found-in entry, linking it when it is a page URL
///
/// Origin labels such as "Sitemap" are kept as plain text.
fn found_in_cell(page: &str) -> String {
    if page.starts_with("http://") || page.starts_with("https://") {
        let page = escape_cell(page);
        format!("[{}](<{}>)", page, page)
    } else {
        escape_cell(page)
    }
}

/// Escapes characters that would break a markdown table cell
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
