//! Integration tests for Link-Warden
//!
//! These tests run complete audits against wiremock servers.

mod audit_tests;
mod report_tests;

use link_warden::config::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with all delays disabled
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.checker.page_delay_ms = 0;
    config.checker.link_delay_min_ms = 0;
    config.checker.link_delay_max_ms = 0;
    config.checker.request_timeout_secs = 5;
    config.checker.max_concurrent_checks = 4;
    config
}

/// Builds a `<urlset>` sitemap listing the given page URLs
pub fn urlset(pages: &[String]) -> String {
    let entries: String = pages
        .iter()
        .map(|page| format!("<url><loc>{}</loc></url>", page))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

/// Builds a `<sitemapindex>` listing the given sub-sitemap URLs
pub fn sitemap_index(sitemaps: &[String]) -> String {
    let entries: String = sitemaps
        .iter()
        .map(|sitemap| format!("<sitemap><loc>{}</loc></sitemap>", sitemap))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

/// Mounts a GET route answering with `status` and `body`
pub async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}
