//! Report output tests

use crate::{create_test_config, mount_page, urlset};
use link_warden::output::{collect_statistics, report_file_name, write_markdown_report};
use link_warden::Auditor;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

#[tokio::test]
async fn test_audit_report_written_to_directory() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let page = format!("{}/blog", base_url);

    mount_page(&server, "/", 200, "").await;
    mount_page(&server, "/sitemap.xml", 200, &urlset(&[page.clone()])).await;
    mount_page(
        &server,
        "/blog",
        200,
        r#"<a href="/post-1">Post</a><img src="/cover.jpg">"#,
    )
    .await;
    mount_page(&server, "/post-1", 200, "").await;

    let report = Auditor::new(create_test_config())
        .unwrap()
        .run(&base_url, CancellationToken::new())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = write_markdown_report(&report, dir.path()).unwrap();

    assert_eq!(path, dir.path().join(report_file_name(&report)));
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with("_health_check_report.md"));

    let markdown = std::fs::read_to_string(&path).unwrap();
    assert!(markdown.contains("## Broken Links - 1"));
    assert!(markdown.contains(&format!(
        "| {}/cover.jpg | Image | 404 | [{}](<{}>) |",
        base_url, page, page
    )));
    assert!(markdown.contains(&format!(
        "| {}/post-1 | Link | 200 | [{}](<{}>) |",
        base_url, page, page
    )));
}

#[tokio::test]
async fn test_statistics_match_report() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let page = format!("{}/a", base_url);

    mount_page(&server, "/", 200, "").await;
    mount_page(&server, "/sitemap.xml", 200, &urlset(&[page])).await;
    mount_page(
        &server,
        "/a",
        200,
        r#"<a href="tel:+4930123">Call</a><a href="/nowhere">x</a>"#,
    )
    .await;

    let report = Auditor::new(create_test_config())
        .unwrap()
        .run(&base_url, CancellationToken::new())
        .await
        .unwrap();

    let stats = collect_statistics(&report);
    // root, page, telephone number
    assert_eq!(stats.working, 3);
    assert_eq!(stats.broken, 1);
    assert_eq!(stats.total_links, report.total_links());
    assert_eq!(stats.broken_by_status, vec![("404".to_string(), 1)]);
}
