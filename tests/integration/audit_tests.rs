//! End-to-end audit tests

use crate::{create_test_config, mount_page, sitemap_index, urlset};
use link_warden::crawler::{MAIN_URL_ORIGIN, SITEMAP_INDEX_ORIGIN, SITEMAP_ORIGIN};
use link_warden::{AuditError, Auditor, Bucket, LinkCategory, LinkStatus};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_shared_link_lands_in_one_bucket_with_all_origins() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let page1 = format!("{}/page1", base_url);
    let page2 = format!("{}/page2", base_url);

    mount_page(&server, "/", 200, "<html><body>Home</body></html>").await;
    mount_page(
        &server,
        "/sitemap.xml",
        200,
        &urlset(&[page1.clone(), page2.clone()]),
    )
    .await;
    mount_page(
        &server,
        "/page1",
        200,
        r#"<html><body><a href="/contact">Contact</a></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/page2",
        200,
        r#"<html><body><a href="/contact">Contact us</a></body></html>"#,
    )
    .await;

    // The shared target must be fetched exactly once
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let report = Auditor::new(create_test_config())
        .unwrap()
        .run(&base_url, CancellationToken::new())
        .await
        .expect("audit should complete");

    let contact = format!("{}/contact", base_url);
    let (bucket, record) = report.find(&contact).expect("contact link recorded");
    assert_eq!(bucket, Bucket::Working);
    assert_eq!(record.found_in.len(), 2);
    assert!(record.found_in.contains(&page1));
    assert!(record.found_in.contains(&page2));

    let occurrences = report
        .working
        .iter()
        .chain(&report.redirected)
        .chain(&report.broken)
        .filter(|record| record.url == contact)
        .count();
    assert_eq!(occurrences, 1);

    assert_eq!(report.pages_listed, 2);
    assert_eq!(report.pages_audited, 2);
}

#[tokio::test]
async fn test_root_and_pages_are_filed_with_labels() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let page = format!("{}/about", base_url);

    mount_page(&server, "/", 200, "").await;
    mount_page(&server, "/sitemap.xml", 200, &urlset(&[page.clone()])).await;
    mount_page(&server, "/about", 200, "<p>About</p>").await;

    let report = Auditor::new(create_test_config())
        .unwrap()
        .run(&base_url, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.working[0].url, base_url);
    assert!(report.working[0].found_in.contains(MAIN_URL_ORIGIN));

    let (bucket, record) = report.find(&page).unwrap();
    assert_eq!(bucket, Bucket::Working);
    assert!(record.found_in.contains(SITEMAP_ORIGIN));
}

#[tokio::test]
async fn test_unreachable_root_aborts() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 500, "").await;

    let result = Auditor::new(create_test_config())
        .unwrap()
        .run(&server.uri(), CancellationToken::new())
        .await;

    assert!(matches!(result, Err(AuditError::RootUnreachable { .. })));
}

#[tokio::test]
async fn test_missing_sub_sitemap_aborts() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let missing = format!("{}/sitemap-1.xml", base_url);

    mount_page(&server, "/", 200, "").await;
    mount_page(&server, "/sitemap.xml", 404, "").await;
    mount_page(
        &server,
        "/sitemap-index.xml",
        200,
        &sitemap_index(&[missing.clone()]),
    )
    .await;
    mount_page(&server, "/sitemap-1.xml", 404, "").await;

    let result = Auditor::new(create_test_config())
        .unwrap()
        .run(&base_url, CancellationToken::new())
        .await;

    match result {
        Err(AuditError::SubSitemapMissing { url }) => assert_eq!(url, missing),
        other => panic!("expected SubSitemapMissing, got {:?}", other.map(|r| r.root_url)),
    }
}

#[tokio::test]
async fn test_sitemap_index_expansion() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let pages_sitemap = format!("{}/sitemap-pages.xml", base_url);
    let failing_sitemap = format!("{}/sitemap-posts.xml", base_url);
    let page = format!("{}/team", base_url);

    mount_page(&server, "/", 200, "").await;
    mount_page(
        &server,
        "/sitemap-index.xml",
        200,
        &sitemap_index(&[failing_sitemap.clone(), pages_sitemap]),
    )
    .await;
    mount_page(&server, "/sitemap-posts.xml", 503, "").await;
    mount_page(&server, "/sitemap-pages.xml", 200, &urlset(&[page.clone()])).await;
    mount_page(&server, "/team", 200, "<p>Team</p>").await;

    let report = Auditor::new(create_test_config())
        .unwrap()
        .run(&base_url, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_audited, 1);
    assert!(report.find(&page).is_some());

    let (bucket, record) = report.find(&failing_sitemap).unwrap();
    assert_eq!(bucket, Bucket::Broken);
    assert_eq!(record.status, LinkStatus::Code(503));
    assert!(record.found_in.contains(SITEMAP_INDEX_ORIGIN));
}

#[tokio::test]
async fn test_broken_page_is_recorded_and_not_scanned() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let page = format!("{}/gone", base_url);

    mount_page(&server, "/", 200, "").await;
    mount_page(&server, "/sitemap.xml", 200, &urlset(&[page.clone()])).await;
    mount_page(&server, "/gone", 410, r#"<a href="/hidden">Hidden</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = Auditor::new(create_test_config())
        .unwrap()
        .run(&base_url, CancellationToken::new())
        .await
        .unwrap();

    let (bucket, record) = report.find(&page).unwrap();
    assert_eq!(bucket, Bucket::Broken);
    assert_eq!(record.status, LinkStatus::Code(410));
    assert_eq!(report.pages_audited, 0);
}

#[tokio::test]
async fn test_classification_of_resources() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let home = format!("{}/home", base_url);

    let html = r#"<html>
        <head>
            <link rel="stylesheet" href="/style.css">
            <script src="/app.js"></script>
        </head>
        <body>
            <a href="/old">Old</a>
            <a href="/private">Private</a>
            <a href="mailto:hello@example.com">Mail</a>
            <img src="/missing.png">
        </body>
    </html>"#;

    mount_page(&server, "/", 200, "").await;
    mount_page(&server, "/sitemap.xml", 200, &urlset(&[home.clone()])).await;
    mount_page(&server, "/home", 200, html).await;
    mount_page(&server, "/style.css", 200, "body {}").await;
    mount_page(&server, "/app.js", 403, "").await;
    mount_page(&server, "/missing.png", 404, "").await;
    mount_page(&server, "/new", 200, "").await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config
        .audit
        .skip_check_urls
        .insert(format!("{}/private", base_url));
    config
        .audit
        .valid_email_addresses
        .insert("hello@example.com".to_string());

    let report = Auditor::new(config)
        .unwrap()
        .run(&base_url, CancellationToken::new())
        .await
        .unwrap();

    let (bucket, record) = report.find(&format!("{}/old", base_url)).unwrap();
    assert_eq!(bucket, Bucket::Redirected);
    assert_eq!(record.status, LinkStatus::Code(301));

    let (bucket, record) = report.find(&format!("{}/private", base_url)).unwrap();
    assert_eq!(bucket, Bucket::Working);
    assert_eq!(record.status, LinkStatus::SkipUrl);

    let (bucket, record) = report.find("mailto:hello@example.com").unwrap();
    assert_eq!(bucket, Bucket::Working);
    assert_eq!(record.category, LinkCategory::Email);

    let (bucket, record) = report.find(&format!("{}/app.js", base_url)).unwrap();
    assert_eq!(bucket, Bucket::Working);
    assert_eq!(record.status, LinkStatus::Code(403));
    assert_eq!(record.category, LinkCategory::Script);

    let (bucket, record) = report.find(&format!("{}/missing.png", base_url)).unwrap();
    assert_eq!(bucket, Bucket::Broken);
    assert_eq!(record.category, LinkCategory::Image);

    let (_, record) = report.find(&format!("{}/style.css", base_url)).unwrap();
    assert_eq!(record.category, LinkCategory::OtherLink);
}
