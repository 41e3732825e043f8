//! Integration tests for `visit_page` and `AssetCache` against a mocked site.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bcdb_scraper::{
    visit_page, AssetCache, BrandPageExtractor, BrandUrls, PageOutcome, ScraperError,
    ShapeMismatch, SourceClient,
};

fn test_client() -> SourceClient {
    SourceClient::new(5, "bcdb-test/0.1", 0, 0).expect("failed to build test SourceClient")
}

fn extractor(server: &MockServer) -> BrandPageExtractor {
    BrandPageExtractor::new(BrandUrls::new(&server.uri(), "/brand/").unwrap())
}

#[tokio::test]
async fn brand_page_is_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brand/Foo/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h4 class="brand">BRAND NAME : Foo</h4>
               <div class="swiper-slide"><a href="/brand/Bar/">Bar</a></div>"#,
        ))
        .mount(&server)
        .await;

    let url = format!("{}/brand/Foo/", server.uri());
    let outcome = visit_page(&test_client(), &extractor(&server), &url).await;

    let brand = match outcome {
        PageOutcome::Entity(brand) => brand,
        other => panic!("expected Entity, got: {other:?}"),
    };
    assert_eq!(brand.record.name, "Foo");
    assert_eq!(brand.links, vec![format!("{}/brand/Bar/", server.uri())]);
}

#[tokio::test]
async fn missing_page_is_not_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/brand/Nope/", server.uri());
    let outcome = visit_page(&test_client(), &extractor(&server), &url).await;

    assert!(matches!(
        outcome,
        PageOutcome::NotEntity(ShapeMismatch::NotFound)
    ));
}

#[tokio::test]
async fn page_without_brand_heading_is_not_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Search</h1>"))
        .mount(&server)
        .await;

    let url = format!("{}/brand/Search/", server.uri());
    let outcome = visit_page(&test_client(), &extractor(&server), &url).await;

    assert!(matches!(
        outcome,
        PageOutcome::NotEntity(ShapeMismatch::MissingName)
    ));
}

#[tokio::test]
async fn server_error_is_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = format!("{}/brand/Foo/", server.uri());
    let outcome = visit_page(&test_client(), &extractor(&server), &url).await;

    assert!(matches!(
        outcome,
        PageOutcome::Failed(ScraperError::UnexpectedStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn asset_is_downloaded_once_per_file_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logos/foo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = AssetCache::new(dir.path().join("images"), "assets/images");
    let client = test_client();
    let url = format!("{}/logos/foo.png?v=1", server.uri());

    let first = cache.fetch_or_reuse(&client, &url).await.unwrap();
    let second = cache.fetch_or_reuse(&client, &url).await.unwrap();

    assert_eq!(first.as_deref(), Some("assets/images/foo.png"));
    assert_eq!(second, first);
    assert_eq!(
        std::fs::read(dir.path().join("images/foo.png")).unwrap(),
        b"png-bytes"
    );
}

#[tokio::test]
async fn failed_asset_download_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = AssetCache::new(dir.path(), "assets/images");
    let result = cache
        .fetch_or_reuse(&test_client(), &format!("{}/missing.png", server.uri()))
        .await;

    assert!(matches!(result, Err(ScraperError::NotFound { .. })));
    assert!(!dir.path().join("missing.png").exists());
}
