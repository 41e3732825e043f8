use std::collections::BTreeMap;

use bcdb_core::{BrandRecord, CatalogDocument, ResolverStrategy};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::test_support::{brand_page, test_config};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn seeds(names: &[&str]) -> SeedsFile {
    SeedsFile {
        seeds: names.iter().map(|s| (*s).to_owned()).collect(),
        aliases: BTreeMap::new(),
    }
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_toll(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/casualties_daily.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"report_date": "2026-10-14", "killed_cum": 100, "famine_cum": 7}
        ])))
        .mount(server)
        .await;
}

fn saved(config: &AppConfig) -> CatalogDocument {
    bcdb_store::load_document(&config.catalog_path)
        .unwrap()
        .expect("catalog written")
}

fn names(document: &CatalogDocument) -> Vec<&str> {
    document.items.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn sitemap_brand_and_guessed_seed_are_both_added() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(
        &server,
        "/sitemap.xml",
        format!("<urlset><loc>{base}/brand/Bar/</loc></urlset>"),
    )
    .await;
    mount_page(&server, "/", "<html>no token here</html>".to_owned()).await;
    mount_page(&server, "/brand/Bar/", brand_page("Bar", &[])).await;
    mount_page(&server, "/brand/Foo/", brand_page("Foo", &[])).await;
    mount_toll(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&base, dir.path());
    let summary = run_crawl(&config, &seeds(&["Foo"]), false, today())
        .await
        .unwrap();

    let document = saved(&config);
    assert_eq!(names(&document), vec!["Bar", "Foo"]);
    assert_eq!(summary.added, 2);
    assert_eq!(document.toll.get("killed"), Some(100));
    assert_eq!(document.toll.get("starved"), Some(7));
    assert_eq!(document.meta.updated, "2026-10-15");
    assert_eq!(
        document.items[1].source_url.as_deref(),
        Some(format!("{base}/brand/Foo/").as_str())
    );
}

#[tokio::test]
async fn guessed_seed_that_404s_is_skipped_cleanly() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(
        &server,
        "/sitemap.xml",
        format!("<loc>{base}/brand/Bar/</loc>"),
    )
    .await;
    mount_page(&server, "/", "<html></html>".to_owned()).await;
    mount_page(&server, "/brand/Bar/", brand_page("Bar", &[])).await;
    Mock::given(method("GET"))
        .and(path("/brand/Foo/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_toll(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&base, dir.path());
    let summary = run_crawl(&config, &seeds(&["Foo"]), false, today())
        .await
        .unwrap();

    assert_eq!(names(&saved(&config)), vec!["Bar"]);
    assert_eq!(summary.not_brand, 1);
    assert_eq!(summary.visited, 2);
}

#[tokio::test]
async fn related_links_are_followed_and_cycles_terminate() {
    let server = MockServer::start().await;
    mount_page(&server, "/brand/Alpha/", brand_page("Alpha", &["Beta"])).await;
    mount_page(&server, "/brand/Beta/", brand_page("Beta", &["Alpha", "Gamma"])).await;
    mount_page(&server, "/brand/Gamma/", brand_page("Gamma", &["Alpha", "Beta"])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.strategies = vec![ResolverStrategy::Guess];

    let summary = run_crawl(&config, &seeds(&["Alpha"]), true, today())
        .await
        .unwrap();

    let document = saved(&config);
    assert_eq!(names(&document), vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(summary.visited, 3);
    assert_eq!(document.items[0].alternatives, vec!["Beta"]);
    assert_eq!(document.items[1].alternatives, vec!["Alpha", "Gamma"]);
}

#[tokio::test]
async fn resuming_never_duplicates_known_brand() {
    let server = MockServer::start().await;
    mount_page(&server, "/brand/Nestle/", brand_page("Nestle", &["Nescafe"])).await;
    mount_page(&server, "/brand/Nescafe/", brand_page("Nescafe", &["Nestle"])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.strategies = vec![ResolverStrategy::Guess];

    let mut curated = BrandRecord::named("Nestle");
    curated.description = "curated".to_owned();
    bcdb_store::save_document(
        &config.catalog_path,
        &CatalogDocument {
            meta: CatalogMeta::new("Merged Database", today()),
            toll: TollSnapshot::new("2026-10-01").with("killed", 1),
            items: vec![curated],
        },
    )
    .unwrap();

    run_crawl(&config, &seeds(&["Nestle", "Nescafe"]), true, today())
        .await
        .unwrap();
    run_crawl(&config, &seeds(&["Nestle", "Nescafe"]), true, today())
        .await
        .unwrap();

    let document = saved(&config);
    assert_eq!(names(&document), vec!["Nestle", "Nescafe"]);
    assert_eq!(document.items[0].description, "curated");
    assert_eq!(document.toll.get("killed"), Some(1));
}

#[tokio::test]
async fn page_seen_under_other_name_is_not_added_twice() {
    let server = MockServer::start().await;
    mount_page(&server, "/brand/Coca-Cola/", brand_page("Coca Cola", &[])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.strategies = vec![ResolverStrategy::Guess];

    let summary = run_crawl(&config, &seeds(&["Coca-Cola"]), true, today())
        .await
        .unwrap();
    assert_eq!(summary.added, 1);

    let second = run_crawl(&config, &seeds(&["Coca-Cola"]), true, today())
        .await
        .unwrap();
    let document = saved(&config);
    assert_eq!(names(&document), vec!["Coca Cola"]);
    assert_eq!(second.added, 0);
}

#[tokio::test]
async fn checkpoints_are_written_during_the_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/brand/Alpha/", brand_page("Alpha", &["Beta"])).await;
    mount_page(&server, "/brand/Beta/", brand_page("Beta", &[])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.strategies = vec![ResolverStrategy::Guess];
    config.checkpoint_every = 1;

    let summary = run_crawl(&config, &seeds(&["Alpha"]), true, today())
        .await
        .unwrap();

    assert_eq!(summary.visited, 2);
    assert_eq!(summary.saves, 3);
}

#[tokio::test]
async fn unreadable_catalog_is_fatal() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());
    std::fs::write(&config.catalog_path, "{ broken").unwrap();

    let result = run_crawl(&config, &seeds(&["Alpha"]), true, today()).await;

    assert!(result.is_err());
    assert_eq!(
        std::fs::read_to_string(&config.catalog_path).unwrap(),
        "{ broken"
    );
}

#[tokio::test]
async fn invalid_base_url_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config("disoccupied.com", dir.path());

    let err = run_crawl(&config, &seeds(&["Alpha"]), true, today())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("invalid URL"), "{err}");
    assert!(!config.catalog_path.exists());
}

#[tokio::test]
async fn logo_is_cached_and_referenced_by_public_path() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/brand/Puma/",
        r#"<h4 class="brand">Puma</h4><img class="brand_image" src="/logos/puma.png">"#.to_owned(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/logos/puma.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.strategies = vec![ResolverStrategy::Guess];

    run_crawl(&config, &seeds(&["Puma"]), true, today())
        .await
        .unwrap();

    let document = saved(&config);
    assert_eq!(
        document.items[0].logo_asset.as_deref(),
        Some("assets/images/puma.png")
    );
    assert!(config.assets_dir.join("puma.png").exists());
}
