//! Configuration pointing every endpoint at a mock server and every path into
//! a temp directory.

use std::path::Path;

use bcdb_core::{AppConfig, ResolverStrategy};

pub(crate) fn test_config(base_url: &str, dir: &Path) -> AppConfig {
    AppConfig {
        log_level: "debug".to_owned(),
        base_url: base_url.to_owned(),
        brand_path_prefix: "/brand/".to_owned(),
        sitemap_path: "/sitemap.xml".to_owned(),
        search_path: "/search".to_owned(),
        search_query_field: "search".to_owned(),
        strategies: ResolverStrategy::ALL.to_vec(),
        listing_url: format!("{base_url}/boycott.html"),
        toll_feed_url: format!("{base_url}/casualties_daily.json"),
        catalog_path: dir.join("boycott_data.json"),
        assets_dir: dir.join("images"),
        asset_public_prefix: "assets/images".to_owned(),
        seeds_path: dir.join("seeds.yaml"),
        source_label: "Merged Database".to_owned(),
        checkpoint_every: 20,
        scraper_request_timeout_secs: 5,
        scraper_user_agent: "bcdb-test/0.1".to_owned(),
        scraper_min_delay_ms: 0,
        scraper_max_delay_ms: 0,
        scraper_max_retries: 0,
        scraper_retry_backoff_base_secs: 0,
    }
}

pub(crate) fn brand_page(name: &str, related: &[&str]) -> String {
    let slides: String = related
        .iter()
        .map(|r| format!(r#"<div class="swiper-slide"><a href="/brand/{r}/">{r}</a></div>"#))
        .collect();
    format!(
        r#"<html><body>
             <h1 class="result-failure">Boycott</h1>
             <h4 class="brand">BRAND NAME : {name}</h4>
             <h5>REASON</h5><p>Reason for {name}.</p>
             {slides}
           </body></html>"#
    )
}
