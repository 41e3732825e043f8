//! The `toll` command: refresh the toll snapshot in place.

use bcdb_core::{AppConfig, CatalogDocument, CatalogMeta, TollSnapshot};
use bcdb_scraper::fetch_toll;
use chrono::NaiveDate;

use crate::catalog::{build_client, load_catalog};

/// Recomputes the toll snapshot and rewrites the catalog with its items
/// untouched.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or written.
pub(crate) async fn run_toll_refresh(
    config: &AppConfig,
    today: NaiveDate,
) -> anyhow::Result<TollSnapshot> {
    let (store, _) = load_catalog(&config.catalog_path)?;
    let client = build_client(config)?;
    let toll = fetch_toll(&client, &config.toll_feed_url).await;

    let document = CatalogDocument {
        meta: CatalogMeta::new(&config.source_label, today),
        toll,
        items: store.into_items(),
    };
    bcdb_store::save_document(&config.catalog_path, &document)
        .map_err(|e| anyhow::anyhow!("cannot save catalog: {e}"))?;
    Ok(document.toll)
}

pub(crate) fn print_snapshot(toll: &TollSnapshot) {
    println!("toll snapshot ({}):", toll.last_update);
    for (metric, count) in &toll.metrics {
        println!("  {metric}: {count}");
    }
}
