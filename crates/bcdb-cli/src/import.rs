//! The `import` command: merge the category listing page into the catalog.

use std::path::Path;

use bcdb_core::{AppConfig, CatalogDocument, CatalogMeta};
use bcdb_scraper::{fetch_toll, parse_listing, AssetCache};
use chrono::NaiveDate;

use crate::catalog::{build_client, load_catalog};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ImportSummary {
    pub listed: usize,
    pub added: usize,
    pub total: usize,
}

impl ImportSummary {
    pub(crate) fn print(&self, catalog_path: &Path) {
        println!(
            "import complete: {} brands listed, {} new",
            self.listed, self.added
        );
        println!(
            "catalog: {} brands saved to {}",
            self.total,
            catalog_path.display()
        );
    }
}

/// Fetches the listing at `listing_url`, merges unseen brands, refreshes the
/// toll, and saves.
///
/// An unreachable listing page is logged and merges nothing; the toll is
/// still refreshed and the catalog rewritten.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or written.
pub(crate) async fn run_import(
    config: &AppConfig,
    listing_url: &str,
    today: NaiveDate,
) -> anyhow::Result<ImportSummary> {
    let (mut store, _) = load_catalog(&config.catalog_path)?;
    let client = build_client(config)?;
    let assets = AssetCache::new(&config.assets_dir, &config.asset_public_prefix);

    let listed = match client.get_text(listing_url).await {
        Ok(html) => parse_listing(listing_url, &html),
        Err(e) => {
            tracing::error!(url = listing_url, error = %e, "listing page unavailable");
            Vec::new()
        }
    };
    tracing::info!(url = listing_url, brands = listed.len(), "listing parsed");

    let mut summary = ImportSummary {
        listed: listed.len(),
        ..ImportSummary::default()
    };

    for brand in listed {
        let mut record = brand.record;
        if store.contains(&record.name) {
            continue;
        }
        if let Some(logo_url) = &brand.logo_url {
            match assets.fetch_or_reuse(&client, logo_url).await {
                Ok(asset) => record.logo_asset = asset,
                Err(e) => tracing::warn!(url = %logo_url, error = %e, "logo download failed"),
            }
        }
        let name = record.name.clone();
        if store.insert(record) {
            summary.added += 1;
            tracing::info!(name = %name, "brand added from listing");
        }
    }

    let document = CatalogDocument {
        meta: CatalogMeta::new(&config.source_label, today),
        toll: fetch_toll(&client, &config.toll_feed_url).await,
        items: store.into_items(),
    };
    bcdb_store::save_document(&config.catalog_path, &document)
        .map_err(|e| anyhow::anyhow!("cannot save catalog: {e}"))?;

    summary.total = document.items.len();
    Ok(summary)
}
