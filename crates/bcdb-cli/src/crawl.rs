//! The `crawl` command: seed resolution, frontier traversal, merge, and
//! checkpointed persistence.
//!
//! Per-page failures are logged and skipped; only catalog I/O aborts a run.

use std::path::Path;

use bcdb_core::{AppConfig, CatalogMeta, SeedsFile, TollSnapshot};
use bcdb_scraper::{
    fetch_toll, visit_page, AssetCache, BrandPageExtractor, Frontier, PageOutcome,
    ResolverSettings, SeedResolver,
};
use bcdb_store::Checkpointer;
use chrono::NaiveDate;

use crate::catalog::{build_client, load_catalog};

/// Counters reported at the end of a crawl.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct CrawlSummary {
    pub candidates: usize,
    pub visited: usize,
    pub added: usize,
    pub known: usize,
    pub not_brand: usize,
    pub failed: usize,
    pub total: usize,
    pub saves: usize,
}

impl CrawlSummary {
    pub(crate) fn print(&self, catalog_path: &Path) {
        println!(
            "crawl complete: visited {} of {} candidate URLs, added {} new brands \
             ({} already known, {} not brand pages, {} failed)",
            self.visited, self.candidates, self.added, self.known, self.not_brand, self.failed
        );
        println!(
            "catalog: {} brands saved to {} ({} writes)",
            self.total,
            catalog_path.display(),
            self.saves
        );
    }
}

/// Runs one full crawl and writes the final catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or written, or if the HTTP
/// client cannot be built. Everything else degrades to skipping a URL.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    seeds: &SeedsFile,
    skip_toll: bool,
    today: NaiveDate,
) -> anyhow::Result<CrawlSummary> {
    let (mut store, loaded_toll) = load_catalog(&config.catalog_path)?;
    let client = build_client(config)?;
    let settings = ResolverSettings::from_config(config)?;
    let urls = settings.urls.clone();

    let mut frontier = Frontier::new(urls.clone());
    for record in store.items() {
        frontier.mark_visited(&urls.for_segment(&record.name));
        if let Some(source_url) = &record.source_url {
            frontier.mark_visited(source_url);
        }
    }

    let candidates = SeedResolver::new(&client, &settings, seeds).resolve().await;
    let mut summary = CrawlSummary {
        candidates: candidates.len(),
        ..CrawlSummary::default()
    };
    for candidate in &candidates {
        frontier.enqueue(&candidate.url);
    }
    tracing::info!(
        candidates = candidates.len(),
        pending = frontier.pending_len(),
        known = store.len(),
        "crawl starting"
    );

    let carried_toll = loaded_toll.unwrap_or_else(TollSnapshot::offline_fallback);
    let mut checkpointer = Checkpointer::new(
        &config.catalog_path,
        config.checkpoint_every,
        CatalogMeta::new(&config.source_label, today),
        carried_toll.clone(),
    );
    let extractor = BrandPageExtractor::new(urls);
    let assets = AssetCache::new(&config.assets_dir, &config.asset_public_prefix);

    while let Some(url) = frontier.next_url() {
        settings.politeness.pause().await;
        summary.visited += 1;

        match visit_page(&client, &extractor, &url).await {
            PageOutcome::Entity(brand) => {
                for link in &brand.links {
                    frontier.enqueue(link);
                }

                let mut record = brand.record;
                if store.contains(&record.name) {
                    summary.known += 1;
                    tracing::debug!(url = %url, name = %record.name, "brand already in catalog");
                } else {
                    if let Some(logo_url) = &brand.logo_url {
                        match assets.fetch_or_reuse(&client, logo_url).await {
                            Ok(asset) => record.logo_asset = asset,
                            Err(e) => {
                                tracing::warn!(url = %logo_url, error = %e, "logo download failed");
                            }
                        }
                    }
                    record.source_url = Some(url.clone());
                    let name = record.name.clone();
                    if store.insert(record) {
                        summary.added += 1;
                        tracing::info!(url = %url, name = %name, "brand added");
                    }
                }
            }
            PageOutcome::NotEntity(reason) => {
                summary.not_brand += 1;
                tracing::debug!(url = %url, reason = %reason, "not a brand page");
            }
            PageOutcome::Failed(e) => {
                summary.failed += 1;
                tracing::warn!(url = %url, error = %e, "page fetch failed");
            }
        }

        checkpointer
            .record_visit(&store)
            .map_err(|e| anyhow::anyhow!("checkpoint failed: {e}"))?;
    }

    let toll = if skip_toll {
        carried_toll
    } else {
        fetch_toll(&client, &config.toll_feed_url).await
    };
    let document = checkpointer
        .finish(&store, toll)
        .map_err(|e| anyhow::anyhow!("cannot save catalog: {e}"))?;

    summary.total = document.items.len();
    summary.saves = checkpointer.saves();
    tracing::info!(
        visited = summary.visited,
        added = summary.added,
        total = summary.total,
        "crawl finished"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;
