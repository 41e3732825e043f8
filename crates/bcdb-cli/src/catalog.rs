//! Helpers shared by every command: client construction, seed loading, and
//! reading the catalog into a merge store.

use std::path::Path;

use bcdb_core::{AppConfig, SeedsFile, TollSnapshot};
use bcdb_scraper::SourceClient;
use bcdb_store::MergeStore;

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<SourceClient> {
    SourceClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))
}

/// Loads the seed list from `override_path`, or from the configured path.
pub(crate) fn load_seed_list(
    config: &AppConfig,
    override_path: Option<&Path>,
) -> anyhow::Result<SeedsFile> {
    let path = override_path.unwrap_or(&config.seeds_path);
    let seeds = bcdb_core::load_seeds(path)
        .map_err(|e| anyhow::anyhow!("failed to load seeds from {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), seeds = seeds.seeds.len(), "seed list loaded");
    Ok(seeds)
}

/// The persisted catalog as a merge store, plus the toll snapshot it carried.
///
/// A missing file is an empty catalog with no snapshot. An unreadable or
/// malformed file is an error.
pub(crate) fn load_catalog(path: &Path) -> anyhow::Result<(MergeStore, Option<TollSnapshot>)> {
    let document = bcdb_store::load_document(path)
        .map_err(|e| anyhow::anyhow!("cannot load catalog: {e}"))?;
    match document {
        Some(document) => {
            let store = MergeStore::from_items(document.items);
            tracing::info!(path = %path.display(), brands = store.len(), "catalog loaded");
            Ok((store, Some(document.toll)))
        }
        None => {
            tracing::info!(path = %path.display(), "no catalog yet, starting empty");
            Ok((MergeStore::new(), None))
        }
    }
}
