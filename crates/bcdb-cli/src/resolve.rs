//! The `resolve` command: preview seed resolution without crawling.

use bcdb_core::{AppConfig, SeedsFile};
use bcdb_scraper::{ResolverSettings, SeedCandidate, SeedResolver};

use crate::catalog::build_client;

/// # Errors
///
/// Returns an error if the base URL is invalid or the HTTP client cannot be
/// built.
pub(crate) async fn run_resolve(
    config: &AppConfig,
    seeds: &SeedsFile,
) -> anyhow::Result<Vec<SeedCandidate>> {
    let client = build_client(config)?;
    let settings = ResolverSettings::from_config(config)?;
    Ok(SeedResolver::new(&client, &settings, seeds).resolve().await)
}

pub(crate) fn print_candidates(candidates: &[SeedCandidate]) {
    for candidate in candidates {
        println!(
            "{:<8} {:<24} {}",
            candidate.strategy.to_string(),
            candidate.source_name,
            candidate.url
        );
    }
    println!("{} candidate URLs", candidates.len());
}
