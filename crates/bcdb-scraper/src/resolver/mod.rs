//! Seed resolution: turning human-entered brand names into candidate brand
//! page URLs.
//!
//! Strategies run in a fixed order. The sitemap is enumerated once; then each
//! seed is searched (when a token could be captured) and, if the search found
//! nothing, guessed from its name variants and configured aliases.

mod guess;
mod search;
mod sitemap;

use std::collections::HashSet;

use bcdb_core::{AppConfig, ResolverStrategy, SeedsFile};

use crate::client::SourceClient;
use crate::error::ScraperError;
use crate::rate_limit::Politeness;
use crate::urls::{decode_segment, BrandUrls};

pub use guess::guess_urls;
pub use search::{capture_token, search_seed, SearchToken};
pub use sitemap::fetch_sitemap;

/// A candidate brand page and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCandidate {
    /// Seed name, or the decoded segment for sitemap entries.
    pub source_name: String,
    pub url: String,
    pub strategy: ResolverStrategy,
}

/// Site layout and strategy selection for a resolver run.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub urls: BrandUrls,
    pub sitemap_path: String,
    pub search_path: String,
    pub search_query_field: String,
    pub strategies: Vec<ResolverStrategy>,
    pub politeness: Politeness,
}

impl ResolverSettings {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] when the configured base URL is
    /// not an absolute `http`/`https` URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            urls: BrandUrls::new(&config.base_url, &config.brand_path_prefix)?,
            sitemap_path: config.sitemap_path.clone(),
            search_path: config.search_path.clone(),
            search_query_field: config.search_query_field.clone(),
            strategies: config.strategies.clone(),
            politeness: Politeness::new(config.scraper_min_delay_ms, config.scraper_max_delay_ms),
        })
    }

    #[must_use]
    pub fn uses(&self, strategy: ResolverStrategy) -> bool {
        self.strategies.contains(&strategy)
    }
}

/// Runs the configured strategies for every seed.
pub struct SeedResolver<'a> {
    client: &'a SourceClient,
    settings: &'a ResolverSettings,
    seeds: &'a SeedsFile,
}

impl<'a> SeedResolver<'a> {
    #[must_use]
    pub fn new(client: &'a SourceClient, settings: &'a ResolverSettings, seeds: &'a SeedsFile) -> Self {
        Self {
            client,
            settings,
            seeds,
        }
    }

    /// Candidate URLs in discovery order, one per canonical URL.
    ///
    /// Never fails: every strategy degrades to contributing nothing.
    pub async fn resolve(&self) -> Vec<SeedCandidate> {
        let urls = &self.settings.urls;
        let mut collected = Candidates::default();

        if self.settings.uses(ResolverStrategy::Sitemap) {
            let sitemap_url = urls.on_site(&self.settings.sitemap_path);
            for url in fetch_sitemap(self.client, urls, &sitemap_url).await {
                let name = urls.segment_of(&url).unwrap_or_default();
                collected.push(urls, name, url, ResolverStrategy::Sitemap);
            }
        }

        let token = if self.settings.uses(ResolverStrategy::Search) {
            let token = capture_token(self.client, &urls.on_site("/")).await;
            if token.is_none() {
                tracing::warn!("no anti-forgery token on home page, search strategy skipped");
            }
            token
        } else {
            None
        };

        for seed in &self.seeds.seeds {
            let found = match &token {
                Some(token) => {
                    self.settings.politeness.pause().await;
                    search_seed(self.client, self.settings, token, seed).await
                }
                None => Vec::new(),
            };
            tracing::debug!(seed = %seed, found = found.len(), "seed searched");

            if found.is_empty() && self.settings.uses(ResolverStrategy::Guess) {
                for url in guess_urls(urls, seed, self.seeds.aliases_for(seed)) {
                    collected.push(urls, seed.clone(), url, ResolverStrategy::Guess);
                }
            } else {
                for url in found {
                    collected.push(urls, seed.clone(), url, ResolverStrategy::Search);
                }
            }
        }

        let candidates = collected.into_inner();
        tracing::info!(
            seeds = self.seeds.seeds.len(),
            candidates = candidates.len(),
            "seed resolution complete"
        );
        candidates
    }
}

#[derive(Default)]
struct Candidates {
    seen: HashSet<String>,
    items: Vec<SeedCandidate>,
}

impl Candidates {
    fn push(&mut self, urls: &BrandUrls, source_name: String, url: String, strategy: ResolverStrategy) {
        let url = urls.canonical(&url);
        if self.seen.insert(url.clone()) {
            self.items.push(SeedCandidate {
                source_name,
                url,
                strategy,
            });
        }
    }

    fn into_inner(self) -> Vec<SeedCandidate> {
        self.items
    }
}

/// Decoded brand segments following every occurrence of `prefix` in `text`,
/// in order of first appearance.
pub(crate) fn segments_after_prefix(text: &str, prefix: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut segments = Vec::new();
    for (idx, _) in text.match_indices(prefix) {
        let rest = &text[idx + prefix.len()..];
        let end = rest
            .find(|c: char| {
                c.is_whitespace() || matches!(c, '/' | '"' | '\'' | '<' | '>' | '?' | '#' | '\\')
            })
            .unwrap_or(rest.len());
        let segment = decode_segment(&rest[..end]);
        if !segment.trim().is_empty() && seen.insert(segment.clone()) {
            segments.push(segment);
        }
    }
    segments
}
