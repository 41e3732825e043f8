use std::path::PathBuf;

/// One way of turning seed names into candidate brand URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverStrategy {
    Sitemap,
    Search,
    Guess,
}

impl ResolverStrategy {
    pub const ALL: [ResolverStrategy; 3] = [
        ResolverStrategy::Sitemap,
        ResolverStrategy::Search,
        ResolverStrategy::Guess,
    ];
}

impl std::str::FromStr for ResolverStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sitemap" => Ok(Self::Sitemap),
            "search" => Ok(Self::Search),
            "guess" => Ok(Self::Guess),
            other => Err(format!(
                "unknown strategy '{other}'; expected sitemap, search, or guess"
            )),
        }
    }
}

impl std::fmt::Display for ResolverStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverStrategy::Sitemap => write!(f, "sitemap"),
            ResolverStrategy::Search => write!(f, "search"),
            ResolverStrategy::Guess => write!(f, "guess"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub base_url: String,
    pub brand_path_prefix: String,
    pub sitemap_path: String,
    pub search_path: String,
    pub search_query_field: String,
    pub strategies: Vec<ResolverStrategy>,
    pub listing_url: String,
    pub toll_feed_url: String,
    pub catalog_path: PathBuf,
    pub assets_dir: PathBuf,
    pub asset_public_prefix: String,
    pub seeds_path: PathBuf,
    pub source_label: String,
    pub checkpoint_every: usize,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_min_delay_ms: u64,
    pub scraper_max_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
}
