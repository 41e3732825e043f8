use crate::app_config::{AppConfig, ResolverStrategy};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; the lookup only ever overrides.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("BCDB_LOG_LEVEL", "info");

    let base_url = or_default("BCDB_BASE_URL", "https://disoccupied.com")
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "BCDB_BASE_URL",
            format!("'{base_url}' must start with http:// or https://"),
        ));
    }

    let brand_path_prefix = ensure_slashes(&or_default("BCDB_BRAND_PATH_PREFIX", "/brand/"));
    let sitemap_path = or_default("BCDB_SITEMAP_PATH", "/sitemap.xml");
    let search_path = or_default("BCDB_SEARCH_PATH", "/search");
    let search_query_field = or_default("BCDB_SEARCH_QUERY_FIELD", "search");
    let strategies = parse_strategies(&or_default("BCDB_STRATEGIES", "sitemap,search,guess"))
        .map_err(|reason| invalid("BCDB_STRATEGIES", reason))?;

    let listing_url = or_default("BCDB_LISTING_URL", "https://boycott-israel.org/boycott.html");
    let toll_feed_url = or_default(
        "BCDB_TOLL_FEED_URL",
        "https://data.techforpalestine.org/api/v2/casualties_daily.json",
    );

    let catalog_path = PathBuf::from(or_default(
        "BCDB_CATALOG_PATH",
        "./app/assets/boycott_data.json",
    ));
    let assets_dir = PathBuf::from(or_default("BCDB_ASSETS_DIR", "./app/assets/images"));
    let asset_public_prefix = or_default("BCDB_ASSET_PUBLIC_PREFIX", "assets/images")
        .trim_end_matches('/')
        .to_string();
    let seeds_path = PathBuf::from(or_default("BCDB_SEEDS_PATH", "./config/seeds.yaml"));
    let source_label = or_default("BCDB_SOURCE_LABEL", "Merged Database");

    let checkpoint_every = parse_usize("BCDB_CHECKPOINT_EVERY", "20")?;
    if checkpoint_every == 0 {
        return Err(invalid(
            "BCDB_CHECKPOINT_EVERY",
            "must be at least 1".to_string(),
        ));
    }

    let scraper_request_timeout_secs = parse_u64("BCDB_SCRAPER_REQUEST_TIMEOUT_SECS", "15")?;
    let scraper_user_agent = or_default("BCDB_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_min_delay_ms = parse_u64("BCDB_SCRAPER_MIN_DELAY_MS", "500")?;
    let scraper_max_delay_ms = parse_u64("BCDB_SCRAPER_MAX_DELAY_MS", "1000")?;
    if scraper_max_delay_ms < scraper_min_delay_ms {
        return Err(invalid(
            "BCDB_SCRAPER_MAX_DELAY_MS",
            format!("{scraper_max_delay_ms} is below BCDB_SCRAPER_MIN_DELAY_MS ({scraper_min_delay_ms})"),
        ));
    }
    let scraper_max_retries = parse_u32("BCDB_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_secs = parse_u64("BCDB_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        log_level,
        base_url,
        brand_path_prefix,
        sitemap_path,
        search_path,
        search_query_field,
        strategies,
        listing_url,
        toll_feed_url,
        catalog_path,
        assets_dir,
        asset_public_prefix,
        seeds_path,
        source_label,
        checkpoint_every,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_min_delay_ms,
        scraper_max_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
    })
}

/// Parse a comma-separated strategy list, keeping first-seen order.
fn parse_strategies(raw: &str) -> Result<Vec<ResolverStrategy>, String> {
    let mut out = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let strategy = part.parse::<ResolverStrategy>()?;
        if !out.contains(&strategy) {
            out.push(strategy);
        }
    }
    if out.is_empty() {
        return Err("at least one strategy is required".to_string());
    }
    Ok(out)
}

fn ensure_slashes(prefix: &str) -> String {
    format!("/{}/", prefix.trim_matches('/'))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
