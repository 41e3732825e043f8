pub mod app_config;
pub mod brands;
pub mod catalog;
pub mod config;
pub mod names;
pub mod seeds;

use thiserror::Error;

pub use app_config::{AppConfig, ResolverStrategy};
pub use brands::{BrandRecord, BrandStatus};
pub use catalog::{CatalogDocument, CatalogMeta, TollSnapshot};
pub use config::{load_app_config, load_app_config_from_env};
pub use names::{clean_text, normalize, variants};
pub use seeds::{load_seeds, SeedsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seeds file {path}: {source}")]
    SeedsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seeds file: {0}")]
    SeedsFileParse(#[source] serde_yaml::Error),

    #[error("seeds validation failed: {0}")]
    Validation(String),
}
