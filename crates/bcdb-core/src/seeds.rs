use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::names::normalize;
use crate::ConfigError;

/// Seed names used to bootstrap discovery, plus extra path segments to try
/// for seeds whose page lives under a different slug.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedsFile {
    pub seeds: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl SeedsFile {
    /// Alias segments configured for `seed`, matched by normalized name.
    #[must_use]
    pub fn aliases_for(&self, seed: &str) -> &[String] {
        let key = normalize(seed);
        self.aliases
            .iter()
            .find(|(name, _)| normalize(name) == key)
            .map(|(_, segments)| segments.as_slice())
            .unwrap_or(&[])
    }
}

/// Load and validate the seed list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seeds(path: &Path) -> Result<SeedsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let seeds_file: SeedsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::SeedsFileParse)?;

    validate_seeds(&seeds_file)?;

    Ok(seeds_file)
}

fn validate_seeds(seeds_file: &SeedsFile) -> Result<(), ConfigError> {
    let mut seen_keys = HashSet::new();

    for seed in &seeds_file.seeds {
        let key = normalize(seed);
        if key.is_empty() {
            return Err(ConfigError::Validation(format!(
                "seed '{seed}' has no letters or digits"
            )));
        }
        if !seen_keys.insert(key) {
            return Err(ConfigError::Validation(format!("duplicate seed: '{seed}'")));
        }
    }

    for (name, segments) in &seeds_file.aliases {
        if !seen_keys.contains(&normalize(name)) {
            return Err(ConfigError::Validation(format!(
                "alias entry '{name}' does not match any seed"
            )));
        }
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "alias entry '{name}' contains an empty segment"
            )));
        }
    }

    Ok(())
}
