//! The persisted catalog document and the toll snapshot it carries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::brands::BrandRecord;

/// Label used when the toll feed could not be reached.
pub const OFFLINE_LABEL: &str = "Offline";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMeta {
    #[serde(default)]
    pub source: String,
    /// Run date, `YYYY-MM-DD`.
    #[serde(default)]
    pub updated: String,
}

impl CatalogMeta {
    #[must_use]
    pub fn new(source: impl Into<String>, updated: NaiveDate) -> Self {
        Self {
            source: source.into(),
            updated: updated.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Flat metric → count mapping plus the label of the report it came from.
///
/// On load, metrics that are `null` or not integers are dropped instead of
/// failing the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredToll")]
pub struct TollSnapshot {
    #[serde(flatten)]
    pub metrics: BTreeMap<String, i64>,
    #[serde(default)]
    pub last_update: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMetric {
    Count(i64),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
struct StoredToll {
    #[serde(default)]
    last_update: Option<String>,
    #[serde(flatten)]
    metrics: BTreeMap<String, StoredMetric>,
}

impl From<StoredToll> for TollSnapshot {
    fn from(stored: StoredToll) -> Self {
        let metrics = stored
            .metrics
            .into_iter()
            .filter_map(|(metric, value)| match value {
                StoredMetric::Count(count) => Some((metric, count)),
                StoredMetric::Other(_) => None,
            })
            .collect();
        Self {
            metrics,
            last_update: stored.last_update.unwrap_or_default(),
        }
    }
}

impl TollSnapshot {
    #[must_use]
    pub fn new(last_update: impl Into<String>) -> Self {
        Self {
            metrics: BTreeMap::new(),
            last_update: last_update.into(),
        }
    }

    #[must_use]
    pub fn with(mut self, metric: &str, count: i64) -> Self {
        self.metrics.insert(metric.to_string(), count);
        self
    }

    #[must_use]
    pub fn get(&self, metric: &str) -> Option<i64> {
        self.metrics.get(metric).copied()
    }

    /// The hard-coded snapshot used when the history feed is unusable.
    #[must_use]
    pub fn offline_fallback() -> Self {
        Self::new(OFFLINE_LABEL)
            .with("killed", 73_000)
            .with("injured", 171_000)
            .with("children", 21_000)
            .with("women", 13_000)
            .with("starved", 463)
    }
}

/// `{ meta, toll, items }` as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub meta: CatalogMeta,
    #[serde(default)]
    pub toll: TollSnapshot,
    #[serde(default)]
    pub items: Vec<BrandRecord>,
}
