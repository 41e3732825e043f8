use serde::{Deserialize, Deserializer, Serialize};

use crate::names::normalize;

/// Verdict a source assigns to a brand.
///
/// Deserialization goes through [`BrandStatus::from_label`], so catalogs that
/// stored the raw source label ("Boycott", "Warning") still load. Unknown or
/// missing labels become the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BrandStatus {
    #[default]
    Avoid,
    Caution,
    Safe,
}

impl BrandStatus {
    /// Parses a free-form status label ("AVOID", "caution", " Safe ").
    ///
    /// Returns `None` for labels that are not one of the three verdicts.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "avoid" | "boycott" => Some(Self::Avoid),
            "caution" | "warning" => Some(Self::Caution),
            "safe" | "ok" => Some(Self::Safe),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for BrandStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .and_then(Self::from_label)
            .unwrap_or_default())
    }
}

impl std::fmt::Display for BrandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrandStatus::Avoid => write!(f, "Avoid"),
            BrandStatus::Caution => write!(f, "Caution"),
            BrandStatus::Safe => write!(f, "Safe"),
        }
    }
}

/// One catalog entry.
///
/// Identity is [`BrandRecord::key`], never the display name itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRecord {
    pub name: String,
    #[serde(default)]
    pub status: BrandStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub subbrands: Vec<String>,
    #[serde(default)]
    pub logo_asset: Option<String>,
    /// Canonical page URL the record was extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

fn default_category() -> String {
    "General".to_string()
}

fn default_country() -> String {
    "Global".to_string()
}

impl BrandRecord {
    /// Creates a record with the given name and every other field defaulted.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: BrandStatus::default(),
            description: String::new(),
            category: default_category(),
            country: default_country(),
            alternatives: Vec::new(),
            subbrands: Vec::new(),
            logo_asset: None,
            source_url: None,
        }
    }

    /// The deduplication key for this record.
    #[must_use]
    pub fn key(&self) -> String {
        normalize(&self.name)
    }

    /// Adds an alternative unless an equal one is already listed.
    pub fn push_alternative(&mut self, alternative: impl Into<String>) {
        let alternative = alternative.into();
        if !self.alternatives.contains(&alternative) {
            self.alternatives.push(alternative);
        }
    }
}
