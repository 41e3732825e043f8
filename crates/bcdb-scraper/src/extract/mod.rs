//! Turning fetched page bodies into brand records.

mod brand_page;
pub(crate) mod html;
mod listing;

use bcdb_core::BrandRecord;
use thiserror::Error;

pub use brand_page::BrandPageExtractor;
pub use listing::{parse_listing, ListedBrand};

/// A brand page successfully parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBrand {
    /// The record, without `logo_asset` or `source_url` filled in.
    pub record: BrandRecord,
    /// Absolute URL of the brand logo, when the page shows one.
    pub logo_url: Option<String>,
    /// Absolute URLs of related brand pages found on this page.
    pub links: Vec<String>,
}

/// Why a fetched page is not treated as a brand page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeMismatch {
    #[error("page does not exist")]
    NotFound,

    #[error("page body is empty")]
    EmptyBody,

    #[error("page has no brand name heading")]
    MissingName,
}

/// Parses one fetched page into a brand.
///
/// Implementations are pure: no I/O, no logging.
pub trait Extractor: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ShapeMismatch`] when `html` is not a brand page.
    fn extract(&self, page_url: &str, html: &str) -> Result<ExtractedBrand, ShapeMismatch>;
}
