//! Fetch-and-extract for a single frontier URL.

use crate::client::SourceClient;
use crate::error::ScraperError;
use crate::extract::{ExtractedBrand, Extractor, ShapeMismatch};

/// Result of visiting one URL.
#[derive(Debug)]
pub enum PageOutcome {
    /// The page is a brand page.
    Entity(ExtractedBrand),
    /// The page was reached (or is known not to exist) but is not a brand page.
    NotEntity(ShapeMismatch),
    /// The page could not be fetched.
    Failed(ScraperError),
}

/// Fetches `url` and hands the body to `extractor`.
///
/// A 404 is reported as [`PageOutcome::NotEntity`] with
/// [`ShapeMismatch::NotFound`]; every other transport error becomes
/// [`PageOutcome::Failed`].
pub async fn visit_page(
    client: &SourceClient,
    extractor: &dyn Extractor,
    url: &str,
) -> PageOutcome {
    let body = match client.get_text(url).await {
        Ok(body) => body,
        Err(ScraperError::NotFound { .. }) => return PageOutcome::NotEntity(ShapeMismatch::NotFound),
        Err(e) => return PageOutcome::Failed(e),
    };

    match extractor.extract(url, &body) {
        Ok(brand) => PageOutcome::Entity(brand),
        Err(mismatch) => PageOutcome::NotEntity(mismatch),
    }
}
