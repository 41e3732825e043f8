use crate::client::SourceClient;
use crate::urls::BrandUrls;

use super::segments_after_prefix;

/// Every brand page listed in the sitemap at `sitemap_url`.
///
/// Any failure yields an empty list.
pub async fn fetch_sitemap(client: &SourceClient, urls: &BrandUrls, sitemap_url: &str) -> Vec<String> {
    let body = match client.get_text(sitemap_url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(url = sitemap_url, error = %e, "sitemap unavailable");
            return Vec::new();
        }
    };

    let found: Vec<String> = segments_after_prefix(&body, urls.prefix())
        .iter()
        .map(|segment| urls.for_segment(segment))
        .collect();
    tracing::info!(url = sitemap_url, brands = found.len(), "sitemap enumerated");
    found
}
