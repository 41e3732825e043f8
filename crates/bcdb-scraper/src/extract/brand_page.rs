use bcdb_core::{clean_text, BrandRecord, BrandStatus};

use super::html::{elements, elements_with_class, Element};
use super::{ExtractedBrand, Extractor, ShapeMismatch};
use crate::urls::BrandUrls;

const NAME_LABEL: &str = "BRAND NAME :";
const DEFAULT_DESCRIPTION: &str = "Listed on Disoccupied.";
const DEFAULT_CATEGORY: &str = "General";

/// Extractor for brand detail pages on the crawled site.
///
/// Required: an `h4.brand` heading. Status comes from the result banner
/// (`h1.result-failure` / `result-warning` / `result-success`), the
/// description from the paragraph following the "REASON" heading, and
/// related brands from the `swiper-slide` carousel.
#[derive(Debug, Clone)]
pub struct BrandPageExtractor {
    urls: BrandUrls,
}

impl BrandPageExtractor {
    #[must_use]
    pub fn new(urls: BrandUrls) -> Self {
        Self { urls }
    }
}

impl Extractor for BrandPageExtractor {
    fn extract(&self, _page_url: &str, html: &str) -> Result<ExtractedBrand, ShapeMismatch> {
        if html.trim().is_empty() {
            return Err(ShapeMismatch::EmptyBody);
        }

        let name = elements_with_class(html, "h4", "brand")
            .first()
            .map(|h4| clean_text(&h4.text().replace(NAME_LABEL, "")))
            .filter(|name| !name.is_empty())
            .ok_or(ShapeMismatch::MissingName)?;

        let mut record = BrandRecord::named(name);
        record.status = banner_status(html);
        record.description = reason(html).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned());
        record.category = DEFAULT_CATEGORY.to_owned();

        let mut links = Vec::new();
        for slide in elements_with_class(html, "div", "swiper-slide") {
            let Some(href) = slide.first("a").and_then(|a| a.attr("href")) else {
                continue;
            };
            let Some(segment) = self.urls.segment_of(&href) else {
                continue;
            };
            let link = self.urls.for_segment(&segment);
            if !links.contains(&link) {
                links.push(link);
            }
            if segment.chars().count() > 1 && segment != record.name {
                record.push_alternative(segment);
            }
        }

        let logo_url = elements_with_class(html, "img", "brand_image")
            .first()
            .and_then(|img| img.attr("src"))
            .and_then(|src| self.urls.resolve_href(&src));

        Ok(ExtractedBrand {
            record,
            logo_url,
            links,
        })
    }
}

fn banner_status(html: &str) -> BrandStatus {
    let banners = elements(html, "h1");
    let has = |class: &str| banners.iter().any(|h1| h1.has_class(class));
    if has("result-failure") {
        BrandStatus::Avoid
    } else if has("result-warning") {
        BrandStatus::Caution
    } else if has("result-success") {
        BrandStatus::Safe
    } else {
        BrandStatus::default()
    }
}

/// Text of the first paragraph after the `h5` whose text mentions "REASON".
fn reason(html: &str) -> Option<String> {
    let heading: Element<'_> = elements(html, "h5")
        .into_iter()
        .find(|h5| h5.text().to_uppercase().contains("REASON"))?;
    elements(&html[heading.end..], "p")
        .first()
        .map(Element::text)
        .filter(|text| !text.is_empty())
}
