//! Category listing page (one page, every brand grouped by category).

use bcdb_core::{clean_text, BrandRecord, BrandStatus};

use super::html::{elements_with_class, Element};

const DEFAULT_CATEGORY: &str = "General";
const DEFAULT_DESCRIPTION: &str = "No description.";
const DEFAULT_COUNTRY: &str = "Global";

/// A brand block from the listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedBrand {
    pub record: BrandRecord,
    /// Absolute logo URL, resolved against the listing page URL.
    pub logo_url: Option<String>,
}

/// Extracts every brand from a listing page.
///
/// Brands sit in `<li>` blocks inside `div.boycott-category` sections whose
/// `h3` names the category. Blocks without an `h4` are skipped.
#[must_use]
pub fn parse_listing(page_url: &str, html: &str) -> Vec<ListedBrand> {
    let base = reqwest::Url::parse(page_url).ok();
    let mut brands = Vec::new();

    for section in elements_with_class(html, "div", "boycott-category") {
        let category = section
            .first("h3")
            .map(|h3| h3.text())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());

        brands.extend(
            section
                .children("li")
                .iter()
                .filter_map(|item| parse_item(item, &category, base.as_ref())),
        );
    }

    brands
}

fn parse_item(item: &Element<'_>, category: &str, base: Option<&reqwest::Url>) -> Option<ListedBrand> {
    let heading = item.first("h4")?;
    let label = heading.first_with_class("span", "label");

    let status = label
        .as_ref()
        .and_then(|span| BrandStatus::from_label(&span.text()))
        .unwrap_or_default();
    let name = match label {
        Some(span) => {
            let without_label = format!(
                "{}{}",
                &heading.inner[..span.start],
                &heading.inner[span.end..]
            );
            super::html::text_of(&without_label)
        }
        None => heading.text(),
    };
    if name.is_empty() {
        return None;
    }

    let mut record = BrandRecord::named(name);
    record.status = status;
    record.category = category.to_owned();

    record.description = item
        .first_with_class("div", "company-content")
        .and_then(|content| {
            content
                .children("p")
                .into_iter()
                .find(|p| !p.has_class("country") && !p.has_class("alternative"))
                .map(|p| p.text())
        })
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned());

    record.country = item
        .first_with_class("p", "country")
        .map(|p| p.text())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_owned());

    if let Some(alternative) = item
        .first_with_class("p", "alternative")
        .map(|p| {
            let text = p.text().replace("Alternative", "");
            clean_text(text.trim_start_matches([':', ' ']))
        })
        .filter(|t| !t.is_empty())
    {
        record.push_alternative(alternative);
    }

    if let Some(subbrands) = item.first_with_class("div", "subbrands") {
        record.subbrands = subbrands
            .children("div")
            .iter()
            .map(Element::text)
            .filter(|t| !t.is_empty())
            .collect();
    }

    let logo_url = item
        .first_with_class("div", "company-logo")
        .and_then(|logo| logo.first("img"))
        .and_then(|img| img.attr("src"))
        .and_then(|src| match base {
            Some(base) => base.join(&src).ok().map(|u| u.to_string()),
            None => Some(src),
        });

    Some(ListedBrand { record, logo_url })
}
