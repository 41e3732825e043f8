use bcdb_core::variants;

use crate::urls::BrandUrls;

/// Direct page URLs to try for `seed`: one per name variant, then one per
/// alias segment, duplicates removed.
#[must_use]
pub fn guess_urls(urls: &BrandUrls, seed: &str, aliases: &[String]) -> Vec<String> {
    let mut guessed: Vec<String> = Vec::new();
    let segments = variants(seed)
        .into_iter()
        .chain(aliases.iter().map(|a| a.trim().to_owned()));
    for segment in segments.filter(|s| !s.is_empty()) {
        let url = urls.for_segment(&segment);
        if !guessed.contains(&url) {
            guessed.push(url);
        }
    }
    guessed
}
