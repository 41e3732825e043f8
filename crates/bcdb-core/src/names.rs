//! Brand name canonicalization.
//!
//! [`normalize`] produces the identity key used for deduplication;
//! [`variants`] produces the URL path segments worth guessing for a seed.

const APOSTROPHES: [char; 4] = ['\'', '\u{2019}', '\u{2018}', '`'];
const MIN_VARIANT_LEN: usize = 2;

/// Lower-cases `name` and drops every character outside `[a-z0-9]`.
///
/// `"Coca-Cola"`, `"Coca Cola"` and `"CocaCola"` all map to `"cocacola"`.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Collapses runs of whitespace into single spaces and trims the ends.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Candidate path segments for a seed name, in the order they should be tried.
///
/// Forms: apostrophe-stripped name, words joined by spaces, words joined with
/// nothing, `&` spelled out as `and`, words joined by hyphens, and the
/// title-cased spaced form. Spaces and hyphens both separate words. Forms
/// shorter than two characters are dropped and duplicates keep their first
/// position.
#[must_use]
pub fn variants(name: &str) -> Vec<String> {
    let cleaned = clean_text(&name.replace(APOSTROPHES, ""));
    let words: Vec<&str> = cleaned
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
        .collect();

    let spaced = words.join(" ");
    let candidates = [
        cleaned.clone(),
        spaced.clone(),
        words.concat(),
        clean_text(&cleaned.replace('&', " and ")),
        words.join("-"),
        title_case(&spaced),
    ];

    let mut out: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.chars().count() >= MIN_VARIANT_LEN && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Upper-cases the first letter of every space-separated word and lower-cases
/// the rest.
fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "names_test.rs"]
mod tests;
