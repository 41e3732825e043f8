//! Authenticated site search.
//!
//! The search endpoint only accepts form posts carrying the anti-forgery
//! token handed out with the home page, so the token is captured once per run
//! and replayed with every seed.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER};

use crate::client::SourceClient;
use crate::extract::html::elements;
use crate::urls::{decode_segment, BrandUrls};

use super::{segments_after_prefix, ResolverSettings};

/// Hidden form inputs known to carry an anti-forgery token.
const TOKEN_INPUTS: [&str; 5] = [
    "_token",
    "csrf_token",
    "csrfmiddlewaretoken",
    "__RequestVerificationToken",
    "authenticity_token",
];

/// Cookies known to carry an anti-forgery token.
const TOKEN_COOKIES: [&str; 4] = ["XSRF-TOKEN", "csrftoken", "csrf_token", "_token"];

/// Form field used when the token did not come from a named input.
const DEFAULT_TOKEN_FIELD: &str = "_token";

/// Anti-forgery token captured from the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchToken {
    /// Form field the token is posted under.
    pub field: String,
    pub value: String,
    /// Name of the cookie it was read from, if it came from a cookie.
    pub cookie: Option<String>,
}

/// Looks for a token in the home page markup, then in the session cookies
/// it set.
pub async fn capture_token(client: &SourceClient, home_url: &str) -> Option<SearchToken> {
    let body = match client.get_text(home_url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(url = home_url, error = %e, "home page unavailable for token capture");
            return None;
        }
    };

    if let Some(token) = token_from_markup(&body) {
        tracing::debug!(field = %token.field, "anti-forgery token found in markup");
        return Some(token);
    }

    let token = TOKEN_COOKIES.iter().find_map(|name| {
        let raw = client.cookie(home_url, name)?;
        let value = decode_segment(&raw);
        (!value.is_empty()).then(|| SearchToken {
            field: DEFAULT_TOKEN_FIELD.to_owned(),
            value,
            cookie: Some((*name).to_owned()),
        })
    });
    if let Some(token) = &token {
        tracing::debug!(cookie = ?token.cookie, "anti-forgery token found in cookies");
    }
    token
}

/// Token from a hidden input or a `csrf-token` meta tag.
pub(crate) fn token_from_markup(html: &str) -> Option<SearchToken> {
    let from_input = elements(html, "input").into_iter().find_map(|input| {
        let name = input.attr("name")?;
        if !TOKEN_INPUTS.contains(&name.as_str()) {
            return None;
        }
        let value = input.attr("value").filter(|v| !v.is_empty())?;
        Some(SearchToken {
            field: name,
            value,
            cookie: None,
        })
    });
    if from_input.is_some() {
        return from_input;
    }

    elements(html, "meta").into_iter().find_map(|meta| {
        let name = meta.attr("name")?;
        if !name.eq_ignore_ascii_case("csrf-token") {
            return None;
        }
        let value = meta.attr("content").filter(|v| !v.is_empty())?;
        Some(SearchToken {
            field: DEFAULT_TOKEN_FIELD.to_owned(),
            value,
            cookie: None,
        })
    })
}

/// Posts `seed` to the search endpoint and returns the brand page URLs in
/// the response. Transport failures are logged and yield no URLs.
pub async fn search_seed(
    client: &SourceClient,
    settings: &ResolverSettings,
    token: &SearchToken,
    seed: &str,
) -> Vec<String> {
    let urls = &settings.urls;
    let search_url = urls.on_site(&settings.search_path);
    let form = [
        (token.field.as_str(), token.value.as_str()),
        (settings.search_query_field.as_str(), seed),
    ];

    let body = match client
        .post_form(&search_url, &form, search_headers(token, urls))
        .await
    {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(seed, error = %e, "search request failed");
            return Vec::new();
        }
    };

    // JSON responses escape slashes.
    let body = body.replace("\\/", "/");
    segments_after_prefix(&body, urls.prefix())
        .iter()
        .map(|segment| urls.for_segment(segment))
        .collect()
}

fn search_headers(token: &SearchToken, urls: &BrandUrls) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    if let Ok(value) = HeaderValue::from_str(&token.value) {
        headers.insert(HeaderName::from_static("x-csrf-token"), value.clone());
        if token.cookie.as_deref() == Some("XSRF-TOKEN") {
            headers.insert(HeaderName::from_static("x-xsrf-token"), value);
        }
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{}/", urls.base())) {
        headers.insert(REFERER, value);
    }
    if let Ok(value) = HeaderValue::from_str(urls.origin()) {
        headers.insert(ORIGIN, value);
    }
    headers
}
