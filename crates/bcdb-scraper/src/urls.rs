//! Brand page URL construction and canonicalization.
//!
//! Every URL that enters the frontier goes through [`BrandUrls::canonical`]
//! so that `/brand/Coca Cola`, `/brand/Coca%20Cola/` and
//! `https://host/brand/Coca%20Cola/#top` are one and the same entry.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ScraperError;

/// Characters left unescaped in a path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds and recognises brand detail page URLs for one source site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandUrls {
    base: String,
    prefix: String,
    origin: String,
    host: String,
}

impl BrandUrls {
    /// `base_url` loses any trailing `/`; `prefix` is forced to start and
    /// end with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] unless `base_url` is an absolute
    /// `http`/`https` URL with a host.
    pub fn new(base_url: &str, prefix: &str) -> Result<Self, ScraperError> {
        let invalid = |reason: &str| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: reason.to_owned(),
        };
        let parsed = reqwest::Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        let host = parsed
            .host_str()
            .map(site_host)
            .ok_or_else(|| invalid("missing host"))?;

        let trimmed = prefix.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            "/".to_owned()
        } else {
            format!("/{trimmed}/")
        };
        Ok(Self {
            base: base_url.trim_end_matches('/').to_owned(),
            prefix,
            origin: parsed.origin().ascii_serialization(),
            host,
        })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `scheme://host[:port]` of the source site.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute URL of `path` (which should start with `/`) on the source site.
    #[must_use]
    pub fn on_site(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Canonical page URL for a decoded path segment.
    ///
    /// `"Coca Cola"` becomes `https://host/brand/Coca%20Cola/`.
    #[must_use]
    pub fn for_segment(&self, segment: &str) -> String {
        let segment = segment.trim_matches('/');
        format!(
            "{}{}{}/",
            self.base,
            self.prefix,
            utf8_percent_encode(segment, SEGMENT)
        )
    }

    /// The decoded brand segment of `url`, if it is a brand page URL.
    ///
    /// Accepts site-relative paths and absolute URLs on the source host
    /// (scheme and a leading `www.` are ignored). Brand-shaped paths on other
    /// hosts are not brand pages.
    #[must_use]
    pub fn segment_of(&self, url: &str) -> Option<String> {
        let path = match reqwest::Url::parse(url) {
            Ok(parsed) => {
                if parsed.host_str().map(site_host).as_deref() != Some(self.host.as_str()) {
                    return None;
                }
                parsed.path().to_owned()
            }
            Err(_) if url.starts_with('/') => {
                url.split(['?', '#']).next().unwrap_or_default().to_owned()
            }
            Err(_) => return None,
        };
        let rest = path.strip_prefix(&self.prefix)?.trim_end_matches('/');
        if rest.is_empty() || rest.contains('/') {
            return None;
        }
        let decoded = decode_segment(rest);
        (!decoded.trim().is_empty()).then_some(decoded)
    }

    /// Resolves an `href` found on a source page to an absolute URL.
    #[must_use]
    pub fn resolve_href(&self, href: &str) -> Option<String> {
        let href = href.trim().replace("&amp;", "&");
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }
        let base = reqwest::Url::parse(&format!("{}/", self.base)).ok()?;
        base.join(&href).ok().map(|u| u.to_string())
    }

    /// Canonical form of `url`: brand pages are rebuilt from their decoded
    /// segment on this site, anything else only loses its fragment and gains
    /// a trailing slash.
    #[must_use]
    pub fn canonical(&self, url: &str) -> String {
        if let Some(segment) = self.segment_of(url) {
            return self.for_segment(&segment);
        }
        canonicalize_url(url)
    }
}

fn site_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    host.strip_prefix("www.").map_or_else(|| host.clone(), str::to_owned)
}

/// Strips the fragment and makes sure the path ends with `/`.
#[must_use]
pub fn canonicalize_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            if !parsed.path().ends_with('/') {
                let path = format!("{}/", parsed.path());
                parsed.set_path(&path);
            }
            parsed.to_string()
        }
        Err(_) if url.ends_with('/') => url.to_owned(),
        Err(_) => format!("{url}/"),
    }
}

/// Percent-decodes a path segment, replacing invalid UTF-8 lossily.
#[must_use]
pub fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
