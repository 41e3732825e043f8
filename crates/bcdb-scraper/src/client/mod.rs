//! HTTP session used for every request against the source site, the listing
//! page, the toll feed, and logo hosts.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Cookie-keeping HTTP client with typed status errors and retry.
///
/// One instance is shared for a whole run so the session cookies set by the
/// home page are sent with later search submissions.
///
/// Transient errors (429, network failures, 5xx) are retried with
/// exponential backoff up to `max_retries` additional attempts.
pub struct SourceClient {
    client: Client,
    jar: Arc<Jar>,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl SourceClient {
    /// Creates a `SourceClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_provider(Arc::clone(&jar))
            .build()?;
        Ok(Self {
            client,
            jar,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries exhausted.
    pub async fn get_text(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let request = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, ACCEPT_HTML)
                .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9");
            let response = send_checked(request, url).await?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Fetches `url` and returns the raw body bytes.
    ///
    /// # Errors
    ///
    /// Same as [`SourceClient::get_text`].
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = send_checked(self.client.get(url), url).await?;
            Ok(response.bytes().await?.to_vec())
        })
        .await
    }

    /// Fetches `url` and decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`SourceClient::get_text`], plus [`ScraperError::Deserialize`]
    /// when the body is not valid JSON for `T` (not retried).
    pub async fn get_json<T>(&self, url: &str) -> Result<T, ScraperError>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let request = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json");
            let response = send_checked(request, url).await?;
            Ok(response.text().await?)
        })
        .await?;
        serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
            context: url.to_owned(),
            source,
        })
    }

    /// Submits `form` as `application/x-www-form-urlencoded` with extra
    /// `headers` and returns the response body.
    ///
    /// # Errors
    ///
    /// Same as [`SourceClient::get_text`].
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: HeaderMap,
    ) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let request = self.client.post(url).headers(headers.clone()).form(form);
            async move {
                let response = send_checked(request, url).await?;
                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Value of the cookie `name` currently held for `url`, if any.
    #[must_use]
    pub fn cookie(&self, url: &str, name: &str) -> Option<String> {
        let parsed = reqwest::Url::parse(url).ok()?;
        let header = self.jar.cookies(&parsed)?;
        let header = header.to_str().ok()?;
        header.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_owned())
        })
    }
}

/// Sends `request` and maps non-success statuses to typed errors.
async fn send_checked(request: RequestBuilder, url: &str) -> Result<Response, ScraperError> {
    let response = request.send().await?;
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ScraperError::RateLimited {
            domain: response.url().host_str().unwrap_or(url).to_owned(),
            retry_after_secs,
        });
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ScraperError::NotFound {
            url: url.to_owned(),
        });
    }

    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
