//! HTTP client for the upstream product service.
//!
//! Wraps `reqwest` with the storefront's fetch discipline: a per-request
//! timeout, a fixed-delay retry that fires only on timeouts, cooperative
//! cancellation checked around every await point, and the HTTP-500 recovery
//! guard for the known lighting-category/non-lighting-brand inconsistency.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::error::UpstreamError;
use crate::normalize::normalize_page;
use crate::retry::retry_on_timeout;
use crate::types::{FetchParams, PageResult, WirePage};

/// Decides whether an upstream HTTP 500 is the known recoverable
/// inconsistency: a lighting category requested under a non-lighting brand
/// context. Everything else keeps failing loudly.
#[derive(Debug, Clone, Default)]
pub struct MismatchGuard {
    lighting_categories: HashSet<String>,
    non_lighting_brands: HashSet<String>,
}

impl MismatchGuard {
    /// Both sets must be lowercased by the caller; the taxonomy exposes them
    /// that way.
    #[must_use]
    pub fn new(lighting_categories: HashSet<String>, non_lighting_brands: HashSet<String>) -> Self {
        MismatchGuard {
            lighting_categories,
            non_lighting_brands,
        }
    }

    fn recoverable(&self, brand: &str, category: Option<&str>) -> bool {
        category.is_some_and(|c| self.lighting_categories.contains(&c.to_lowercase()))
            && self.non_lighting_brands.contains(&brand.to_lowercase())
    }
}

/// Client for `GET /products/{brand}`.
///
/// Use [`UpstreamClient::new`] in production; point `base_url` at a wiremock
/// server in tests.
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
    timeout_max_retries: u32,
    timeout_retry_delay: Duration,
    guard: MismatchGuard,
}

impl UpstreamClient {
    /// Creates a client with the configured timeout, user agent, and retry
    /// policy. `timeout_max_retries` counts additional attempts after the
    /// first timed-out request.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Network`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`UpstreamError::InvalidBaseUrl`] if
    /// `base_url` cannot serve as a URL base.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        timeout_max_retries: u32,
        timeout_retry_delay_ms: u64,
        guard: MismatchGuard,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(UpstreamError::Network)?;

        // Normalise: exactly one trailing slash so joined paths extend the
        // base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| UpstreamError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot serve as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url,
            timeout_max_retries,
            timeout_retry_delay: Duration::from_millis(timeout_retry_delay_ms),
            guard,
        })
    }

    /// Fetches one upstream page.
    ///
    /// Timeouts are retried per the configured policy; a cancelled token
    /// settles as [`UpstreamError::Cancelled`] without retrying. An HTTP 500
    /// matching the mismatch guard is absorbed into an empty page.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Timeout`] — all attempts timed out.
    /// - [`UpstreamError::Status`] — non-2xx response (minus the guard case).
    /// - [`UpstreamError::Cancelled`] — the token fired.
    /// - [`UpstreamError::Network`] — connection or TLS failure.
    /// - [`UpstreamError::Deserialize`] — body is not the expected JSON.
    pub async fn fetch_page(
        &self,
        brand: &str,
        page: u32,
        limit: u32,
        params: &FetchParams,
        cancel: &CancellationToken,
    ) -> Result<PageResult, UpstreamError> {
        let url = self.page_url(brand, page, limit, params)?;

        let result = retry_on_timeout(
            self.timeout_max_retries,
            self.timeout_retry_delay,
            cancel,
            || {
                let url = url.clone();
                async move { self.request_page(&url, cancel).await }
            },
        )
        .await;

        match result {
            Err(UpstreamError::Status { status: 500, url })
                if self.guard.recoverable(brand, params.name.as_deref()) =>
            {
                tracing::warn!(
                    brand,
                    category = ?params.name,
                    url = %url,
                    "HTTP 500 for lighting category under non-lighting brand — treating as empty result"
                );
                Ok(PageResult::empty())
            }
            other => other,
        }
    }

    /// Sends one GET, racing the cancellation token against every await.
    async fn request_page(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<PageResult, UpstreamError> {
        if cancel.is_cancelled() {
            return Err(UpstreamError::Cancelled);
        }

        let response = tokio::select! {
            () = cancel.cancelled() => return Err(UpstreamError::Cancelled),
            sent = self.client.get(url.clone()).send() => sent.map_err(map_request_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = tokio::select! {
            () = cancel.cancelled() => return Err(UpstreamError::Cancelled),
            read = response.text() => read.map_err(map_request_error)?,
        };

        let wire: WirePage =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        Ok(normalize_page(wire, url.as_str()))
    }

    /// Builds the request URL with percent-encoded path and query parameters.
    fn page_url(
        &self,
        brand: &str,
        page: u32,
        limit: u32,
        params: &FetchParams,
    ) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| UpstreamError::InvalidBaseUrl {
                        url: self.base_url.to_string(),
                        reason: "URL cannot serve as a base".to_owned(),
                    })?;
            segments.pop_if_empty();
            segments.push("products");
            segments.push(brand);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("limit", &limit.to_string());
            if let Some(name) = &params.name {
                pairs.append_pair("name", name);
            }
            for alias in &params.aliases {
                pairs.append_pair("aliases", alias);
            }
            if let Some(color) = &params.color {
                pairs.append_pair("color", color);
            }
            if let Some(material) = &params.material {
                pairs.append_pair("material", material);
            }
            if let Some(min) = params.min_price {
                pairs.append_pair("minPrice", &min.to_string());
            }
            if let Some(max) = params.max_price {
                pairs.append_pair("maxPrice", &max.to_string());
            }
            if let Some(search) = &params.search {
                pairs.append_pair("search", search);
            }
            if let Some((by, order)) = &params.sort {
                pairs.append_pair("sortBy", by);
                pairs.append_pair("sortOrder", order);
            }
            if let Some(in_stock) = params.in_stock {
                pairs.append_pair("inStock", if in_stock { "true" } else { "false" });
            }
            for excluded in &params.exclude_brands {
                pairs.append_pair("excludeBrands", excluded);
            }
        }
        Ok(url)
    }
}

fn map_request_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout {
            url: e.url().map(ToString::to_string).unwrap_or_default(),
            attempts: 1,
        }
    } else {
        UpstreamError::Network(e)
    }
}
