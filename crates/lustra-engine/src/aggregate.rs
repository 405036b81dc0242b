//! Page aggregation over the upstream fetch client.
//!
//! Two modes:
//! - **pass-through** — no client-only filter is active; exactly one upstream
//!   call at the requested page and size, upstream pagination forwarded as-is.
//! - **buffered** — availability=out-of-stock or new-items is active, which
//!   upstream cannot express; page 1 is requested at an enlarged size to
//!   approximate the whole category, with a bounded number of follow-up
//!   fetches, and pagination is recomputed client-side afterwards.
//!
//! All fetch-layer errors stop here: a failed first page becomes an empty
//! buffer plus a notice, a failed later page keeps what was gathered.

use tokio_util::sync::CancellationToken;

use lustra_core::ProductRecord;
use lustra_upstream::{UpstreamClient, UpstreamError};

use crate::notice::LoadNotice;
use crate::query::ResolvedQuery;

/// Path segment used when no brand is selected.
const ALL_BRANDS_SEGMENT: &str = "all";

/// Products accumulated for a single resolved query, plus the upstream
/// pagination baseline. Lives only for the duration of producing one
/// client-visible page; never cached across navigations.
#[derive(Debug, Clone)]
pub struct AggregationBuffer {
    pub products: Vec<ProductRecord>,
    /// Totals from the *first* upstream response — the unfiltered category
    /// size, kept as the display baseline.
    pub upstream_total_pages: u32,
    pub upstream_total_products: u64,
    /// Set once upstream pages ran out or the fetch cap was reached.
    pub exhausted: bool,
    /// Set when the fetch cap stopped accumulation while upstream still had
    /// more pages; filtered totals then understate the category.
    pub truncated: bool,
    /// Which mode produced this buffer; decides how the paginator treats it.
    pub buffered: bool,
}

impl AggregationBuffer {
    fn empty(buffered: bool) -> Self {
        AggregationBuffer {
            products: Vec::new(),
            upstream_total_pages: 0,
            upstream_total_products: 0,
            exhausted: true,
            truncated: false,
            buffered,
        }
    }
}

/// An aggregation result: the buffer is always renderable, the notice is the
/// optional user-visible condition that accompanied producing it.
#[derive(Debug, Clone)]
pub struct AggregationOutcome {
    pub buffer: AggregationBuffer,
    pub notice: Option<LoadNotice>,
}

/// Drives one or more upstream fetches per navigation.
pub struct Aggregator {
    client: UpstreamClient,
    excluded_brands: Vec<String>,
    buffer_page_size: u32,
    buffer_max_fetches: u32,
}

impl Aggregator {
    #[must_use]
    pub fn new(
        client: UpstreamClient,
        excluded_brands: Vec<String>,
        buffer_page_size: u32,
        buffer_max_fetches: u32,
    ) -> Self {
        Aggregator {
            client,
            excluded_brands,
            buffer_page_size,
            buffer_max_fetches,
        }
    }

    /// Builds the product buffer for `query`. Never fails; failures degrade
    /// to an empty or partial buffer with an optional notice.
    pub async fn aggregate(
        &self,
        query: &ResolvedQuery,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> AggregationOutcome {
        let brand = query.brand.as_deref().unwrap_or(ALL_BRANDS_SEGMENT);
        let params = query.fetch_params(&self.excluded_brands);

        if query.requires_buffering() {
            self.aggregate_buffered(brand, &params, cancel).await
        } else {
            match self
                .client
                .fetch_page(brand, query.page, page_size, &params, cancel)
                .await
            {
                Ok(page) => AggregationOutcome {
                    buffer: AggregationBuffer {
                        products: page.products,
                        upstream_total_pages: page.total_pages,
                        upstream_total_products: page.total_products,
                        exhausted: true,
                        truncated: false,
                        buffered: false,
                    },
                    notice: None,
                },
                Err(err) => first_fetch_failure(&err, false),
            }
        }
    }

    /// Buffered mode: page 1 at the enlarged size, then up to
    /// `buffer_max_fetches - 1` follow-ups until the target is reached or
    /// upstream is exhausted.
    async fn aggregate_buffered(
        &self,
        brand: &str,
        params: &lustra_upstream::FetchParams,
        cancel: &CancellationToken,
    ) -> AggregationOutcome {
        let limit = self.buffer_page_size;
        let target = limit as usize;

        let first = match self.client.fetch_page(brand, 1, limit, params, cancel).await {
            Ok(page) => page,
            Err(err) => return first_fetch_failure(&err, true),
        };

        let upstream_total_pages = first.total_pages;
        let upstream_total_products = first.total_products;
        let mut products = first.products;
        let mut fetches_done = 1u32;
        let mut notice = None;
        let mut truncated = false;

        while products.len() < target && !products.is_empty() {
            let next_page = fetches_done + 1;
            if next_page > upstream_total_pages {
                break; // upstream exhausted
            }
            if fetches_done >= self.buffer_max_fetches {
                truncated = true;
                tracing::warn!(
                    brand,
                    fetches = fetches_done,
                    upstream_total_pages,
                    "buffered aggregation hit its fetch cap before exhausting the category"
                );
                break;
            }

            match self
                .client
                .fetch_page(brand, next_page, limit, params, cancel)
                .await
            {
                Ok(page) if page.products.is_empty() => break,
                Ok(page) => {
                    products.extend(page.products);
                    fetches_done += 1;
                }
                Err(UpstreamError::Cancelled) => {
                    // The session discards superseded buffers by token; no
                    // point fetching further for a dead navigation.
                    break;
                }
                Err(err @ UpstreamError::Timeout { .. }) => {
                    tracing::warn!(brand, page = next_page, error = %err,
                        "later buffered page timed out — keeping partial buffer");
                    notice = Some(LoadNotice::Transient);
                    break;
                }
                Err(err) => {
                    tracing::error!(brand, page = next_page, error = %err,
                        "later buffered page failed — keeping partial buffer");
                    break;
                }
            }
        }

        if truncated && notice.is_none() {
            notice = Some(LoadNotice::ResultsMayBeIncomplete);
        }

        AggregationOutcome {
            buffer: AggregationBuffer {
                products,
                upstream_total_pages,
                upstream_total_products,
                exhausted: true,
                truncated,
                buffered: true,
            },
            notice,
        }
    }
}

/// A failed first page renders the empty state; the notice depends on how it
/// failed. Cancellation is silence — the result is discarded anyway.
fn first_fetch_failure(err: &UpstreamError, buffered: bool) -> AggregationOutcome {
    let notice = match err {
        UpstreamError::Cancelled => None,
        UpstreamError::Timeout { .. } => {
            tracing::warn!(error = %err, "first page fetch timed out");
            Some(LoadNotice::Transient)
        }
        _ => {
            tracing::error!(error = %err, "first page fetch failed");
            Some(LoadNotice::Failed)
        }
    };
    AggregationOutcome {
        buffer: AggregationBuffer::empty(buffered),
        notice,
    }
}
