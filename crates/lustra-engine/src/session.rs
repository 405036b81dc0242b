//! The catalog session: owns the current resolved state, orchestrates one
//! navigation end to end, and enforces the ordering guarantee that the last
//! navigation intent always wins regardless of response arrival order.
//!
//! Every navigation captures an immutable [`ResolvedQuery`] snapshot, takes a
//! monotonically increasing request token, and cancels the previous in-flight
//! fetch through its cancellation token. A result whose token no longer
//! matches the latest issued token is discarded without touching shared
//! state; the token comparison under the state lock plays the role of a
//! compare-and-swap guard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use lustra_core::{AppConfig, Availability, CatalogFilters, ProductRecord, SortMode};
use lustra_taxonomy::Taxonomy;
use lustra_upstream::{MismatchGuard, UpstreamClient, UpstreamError};

use crate::aggregate::Aggregator;
use crate::facets::{self, FacetSet};
use crate::notice::LoadNotice;
use crate::paginate;
use crate::query::ResolvedQuery;
use crate::url_state;

/// A partial state change: `None` fields keep their current value. This is
/// what makes the UX invariant hold — switching brand without naming a
/// category preserves the selected category, and vice versa.
#[derive(Debug, Clone, Default)]
pub struct NavigationIntent {
    /// Brand name (canonicalized against the taxonomy during the merge).
    pub brand: Option<String>,
    /// Raw category input: a label, search key, alias, path-mapped key, or
    /// free text.
    pub category: Option<String>,
    pub filters: Option<CatalogFilters>,
    pub availability: Option<Availability>,
    pub show_only_new: Option<bool>,
    pub sort: Option<SortMode>,
    /// Absent means the change resets to page 1.
    pub page: Option<u32>,
}

/// The committed outcome of one navigation: the final page, its facets, any
/// load notice, and the canonical address for the URL bar.
#[derive(Debug, Clone)]
pub struct CatalogView {
    pub query: ResolvedQuery,
    pub products: Vec<ProductRecord>,
    pub total_pages: u32,
    pub total_products: u64,
    pub facets: FacetSet,
    pub notice: Option<LoadNotice>,
    pub url: String,
}

struct SessionState {
    current: ResolvedQuery,
    inflight: Option<CancellationToken>,
}

/// One shopper's catalog session.
pub struct CatalogSession {
    taxonomy: Arc<Taxonomy>,
    aggregator: Aggregator,
    page_size: u32,
    latest_token: AtomicU64,
    state: Mutex<SessionState>,
}

impl CatalogSession {
    #[must_use]
    pub fn new(taxonomy: Arc<Taxonomy>, aggregator: Aggregator, page_size: u32) -> Self {
        CatalogSession {
            taxonomy,
            aggregator,
            page_size,
            latest_token: AtomicU64::new(0),
            state: Mutex::new(SessionState {
                current: ResolvedQuery::default(),
                inflight: None,
            }),
        }
    }

    /// Builds the upstream client and aggregator from the application
    /// configuration and the loaded taxonomy.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the HTTP client cannot be constructed or
    /// the base URL is unusable.
    pub fn from_config(config: &AppConfig, taxonomy: Arc<Taxonomy>) -> Result<Self, UpstreamError> {
        let guard = MismatchGuard::new(
            taxonomy.lighting_category_set(),
            taxonomy.non_lighting_brand_set(),
        );
        let client = UpstreamClient::new(
            &config.upstream_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.timeout_max_retries,
            config.timeout_retry_delay_ms,
            guard,
        )?;
        let aggregator = Aggregator::new(
            client,
            taxonomy.excluded_brands().to_vec(),
            config.buffer_page_size,
            config.buffer_max_fetches,
        );
        Ok(Self::new(taxonomy, aggregator, config.default_page_size))
    }

    /// The current resolved state (for display and tests).
    #[must_use]
    pub fn current(&self) -> ResolvedQuery {
        self.state
            .lock()
            .expect("session state lock poisoned")
            .current
            .clone()
    }

    /// Decodes an address and navigates to it.
    pub async fn navigate_address(&self, address: &str) -> Option<CatalogView> {
        let intent = url_state::decode(address, &self.taxonomy);
        self.navigate(intent).await
    }

    /// Runs one navigation: merge the intent into the current state, fetch,
    /// filter, paginate, extract facets, and encode the canonical address.
    ///
    /// Returns `None` when a newer navigation superseded this one while its
    /// fetch was in flight; the superseded result is discarded and nothing is
    /// mutated.
    pub async fn navigate(&self, intent: NavigationIntent) -> Option<CatalogView> {
        let (query, token, cancel) = {
            let mut state = self.state.lock().expect("session state lock poisoned");
            let query = merge_intent(&self.taxonomy, &state.current, intent);
            let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(previous) = state.inflight.take() {
                previous.cancel();
            }
            let cancel = CancellationToken::new();
            state.inflight = Some(cancel.clone());
            state.current = query.clone();
            (query, token, cancel)
        };

        tracing::debug!(token, brand = ?query.brand, page = query.page, "navigation issued");

        let outcome = self
            .aggregator
            .aggregate(&query, self.page_size, &cancel)
            .await;

        let page = paginate::apply(
            &outcome.buffer,
            &query,
            self.page_size,
            Utc::now(),
            self.taxonomy.excluded_brands(),
        );
        let facets = facets::extract(&page.products);
        let url = url_state::encode(&query, &self.taxonomy);

        // Commit gate: only the latest issued navigation may surface a view.
        {
            let mut state = self.state.lock().expect("session state lock poisoned");
            if self.latest_token.load(Ordering::SeqCst) != token || cancel.is_cancelled() {
                tracing::debug!(token, "navigation superseded — discarding result");
                return None;
            }
            state.inflight = None;
        }

        Some(CatalogView {
            query,
            products: page.products,
            total_pages: page.total_pages,
            total_products: page.total_products,
            facets,
            notice: outcome.notice,
            url,
        })
    }
}

/// Merges a partial intent into the current state.
///
/// Order matters: the brand lands first so it can hint category resolution,
/// filters land before the category so a resolution miss can claim the
/// free-text search slot.
fn merge_intent(
    taxonomy: &Taxonomy,
    current: &ResolvedQuery,
    intent: NavigationIntent,
) -> ResolvedQuery {
    let mut next = current.clone();

    if let Some(brand_input) = intent.brand {
        next.brand = Some(
            taxonomy
                .brand(&brand_input)
                .map_or(brand_input, |b| b.name.clone()),
        );
    }

    if let Some(filters) = intent.filters {
        next.filters = filters;
    }

    if let Some(category_input) = intent.category {
        match lustra_taxonomy::resolve(taxonomy, &category_input, next.brand.as_deref()) {
            Some(hit) => {
                if hit.redirected {
                    tracing::debug!(
                        input = %category_input,
                        child = %hit.node.label,
                        "parent category redirected to its first child"
                    );
                }
                next.category = Some(hit.node.clone());
                next.filters.search = None;
            }
            None => {
                // Resolution miss: recover locally by treating the input as a
                // free-text search term.
                next.category = None;
                next.filters.search = Some(category_input);
            }
        }
    }

    if let Some(availability) = intent.availability {
        next.availability = availability;
    }
    if let Some(show_only_new) = intent.show_only_new {
        next.show_only_new = show_only_new;
    }
    if let Some(sort) = intent.sort {
        next.sort = sort;
    }
    next.page = intent.page.unwrap_or(1);

    next
}
