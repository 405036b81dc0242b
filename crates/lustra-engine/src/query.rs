//! The immutable state snapshot behind one navigation.

use lustra_core::{Availability, CatalogFilters, SortMode};
use lustra_taxonomy::CategoryNode;
use lustra_upstream::FetchParams;

/// Everything one navigation resolved to. Created from the URL or a filter
/// change, captured as an immutable snapshot per in-flight request, and never
/// shared between concurrent fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    /// Canonical brand name; `None` browses the all-brands catalog.
    pub brand: Option<String>,
    /// Canonical category node; `None` falls back to free-text search.
    pub category: Option<CategoryNode>,
    pub filters: CatalogFilters,
    pub availability: Availability,
    pub show_only_new: bool,
    pub sort: SortMode,
    /// 1-based client page.
    pub page: u32,
}

impl Default for ResolvedQuery {
    fn default() -> Self {
        ResolvedQuery {
            brand: None,
            category: None,
            filters: CatalogFilters::default(),
            availability: Availability::All,
            show_only_new: false,
            sort: SortMode::None,
            page: 1,
        }
    }
}

impl ResolvedQuery {
    /// `true` when an active filter cannot be expressed upstream, forcing the
    /// aggregation engine into buffered mode.
    #[must_use]
    pub fn requires_buffering(&self) -> bool {
        self.availability == Availability::OutOfStock || self.show_only_new
    }

    /// Maps this query onto the upstream request surface. `excluded_brands`
    /// is forwarded so upstream can pre-filter; the paginator re-checks it
    /// anyway.
    #[must_use]
    pub fn fetch_params(&self, excluded_brands: &[String]) -> FetchParams {
        let (name, aliases) = match &self.category {
            Some(node) => (Some(node.search_key.clone()), node.aliases.clone()),
            None => (None, Vec::new()),
        };

        FetchParams {
            name,
            aliases,
            color: self.filters.color.clone(),
            material: self.filters.material.clone(),
            min_price: self.filters.min_price,
            max_price: self.filters.max_price,
            search: self.filters.search.clone(),
            sort: self
                .sort
                .upstream_pair()
                .map(|(by, order)| (by.to_owned(), order.to_owned())),
            // Only the in-stock class is expressible upstream; out-of-stock is
            // filtered client-side from a buffered fetch.
            in_stock: (self.availability == Availability::InStock).then_some(true),
            exclude_brands: excluded_brands.to_vec(),
        }
    }
}
