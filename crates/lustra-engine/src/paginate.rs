//! Client-side filtering and re-pagination of an aggregation buffer.
//!
//! Filter steps run in a fixed order: excluded brands, availability re-check,
//! new-items window. Pagination is only recomputed for buffered-mode buffers;
//! a pass-through buffer already *is* exactly one upstream page, so upstream
//! totals are trusted and nothing is re-sliced.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use lustra_core::{Availability, ProductRecord};

use crate::aggregate::AggregationBuffer;
use crate::query::ResolvedQuery;

/// The final client-visible page.
#[derive(Debug, Clone)]
pub struct PageView {
    pub products: Vec<ProductRecord>,
    pub total_pages: u32,
    pub total_products: u64,
}

/// Applies client-side filters and produces the requested page window.
///
/// `now` anchors the new-items window; the session passes `Utc::now()`.
/// A page beyond the recomputed total yields an empty slice, not an error.
#[must_use]
pub fn apply(
    buffer: &AggregationBuffer,
    query: &ResolvedQuery,
    page_size: u32,
    now: DateTime<Utc>,
    excluded_brands: &[String],
) -> PageView {
    let excluded: HashSet<String> = excluded_brands.iter().map(|b| b.to_lowercase()).collect();

    let filtered: Vec<&ProductRecord> = buffer
        .products
        .iter()
        .filter(|p| !excluded.contains(&p.brand.to_lowercase()))
        .filter(|p| match query.availability {
            Availability::All => true,
            // Defensive re-check: upstream already asked for in-stock, but a
            // stale upstream index must not leak sold-out items.
            Availability::InStock => p.stock_count > 0,
            Availability::OutOfStock => p.stock_count <= 0,
        })
        .filter(|p| !query.show_only_new || p.is_new(now))
        .collect();

    if buffer.buffered {
        let total_products = filtered.len();
        let size = page_size.max(1) as usize;
        let total_pages = total_products.div_ceil(size);
        let start = (query.page.max(1) as usize - 1) * size;

        let products: Vec<ProductRecord> = filtered
            .into_iter()
            .skip(start)
            .take(size)
            .cloned()
            .collect();

        PageView {
            products,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_products: total_products as u64,
        }
    } else {
        PageView {
            products: filtered.into_iter().cloned().collect(),
            total_pages: buffer.upstream_total_pages,
            total_products: buffer.upstream_total_products,
        }
    }
}
