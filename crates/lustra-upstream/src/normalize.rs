//! Normalization from raw upstream shapes to [`lustra_core::ProductRecord`].
//!
//! Stock and price parsing is delegated to [`crate::parse`]; this module
//! focuses on structural conversion. Products that cannot be normalized are
//! skipped individually with a warning rather than failing the whole page.

use chrono::{DateTime, Utc};
use lustra_core::{ProductAttributes, ProductRecord};

use crate::parse::{parse_price, parse_stock_count};
use crate::types::{NumberOrText, PageResult, WirePage, WireProduct};

/// Normalizes a raw upstream page. `context` identifies the request in logs.
#[must_use]
pub fn normalize_page(wire: WirePage, context: &str) -> PageResult {
    let reported_total = wire.total_products;
    let total_pages = wire.total_pages.unwrap_or(1).max(1);

    let products: Vec<ProductRecord> = wire
        .products
        .into_iter()
        .filter_map(|raw| match normalize_product(raw) {
            Ok(product) => Some(product),
            Err(reason) => {
                tracing::warn!(context, reason, "skipping malformed upstream product");
                None
            }
        })
        .collect();

    let total_products = reported_total.unwrap_or(products.len() as u64);

    PageResult {
        products,
        total_pages,
        total_products,
    }
}

/// Normalizes one raw product. Errors describe why the product was dropped.
fn normalize_product(raw: WireProduct) -> Result<ProductRecord, String> {
    let id = raw.id.into_string();
    if raw.name.trim().is_empty() {
        return Err(format!("product {id} has no name"));
    }

    let price = match raw.price {
        Some(NumberOrText::Number(n)) => n,
        Some(NumberOrText::Text(ref s)) => {
            parse_price(s).ok_or_else(|| format!("product {id} has unparseable price '{s}'"))?
        }
        None => return Err(format!("product {id} has no price")),
    };

    let stock_count = match raw.stock {
        #[allow(clippy::cast_possible_truncation)]
        Some(NumberOrText::Number(n)) => n.trunc() as i64,
        Some(NumberOrText::Text(ref s)) => parse_stock_count(s),
        None => 0,
    };

    // Unparseable timestamps degrade to "no creation date" — the product
    // simply never counts as new.
    let created_at = raw.created_at.as_deref().and_then(parse_timestamp);

    Ok(ProductRecord {
        id,
        name: raw.name,
        article_code: raw.article_code.unwrap_or_default(),
        brand: raw.brand.unwrap_or_default(),
        category_label: raw.category.unwrap_or_default(),
        stock_count,
        price,
        created_at,
        attributes: ProductAttributes {
            color: non_empty(raw.color),
            material: non_empty(raw.material),
            socket_type: non_empty(raw.socket_type),
            lamp_count: raw.lamp_count,
            shade_color: non_empty(raw.shade_color),
            frame_color: non_empty(raw.frame_color),
        },
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Treat empty strings as absent attributes.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
