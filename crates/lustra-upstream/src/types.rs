//! Wire types for the upstream product service and the normalized
//! [`PageResult`] handed to the aggregation engine.

use lustra_core::ProductRecord;
use serde::Deserialize;

/// One normalized page from upstream. Ephemeral; one per fetch.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub products: Vec<ProductRecord>,
    pub total_pages: u32,
    pub total_products: u64,
}

impl PageResult {
    /// The recoverable-empty shape used when a known upstream inconsistency
    /// is silently absorbed.
    #[must_use]
    pub fn empty() -> Self {
        PageResult {
            products: Vec::new(),
            total_pages: 1,
            total_products: 0,
        }
    }
}

/// Query surface of `GET /products/{brand}`. Everything the upstream API can
/// express server-side; filters it cannot express stay client-side.
#[derive(Debug, Clone, Default)]
pub struct FetchParams {
    /// Canonical category search key (`name` query parameter).
    pub name: Option<String>,
    /// Category aliases forwarded so upstream can widen its match.
    pub aliases: Vec<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Free-text search against product names.
    pub search: Option<String>,
    /// `(sortBy, sortOrder)` pair; `None` for the upstream default order.
    pub sort: Option<(String, String)>,
    pub in_stock: Option<bool>,
    pub exclude_brands: Vec<String>,
}

/// Raw page envelope. `totalPages`/`totalProducts` are occasionally absent
/// and are derived during normalization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePage {
    #[serde(default)]
    pub products: Vec<WireProduct>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_products: Option<u64>,
}

/// A value upstream serializes either as a JSON number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Product IDs arrive as numbers or strings depending on the upstream
/// endpoint version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            IdValue::Number(n) => n.to_string(),
            IdValue::Text(s) => s,
        }
    }
}

/// Raw upstream product. Attribute fields ride flat on the product object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: IdValue,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub article_code: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Stock as a number or free text (`"5 шт"`, `"в наличии"`, `"нет"`).
    #[serde(default)]
    pub stock: Option<NumberOrText>,
    pub price: Option<NumberOrText>,
    /// RFC 3339; unparseable values are dropped during normalization.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub socket_type: Option<String>,
    #[serde(default)]
    pub lamp_count: Option<u32>,
    #[serde(default)]
    pub shade_color: Option<String>,
    #[serde(default)]
    pub frame_color: Option<String>,
}
