//! Filter, availability, and sort vocabulary shared by the engine, the
//! upstream client, and the URL codec.

use serde::{Deserialize, Serialize};

/// Availability classes a shopper can request.
///
/// `InStock` is expressible upstream; `OutOfStock` is not and forces the
/// aggregation engine into buffered mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    #[default]
    All,
    InStock,
    OutOfStock,
}

impl Availability {
    /// The value carried in the `availability` URL parameter.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Availability::All => "all",
            Availability::InStock => "inStock",
            Availability::OutOfStock => "outOfStock",
        }
    }

    /// Parses an `availability` URL parameter. Unknown values are `None`.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Availability::All),
            "inStock" => Some(Availability::InStock),
            "outOfStock" => Some(Availability::OutOfStock),
            _ => None,
        }
    }
}

/// Sort modes the storefront exposes. All of them are expressible upstream,
/// so sorting never forces buffered aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    PriceAsc,
    PriceDesc,
    Popularity,
    Newest,
    Random,
    #[default]
    None,
}

impl SortMode {
    /// The value carried in the `sort` URL parameter, or `None` for the
    /// default order (which is omitted from URLs).
    #[must_use]
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            SortMode::PriceAsc => Some("price-asc"),
            SortMode::PriceDesc => Some("price-desc"),
            SortMode::Popularity => Some("popularity"),
            SortMode::Newest => Some("newest"),
            SortMode::Random => Some("random"),
            SortMode::None => None,
        }
    }

    /// Parses a `sort` URL parameter. Unknown values are `None`.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "price-asc" => Some(SortMode::PriceAsc),
            "price-desc" => Some(SortMode::PriceDesc),
            "popularity" => Some(SortMode::Popularity),
            "newest" => Some(SortMode::Newest),
            "random" => Some(SortMode::Random),
            _ => None,
        }
    }

    /// The `(sortBy, sortOrder)` pair sent upstream, or `None` for the
    /// upstream default order.
    #[must_use]
    pub fn upstream_pair(self) -> Option<(&'static str, &'static str)> {
        match self {
            SortMode::PriceAsc => Some(("price", "asc")),
            SortMode::PriceDesc => Some(("price", "desc")),
            SortMode::Popularity => Some(("popularity", "desc")),
            SortMode::Newest => Some(("createdAt", "desc")),
            SortMode::Random => Some(("random", "asc")),
            SortMode::None => None,
        }
    }
}

/// Attribute and price filters. Everything here is expressible upstream and
/// rides along on both URL forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilters {
    pub color: Option<String>,
    pub material: Option<String>,
    pub socket_type: Option<String>,
    pub lamp_count: Option<u32>,
    pub shade_color: Option<String>,
    pub frame_color: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Free-text search against product names. Also the fallback when an
    /// input string resolves to no taxonomy node.
    pub search: Option<String>,
}
