use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Number of days a product counts as "new" after its creation date.
pub const NEW_ITEM_WINDOW_DAYS: i64 = 30;

/// A catalog product normalized from the upstream product service.
///
/// Owned by the aggregation buffer for the duration of one resolved query and
/// discarded on the next navigation; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Upstream numeric product ID, stored as a string to avoid precision loss.
    pub id: String,
    pub name: String,
    /// Manufacturer article code, e.g. `"07719-44,19"`.
    pub article_code: String,
    pub brand: String,
    /// Display label of the category the product was returned under.
    pub category_label: String,
    /// Units on hand. Parsed from a free-text stock field at the upstream
    /// boundary; `0` means out of stock.
    pub stock_count: i64,
    pub price: f64,
    /// When the product entered the catalog, if upstream reports it.
    pub created_at: Option<DateTime<Utc>>,
    pub attributes: ProductAttributes,
}

impl ProductRecord {
    /// Returns `true` if the product has at least one unit on hand.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.stock_count > 0
    }

    /// Returns `true` if the product was created within the new-item window
    /// ending at `now`. Products without a creation date are never new.
    #[must_use]
    pub fn is_new(&self, now: DateTime<Utc>) -> bool {
        self.created_at
            .is_some_and(|created| now - created <= Duration::days(NEW_ITEM_WINDOW_DAYS))
    }
}

/// Filterable product attributes. All optional: upstream omits whatever a
/// product does not have.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub color: Option<String>,
    pub material: Option<String>,
    /// Lamp socket type, e.g. `"E14"` or `"GU10"`.
    pub socket_type: Option<String>,
    pub lamp_count: Option<u32>,
    pub shade_color: Option<String>,
    pub frame_color: Option<String>,
}
