//! Catalog resolution & aggregation engine.
//!
//! Orchestrates one navigation: canonicalize the intended brand/category
//! through the taxonomy, fetch from upstream (one page, or an enlarged
//! buffer when a requested filter is not expressible server-side), apply
//! client-side filters and re-pagination, derive facets, and hand back the
//! canonical address for the URL bar. The session layer guarantees that the
//! last navigation intent always wins, regardless of response arrival order.

pub mod aggregate;
pub mod facets;
pub mod notice;
pub mod paginate;
pub mod query;
pub mod session;
pub mod url_state;

pub use aggregate::{AggregationBuffer, AggregationOutcome, Aggregator};
pub use facets::{ColorFacet, FacetSet};
pub use notice::LoadNotice;
pub use paginate::PageView;
pub use query::ResolvedQuery;
pub use session::{CatalogSession, CatalogView, NavigationIntent};
