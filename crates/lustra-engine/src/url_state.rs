//! Bidirectional mapping between a [`ResolvedQuery`] and the address bar.
//!
//! Write path: a "pretty" canonical path (`/catalog/{brand-slug}/{category-path}`)
//! whenever both the brand slug and the category path are mappable, otherwise
//! the query-string form (`/catalog?source=…&category=…`). Filters, sort,
//! availability, new-items, and page ride as query parameters on either form;
//! page 1 is omitted to keep canonical URLs stable.
//!
//! Read path: path segments resolve through the slug/category tables before
//! query parameters are consulted, and an explicit `category` (or `source`)
//! query parameter overrides a same-named pretty-path segment, which supports
//! deep links with overrides. Filters, sort, availability, and page are fully
//! specified by the address; brand and category are left unset when absent so
//! the session's merge invariant (brand switches preserve the category, and
//! vice versa) applies.

use lustra_core::{Availability, CatalogFilters, SortMode};
use lustra_taxonomy::Taxonomy;
use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::query::ResolvedQuery;
use crate::session::NavigationIntent;

/// Renders the canonical address for a resolved query.
#[must_use]
pub fn encode(query: &ResolvedQuery, taxonomy: &Taxonomy) -> String {
    let slug = query
        .brand
        .as_deref()
        .and_then(|b| taxonomy.slug_for_brand(b));
    let category_path = query
        .category
        .as_ref()
        .and_then(|node| taxonomy.path_for_category(&node.search_key));

    let (path, pretty) = match (slug, &query.category) {
        (Some(slug), Some(_)) => match category_path {
            Some(mapped) => (format!("/catalog/{slug}/{mapped}"), true),
            None => ("/catalog".to_owned(), false),
        },
        (Some(slug), None) => (format!("/catalog/{slug}"), true),
        _ => ("/catalog".to_owned(), false),
    };

    let mut params = form_urlencoded::Serializer::new(String::new());
    if !pretty {
        if let Some(brand) = &query.brand {
            params.append_pair("source", brand);
        }
        if let Some(node) = &query.category {
            params.append_pair("category", &node.label);
        }
    }
    if let Some(color) = &query.filters.color {
        params.append_pair("color", color);
    }
    if let Some(material) = &query.filters.material {
        params.append_pair("material", material);
    }
    if let Some(min) = query.filters.min_price {
        params.append_pair("minPrice", &min.to_string());
    }
    if let Some(max) = query.filters.max_price {
        params.append_pair("maxPrice", &max.to_string());
    }
    if let Some(search) = &query.filters.search {
        params.append_pair("search", search);
    }
    if let Some(sort) = query.sort.as_param() {
        params.append_pair("sort", sort);
    }
    if query.availability != Availability::All {
        params.append_pair("availability", query.availability.as_param());
    }
    if query.show_only_new {
        params.append_pair("newItems", "1");
    }
    if query.page > 1 {
        params.append_pair("page", &query.page.to_string());
    }

    let query_string = params.finish();
    if query_string.is_empty() {
        path
    } else {
        format!("{path}?{query_string}")
    }
}

/// Parses an address (pretty or query form) into a navigation intent.
///
/// Never fails: unknown slugs degrade to free-text category matching and
/// malformed parameter values degrade to their defaults.
#[must_use]
pub fn decode(address: &str, taxonomy: &Taxonomy) -> NavigationIntent {
    let (path, query_string) = match address.split_once('?') {
        Some((p, q)) => (p, q),
        None => (address, ""),
    };

    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect();
    let mut rest: &[String] = &segments;
    if rest.first().is_some_and(|s| s == "catalog") {
        rest = &rest[1..];
    }

    let mut brand = None;
    let mut category = None;

    if let Some((first, tail)) = rest.split_first() {
        if let Some(brand_name) = taxonomy.brand_for_slug(first) {
            brand = Some(brand_name.to_owned());
            if !tail.is_empty() {
                category = Some(category_from_segments(tail, taxonomy));
            }
        } else {
            // Unknown slug: fall back to free-text category matching on the
            // remaining segments, or on the segment itself when alone.
            let effective = if tail.is_empty() {
                std::slice::from_ref(first)
            } else {
                tail
            };
            category = Some(category_from_segments(effective, taxonomy));
        }
    }

    let mut filters = CatalogFilters::default();
    let mut availability = Availability::All;
    let mut show_only_new = false;
    let mut sort = SortMode::None;
    let mut page = 1u32;

    for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
        match key.as_ref() {
            "source" => brand = Some(value.into_owned()),
            "category" => category = Some(value.into_owned()),
            "color" => filters.color = Some(value.into_owned()),
            "material" => filters.material = Some(value.into_owned()),
            "minPrice" => filters.min_price = value.parse().ok(),
            "maxPrice" => filters.max_price = value.parse().ok(),
            "search" => filters.search = Some(value.into_owned()),
            "sort" => sort = SortMode::from_param(&value).unwrap_or(SortMode::None),
            "availability" => {
                availability = Availability::from_param(&value).unwrap_or(Availability::All);
            }
            "newItems" => show_only_new = matches!(value.as_ref(), "1" | "true"),
            "page" => page = value.parse().unwrap_or(1),
            _ => {}
        }
    }

    NavigationIntent {
        brand,
        category,
        filters: Some(filters),
        availability: Some(availability),
        show_only_new: Some(show_only_new),
        sort: Some(sort),
        page: Some(page.max(1)),
    }
}

/// Maps path segments through the category path table, falling back to the
/// raw text for free-text resolution.
fn category_from_segments(segments: &[String], taxonomy: &Taxonomy) -> String {
    let joined = segments.join("/");
    taxonomy
        .category_for_path(&joined)
        .map_or_else(|| segments.join(" "), ToOwned::to_owned)
}
