//! Taxonomy resolution: maps a human-authored input string (path segment or
//! free text) to a canonical category node.
//!
//! Match strategies run in declared priority order and the first hit wins:
//! exact label/search-key, then exact alias, then alias substring. Within one
//! strategy brands are scanned in declared order (a brand hint promotes that
//! brand to the front). A hit on a node with children redirects to the node's
//! first child — parent nodes are never canonical.
//!
//! A miss is not an error: callers fall back to treating the raw input as a
//! free-text search term against product names.

use crate::types::{BrandCatalog, CategoryNode, Taxonomy};

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Name of the brand whose catalog produced the match.
    pub brand: &'a str,
    pub node: &'a CategoryNode,
    /// `true` when a parent node matched and the resolution was redirected to
    /// its first child; the caller must re-canonicalize the URL.
    pub redirected: bool,
}

type Matcher = fn(&CategoryNode, &str) -> bool;

/// Ordered match strategies. Earlier strategies win across *all* brands
/// before later ones are consulted.
const STRATEGIES: [(&str, Matcher); 3] = [
    ("exact", match_exact),
    ("alias-exact", match_alias_exact),
    ("alias-substring", match_alias_substring),
];

fn match_exact(node: &CategoryNode, input: &str) -> bool {
    node.label.to_lowercase() == input || node.search_key.to_lowercase() == input
}

fn match_alias_exact(node: &CategoryNode, input: &str) -> bool {
    node.aliases.iter().any(|a| a.to_lowercase() == input)
}

fn match_alias_substring(node: &CategoryNode, input: &str) -> bool {
    node.aliases.iter().any(|a| {
        let alias = a.to_lowercase();
        input.contains(&alias) || alias.contains(input)
    })
}

/// Resolves `input` to the best-matching category node, or `None`.
///
/// A brand hint moves that brand to the front of the scan order; it does not
/// restrict the scan, so cross-brand aliases still resolve when the hinted
/// brand lacks the category.
#[must_use]
pub fn resolve<'a>(
    taxonomy: &'a Taxonomy,
    input: &str,
    brand_hint: Option<&str>,
) -> Option<Resolution<'a>> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let order = scan_order(taxonomy, brand_hint);
    for (strategy, matcher) in STRATEGIES {
        for brand in &order {
            for root in &brand.categories {
                if let Some(found) = find_in(root, &needle, matcher) {
                    tracing::debug!(
                        input,
                        strategy,
                        brand = %brand.name,
                        label = %found.label,
                        "taxonomy hit"
                    );
                    return Some(canonicalize(brand, found));
                }
            }
        }
    }

    tracing::debug!(input, "taxonomy miss — falling back to free-text search");
    None
}

fn scan_order<'a>(taxonomy: &'a Taxonomy, hint: Option<&str>) -> Vec<&'a BrandCatalog> {
    let mut order: Vec<&BrandCatalog> = Vec::with_capacity(taxonomy.brands().len());
    if let Some(hinted) = hint.and_then(|h| taxonomy.brand(h)) {
        order.push(hinted);
    }
    for brand in taxonomy.brands() {
        let already_first = order
            .first()
            .is_some_and(|h| h.name.eq_ignore_ascii_case(&brand.name));
        if !already_first {
            order.push(brand);
        }
    }
    order
}

/// Depth-first search applying one matcher, node before its children.
fn find_in<'a>(node: &'a CategoryNode, needle: &str, matcher: Matcher) -> Option<&'a CategoryNode> {
    if matcher(node, needle) {
        return Some(node);
    }
    node.children
        .iter()
        .find_map(|child| find_in(child, needle, matcher))
}

/// A matched parent is replaced by its first declared child.
fn canonicalize<'a>(brand: &'a BrandCatalog, found: &'a CategoryNode) -> Resolution<'a> {
    if let Some(first_child) = found.children.first() {
        return Resolution {
            brand: &brand.name,
            node: first_child,
            redirected: true,
        };
    }
    Resolution {
        brand: &brand.name,
        node: found,
        redirected: false,
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
