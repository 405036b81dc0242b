//! Catalog taxonomy data: brand category trees plus the fixed lookup tables
//! the URL codec and the upstream client consult.
//!
//! Everything here is built once from `config/catalog.yaml` and immutable
//! afterwards.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// One node of a brand's category tree.
///
/// `label` is what the shopper sees, `search_key` is the canonical string
/// sent upstream as the `name` parameter. Aliases are matched
/// case-insensitively by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub label: String,
    pub search_key: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Returns `true` for a node with at least one child. Such nodes are
    /// never canonical; the resolver redirects to their first child.
    #[must_use]
    pub fn is_parent(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Whether a brand sells lighting or electrical installation products.
///
/// The distinction feeds the upstream client's HTTP-500 recovery guard: a 500
/// for a lighting category under an electrical brand is a known upstream
/// inconsistency, not a genuine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandKind {
    Lighting,
    Electrical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandCatalog {
    pub name: String,
    pub kind: BrandKind,
    pub categories: Vec<CategoryNode>,
}

/// Raw deserialization target for `config/catalog.yaml`.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub brands: Vec<BrandCatalog>,
    /// URL slug -> brand name.
    #[serde(default)]
    pub slugs: BTreeMap<String, String>,
    /// Category search key -> pretty path segment(s).
    #[serde(default)]
    pub category_paths: BTreeMap<String, String>,
    #[serde(default)]
    pub excluded_brands: Vec<String>,
    #[serde(default)]
    pub lighting_categories: Vec<String>,
}

/// The validated, immutable taxonomy. Constructed once at process start and
/// passed by reference into the resolver and the engine.
#[derive(Debug)]
pub struct Taxonomy {
    brands: Vec<BrandCatalog>,
    /// Synthetic catalog whose categories are the union of cross-brand
    /// category labels, in first-declared order.
    all_brands: BrandCatalog,
    slugs: BTreeMap<String, String>,
    slugs_rev: BTreeMap<String, String>,
    category_paths: BTreeMap<String, String>,
    paths_rev: BTreeMap<String, String>,
    excluded_brands: Vec<String>,
    excluded_lower: HashSet<String>,
    lighting_categories: HashSet<String>,
}

impl Taxonomy {
    pub(crate) fn assemble(
        brands: Vec<BrandCatalog>,
        slugs: BTreeMap<String, String>,
        category_paths: BTreeMap<String, String>,
        excluded_brands: Vec<String>,
        lighting_categories: Vec<String>,
    ) -> Self {
        let all_brands = union_catalog(&brands);
        let slugs_rev = slugs
            .iter()
            .map(|(slug, brand)| (brand.to_lowercase(), slug.clone()))
            .collect();
        let paths_rev = category_paths
            .iter()
            .map(|(key, path)| (path.clone(), key.clone()))
            .collect();
        let excluded_lower = excluded_brands.iter().map(|b| b.to_lowercase()).collect();
        let lighting_categories = lighting_categories
            .into_iter()
            .map(|c| c.to_lowercase())
            .collect();

        Taxonomy {
            brands,
            all_brands,
            slugs,
            slugs_rev,
            category_paths,
            paths_rev,
            excluded_brands,
            excluded_lower,
            lighting_categories,
        }
    }

    /// Brand catalogs in declared order.
    #[must_use]
    pub fn brands(&self) -> &[BrandCatalog] {
        &self.brands
    }

    /// The synthetic all-brands catalog.
    #[must_use]
    pub fn all_brands(&self) -> &BrandCatalog {
        &self.all_brands
    }

    /// Case-insensitive brand lookup by name.
    #[must_use]
    pub fn brand(&self, name: &str) -> Option<&BrandCatalog> {
        self.brands
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Resolves a URL slug to its brand name.
    #[must_use]
    pub fn brand_for_slug(&self, slug: &str) -> Option<&str> {
        self.slugs.get(&slug.to_lowercase()).map(String::as_str)
    }

    /// Reverse slug lookup for the URL write path.
    #[must_use]
    pub fn slug_for_brand(&self, brand: &str) -> Option<&str> {
        self.slugs_rev.get(&brand.to_lowercase()).map(String::as_str)
    }

    /// Pretty path segment(s) for a category search key, if mapped.
    #[must_use]
    pub fn path_for_category(&self, search_key: &str) -> Option<&str> {
        self.category_paths.get(search_key).map(String::as_str)
    }

    /// Reverse path lookup for the URL read path.
    #[must_use]
    pub fn category_for_path(&self, path: &str) -> Option<&str> {
        self.paths_rev.get(path).map(String::as_str)
    }

    /// Brands that must never surface in the open catalog.
    #[must_use]
    pub fn excluded_brands(&self) -> &[String] {
        &self.excluded_brands
    }

    #[must_use]
    pub fn is_excluded_brand(&self, brand: &str) -> bool {
        self.excluded_lower.contains(&brand.to_lowercase())
    }

    /// Returns `true` if the search key belongs to the lighting assortment.
    #[must_use]
    pub fn is_lighting_category(&self, search_key: &str) -> bool {
        self.lighting_categories.contains(&search_key.to_lowercase())
    }

    /// Returns `true` if the named brand sells lighting. Unknown brands count
    /// as lighting so the 500 guard never masks failures for them.
    #[must_use]
    pub fn is_lighting_brand(&self, name: &str) -> bool {
        self.brand(name).is_none_or(|b| b.kind == BrandKind::Lighting)
    }

    /// Lighting category search keys, lowercased, for the upstream client's
    /// mismatch guard.
    #[must_use]
    pub fn lighting_category_set(&self) -> HashSet<String> {
        self.lighting_categories.clone()
    }

    /// Names of non-lighting brands, lowercased, for the upstream client's
    /// mismatch guard.
    #[must_use]
    pub fn non_lighting_brand_set(&self) -> HashSet<String> {
        self.brands
            .iter()
            .filter(|b| b.kind == BrandKind::Electrical)
            .map(|b| b.name.to_lowercase())
            .collect()
    }
}

/// Builds the synthetic all-brands catalog: the union of cross-brand category
/// labels in first-declared order. The first brand declaring a label
/// contributes its node (aliases and children included).
fn union_catalog(brands: &[BrandCatalog]) -> BrandCatalog {
    let mut seen: HashSet<String> = HashSet::new();
    let mut categories = Vec::new();
    for brand in brands {
        for node in &brand.categories {
            if seen.insert(node.label.to_lowercase()) {
                categories.push(node.clone());
            }
        }
    }
    BrandCatalog {
        name: "Все бренды".to_owned(),
        kind: BrandKind::Lighting,
        categories,
    }
}
