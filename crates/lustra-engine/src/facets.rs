//! Facet extraction from the currently visible result set.
//!
//! Facets always describe the products in front of the shopper, so the lists
//! legitimately narrow or grow as filters and category change — this is not a
//! global facet index.
//!
//! Color-like attributes are normalized before deduplication: all spellings
//! of one color family («Золотой», "gold matte", «ЗОЛОТО») collapse into a
//! single entry labeled with the canonical family name, and observed
//! matte/glossy qualifiers are retained on that entry as sub-variants.

use std::collections::{BTreeMap, BTreeSet};

use lustra_core::ProductRecord;

/// One color facet entry: a canonical label plus any qualifier sub-variants
/// observed in the result set (e.g. `"Gold"` with `["Matte"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorFacet {
    pub label: String,
    pub variants: Vec<String>,
}

/// The filter values available in the current result set, each deduplicated
/// and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSet {
    pub colors: Vec<ColorFacet>,
    pub materials: Vec<String>,
    pub socket_types: Vec<String>,
    pub lamp_counts: Vec<u32>,
    pub shade_colors: Vec<ColorFacet>,
    pub frame_colors: Vec<ColorFacet>,
}

/// Color family markers: any spelling containing a marker collapses into the
/// family's canonical label.
const FAMILIES: [(&str, &[&str]); 4] = [
    ("Gold", &["gold", "золот"]),
    ("Silver", &["silver", "серебр"]),
    ("White", &["white", "бел"]),
    ("Black", &["black", "черн", "чёрн"]),
];

/// Finish qualifiers kept as sub-variants of a family entry.
const QUALIFIERS: [(&str, &[&str]); 2] = [
    ("Matte", &["matt", "матов"]),
    ("Glossy", &["glossy", "глянц"]),
];

/// Derives the facet set from `products`.
#[must_use]
pub fn extract(products: &[ProductRecord]) -> FacetSet {
    let mut colors = ColorBuckets::default();
    let mut shade_colors = ColorBuckets::default();
    let mut frame_colors = ColorBuckets::default();
    let mut materials = TextBucket::default();
    let mut socket_types = TextBucket::default();
    let mut lamp_counts = BTreeSet::new();

    for product in products {
        let attrs = &product.attributes;
        colors.add(attrs.color.as_deref());
        shade_colors.add(attrs.shade_color.as_deref());
        frame_colors.add(attrs.frame_color.as_deref());
        materials.add(attrs.material.as_deref());
        socket_types.add(attrs.socket_type.as_deref());
        if let Some(count) = attrs.lamp_count {
            lamp_counts.insert(count);
        }
    }

    FacetSet {
        colors: colors.into_facets(),
        materials: materials.into_sorted(),
        socket_types: socket_types.into_sorted(),
        lamp_counts: lamp_counts.into_iter().collect(),
        shade_colors: shade_colors.into_facets(),
        frame_colors: frame_colors.into_facets(),
    }
}

/// Canonical label -> observed qualifier sub-variants.
#[derive(Default)]
struct ColorBuckets(BTreeMap<String, BTreeSet<String>>);

impl ColorBuckets {
    fn add(&mut self, value: Option<&str>) {
        let Some(raw) = value else { return };
        let (label, qualifier) = classify_color(raw);
        let variants = self.0.entry(label).or_default();
        if let Some(qualifier) = qualifier {
            variants.insert(qualifier.to_owned());
        }
    }

    fn into_facets(self) -> Vec<ColorFacet> {
        self.0
            .into_iter()
            .map(|(label, variants)| ColorFacet {
                label,
                variants: variants.into_iter().collect(),
            })
            .collect()
    }
}

/// Case-insensitive dedup keeping the first observed spelling.
#[derive(Default)]
struct TextBucket(BTreeMap<String, String>);

impl TextBucket {
    fn add(&mut self, value: Option<&str>) {
        let Some(raw) = value else { return };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        self.0
            .entry(trimmed.to_lowercase())
            .or_insert_with(|| trimmed.to_owned());
    }

    fn into_sorted(self) -> Vec<String> {
        let mut values: Vec<String> = self.0.into_values().collect();
        values.sort();
        values
    }
}

/// Maps a raw color spelling to `(canonical label, qualifier)`.
///
/// Family spellings collapse to the family name; unrecognized colors are
/// title-cased and carry no qualifier.
fn classify_color(raw: &str) -> (String, Option<&'static str>) {
    let lower = raw.trim().to_lowercase();

    for (family, markers) in FAMILIES {
        if markers.iter().any(|m| lower.contains(m)) {
            let qualifier = QUALIFIERS
                .iter()
                .find(|(_, marks)| marks.iter().any(|m| lower.contains(m)))
                .map(|(name, _)| *name);
            return (family.to_owned(), qualifier);
        }
    }

    (title_case(&lower), None)
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lustra_core::ProductAttributes;

    fn product_with(attrs: ProductAttributes) -> ProductRecord {
        ProductRecord {
            id: "1".to_owned(),
            name: "Светильник".to_owned(),
            article_code: String::new(),
            brand: "KinkLight".to_owned(),
            category_label: "Бра".to_owned(),
            stock_count: 1,
            price: 1000.0,
            created_at: None,
            attributes: attrs,
        }
    }

    fn with_color(color: &str) -> ProductRecord {
        product_with(ProductAttributes {
            color: Some(color.to_owned()),
            ..ProductAttributes::default()
        })
    }

    #[test]
    fn gold_spellings_merge_into_one_entry() {
        let products = vec![
            with_color("Золотой"),
            with_color("gold matte"),
            with_color("ЗОЛОТО"),
        ];
        let facets = extract(&products);
        assert_eq!(facets.colors.len(), 1, "one merged entry, not three");
        assert_eq!(facets.colors[0].label, "Gold");
        assert_eq!(facets.colors[0].variants, vec!["Matte".to_owned()]);
    }

    #[test]
    fn families_and_unknown_colors_sort_together() {
        let products = vec![
            with_color("чёрный"),
            with_color("серебристый глянцевый"),
            with_color("синий"),
        ];
        let facets = extract(&products);
        let labels: Vec<&str> = facets.colors.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Black", "Silver", "Синий"]);
        let silver = &facets.colors[1];
        assert_eq!(silver.variants, vec!["Glossy".to_owned()]);
    }

    #[test]
    fn materials_dedupe_case_insensitively_keeping_first_spelling() {
        let products = vec![
            product_with(ProductAttributes {
                material: Some("Металл".to_owned()),
                ..ProductAttributes::default()
            }),
            product_with(ProductAttributes {
                material: Some("металл".to_owned()),
                ..ProductAttributes::default()
            }),
            product_with(ProductAttributes {
                material: Some("Стекло".to_owned()),
                ..ProductAttributes::default()
            }),
        ];
        let facets = extract(&products);
        assert_eq!(
            facets.materials,
            vec!["Металл".to_owned(), "Стекло".to_owned()]
        );
    }

    #[test]
    fn lamp_counts_sort_numerically() {
        let products = vec![
            product_with(ProductAttributes {
                lamp_count: Some(12),
                ..ProductAttributes::default()
            }),
            product_with(ProductAttributes {
                lamp_count: Some(1),
                ..ProductAttributes::default()
            }),
            product_with(ProductAttributes {
                lamp_count: Some(3),
                ..ProductAttributes::default()
            }),
        ];
        let facets = extract(&products);
        assert_eq!(facets.lamp_counts, vec![1, 3, 12]);
    }

    #[test]
    fn empty_set_yields_empty_facets() {
        assert_eq!(extract(&[]), FacetSet::default());
    }

    #[test]
    fn shade_and_frame_colors_use_the_same_normalization() {
        let products = vec![product_with(ProductAttributes {
            shade_color: Some("белый матовый".to_owned()),
            frame_color: Some("black".to_owned()),
            ..ProductAttributes::default()
        })];
        let facets = extract(&products);
        assert_eq!(facets.shade_colors[0].label, "White");
        assert_eq!(facets.shade_colors[0].variants, vec!["Matte".to_owned()]);
        assert_eq!(facets.frame_colors[0].label, "Black");
    }
}
