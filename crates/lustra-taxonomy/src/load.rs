//! Loading and validation of `config/catalog.yaml`.

use std::collections::HashSet;
use std::path::Path;

use crate::types::{CatalogFile, CategoryNode, Taxonomy};
use crate::TaxonomyError;

/// Load and validate the catalog taxonomy from a YAML file.
///
/// # Errors
///
/// Returns `TaxonomyError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy, TaxonomyError> {
    let content = std::fs::read_to_string(path).map_err(|e| TaxonomyError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: CatalogFile = serde_yaml::from_str(&content)?;
    build_taxonomy(file)
}

/// Validate a parsed catalog file and assemble the immutable [`Taxonomy`].
///
/// # Errors
///
/// Returns [`TaxonomyError::Validation`] on duplicate or empty identifiers,
/// slugs pointing at undeclared brands, or colliding category paths.
pub fn build_taxonomy(file: CatalogFile) -> Result<Taxonomy, TaxonomyError> {
    validate(&file)?;

    let keys = known_search_keys(&file);
    for key in &file.lighting_categories {
        if !keys.contains(&key.to_lowercase()) {
            tracing::warn!(search_key = %key, "lighting category is not declared by any brand");
        }
    }

    Ok(Taxonomy::assemble(
        file.brands,
        file.slugs,
        file.category_paths,
        file.excluded_brands,
        file.lighting_categories,
    ))
}

fn known_search_keys(file: &CatalogFile) -> HashSet<String> {
    let mut keys = HashSet::new();
    for brand in &file.brands {
        for node in &brand.categories {
            collect_search_keys(node, &mut keys);
        }
    }
    keys
}

fn collect_search_keys(node: &CategoryNode, keys: &mut HashSet<String>) {
    keys.insert(node.search_key.to_lowercase());
    for child in &node.children {
        collect_search_keys(child, keys);
    }
}

fn validate(file: &CatalogFile) -> Result<(), TaxonomyError> {
    if file.brands.is_empty() {
        return Err(TaxonomyError::Validation(
            "catalog declares no brands".to_owned(),
        ));
    }

    let mut seen_brands = HashSet::new();
    for brand in &file.brands {
        if brand.name.trim().is_empty() {
            return Err(TaxonomyError::Validation(
                "brand name must be non-empty".to_owned(),
            ));
        }
        if !seen_brands.insert(brand.name.to_lowercase()) {
            return Err(TaxonomyError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }

        // Every node reachable from a brand's taxonomy must carry a unique
        // (label, search_key) pair within that brand. Aliases may overlap.
        let mut seen_pairs = HashSet::new();
        for node in &brand.categories {
            validate_node(&brand.name, node, &mut seen_pairs)?;
        }
    }

    for (slug, target) in &file.slugs {
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(TaxonomyError::Validation(format!(
                "slug '{slug}' must be lowercase ASCII, digits, or dashes"
            )));
        }
        if !file
            .brands
            .iter()
            .any(|b| b.name.eq_ignore_ascii_case(target))
        {
            return Err(TaxonomyError::Validation(format!(
                "slug '{slug}' points at undeclared brand '{target}'"
            )));
        }
    }

    let keys = known_search_keys(file);
    let mut seen_paths = HashSet::new();
    for (key, path) in &file.category_paths {
        if !keys.contains(&key.to_lowercase()) {
            return Err(TaxonomyError::Validation(format!(
                "category path for unknown search key '{key}'"
            )));
        }
        if !seen_paths.insert(path.clone()) {
            return Err(TaxonomyError::Validation(format!(
                "duplicate category path '{path}'"
            )));
        }
    }

    Ok(())
}

fn validate_node(
    brand: &str,
    node: &CategoryNode,
    seen_pairs: &mut HashSet<(String, String)>,
) -> Result<(), TaxonomyError> {
    if node.label.trim().is_empty() || node.search_key.trim().is_empty() {
        return Err(TaxonomyError::Validation(format!(
            "brand '{brand}' has a category with an empty label or search key"
        )));
    }
    let pair = (node.label.to_lowercase(), node.search_key.to_lowercase());
    if !seen_pairs.insert(pair) {
        return Err(TaxonomyError::Validation(format!(
            "brand '{brand}' declares category ('{}', '{}') more than once",
            node.label, node.search_key
        )));
    }
    for child in &node.children {
        validate_node(brand, child, seen_pairs)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> CatalogFile {
        serde_yaml::from_str(yaml).expect("test yaml should parse")
    }

    const MINIMAL: &str = r"
brands:
  - name: KinkLight
    kind: lighting
    categories:
      - label: Люстра
        search_key: Люстра
        aliases: [люстры]
        children:
          - label: Подвесная люстра
            search_key: Подвесная люстра
slugs:
  kinklight: KinkLight
category_paths:
  Подвесная люстра: chandeliers/pendant-chandeliers
lighting_categories:
  - Люстра
";

    #[test]
    fn minimal_catalog_builds() {
        let taxonomy = build_taxonomy(parse(MINIMAL)).unwrap();
        assert_eq!(taxonomy.brands().len(), 1);
        assert_eq!(taxonomy.brand_for_slug("kinklight"), Some("KinkLight"));
        assert_eq!(
            taxonomy.category_for_path("chandeliers/pendant-chandeliers"),
            Some("Подвесная люстра")
        );
        assert!(taxonomy.is_lighting_category("люстра"));
    }

    #[test]
    fn rejects_duplicate_label_search_key_pair_within_brand() {
        let yaml = r"
brands:
  - name: A
    kind: lighting
    categories:
      - label: Бра
        search_key: Бра
      - label: бра
        search_key: бра
";
        let err = build_taxonomy(parse(yaml)).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn allows_same_category_across_brands() {
        let yaml = r"
brands:
  - name: A
    kind: lighting
    categories:
      - label: Бра
        search_key: Бра
  - name: B
    kind: lighting
    categories:
      - label: Бра
        search_key: Бра
";
        assert!(build_taxonomy(parse(yaml)).is_ok());
    }

    #[test]
    fn rejects_slug_for_undeclared_brand() {
        let yaml = r"
brands:
  - name: A
    kind: lighting
    categories:
      - label: Бра
        search_key: Бра
slugs:
  ghost: Ghost
";
        let err = build_taxonomy(parse(yaml)).unwrap_err();
        assert!(err.to_string().contains("undeclared brand"));
    }

    #[test]
    fn rejects_path_for_unknown_search_key() {
        let yaml = r"
brands:
  - name: A
    kind: lighting
    categories:
      - label: Бра
        search_key: Бра
category_paths:
  Торшер: floor-lamps
";
        let err = build_taxonomy(parse(yaml)).unwrap_err();
        assert!(err.to_string().contains("unknown search key"));
    }

    #[test]
    fn rejects_colliding_paths() {
        let yaml = r"
brands:
  - name: A
    kind: lighting
    categories:
      - label: Бра
        search_key: Бра
      - label: Торшер
        search_key: Торшер
category_paths:
  Бра: lamps
  Торшер: lamps
";
        let err = build_taxonomy(parse(yaml)).unwrap_err();
        assert!(err.to_string().contains("duplicate category path"));
    }

    #[test]
    fn rejects_uppercase_slug() {
        let yaml = r"
brands:
  - name: A
    kind: lighting
    categories:
      - label: Бра
        search_key: Бра
slugs:
  KinkLight: A
";
        let err = build_taxonomy(parse(yaml)).unwrap_err();
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn load_taxonomy_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("catalog.yaml");
        assert!(
            path.exists(),
            "catalog.yaml missing at {path:?} — required for this test"
        );
        let taxonomy = load_taxonomy(&path).expect("catalog.yaml should load");
        assert!(taxonomy.brands().len() >= 2);
        assert!(!taxonomy.all_brands().categories.is_empty());
    }
}
