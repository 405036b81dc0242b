use super::*;
use crate::load::build_taxonomy;

fn taxonomy() -> Taxonomy {
    let yaml = r"
brands:
  - name: KinkLight
    kind: lighting
    categories:
      - label: Люстра
        search_key: Люстра
        aliases: [люстры, chandelier, chandeliers]
        children:
          - label: Подвесная люстра
            search_key: Подвесная люстра
            aliases: [подвесные люстры, pendant chandelier]
          - label: Потолочная люстра
            search_key: Потолочная люстра
            aliases: [потолочные люстры]
      - label: Бра
        search_key: Бра
        aliases: [настенный светильник, sconce]
      - label: Трековый светильник
        search_key: Трековый светильник
        aliases: [трек, track light]
  - name: Favourite
    kind: lighting
    categories:
      - label: Люстра
        search_key: Люстра
        aliases: [люстры]
      - label: Торшер
        search_key: Торшер
        aliases: [floor lamp, светильник]
  - name: Werkel
    kind: electrical
    categories:
      - label: Розетка
        search_key: Розетка
        aliases: [socket]
";
    build_taxonomy(serde_yaml::from_str(yaml).expect("test yaml should parse"))
        .expect("test taxonomy should validate")
}

#[test]
fn exact_label_match_is_case_insensitive() {
    let t = taxonomy();
    let hit = resolve(&t, "бра", None).expect("label should resolve");
    assert_eq!(hit.node.search_key, "Бра");
    assert!(!hit.redirected);
}

#[test]
fn alias_resolves_to_same_node_as_label_in_any_case() {
    let t = taxonomy();
    let by_label = resolve(&t, "Бра", None).unwrap();
    for spelling in ["sconce", "SCONCE", "Настенный Светильник"] {
        let by_alias = resolve(&t, spelling, None).unwrap();
        assert_eq!(by_alias.node, by_label.node, "alias '{spelling}'");
    }
}

#[test]
fn parent_with_children_redirects_to_first_child() {
    let t = taxonomy();
    let hit = resolve(&t, "Люстра", None).expect("parent should resolve");
    assert_eq!(hit.node.search_key, "Подвесная люстра");
    assert!(hit.redirected);
}

#[test]
fn alias_of_parent_also_redirects() {
    let t = taxonomy();
    let hit = resolve(&t, "chandeliers", None).unwrap();
    assert_eq!(hit.node.search_key, "Подвесная люстра");
    assert!(hit.redirected);
}

#[test]
fn alias_exact_beats_alias_substring_across_brands() {
    // "светильник" is an exact alias of Favourite's Торшер and a substring of
    // KinkLight's "настенный светильник" alias. Strategies are ordered across
    // all brands, so the exact alias in the later brand must win.
    let t = taxonomy();
    let hit = resolve(&t, "светильник", None).unwrap();
    assert_eq!(hit.brand, "Favourite");
    assert_eq!(hit.node.search_key, "Торшер");
}

#[test]
fn substring_match_when_input_contains_alias() {
    let t = taxonomy();
    let hit = resolve(&t, "недорогие подвесные люстры для кухни", None).unwrap();
    assert_eq!(hit.node.search_key, "Подвесная люстра");
}

#[test]
fn substring_match_when_alias_contains_input() {
    let t = taxonomy();
    let hit = resolve(&t, "track", None).unwrap();
    assert_eq!(hit.node.search_key, "Трековый светильник");
}

#[test]
fn brand_hint_promotes_that_brand() {
    let t = taxonomy();
    let unhinted = resolve(&t, "Люстра", None).unwrap();
    assert_eq!(unhinted.brand, "KinkLight");

    let hinted = resolve(&t, "Люстра", Some("Favourite")).unwrap();
    assert_eq!(hinted.brand, "Favourite");
    // Favourite's chandelier node has no children, so no redirect happens.
    assert!(!hinted.redirected);
}

#[test]
fn brand_hint_does_not_restrict_the_scan() {
    let t = taxonomy();
    let hit = resolve(&t, "Розетка", Some("KinkLight")).unwrap();
    assert_eq!(hit.brand, "Werkel");
}

#[test]
fn miss_returns_none() {
    let t = taxonomy();
    assert!(resolve(&t, "граммофон", None).is_none());
    assert!(resolve(&t, "   ", None).is_none());
}
