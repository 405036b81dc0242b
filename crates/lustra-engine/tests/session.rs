//! End-to-end tests for `CatalogSession` against a wiremock upstream.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lustra_core::{AppConfig, Availability};
use lustra_engine::{CatalogSession, LoadNotice, NavigationIntent};
use lustra_taxonomy::load::build_taxonomy;
use lustra_taxonomy::Taxonomy;

fn taxonomy() -> Arc<Taxonomy> {
    let yaml = r"
brands:
  - name: KinkLight
    kind: lighting
    categories:
      - label: Люстра
        search_key: Люстра
        aliases: [люстры, chandeliers]
        children:
          - label: Подвесная люстра
            search_key: Подвесная люстра
            aliases: [подвесные люстры]
          - label: Потолочная люстра
            search_key: Потолочная люстра
      - label: Бра
        search_key: Бра
        aliases: [sconce]
  - name: Favourite
    kind: lighting
    categories:
      - label: Торшер
        search_key: Торшер
slugs:
  kinklight: KinkLight
  favourite: Favourite
category_paths:
  Люстра: chandeliers
  Подвесная люстра: chandeliers/pendant-chandeliers
  Потолочная люстра: chandeliers/ceiling-chandeliers
  Бра: sconces
excluded_brands:
  - NoBrand
lighting_categories:
  - Люстра
  - Подвесная люстра
  - Бра
";
    Arc::new(
        build_taxonomy(serde_yaml::from_str(yaml).expect("test yaml should parse"))
            .expect("test taxonomy should validate"),
    )
}

fn config(base_url: &str) -> AppConfig {
    AppConfig {
        upstream_base_url: base_url.to_owned(),
        catalog_path: "./config/catalog.yaml".into(),
        log_level: "info".to_owned(),
        user_agent: "lustra/0.1 (test)".to_owned(),
        request_timeout_secs: 5,
        timeout_max_retries: 0,
        timeout_retry_delay_ms: 0,
        buffer_page_size: 2000,
        buffer_max_fetches: 3,
        default_page_size: 40,
    }
}

fn session(base_url: &str) -> CatalogSession {
    CatalogSession::from_config(&config(base_url), taxonomy())
        .expect("session construction should not fail")
}

fn product_json(id: u32, stock: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Светильник {id}"),
        "articleCode": format!("A-{id}"),
        "brand": "KinkLight",
        "category": "Подвесная люстра",
        "stock": stock,
        "price": 1000 + id,
        "color": "золотой"
    })
}

fn page_body(products: Vec<serde_json::Value>, total_pages: u32) -> serde_json::Value {
    let total = products.len();
    serde_json::json!({
        "products": products,
        "totalPages": total_pages,
        "totalProducts": total
    })
}

#[tokio::test]
async fn chandelier_address_resolves_to_first_child_and_canonical_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/KinkLight"))
        .and(query_param("name", "Подвесная люстра"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(vec![product_json(1, 3)], 1)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let view = session
        .navigate_address("/catalog/kinklight/chandeliers")
        .await
        .expect("navigation should commit");

    assert_eq!(
        view.query.category.as_ref().unwrap().search_key,
        "Подвесная люстра"
    );
    assert_eq!(view.url, "/catalog/kinklight/chandeliers/pendant-chandeliers");
    assert_eq!(view.products.len(), 1);
}

#[tokio::test]
async fn out_of_stock_pages_partition_the_filtered_set() {
    let server = MockServer::start().await;
    // 100 products in the category, 45 of them out of stock. Buffered mode
    // must request the enlarged page size, not the client page size.
    let products: Vec<serde_json::Value> = (0..100)
        .map(|i| product_json(i, if i < 45 { 0 } else { 2 }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/products/KinkLight"))
        .and(query_param("limit", "2000"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(products, 1)))
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let base = NavigationIntent {
        brand: Some("KinkLight".to_owned()),
        category: Some("Подвесная люстра".to_owned()),
        availability: Some(Availability::OutOfStock),
        ..NavigationIntent::default()
    };

    let page1 = session.navigate(base.clone()).await.unwrap();
    assert_eq!(page1.total_products, 45);
    assert_eq!(page1.total_pages, 2);
    assert_eq!(page1.products.len(), 40);

    let page2 = session
        .navigate(NavigationIntent {
            page: Some(2),
            ..base
        })
        .await
        .unwrap();
    assert_eq!(page2.products.len(), 5);

    let mut ids: Vec<String> = page1
        .products
        .iter()
        .chain(&page2.products)
        .map(|p| p.id.clone())
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total, "no product may repeat across pages");
    assert!(page1.products.iter().all(|p| p.stock_count <= 0));
}

#[tokio::test]
async fn the_last_navigation_always_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/KinkLight"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![product_json(1, 1)], 1))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/Favourite"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(vec![product_json(2, 1)], 1)),
        )
        .mount(&server)
        .await;

    let session = Arc::new(session(&server.uri()));

    let slow = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            session
                .navigate(NavigationIntent {
                    brand: Some("KinkLight".to_owned()),
                    ..NavigationIntent::default()
                })
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    let fast = session
        .navigate(NavigationIntent {
            brand: Some("Favourite".to_owned()),
            ..NavigationIntent::default()
        })
        .await;

    let slow = slow.await.expect("task should not panic");
    assert!(slow.is_none(), "superseded navigation must be discarded");
    let fast = fast.expect("latest navigation must commit");
    assert_eq!(fast.query.brand.as_deref(), Some("Favourite"));
    assert_eq!(session.current().brand.as_deref(), Some("Favourite"));
}

#[tokio::test]
async fn identical_navigations_return_identical_ordered_results() {
    let server = MockServer::start().await;
    let products: Vec<serde_json::Value> = (0..10).map(|i| product_json(i, 1)).collect();
    Mock::given(method("GET"))
        .and(path("/products/KinkLight"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(products, 1)))
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let intent = || NavigationIntent {
        brand: Some("KinkLight".to_owned()),
        category: Some("Бра".to_owned()),
        ..NavigationIntent::default()
    };

    let first = session.navigate(intent()).await.unwrap();
    let second = session.navigate(intent()).await.unwrap();

    let ids = |view: &lustra_engine::CatalogView| {
        view.products.iter().map(|p| p.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.url, second.url);
}

#[tokio::test]
async fn first_page_failure_renders_the_empty_state_with_a_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let view = session
        .navigate(NavigationIntent {
            brand: Some("KinkLight".to_owned()),
            category: Some("Бра".to_owned()),
            ..NavigationIntent::default()
        })
        .await
        .expect("failed fetches still commit an empty view");

    assert!(view.products.is_empty());
    assert_eq!(view.total_products, 0);
    assert_eq!(view.notice, Some(LoadNotice::Failed));
}

#[tokio::test]
async fn excluded_brands_are_dropped_even_when_upstream_returns_them() {
    let server = MockServer::start().await;
    let mut sneaky = product_json(7, 1);
    sneaky["brand"] = serde_json::json!("NoBrand");
    Mock::given(method("GET"))
        .and(path("/products/KinkLight"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![product_json(1, 1), sneaky], 1)),
        )
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let view = session
        .navigate(NavigationIntent {
            brand: Some("KinkLight".to_owned()),
            category: Some("Бра".to_owned()),
            ..NavigationIntent::default()
        })
        .await
        .unwrap();

    assert_eq!(view.products.len(), 1);
    assert!(view.products.iter().all(|p| p.brand != "NoBrand"));
}

#[tokio::test]
async fn facets_reflect_only_the_visible_result_set() {
    let server = MockServer::start().await;
    let mut golden = product_json(1, 1);
    golden["color"] = serde_json::json!("ЗОЛОТО");
    let mut matte = product_json(2, 1);
    matte["color"] = serde_json::json!("gold matte");
    Mock::given(method("GET"))
        .and(path("/products/KinkLight"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![golden, matte], 1)))
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let view = session
        .navigate(NavigationIntent {
            brand: Some("KinkLight".to_owned()),
            category: Some("Бра".to_owned()),
            ..NavigationIntent::default()
        })
        .await
        .unwrap();

    assert_eq!(view.facets.colors.len(), 1);
    assert_eq!(view.facets.colors[0].label, "Gold");
    assert_eq!(view.facets.colors[0].variants, vec!["Matte".to_owned()]);
}
