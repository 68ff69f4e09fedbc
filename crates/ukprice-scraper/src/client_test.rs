use super::*;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(base_url: &str) -> SourceConfig {
    SourceConfig {
        id: "cgars".to_string(),
        name: "C.Gars Ltd".to_string(),
        base_url: base_url.to_string(),
        min_price: None,
    }
}

fn client() -> SearchClient {
    SearchClient::new(5, "ukprice-test/0.1", 1, 0).expect("client builds")
}

const PRODUCTS_BODY: &str = r#"[
    {
        "id": 101,
        "name": "Cohiba Siglo VI Box of 25",
        "permalink": "https://example.co.uk/product/cohiba-siglo-vi",
        "prices": {"price": "87000", "currency_minor_unit": 2, "currency_code": "GBP"},
        "is_in_stock": true
    },
    {
        "id": 102,
        "name": "Cohiba Siglo VI Single",
        "prices": {"price": "3500", "currency_minor_unit": 2, "currency_code": "GBP"},
        "is_in_stock": false
    }
]"#;

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

#[test]
fn search_url_hits_store_api_from_origin() {
    let url = SearchClient::search_url("https://www.cgarsltd.co.uk/cigars/", "siglo", 50);
    assert_eq!(
        url,
        "https://www.cgarsltd.co.uk/wp-json/wc/store/v1/products?search=siglo&per_page=50"
    );
}

#[test]
fn search_url_encodes_term() {
    let url = SearchClient::search_url("https://example.co.uk", "siglo vi", 50);
    assert!(url.contains("search=siglo+vi"), "got: {url}");
}

#[test]
fn extract_store_origin_strips_path() {
    assert_eq!(
        extract_store_origin("https://www.cgarsltd.co.uk/cigars/cuban"),
        "https://www.cgarsltd.co.uk"
    );
}

#[test]
fn extract_store_origin_bare_domain() {
    assert_eq!(
        extract_store_origin("https://example.co.uk"),
        "https://example.co.uk"
    );
}

#[test]
fn extract_domain_strips_scheme_and_path() {
    assert_eq!(extract_domain("https://example.co.uk/shop"), "example.co.uk");
    assert_eq!(extract_domain("example.co.uk"), "example.co.uk");
}

// ---------------------------------------------------------------------------
// HTTP behavior
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_parses_product_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/store/v1/products"))
        .and(query_param("search", "siglo"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PRODUCTS_BODY, "application/json"))
        .mount(&server)
        .await;

    let products = client()
        .search(&source(&server.uri()), "siglo", 50)
        .await
        .expect("search succeeds");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Cohiba Siglo VI Box of 25");
    assert_eq!(products[0].prices.price, "87000");
    assert!(!products[1].is_in_stock);
    assert!(products[1].permalink.is_none());
}

#[tokio::test]
async fn search_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client()
        .search(&source(&server.uri()), "siglo", 50)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn search_retries_after_rate_limit() {
    let server = MockServer::start().await;
    // First request is rate limited, the retry succeeds.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PRODUCTS_BODY, "application/json"))
        .mount(&server)
        .await;

    let products = client()
        .search(&source(&server.uri()), "siglo", 50)
        .await
        .expect("retry succeeds");
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn search_maps_500_to_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client()
        .search(&source(&server.uri()), "siglo", 50)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 500, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn search_maps_bad_json_to_deserialize() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let err = client()
        .search(&source(&server.uri()), "siglo", 50)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::Deserialize { .. }),
        "got: {err:?}"
    );
}
