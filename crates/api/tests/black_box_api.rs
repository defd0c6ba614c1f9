use std::str::FromStr;

use detailpro_api::config::ApiConfig;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(ApiConfig::default()).await
    }

    async fn spawn_with(config: ApiConfig) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = detailpro_api::app::build_app(&config).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn decimal(value: &serde_json::Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

async fn movements_eventually(
    client: &reqwest::Client,
    srv: &TestServer,
    id: u64,
    expected: usize,
) -> serde_json::Value {
    // The journal is fed by a background subscriber; poll until it catches up.
    for _ in 0..50 {
        let res = client
            .get(srv.url(&format!("/api/inventory/items/{id}/movements")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = res.json().await.unwrap();
        if body["movements"].as_array().unwrap().len() >= expected {
            return body;
        }

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    panic!("movement journal did not catch up within timeout");
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn seeded_catalog_is_listed_in_order_with_derived_statuses() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/inventory/items")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let items: serde_json::Value = res.json().await.unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 6);

    let ids: Vec<u64> = items.iter().map(|i| i["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    let statuses: Vec<&str> = items.iter().map(|i| i["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, vec!["Good", "Low", "Good", "Low", "Good", "Critical"]);

    assert_eq!(items[0]["name"], "Ceramic Coating 9H");
    assert_eq!(decimal(&items[0]["value"]), Decimal::from(52_500));
}

#[tokio::test]
async fn unseeded_store_starts_empty() {
    let srv = TestServer::spawn_with(ApiConfig {
        seed_catalog: false,
        ..ApiConfig::default()
    })
    .await;
    let client = reqwest::Client::new();

    let items: serde_json::Value = client
        .get(srv.url("/api/inventory/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items, json!([]));

    // First item in an empty store gets id 1.
    let res = client
        .post(srv.url("/api/inventory/items"))
        .json(&json!({ "name": "Clay Bar", "category": "Detailing", "stock": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["id"], 1);
}

#[tokio::test]
async fn create_item_applies_defaults_and_appends() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/inventory/items"))
        .json(&json!({
            "name": "Foam Cannon Soap",
            "category": "Supplies",
            "stock": 3,
            "price": 800,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["id"], 7);
    assert_eq!(created["unit"], "pcs");
    assert_eq!(created["reorder_level"], 10);
    assert_eq!(created["stock_in"], 0);
    assert_eq!(created["stock_out"], 0);
    assert_eq!(created["status"], "Critical");
    assert_eq!(created["version"], 1);
    assert_eq!(decimal(&created["price"]), Decimal::from(800));

    let res = client.get(srv.url("/api/inventory/items/7")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_item_rejects_missing_or_invalid_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for body in [
        json!({ "category": "Supplies", "stock": 3 }),
        json!({ "name": "Wax", "stock": 3 }),
        json!({ "name": "Wax", "category": "Supplies" }),
        json!({ "name": "Wax", "category": "Supplies", "stock": -1 }),
        json!({ "name": "Wax", "category": "Supplies", "stock": 1, "price": -5 }),
        json!({ "name": "Wax", "category": "Supplies", "stock": "lots" }),
    ] {
        let res = client
            .post(srv.url("/api/inventory/items"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: serde_json::Value = res.json().await.unwrap();
        assert_eq!(err["error"], "invalid_input");
    }

    // Nothing was appended.
    let items: serde_json::Value = client
        .get(srv.url("/api/inventory/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn reorder_restocks_and_reclassifies() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Polishing Compound: stock 8, reorder level 15 -> Low.
    let res = client
        .post(srv.url("/api/inventory/items/4/reorder"))
        .json(&json!({ "quantity": 20, "expected_delivery": "2026-11-02" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["stock"], 28);
    assert_eq!(item["stock_in"], 40);
    assert_eq!(item["status"], "Good");
    assert_eq!(item["expected_delivery"], "2026-11-02");
    assert_eq!(item["version"], 2);

    let body = movements_eventually(&client, &srv, 4, 2).await;
    let last = body["movements"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["kind"], "reordered");
    assert_eq!(last["quantity"], 20);
    assert_eq!(last["stock_after"], 28);
}

#[tokio::test]
async fn reorder_requires_positive_quantity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for body in [json!({ "quantity": 0 }), json!({ "quantity": -3 }), json!({})] {
        let res = client
            .post(srv.url("/api/inventory/items/4/reorder"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    let item: serde_json::Value = client
        .get(srv.url("/api/inventory/items/4"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item["stock"], 8);
    assert_eq!(item["version"], 1);
}

#[tokio::test]
async fn deducting_more_than_on_hand_is_rejected_without_change() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Tire Shine: stock 2, reorder level 10 -> Critical.
    let res = client
        .post(srv.url("/api/inventory/items/6/adjust"))
        .json(&json!({ "amount": 5, "direction": "deduct" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "insufficient_stock");

    let item: serde_json::Value = client
        .get(srv.url("/api/inventory/items/6"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item["stock"], 2);
    assert_eq!(item["stock_out"], 10);
    assert_eq!(item["status"], "Critical");
}

#[tokio::test]
async fn adjust_add_and_deduct_update_counters() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Direction defaults to add.
    let res = client
        .post(srv.url("/api/inventory/items/2/adjust"))
        .json(&json!({ "amount": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["stock"], 7);
    assert_eq!(item["stock_in"], 12);
    assert_eq!(item["status"], "Good");

    let res = client
        .post(srv.url("/api/inventory/items/2/adjust"))
        .json(&json!({ "amount": 6, "direction": "deduct" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["stock"], 1);
    assert_eq!(item["stock_out"], 11);
    assert_eq!(item["status"], "Critical");

    let res = client
        .post(srv.url("/api/inventory/items/2/adjust"))
        .json(&json!({ "amount": 1, "direction": "sideways" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = movements_eventually(&client, &srv, 2, 3).await;
    let kinds: Vec<&str> = body["movements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["received", "added", "deducted"]);
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/inventory/items/99")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "not_found");

    let res = client
        .post(srv.url("/api/inventory/items/99/reorder"))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(srv.url("/api/inventory/items/99/movements"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(srv.url("/api/inventory/items/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "invalid_id");
}

#[tokio::test]
async fn summary_low_stock_and_report() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let summary: serde_json::Value = client
        .get(srv.url("/api/inventory/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["total_items"], 6);
    assert_eq!(summary["low_stock_items"], 3);
    assert_eq!(summary["total_stock_in"], 135);
    assert_eq!(summary["total_stock_out"], 50);
    assert_eq!(decimal(&summary["total_value"]), Decimal::from(204_750));

    let low: serde_json::Value = client
        .get(srv.url("/api/inventory/low-stock"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = low
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["PPF Roll - Clear", "Polishing Compound", "Tire Shine"]);

    let report: serde_json::Value = client
        .get(srv.url("/api/inventory/report"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["lines"].as_array().unwrap().len(), 6);
    assert_eq!(report["summary"], summary);

    let res = client
        .get(srv.url("/api/inventory/report?format=text"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let text = res.text().await.unwrap();
    assert!(text.starts_with("Inventory Report"));
    assert!(text.contains("Tire Shine"));

    let res = client
        .get(srv.url("/api/inventory/report?format=pdf"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mock_login_and_register() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "username": "admin", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid username or password");

    let res = client
        .post(srv.url("/api/auth/register"))
        .json(&json!({ "username": "detailer", "password": "shine" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(srv.url("/api/auth/register"))
        .json(&json!({ "username": "detailer", "password": "again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Username already exists");

    let res = client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "username": "detailer", "password": "shine" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(srv.url("/api/auth/register"))
        .json(&json!({ "username": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oauth_mocks_redirect_to_dashboard() {
    let srv = TestServer::spawn_with(ApiConfig {
        dashboard_url: "http://shop.test/dashboard".to_string(),
        ..ApiConfig::default()
    })
    .await;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    for provider in ["google", "facebook"] {
        let res = client
            .get(srv.url(&format!("/api/auth/{provider}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()[reqwest::header::LOCATION],
            "http://shop.test/dashboard"
        );
    }
}
