#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use showroom_api::{ApiClient, ContactDraft, Credentials, Error, InventorySearch, SalesWindow};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn vehicle_json(id: &str, make: &str, model: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "make": make,
        "model": model,
        "year": 2022,
        "price": 250_000_000,
        "odometer": 12_000,
        "condition": "Used",
        "status": "Available",
        "bodyType": "MPV",
        "assembly": "CKD",
        "fuelType": "Gasoline",
        "transmission": "Automatic"
    })
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "owner@dealer.id", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u1",
            "name": "Owner",
            "email": "owner@dealer.id",
            "verified": true
        })))
        .mount(&server)
        .await;

    let user = client
        .login(&Credentials {
            email: "owner@dealer.id".into(),
            password: "hunter2".to_string().into(),
        })
        .await
        .unwrap();

    assert_eq!(user.id, "u1");
    assert!(user.verified);
}

#[tokio::test]
async fn test_login_rejected_carries_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid password" })),
        )
        .mount(&server)
        .await;

    let result = client
        .login(&Credentials {
            email: "owner@dealer.id".into(),
            password: "wrong".to_string().into(),
        })
        .await;

    match result {
        Err(err @ Error::Api { status: 400, .. }) => {
            assert_eq!(err.server_message(), Some("Invalid password"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_accepts_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

// ── Vehicles ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_vehicles() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            vehicle_json("v1", "Toyota", "Avanza"),
            vehicle_json("v2", "Honda", "Civic"),
        ])))
        .mount(&server)
        .await;

    let vehicles = client.list_vehicles(&CancellationToken::new()).await.unwrap();

    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0].make, "Toyota");
    assert_eq!(vehicles[1].model, "Civic");
}

#[tokio::test]
async fn test_list_vehicles_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicle"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_vehicles(&CancellationToken::new()).await;
    assert!(
        matches!(result, Err(Error::Unauthorized)),
        "expected Unauthorized, got: {result:?}"
    );
}

#[tokio::test]
async fn test_search_vehicles_posts_serialized_query() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/vehicle/search"))
        .and(body_partial_json(json!({
            "search": "avanza",
            "makes": ["Toyota"],
            "priceRange": [100, 200]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([vehicle_json("v1", "Toyota", "Avanza")])),
        )
        .mount(&server)
        .await;

    let query = InventorySearch {
        search: "avanza".into(),
        makes: vec!["Toyota".into()],
        price_range: [100, 200],
        ..InventorySearch::default()
    };

    let vehicles = client
        .search_vehicles(&query, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(vehicles.len(), 1);
}

#[tokio::test]
async fn test_vehicle_sales_window_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/vehicle/sales"))
        .and(body_partial_json(json!({
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-03-01T00:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let window = SalesWindow {
        start_date: "2026-01-01T00:00:00Z".parse().unwrap(),
        end_date: "2026-03-01T00:00:00Z".parse().unwrap(),
    };
    let sold = client
        .vehicle_sales(&window, &CancellationToken::new())
        .await
        .unwrap();
    assert!(sold.is_empty());
}

// ── Cancellation ────────────────────────────────────────────────────

#[tokio::test]
async fn test_cancelled_request_resolves_with_cancelled() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicle"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = client.list_vehicles(&cancel).await;
    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_already_cancelled_token_skips_request() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/contact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = client.list_contacts(&cancel).await;
    assert!(matches!(result, Err(Error::Cancelled)));
}

// ── Contacts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_contacts() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/contact/search"))
        .and(body_json(json!({ "search": "budi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "c1", "name": "Budi", "mobile": "081234567890" }
        ])))
        .mount(&server)
        .await;

    let contacts = client
        .search_contacts("budi", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Budi");
    assert!(contacts[0].email.is_none());
}

#[tokio::test]
async fn test_add_contact() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/contact/add"))
        .and(body_partial_json(json!({ "name": "Sari", "mobile": "081298765432" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "c7", "name": "Sari", "mobile": "081298765432"
        })))
        .mount(&server)
        .await;

    let contact = client
        .add_contact(&ContactDraft {
            name: "Sari".into(),
            mobile: "081298765432".into(),
            ..ContactDraft::default()
        })
        .await
        .unwrap();
    assert_eq!(contact.id, "c7");
}

#[tokio::test]
async fn test_delete_contacts_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/contact/delete"))
        .and(body_json(json!({ "contactIds": ["c1", "c2"] })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Some contacts are buyers of vehicles",
            "associatedBuyerIds": ["c1"],
            "associatedVehicleIds": ["v3", "v4"]
        })))
        .mount(&server)
        .await;

    let result = client.delete_contacts(&["c1".into(), "c2".into()]).await;

    match result {
        Err(Error::Conflict(conflict)) => {
            assert_eq!(conflict.associated_buyer_ids, vec!["c1"]);
            assert_eq!(conflict.associated_vehicle_ids, vec!["v3", "v4"]);
        }
        other => panic!("expected Conflict, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_without_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/contact"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = client
        .list_contacts(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, message: None }));
    assert!(err.is_transient());
}
