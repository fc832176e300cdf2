mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestFixture;
use servicedesk_core::{Config, CorsConfig, TicketStatus};

#[tokio::test]
async fn test_health_and_config() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");

    let response = fixture.get("/api/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["dispatcher"]["attendant_capacity"], 3);
    assert_eq!(response.body["dispatcher"]["attendants"][1]["type"], "LOAN");
}

#[tokio::test]
async fn test_create_service_response_shape() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/services",
            json!({
                "type": "CARD",
                "description": "Card blocked",
                "customerId": "1"
            }),
        )
        .await;

    assert_status!(response, StatusCode::CREATED);
    let body = response.body;
    assert_eq!(body["id"], 1);
    assert_eq!(body["type"], "CARD");
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["description"], "Card blocked");
    assert_eq!(body["customerId"], "1");
    assert_eq!(body["attendantId"], 1);
    assert!(body["createdAt"].is_string());
    assert!(body["startDate"].is_string());
    assert!(body["endDate"].is_null());
}

#[tokio::test]
async fn test_create_service_validation() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/services",
            json!({ "type": "MORTGAGE", "description": "x", "customerId": "1" }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid type");

    let response = fixture
        .post(
            "/api/services",
            json!({ "type": "LOAN", "description": "   ", "customerId": "1" }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Description is required");

    let response = fixture
        .post(
            "/api/services",
            json!({ "type": "LOAN", "description": "Simulation" }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Customer ID is required");

    let response = fixture.post_raw("/api/services", "{not json").await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    // Nothing reached the dispatcher.
    assert!(fixture.dispatcher.list().is_empty());
}

#[tokio::test]
async fn test_fourth_card_is_queued_and_promoted_on_resolve() {
    let fixture = TestFixture::new();

    for _ in 0..3 {
        let body = fixture.create_service("CARD").await;
        assert_eq!(body["status"], "ACTIVE");
    }
    let queued = fixture.create_service("CARD").await;
    assert_eq!(queued["status"], "QUEUED");
    assert!(queued["startDate"].is_null());

    let attendants = fixture.get("/api/attendants").await;
    assert_eq!(attendants.body[0]["attendantId"], 1);
    assert_eq!(attendants.body[0]["active"], 3);
    assert_eq!(attendants.body[0]["capacity"], 3);

    let next = fixture.patch_empty("/api/services/next/CARD").await;
    assert_status!(next, StatusCode::OK);
    assert_eq!(next.body["id"], 4);

    let resolved = fixture
        .patch("/api/services/2", json!({ "status": "RESOLVED" }))
        .await;
    assert_status!(resolved, StatusCode::OK);
    assert_eq!(resolved.body["status"], "RESOLVED");
    assert!(resolved.body["endDate"].is_string());

    let active = fixture.get("/api/services/ACTIVE/CARD").await;
    let ids: Vec<u64> = active
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3, 1]);

    let promoted = &active.body[0];
    assert!(promoted["startDate"].is_string());

    let next = fixture.patch_empty("/api/services/next/CARD").await;
    assert_status!(next, StatusCode::OK);
    assert!(next.body["message"].is_string());
}

#[tokio::test]
async fn test_assign_to_full_attendant_is_rejected() {
    let fixture = TestFixture::new();
    for _ in 0..4 {
        fixture.create_service("CARD").await;
    }
    let fifth = fixture.create_service("CARD").await;

    let response = fixture
        .patch(
            "/api/services/5",
            json!({ "status": "ACTIVE", "attendantId": 1 }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    let message = response.body["error"].as_str().unwrap();
    assert!(message.contains("Attendant 1"), "{}", message);

    let ticket = fixture.dispatcher.get(5).unwrap();
    assert_eq!(ticket.status, TicketStatus::Queued);
    assert_eq!(serde_json::to_value(&ticket).unwrap(), fifth);
}

#[tokio::test]
async fn test_update_description_at_capacity() {
    let fixture = TestFixture::new();
    for _ in 0..3 {
        fixture.create_service("OTHER").await;
    }

    let response = fixture
        .patch("/api/services/1", json!({ "description": "Called back" }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["description"], "Called back");
    assert_eq!(response.body["status"], "ACTIVE");

    let attendants = fixture.get("/api/attendants").await;
    assert_eq!(attendants.body[2]["active"], 3);
}

#[tokio::test]
async fn test_update_errors() {
    let fixture = TestFixture::new();
    fixture.create_service("LOAN").await;

    let response = fixture
        .patch("/api/services/42", json!({ "status": "RESOLVED" }))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let response = fixture
        .patch("/api/services/abc", json!({ "status": "RESOLVED" }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid ID");

    let response = fixture
        .patch("/api/services/1", json!({ "status": "DONE" }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid status");

    let response = fixture
        .patch("/api/services/1", json!({ "attendantId": 8 }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    // Legacy status names are still understood.
    let response = fixture
        .patch("/api/services/1", json!({ "status": "RESOLVED" }))
        .await;
    assert_status!(response, StatusCode::OK);
    let response = fixture
        .patch("/api/services/1", json!({ "status": "IN_PROGRESS" }))
        .await;
    assert_status!(response, StatusCode::CONFLICT);

    // An empty PATCH is a no-op.
    let response = fixture.patch_empty("/api/services/1").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "RESOLVED");
}

#[tokio::test]
async fn test_list_filters_and_order() {
    let fixture = TestFixture::new();
    for service_type in ["CARD", "LOAN", "OTHER", "LOAN"] {
        fixture.create_service(service_type).await;
    }

    let all = fixture.get("/api/services").await;
    assert_status!(all, StatusCode::OK);
    let ids: Vec<u64> = all
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);

    let active = fixture.get("/api/services/ACTIVE").await;
    assert_eq!(active.body.as_array().unwrap().len(), 4);

    let legacy = fixture.get("/api/services/IN_PROGRESS/LOAN").await;
    assert_status!(legacy, StatusCode::OK);
    assert_eq!(legacy.body.as_array().unwrap().len(), 2);

    let queued = fixture.get("/api/services/QUEUED").await;
    assert!(queued.body.as_array().unwrap().is_empty());

    let response = fixture.get("/api/services/WAITING").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid status");

    let response = fixture.get("/api/services/ACTIVE/MORTGAGE").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid type");

    let response = fixture.patch_empty("/api/services/next/MORTGAGE").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.create_service("CARD").await;

    let response = fixture.get("/api/metrics").await;
    assert_status!(response, StatusCode::OK);
    let text = response.body.as_str().unwrap();
    assert!(text.contains("servicedesk_tickets_by_status"));
    assert!(text.contains("servicedesk_tickets_created_total"));
}

#[tokio::test]
async fn test_cors_headers_when_configured() {
    let config = Config {
        cors: CorsConfig {
            allowed_origins: vec!["http://a.test".to_string()],
        },
        ..Config::default()
    };
    let fixture = TestFixture::with_config(config);

    let response = fixture.get_with_origin("/api/health", "http://a.test").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response
            .headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://a.test")
    );

    let response = fixture
        .get_with_origin("/api/health", "http://other.test")
        .await;
    assert!(response.headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_no_cors_headers_by_default() {
    let fixture = TestFixture::new();

    let response = fixture.get_with_origin("/api/health", "http://a.test").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.headers.get("access-control-allow-origin").is_none());
}
