//! End-to-end API tests against the in-process router.

mod common;

use axum::http::StatusCode;
use common::{ticket_payload, TestConfig, TestFixture, TEST_TOKEN};
use serde_json::json;

// ============================================================================
// Health / config / metrics
// ============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "status", "ok");
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::with_config(TestConfig::with_token_auth()).await;

    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["auth"]["method"], "token");
    assert_eq!(response.body["auth"]["tokens_configured"], 1);
    assert!(!response.body.to_string().contains(TEST_TOKEN));
    assert_eq!(response.body["tickets"]["per_page"], 3);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    fixture.seed_ticket(user_id, 2, "open").await;

    let response = fixture.get("/api/v1/metrics").await;
    assert_status!(response, StatusCode::OK);
    let text = response.body.as_str().expect("metrics should be text");
    assert!(text.contains("helpdesk_tickets_created_total"));
    assert!(text.contains("helpdesk_tickets_by_status"));
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_token_auth_protects_api() {
    let fixture = TestFixture::with_config(TestConfig::with_token_auth()).await;

    let response = fixture.get_with_token("/api/v1/tickets", None).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = fixture.get_with_token("/api/v1/tickets", Some("wrong")).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = fixture
        .get_with_token("/api/v1/tickets", Some(TEST_TOKEN))
        .await;
    assert_status!(response, StatusCode::OK);

    // Health stays public
    let response = fixture.get_with_token("/api/v1/health", None).await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_current_user() {
    let fixture = TestFixture::with_config(TestConfig::with_token_auth()).await;
    let user_id = fixture.seed_user("Agent Smith", "smith@example.com").await;
    assert_eq!(user_id, 1);

    let response = fixture.get("/api/v1/user").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["identity"]["user_id"], 1);
    assert_eq!(response.body["identity"]["method"], "token");
    assert_eq!(response.body["user"]["email"], "smith@example.com");
}

#[tokio::test]
async fn test_current_user_anonymous() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/user").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.body["identity"]["user_id"].is_null());
    assert!(response.body["user"].is_null());
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_create_user_validation() {
    let fixture = TestFixture::new().await;
    fixture.seed_user("Ada", "ada@example.com").await;

    let response = fixture
        .post("/api/v1/users", json!({"name": "Ada 2", "email": "ada@example.com"}))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["errors"]["email"][0],
        "The email has already been taken."
    );
}

// ============================================================================
// Tickets
// ============================================================================

#[tokio::test]
async fn test_create_ticket_round_trip() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;

    let response = fixture
        .post("/api/v1/tickets", ticket_payload(user_id, 2, "open"))
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_json_path!(response.body, "status", true);
    assert_json_path!(response.body, "message", "Ticket created successfully");

    let ticket = &response.body["ticket"];
    assert_eq!(ticket["user_id"], user_id);
    assert_eq!(ticket["agent_id"], 2);
    assert_eq!(ticket["title"], "engine problem");
    assert_eq!(
        ticket["description"],
        "The engine makes a grinding noise on start."
    );
    assert_eq!(ticket["status"], "open");

    let id = ticket["id"].as_i64().unwrap();
    let fetched = fixture.get(&format!("/api/v1/tickets/{}", id)).await;
    assert_status!(fetched, StatusCode::OK);
    assert_eq!(fetched.body["ticket"], *ticket);
    assert_json_path!(fetched.body, "message", "Ticket retrieved successfully");
}

#[tokio::test]
async fn test_create_ticket_validation_errors() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/tickets",
            json!({
                "user_id": 99,
                "agent_id": "x",
                "title": "t".repeat(51),
                "status": "pending"
            }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "status", false);
    assert_json_path!(response.body, "message", "Validation error");

    let errors = &response.body["errors"];
    assert_eq!(errors["user_id"][0], "The selected user id is invalid.");
    assert_eq!(errors["agent_id"][0], "The agent id field must be an integer.");
    assert_eq!(
        errors["title"][0],
        "The title field must not be greater than 50 characters."
    );
    assert_eq!(errors["description"][0], "The description field is required.");
    assert_eq!(errors["status"][0], "The selected status is invalid.");

    // Nothing persisted
    let list = fixture.get("/api/v1/tickets").await;
    assert_eq!(list.body["total_items"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let fixture = TestFixture::new().await;

    let response = fixture.post_raw("/api/v1/tickets", "{not json").await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_get_missing_ticket() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/tickets/404").await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_json_path!(response.body, "status", false);
    assert_json_path!(response.body, "message", "Ticket not found");
}

#[tokio::test]
async fn test_list_pagination() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    for _ in 0..7 {
        fixture.seed_ticket(user_id, 2, "open").await;
    }

    // Default page size is 3
    let page1 = fixture.get("/api/v1/tickets").await;
    assert_status!(page1, StatusCode::OK);
    assert_json_path!(page1.body, "current_page", 1);
    assert_json_path!(page1.body, "total_pages", 3);
    assert_json_path!(page1.body, "total_items", 7);
    assert_json_path!(page1.body, "per_page", 3);
    assert_eq!(page1.body["data"].as_array().unwrap().len(), 3);

    let page2 = fixture.get("/api/v1/tickets?page=2").await;
    assert_eq!(page2.body["data"].as_array().unwrap().len(), 3);
    assert_eq!(page2.body["data"][0]["id"], 4);

    let page3 = fixture.get("/api/v1/tickets?page=3").await;
    assert_eq!(page3.body["data"].as_array().unwrap().len(), 1);

    let past_end = fixture.get("/api/v1/tickets?page=9").await;
    assert_status!(past_end, StatusCode::OK);
    assert!(past_end.body["data"].as_array().unwrap().is_empty());

    let page_zero = fixture.get("/api/v1/tickets?page=0").await;
    assert_json_path!(page_zero.body, "current_page", 1);

    let big_page = fixture.get("/api/v1/tickets?per_page=1000").await;
    assert_json_path!(big_page.body, "per_page", 100);
    assert_eq!(big_page.body["data"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_list_filters() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    fixture.seed_ticket(user_id, 5, "open").await;
    fixture.seed_ticket(user_id, 5, "closed").await;
    fixture.seed_ticket(user_id, 6, "open").await;

    let open = fixture.get("/api/v1/tickets?status=open&per_page=10").await;
    assert_status!(open, StatusCode::OK);
    let data = open.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|t| t["status"] == "open"));

    let agent = fixture.get("/api/v1/tickets?agent_id=5&per_page=10").await;
    let data = agent.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|t| t["agent_id"] == 5));

    let both = fixture
        .get("/api/v1/tickets?agent_id=5&status=closed")
        .await;
    assert_json_path!(both.body, "total_items", 1);

    let bad = fixture.get("/api/v1/tickets?status=pending").await;
    assert_status!(bad, StatusCode::BAD_REQUEST);
    assert_eq!(
        bad.body["errors"]["status"][0],
        "The selected status is invalid."
    );
}

#[tokio::test]
async fn test_list_query_out_of_range_and_malformed() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    fixture.seed_ticket(user_id, 5, "open").await;

    let negative_page = fixture.get("/api/v1/tickets?page=-1").await;
    assert_status!(negative_page, StatusCode::OK);
    assert_json_path!(negative_page.body, "current_page", 1);
    assert_eq!(negative_page.body["data"].as_array().unwrap().len(), 1);

    let tiny_page = fixture.get("/api/v1/tickets?per_page=-5").await;
    assert_status!(tiny_page, StatusCode::OK);
    assert_json_path!(tiny_page.body, "per_page", 1);

    let bad_agent = fixture.get("/api/v1/tickets?agent_id=abc").await;
    assert_status!(bad_agent, StatusCode::BAD_REQUEST);
    assert_json_path!(bad_agent.body, "status", false);
    assert_json_path!(bad_agent.body, "message", "Validation error");
    assert_eq!(
        bad_agent.body["errors"]["agent_id"][0],
        "The agent id field must be an integer."
    );

    let bad_page = fixture.get("/api/v1/tickets?page=two&status=pending").await;
    assert_status!(bad_page, StatusCode::BAD_REQUEST);
    assert_eq!(
        bad_page.body["errors"]["page"][0],
        "The page field must be an integer."
    );
    assert_eq!(
        bad_page.body["errors"]["status"][0],
        "The selected status is invalid."
    );
}

#[tokio::test]
async fn test_update_ticket() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    let id = fixture.seed_ticket(user_id, 2, "open").await;

    let response = fixture
        .put(
            &format!("/api/v1/tickets/{}", id),
            json!({"title": "engine fixed", "status": "resolved"}),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "message", "Ticket updated successfully");
    assert_eq!(response.body["ticket"]["title"], "engine fixed");
    assert_eq!(response.body["ticket"]["status"], "resolved");
    assert_eq!(response.body["ticket"]["agent_id"], 2);

    let invalid = fixture
        .put(&format!("/api/v1/tickets/{}", id), json!({"status": "bogus"}))
        .await;
    assert_status!(invalid, StatusCode::BAD_REQUEST);

    let missing = fixture
        .put("/api/v1/tickets/999", json!({"title": "x"}))
        .await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_ticket_twice() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    let id = fixture.seed_ticket(user_id, 2, "open").await;

    let first = fixture.delete(&format!("/api/v1/tickets/{}", id)).await;
    assert_status!(first, StatusCode::OK);
    assert_json_path!(first.body, "status", true);
    assert_json_path!(first.body, "message", "Ticket deleted successfully");

    let second = fixture.delete(&format!("/api/v1/tickets/{}", id)).await;
    assert_status!(second, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assign_agent() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    let id = fixture.seed_ticket(user_id, 2, "open").await;

    // The agent does not need to exist
    let response = fixture
        .post_empty(&format!("/api/v1/tickets/{}/assign/777", id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "message", "Agent assigned successfully");
    assert_eq!(response.body["ticket"]["agent_id"], 777);

    let missing = fixture.post_empty("/api/v1/tickets/999/assign/3").await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_status() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    let id = fixture.seed_ticket(user_id, 2, "open").await;
    let path = format!("/api/v1/tickets/{}/status", id);

    let response = fixture.patch(&path, json!({"status": "resolved"})).await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "message", "Status updated successfully");
    assert_eq!(response.body["ticket"]["status"], "resolved");

    let invalid = fixture.patch(&path, json!({"status": "archived"})).await;
    assert_status!(invalid, StatusCode::UNPROCESSABLE_ENTITY);
    assert_json_path!(invalid.body, "status", false);
    assert_json_path!(invalid.body, "message", "Invalid status");

    let fetched = fixture.get(&format!("/api/v1/tickets/{}", id)).await;
    assert_eq!(fetched.body["ticket"]["status"], "resolved");

    let missing = fixture
        .patch("/api/v1/tickets/999/status", json!({"status": "closed"}))
        .await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

// ============================================================================
// Responses
// ============================================================================

#[tokio::test]
async fn test_response_thread() {
    let fixture = TestFixture::new().await;
    let user_id = fixture.seed_user("Ada", "ada@example.com").await;
    let ticket_id = fixture.seed_ticket(user_id, 2, "open").await;

    let created = fixture
        .post(
            "/api/v1/responses",
            json!({"ticket_id": ticket_id, "user_id": user_id, "message": "Looking into it."}),
        )
        .await;
    assert_status!(created, StatusCode::CREATED);
    assert_json_path!(created.body, "message", "Response added successfully");
    let response_id = created.body["response"]["id"].as_i64().unwrap();

    let thread = fixture
        .get(&format!("/api/v1/tickets/{}/responses", ticket_id))
        .await;
    assert_status!(thread, StatusCode::OK);
    assert_json_path!(thread.body, "message", "Responses retrieved successfully");
    assert_eq!(thread.body["responses"].as_array().unwrap().len(), 1);
    assert_eq!(thread.body["responses"][0]["message"], "Looking into it.");

    let updated = fixture
        .put(
            &format!("/api/v1/responses/{}", response_id),
            json!({"message": "Fixed."}),
        )
        .await;
    assert_status!(updated, StatusCode::OK);
    assert_eq!(updated.body["response"]["message"], "Fixed.");

    let fetched = fixture
        .get(&format!("/api/v1/responses/{}", response_id))
        .await;
    assert_eq!(fetched.body["response"]["message"], "Fixed.");

    let deleted = fixture
        .delete(&format!("/api/v1/responses/{}", response_id))
        .await;
    assert_status!(deleted, StatusCode::OK);
    assert_json_path!(deleted.body, "message", "Response deleted successfully");

    let gone = fixture
        .get(&format!("/api/v1/responses/{}", response_id))
        .await;
    assert_status!(gone, StatusCode::NOT_FOUND);
    assert_json_path!(gone.body, "message", "Response not found");
}

#[tokio::test]
async fn test_response_validation() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/responses",
            json!({"ticket_id": 12, "user_id": 34}),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    let errors = &response.body["errors"];
    assert_eq!(errors["ticket_id"][0], "The selected ticket id is invalid.");
    assert_eq!(errors["user_id"][0], "The selected user id is invalid.");
    assert_eq!(errors["message"][0], "The message field is required.");
}

#[tokio::test]
async fn test_responses_for_missing_ticket_is_empty() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/tickets/42/responses").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.body["responses"].as_array().unwrap().is_empty());
}
