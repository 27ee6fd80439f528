//! Integration tests for the Lark callback endpoint.
//!
//! Requests go through the full router (tracing, state extension, handler).

mod common;

use crate::common::{
    application_row, button_value, card_action_event, message_receive_event,
    record_changed_event, url_verification, TestHarness, VERIFICATION_TOKEN,
};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_reports_version() {
    let harness = TestHarness::new();

    let (status, body) = harness.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn answers_url_verification_challenge() {
    let harness = TestHarness::new();

    let (status, body) = harness
        .post_json("/webhooks/lark", &url_verification(VERIFICATION_TOKEN))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"challenge": "ajls384kdjx98XX"}));
}

#[tokio::test]
async fn rejects_wrong_verification_token() {
    let harness = TestHarness::new();

    let (status, _) = harness
        .post_json("/webhooks/lark", &url_verification("someone-else"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut event = card_action_event("button", button_value("approve", "T", "t@example.com"));
    event["header"]["token"] = json!("forged");
    let (status, _) = harness.post_json("/webhooks/lark/card", &event).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing was published on the forged click
    assert!(harness.deps.repo.writes().is_empty());
}

#[tokio::test]
async fn rejects_encrypted_and_malformed_payloads() {
    let harness = TestHarness::new();

    let (status, body) = harness
        .post_json("/webhooks/lark", &json!({"encrypt": "FIdarNq8yvdbOA=="}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "encrypted payloads are not supported");

    let (status, _) = harness.post_raw("/webhooks/lark", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn record_added_event_sends_card() {
    let harness = TestHarness::new();
    harness
        .deps
        .tables
        .insert_record("rec_new", application_row("期末复习资料", "carol@fudan.edu.cn"));

    let (status, body) = harness
        .post_json(
            "/webhooks/lark",
            &record_changed_event("tbl_application", &[("rec_new", "record_added")]),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    let cards = harness.deps.chat.sent_cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].variables["banner_title"], "期末复习资料");
}

#[tokio::test]
async fn event_failure_returns_500() {
    let harness = TestHarness::new();
    harness
        .deps
        .tables
        .insert_record("rec_new", application_row("T", "t@example.com"));
    harness.deps.chat.fail_sends();

    let (status, _) = harness
        .post_json(
            "/webhooks/lark",
            &record_changed_event("tbl_application", &[("rec_new", "record_added")]),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn approve_click_returns_success_toast() {
    let harness = TestHarness::new();

    let value = button_value("approve", "期末复习资料", "carol@fudan.edu.cn");
    let (status, body) = harness
        .post_json("/webhooks/lark/card", &card_action_event("button", value))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"toast": {
            "type": "success",
            "content": "Approved!",
            "i18n": {"zh_cn": "已通过", "en_us": "Approved!"}
        }})
    );
    let writes = harness.deps.repo.writes();
    assert_eq!(writes.len(), 1);
    assert!(writes[0].content.contains("title = \"期末复习资料\""));
    assert_eq!(harness.deps.email.sent().len(), 1);
}

#[tokio::test]
async fn disapprove_click_returns_info_toast() {
    let harness = TestHarness::new();

    let (status, body) = harness
        .post_json(
            "/webhooks/lark",
            &card_action_event("button", button_value("disapprove", "T", "t@example.com")),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["toast"]["type"], "info");
    assert_eq!(body["toast"]["i18n"]["zh_cn"], "已驳回");
    assert!(harness.deps.repo.writes().is_empty());
}

#[tokio::test]
async fn failed_click_is_answered_with_error_toast() {
    let harness = TestHarness::new();

    let (status, body) = harness
        .post_json(
            "/webhooks/lark/card",
            &card_action_event("button", button_value("archive", "T", "t@example.com")),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["toast"]["type"], "error");
    assert_eq!(body["toast"]["content"], "unknown action type: archive");
}

#[tokio::test]
async fn non_button_click_leaves_card_untouched() {
    let harness = TestHarness::new();

    let (status, body) = harness
        .post_json(
            "/webhooks/lark/card",
            &card_action_event("input", json!({})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn chat_messages_are_acknowledged() {
    let harness = TestHarness::new();

    let (status, body) = harness
        .post_json("/webhooks/lark", &message_receive_event())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    assert!(harness.deps.chat.sent_cards().is_empty());
}
