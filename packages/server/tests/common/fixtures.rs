//! Test fixtures: Lark payloads and config files.

use serde_json::{json, Value};

pub const VERIFICATION_TOKEN: &str = "test-verification-token";

/// Config file as it sits in the repository before any approval.
pub const APP_CONFIG: &str = r#"# DanXi app content, edited by the banner bot
user_agent = "DanXi/1.4.0"
stop_words = ["spam"]
highlight_tag_ids = [3, 7]

[[banners]]
title = "欢迎使用旦夕"
action = "https://danxi.fduhole.com"
button = "了解更多"

[[celebrations]]
date = "01-01"
words = ["新年快乐"]

[latest_version]
ios = "1.4.0"
"#;

/// A questionnaire row with rich-text cells, as bitable returns them.
pub fn application_row(title: &str, email: &str) -> Value {
    json!({
        "Banner": [{"type": "text", "text": title}],
        "action": {"link": "https://danxi.fduhole.com/events", "text": "活动页"},
        "button": "去看看",
        "联系邮箱": [{"type": "text", "text": email}]
    })
}

fn header(event_type: &str, token: &str) -> Value {
    json!({
        "event_id": "evt_0001",
        "event_type": event_type,
        "create_time": "1717171717000",
        "token": token,
        "app_id": "cli_test",
        "tenant_key": "tenant_test"
    })
}

pub fn url_verification(token: &str) -> Value {
    json!({
        "challenge": "ajls384kdjx98XX",
        "token": token,
        "type": "url_verification"
    })
}

/// `record_changed_event(&[("rec_1", "record_added")])`
pub fn record_changed_event(table_id: &str, actions: &[(&str, &str)]) -> Value {
    let action_list: Vec<Value> = actions
        .iter()
        .map(|(record_id, action)| json!({"record_id": record_id, "action": action}))
        .collect();

    json!({
        "schema": "2.0",
        "header": header("drive.file.bitable_record_changed_v1", VERIFICATION_TOKEN),
        "event": {
            "file_token": "bascn_banner",
            "file_type": "bitable",
            "table_id": table_id,
            "operator_id": {"open_id": "ou_submitter"},
            "action_list": action_list
        }
    })
}

/// Button value echoed back by the approval card.
pub fn button_value(action: &str, title: &str, email: &str) -> Value {
    json!({
        "action": action,
        "banner_title": title,
        "banner_action": "https://danxi.fduhole.com/events",
        "banner_button": "去看看",
        "applicant_email": email
    })
}

pub fn card_action_event(tag: &str, value: Value) -> Value {
    json!({
        "schema": "2.0",
        "header": header("card.action.trigger", VERIFICATION_TOKEN),
        "event": {
            "operator": {"open_id": "ou_operator", "user_id": "operator"},
            "token": "c-callback-token",
            "action": {"tag": tag, "value": value},
            "host": "im_message",
            "context": {"open_message_id": "om_card", "open_chat_id": "oc_banner_approvers"}
        }
    })
}

pub fn message_receive_event() -> Value {
    json!({
        "schema": "2.0",
        "header": header("im.message.receive_v1", VERIFICATION_TOKEN),
        "event": {
            "sender": {"sender_id": {"open_id": "ou_someone"}},
            "message": {
                "message_id": "om_msg",
                "chat_id": "oc_banner_approvers",
                "chat_type": "group",
                "message_type": "text",
                "content": "{\"text\":\"hello\"}"
            }
        }
    })
}
