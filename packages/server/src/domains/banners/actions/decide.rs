//! Operator clicks on the approval card.

use anyhow::Result;
use chrono::Utc;
use lark_client::events::{CardActionResponse, CardActionTriggerEvent, Toast, ToastKind};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use super::{notify_applicant, publish_banner, record_usage};
use crate::domains::banners::data::{card_keys, BUTTON_TAG};
use crate::domains::banners::events::BannerApprovalEvent;
use crate::domains::banners::models::{
    Banner, BannerApplication, BannerStatus, CardDecision, UnknownDecision,
};
use crate::kernel::ServerDeps;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardActionError {
    #[error("action tag is empty")]
    EmptyTag,

    #[error("button value is missing {0:?}")]
    MissingValue(&'static str),

    #[error(transparent)]
    UnknownDecision(#[from] UnknownDecision),
}

/// What the click produced: the toast to answer with plus the facts.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    pub response: CardActionResponse,
    pub events: Vec<BannerApprovalEvent>,
}

pub fn approved_toast() -> CardActionResponse {
    CardActionResponse::toast(
        Toast::new(ToastKind::Success, "Approved!")
            .with_i18n("zh_cn", "已通过")
            .with_i18n("en_us", "Approved!"),
    )
}

pub fn disapproved_toast() -> CardActionResponse {
    CardActionResponse::toast(
        Toast::new(ToastKind::Info, "Disapproved!")
            .with_i18n("zh_cn", "已驳回")
            .with_i18n("en_us", "Disapproved!"),
    )
}

pub fn error_toast(message: impl Into<String>) -> CardActionResponse {
    let message = message.into();
    CardActionResponse::toast(
        Toast::new(ToastKind::Error, message.clone())
            .with_i18n("zh_cn", format!("操作失败：{}", message))
            .with_i18n("en_us", message),
    )
}

/// Read the decision and the application echoed back by the button.
pub fn parse_button_value(
    value: &Map<String, Value>,
) -> Result<(CardDecision, BannerApplication), CardActionError> {
    let get = |key: &'static str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(CardActionError::MissingValue(key))
    };

    let decision = get(card_keys::ACTION)?.parse::<CardDecision>()?;
    let application = BannerApplication {
        banner: Banner {
            title: get(card_keys::BANNER_TITLE)?,
            action: get(card_keys::BANNER_ACTION)?,
            button: get(card_keys::BANNER_BUTTON)?,
        },
        applicant_email: get(card_keys::APPLICANT_EMAIL)?,
    };
    Ok((decision, application))
}

/// Handle an approve or disapprove click.
///
/// Approving publishes the banner first; the usage log and the mail that
/// follow are best effort so a failure there never republishes the banner
/// on a second click. Clicks on anything but a button leave the card as is.
pub async fn decide(event: &CardActionTriggerEvent, deps: &ServerDeps) -> Result<DecisionOutcome> {
    let action = &event.action;
    if action.tag.is_empty() {
        return Err(CardActionError::EmptyTag.into());
    }
    if action.tag != BUTTON_TAG {
        return Ok(DecisionOutcome {
            response: CardActionResponse::default(),
            events: Vec::new(),
        });
    }

    let (decision, application) = parse_button_value(&action.value)?;
    let status = BannerStatus::from(decision);
    info!(
        %decision,
        title = %application.title(),
        operator = ?event.operator.open_id,
        "Banner decision received"
    );

    let mut events = Vec::new();
    let response = match status {
        BannerStatus::Approved => {
            let attempts = publish_banner(&application.banner, deps).await?;
            events.push(BannerApprovalEvent::BannerPublished {
                title: application.banner.title.clone(),
                attempts,
            });

            match record_usage(&application, Utc::now(), deps).await {
                Ok(()) => events.push(BannerApprovalEvent::UsageRecorded {
                    title: application.banner.title.clone(),
                }),
                Err(e) => {
                    warn!(
                        title = %application.title(),
                        error = %e,
                        "Failed to record banner usage"
                    );
                    events.push(BannerApprovalEvent::UsageRecordFailed {
                        title: application.banner.title.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }

            approved_toast()
        }
        BannerStatus::Disapproved => {
            events.push(BannerApprovalEvent::BannerDisapproved {
                title: application.banner.title.clone(),
            });
            disapproved_toast()
        }
    };

    events.push(notify_applicant(&application, status, deps).await);

    Ok(DecisionOutcome { response, events })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn parses_complete_button_value() {
        let (decision, application) = parse_button_value(&value(json!({
            "action": "approve",
            "banner_title": "T",
            "banner_action": "https://example.com",
            "banner_button": "Go",
            "applicant_email": "a@example.com"
        })))
        .unwrap();

        assert_eq!(decision, CardDecision::Approve);
        assert_eq!(application.banner.title, "T");
        assert_eq!(application.applicant_email, "a@example.com");
    }

    #[test]
    fn missing_keys_are_named() {
        let err = parse_button_value(&value(json!({
            "action": "approve",
            "banner_title": "T",
            "banner_button": "Go",
            "applicant_email": "a@example.com"
        })))
        .unwrap_err();
        assert_eq!(err, CardActionError::MissingValue("banner_action"));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = parse_button_value(&value(json!({"action": "maybe"}))).unwrap_err();
        assert_eq!(err.to_string(), "unknown action type: maybe");
    }

    #[test]
    fn toasts_serialize_like_lark_expects() {
        assert_eq!(
            serde_json::to_value(approved_toast()).unwrap(),
            json!({"toast": {
                "type": "success",
                "content": "Approved!",
                "i18n": {"zh_cn": "已通过", "en_us": "Approved!"}
            }})
        );
        assert_eq!(
            serde_json::to_value(disapproved_toast()).unwrap()["toast"]["type"],
            "info"
        );
    }
}
