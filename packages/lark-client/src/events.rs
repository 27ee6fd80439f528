//! Event and callback payloads delivered to a subscription URL.
//!
//! Lark posts three shapes to the same endpoint:
//! - the one-off `url_verification` handshake (`{"type","challenge","token"}`),
//! - schema 2.0 envelopes (`{"schema":"2.0","header":{..},"event":{..}}`),
//! - `{"encrypt": ".."}` when an encrypt key is configured (not supported).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const EVENT_BITABLE_RECORD_CHANGED: &str = "drive.file.bitable_record_changed_v1";
pub const EVENT_CARD_ACTION_TRIGGER: &str = "card.action.trigger";
pub const EVENT_MESSAGE_RECEIVE: &str = "im.message.receive_v1";

pub const RECORD_ADDED: &str = "record_added";
pub const RECORD_EDITED: &str = "record_edited";
pub const RECORD_DELETED: &str = "record_deleted";

#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("invalid event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encrypted payloads are not supported")]
    Encrypted,

    #[error("event envelope has no header")]
    MissingHeader,

    #[error("event {0} has no body")]
    MissingEvent(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventHeader {
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub create_time: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub tenant_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlVerification {
    pub challenge: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BitableRecordChangedEvent {
    #[serde(default)]
    pub file_token: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub table_id: String,
    #[serde(default)]
    pub action_list: Vec<BitableRecordAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BitableRecordAction {
    #[serde(default)]
    pub record_id: String,
    #[serde(default)]
    pub action: String,
}

impl BitableRecordChangedEvent {
    /// Ids of rows created in this change, in delivery order.
    pub fn added_record_ids(&self) -> Vec<String> {
        self.action_list
            .iter()
            .filter(|a| a.action == RECORD_ADDED && !a.record_id.is_empty())
            .map(|a| a.record_id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Operator {
    pub open_id: Option<String>,
    pub user_id: Option<String>,
    pub union_id: Option<String>,
    pub tenant_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardAction {
    #[serde(default)]
    pub tag: String,
    /// Whatever the card builder attached to the clicked component.
    #[serde(default)]
    pub value: Map<String, Value>,
    #[serde(default)]
    pub form_value: Map<String, Value>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardContext {
    pub open_message_id: Option<String>,
    pub open_chat_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardActionTriggerEvent {
    #[serde(default)]
    pub operator: Operator,
    /// Per-callback token usable for delayed card updates.
    pub token: Option<String>,
    #[serde(default)]
    pub action: CardAction,
    pub host: Option<String>,
    #[serde(default)]
    pub context: CardContext,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReceivedMessage {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub chat_type: String,
    #[serde(default)]
    pub message_type: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageReceiveEvent {
    #[serde(default)]
    pub message: ReceivedMessage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    UrlVerification(UrlVerification),
    BitableRecordChanged {
        header: EventHeader,
        event: BitableRecordChangedEvent,
    },
    CardActionTrigger {
        header: EventHeader,
        event: CardActionTriggerEvent,
    },
    MessageReceive {
        header: EventHeader,
        event: MessageReceiveEvent,
    },
    /// An enveloped event of a type this client does not model.
    Other { header: EventHeader },
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(rename = "type")]
    kind: Option<String>,
    challenge: Option<String>,
    token: Option<String>,
    encrypt: Option<String>,
    header: Option<EventHeader>,
    event: Option<Value>,
}

impl EventPayload {
    pub fn parse(body: &[u8]) -> Result<Self, EventParseError> {
        let raw: RawPayload = serde_json::from_slice(body)?;

        if raw.encrypt.is_some() {
            return Err(EventParseError::Encrypted);
        }

        if raw.kind.as_deref() == Some("url_verification") {
            return Ok(Self::UrlVerification(UrlVerification {
                challenge: raw.challenge.unwrap_or_default(),
                token: raw.token.unwrap_or_default(),
            }));
        }

        let header = raw.header.ok_or(EventParseError::MissingHeader)?;
        let event_type = header.event_type.clone();

        let body = match (event_type.as_str(), raw.event) {
            (
                EVENT_BITABLE_RECORD_CHANGED | EVENT_CARD_ACTION_TRIGGER | EVENT_MESSAGE_RECEIVE,
                None,
            ) => return Err(EventParseError::MissingEvent(event_type)),
            (_, Some(body)) => body,
            (_, None) => return Ok(Self::Other { header }),
        };

        Ok(match event_type.as_str() {
            EVENT_BITABLE_RECORD_CHANGED => Self::BitableRecordChanged {
                header,
                event: serde_json::from_value(body)?,
            },
            EVENT_CARD_ACTION_TRIGGER => Self::CardActionTrigger {
                header,
                event: serde_json::from_value(body)?,
            },
            EVENT_MESSAGE_RECEIVE => Self::MessageReceive {
                header,
                event: serde_json::from_value(body)?,
            },
            _ => Self::Other { header },
        })
    }

    /// The verification token Lark echoed back, used to authenticate the sender.
    pub fn verification_token(&self) -> &str {
        match self {
            Self::UrlVerification(v) => &v.token,
            Self::BitableRecordChanged { header, .. }
            | Self::CardActionTrigger { header, .. }
            | Self::MessageReceive { header, .. }
            | Self::Other { header } => &header.token,
        }
    }

    pub fn event_type(&self) -> &str {
        match self {
            Self::UrlVerification(_) => "url_verification",
            Self::BitableRecordChanged { header, .. }
            | Self::CardActionTrigger { header, .. }
            | Self::MessageReceive { header, .. }
            | Self::Other { header } => &header.event_type,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Toast {
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub i18n: HashMap<String, String>,
}

impl Toast {
    pub fn new(kind: ToastKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            i18n: HashMap::new(),
        }
    }

    pub fn with_i18n(mut self, locale: &str, content: impl Into<String>) -> Self {
        self.i18n.insert(locale.to_string(), content.into());
        self
    }
}

/// Synchronous answer to `card.action.trigger`. An empty object leaves the card untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardActionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toast: Option<Toast>,
}

impl CardActionResponse {
    pub fn toast(toast: Toast) -> Self {
        Self { toast: Some(toast) }
    }
}
