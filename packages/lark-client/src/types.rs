use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Standard Lark response envelope: `{ "code": 0, "msg": "success", "data": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TenantTokenRequest<'a> {
    pub app_id: &'a str,
    pub app_secret: &'a str,
}

/// The token endpoint does not wrap its payload in `data`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TenantTokenResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub tenant_access_token: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expire: u64,
}

/// Which kind of id `receive_id` holds when sending a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveIdType {
    ChatId,
    OpenId,
    UserId,
    UnionId,
    Email,
}

impl ReceiveIdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatId => "chat_id",
            Self::OpenId => "open_id",
            Self::UserId => "user_id",
            Self::UnionId => "union_id",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for ReceiveIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message types accepted by `im/v1/messages`.
pub mod msg_type {
    pub const INTERACTIVE: &str = "interactive";
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateMessageRequest<'a> {
    pub receive_id: &'a str,
    pub msg_type: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: String,
    pub chat_id: Option<String>,
    pub msg_type: Option<String>,
}

/// Interactive card built from a template in the card builder.
///
/// Serialises to `{"type":"template","data":{"template_id":..,"template_variable":{..}}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateCard {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: TemplateCardData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateCardData {
    pub template_id: String,
    #[serde(default)]
    pub template_variable: Map<String, Value>,
}

impl TemplateCard {
    pub fn new(template_id: impl Into<String>, variables: Map<String, Value>) -> Self {
        Self {
            kind: "template".to_string(),
            data: TemplateCardData {
                template_id: template_id.into(),
                template_variable: variables,
            },
        }
    }
}

/// A bitable row. Field values keep Lark's loose JSON shape (strings,
/// rich-text segment arrays, numbers, person objects...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppTableRecord {
    #[serde(default)]
    pub record_id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct BatchGetRecordsRequest<'a> {
    pub record_ids: &'a [String],
    pub user_id_type: &'a str,
    pub with_shared_url: bool,
    pub automatic_fields: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BatchGetRecordsResponse {
    #[serde(default)]
    pub records: Vec<AppTableRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateRecordRequest<'a> {
    pub fields: &'a Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateRecordResponse {
    pub record: AppTableRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailAddress {
    pub mail_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MailAddress {
    pub fn new(mail_address: impl Into<String>, name: Option<String>) -> Self {
        Self {
            mail_address: mail_address.into(),
            name,
        }
    }
}

/// Body of `mail/v1/user_mailboxes/:id/messages/send`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MailMessage {
    pub subject: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub to: Vec<MailAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub cc: Vec<MailAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub bcc: Vec<MailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_from: Option<MailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_plain_text: Option<String>,
}
