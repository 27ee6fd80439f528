//! Pure Lark (Feishu) Open Platform REST client.
//!
//! Covers the endpoints a bot needs to run an approval loop: tenant access
//! tokens, interactive messages, bitable records and mailbox sending.
//! Callback payloads pushed by Lark are modelled in [`events`].
//!
//! # Example
//!
//! ```rust,ignore
//! use lark_client::{LarkClient, LarkOptions, ReceiveIdType};
//!
//! let client = LarkClient::new(LarkOptions::new("cli_xxx", "secret"));
//! client
//!     .send_template_card(ReceiveIdType::ChatId, "oc_xxx", "AAqk...", variables)
//!     .await?;
//! ```

pub mod error;
pub mod events;
pub mod types;

pub use error::{LarkError, Result};
pub use types::{
    msg_type, AppTableRecord, MailAddress, MailMessage, ReceiveIdType, SentMessage, TemplateCard,
};

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use types::{
    ApiResponse, BatchGetRecordsRequest, BatchGetRecordsResponse, CreateMessageRequest,
    CreateRecordRequest, CreateRecordResponse, TenantTokenRequest, TenantTokenResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn";

/// Tokens are refreshed this long before Lark says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct LarkOptions {
    pub app_id: String,
    pub app_secret: String,
    pub base_url: String,
}

impl LarkOptions {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct LarkClient {
    client: reqwest::Client,
    options: LarkOptions,
    tenant_token: Mutex<Option<CachedToken>>,
}

impl LarkClient {
    pub fn new(options: LarkOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
            tenant_token: Mutex::new(None),
        }
    }

    /// Get a tenant access token, reusing the cached one while it is still fresh.
    pub async fn tenant_access_token(&self) -> Result<String> {
        let mut cached = self.tenant_token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_REFRESH_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let url = format!(
            "{}/open-apis/auth/v3/tenant_access_token/internal",
            self.options.base_url
        );
        let resp = self
            .client
            .post(&url)
            .json(&TenantTokenRequest {
                app_id: &self.options.app_id,
                app_secret: &self.options.app_secret,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let token: TenantTokenResponse = match serde_json::from_str(&body) {
            Ok(token) => token,
            Err(_) if !status.is_success() => {
                return Err(LarkError::Status {
                    status: status.as_u16(),
                    message: body,
                })
            }
            Err(e) => return Err(e.into()),
        };
        if token.code != 0 {
            return Err(LarkError::Api {
                code: token.code,
                message: token.msg,
            });
        }

        tracing::debug!(expire = token.expire, "Fetched tenant access token");
        *cached = Some(CachedToken {
            value: token.tenant_access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expire),
        });
        Ok(token.tenant_access_token)
    }

    /// Send a message to a chat or user. `content` is the JSON string Lark expects
    /// for the given `msg_type`.
    pub async fn send_message(
        &self,
        receive_id_type: ReceiveIdType,
        receive_id: &str,
        msg_type: &str,
        content: &str,
    ) -> Result<SentMessage> {
        let body = CreateMessageRequest {
            receive_id,
            msg_type,
            content,
        };
        let sent: Option<SentMessage> = self
            .post(
                "/open-apis/im/v1/messages",
                &[("receive_id_type", receive_id_type.as_str())],
                &body,
                None,
            )
            .await?;
        let sent = sent.ok_or(LarkError::MissingData("im/v1/messages"))?;
        tracing::info!(message_id = %sent.message_id, receive_id, "Message sent");
        Ok(sent)
    }

    /// Send an interactive card rendered from a card-builder template.
    pub async fn send_template_card(
        &self,
        receive_id_type: ReceiveIdType,
        receive_id: &str,
        template_id: &str,
        variables: Map<String, Value>,
    ) -> Result<SentMessage> {
        let content = serde_json::to_string(&TemplateCard::new(template_id, variables))?;
        self.send_message(receive_id_type, receive_id, msg_type::INTERACTIVE, &content)
            .await
    }

    /// Fetch bitable records by id. An empty id list short-circuits without a request.
    pub async fn batch_get_records(
        &self,
        app_token: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> Result<Vec<AppTableRecord>> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }

        let path = format!(
            "/open-apis/bitable/v1/apps/{}/tables/{}/records/batch_get",
            app_token, table_id
        );
        let body = BatchGetRecordsRequest {
            record_ids,
            user_id_type: "open_id",
            with_shared_url: false,
            automatic_fields: false,
        };
        let data: Option<BatchGetRecordsResponse> = self.post(&path, &[], &body, None).await?;
        Ok(data.map(|d| d.records).unwrap_or_default())
    }

    /// Append a row to a bitable table, returning the stored record.
    pub async fn create_record(
        &self,
        app_token: &str,
        table_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<AppTableRecord> {
        let path = format!(
            "/open-apis/bitable/v1/apps/{}/tables/{}/records",
            app_token, table_id
        );
        let data: Option<CreateRecordResponse> = self
            .post(&path, &[], &CreateRecordRequest { fields }, None)
            .await?;
        let data = data.ok_or(LarkError::MissingData("bitable records create"))?;
        tracing::info!(record_id = %data.record.record_id, table_id, "Bitable record created");
        Ok(data.record)
    }

    /// Send a mail from a user mailbox.
    ///
    /// The mail API acts on behalf of a user, so a user access token should be
    /// supplied; without one the tenant token is tried. An empty mailbox id
    /// means the token owner's own mailbox (`me`).
    pub async fn send_mail(
        &self,
        user_mailbox_id: &str,
        message: &MailMessage,
        user_access_token: Option<&str>,
    ) -> Result<()> {
        let mailbox = if user_mailbox_id.is_empty() {
            tracing::warn!("Mailbox id is empty, falling back to 'me'");
            "me"
        } else {
            user_mailbox_id
        };
        let path = format!("/open-apis/mail/v1/user_mailboxes/{}/messages/send", mailbox);
        let _: Option<Value> = self.post(&path, &[], message, user_access_token).await?;
        tracing::info!(subject = %message.subject, recipients = message.to.len(), "Mail sent");
        Ok(())
    }

    async fn post<B, T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
        bearer: Option<&str>,
    ) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = match bearer {
            Some(token) => token.to_string(),
            None => self.tenant_access_token().await?,
        };

        let url = format!("{}{}", self.options.base_url, path);
        let resp = self
            .client
            .post(&url)
            .query(query)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        read_envelope(resp).await
    }
}

async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>> {
    let status = resp.status();
    let body = resp.text().await?;

    let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(LarkError::Status {
                status: status.as_u16(),
                message: body,
            })
        }
        Err(e) => return Err(e.into()),
    };

    if envelope.code != 0 {
        tracing::error!(code = envelope.code, msg = %envelope.msg, "Lark API call failed");
        return Err(LarkError::Api {
            code: envelope.code,
            message: envelope.msg,
        });
    }
    if !status.is_success() {
        return Err(LarkError::Status {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(envelope.data)
}
