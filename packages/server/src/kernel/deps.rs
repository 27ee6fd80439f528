//! Server dependencies for the workflow (using traits for testability)
//!
//! This module provides the central dependency container used by the banner
//! actions. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use github_client::{GithubClient, GithubError, PutFileRequest};
use lark_client::{LarkClient, MailAddress, MailMessage, ReceiveIdType};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domains::banners::BannerSettings;
use crate::kernel::{
    AppTableRecord, BaseChatService, BaseEmailService, BaseRepoContentService, BaseTableService,
    OutgoingEmail, RepoFile, RepoWriteError,
};

// =============================================================================
// LarkClient Adapter (implements BaseChatService + BaseTableService)
// =============================================================================

/// Wrapper around LarkClient that implements the chat and table traits
pub struct LarkAdapter(pub Arc<LarkClient>);

impl LarkAdapter {
    pub fn new(client: Arc<LarkClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseChatService for LarkAdapter {
    async fn send_template_card(
        &self,
        chat_id: &str,
        template_id: &str,
        variables: Map<String, Value>,
    ) -> Result<()> {
        self.0
            .send_template_card(ReceiveIdType::ChatId, chat_id, template_id, variables)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("Failed to send card message: {}", e))
    }
}

#[async_trait]
impl BaseTableService for LarkAdapter {
    async fn batch_get_records(
        &self,
        app_token: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> Result<Vec<AppTableRecord>> {
        self.0
            .batch_get_records(app_token, table_id, record_ids)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to batch query bitable records: {}", e))
    }

    async fn create_record(
        &self,
        app_token: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> Result<()> {
        self.0
            .create_record(app_token, table_id, &fields)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("Failed to add bitable record: {}", e))
    }
}

// =============================================================================
// Lark Mail Adapter (implements BaseEmailService)
// =============================================================================

/// Sends mail from a Lark user mailbox
pub struct LarkMailAdapter {
    client: Arc<LarkClient>,
    sender_mailbox: String,
    sender_name: Option<String>,
    user_access_token: Option<String>,
}

impl LarkMailAdapter {
    pub fn new(
        client: Arc<LarkClient>,
        sender_mailbox: String,
        sender_name: Option<String>,
        user_access_token: Option<String>,
    ) -> Self {
        if user_access_token.is_none() {
            tracing::warn!("LARK_USER_ACCESS_TOKEN is empty, mail will use the tenant token");
        }
        Self {
            client,
            sender_mailbox,
            sender_name,
            user_access_token,
        }
    }
}

#[async_trait]
impl BaseEmailService for LarkMailAdapter {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<()> {
        let to_addresses = |list: &[String]| -> Vec<MailAddress> {
            list.iter().map(|a| MailAddress::new(a, None)).collect()
        };

        // head_from is only meaningful when the mailbox id is an address
        let head_from = self
            .sender_mailbox
            .contains('@')
            .then(|| MailAddress::new(&self.sender_mailbox, self.sender_name.clone()));

        let message = MailMessage {
            subject: email.subject.clone(),
            to: to_addresses(&email.to),
            cc: to_addresses(&email.cc),
            bcc: Vec::new(),
            head_from,
            body_html: email.body_html.clone(),
            body_plain_text: Some(email.body_plain_text.clone()),
        };

        self.client
            .send_mail(
                &self.sender_mailbox,
                &message,
                self.user_access_token.as_deref(),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send email: {}", e))
    }
}

// =============================================================================
// GithubClient Adapter (implements BaseRepoContentService)
// =============================================================================

/// Binds a GithubClient to one repository (and optionally one branch)
pub struct GithubAdapter {
    client: Arc<GithubClient>,
    owner: String,
    repo: String,
    branch: Option<String>,
}

impl GithubAdapter {
    pub fn new(
        client: Arc<GithubClient>,
        owner: String,
        repo: String,
        branch: Option<String>,
    ) -> Self {
        Self {
            client,
            owner,
            repo,
            branch,
        }
    }
}

#[async_trait]
impl BaseRepoContentService for GithubAdapter {
    async fn get_file(&self, path: &str) -> Result<RepoFile> {
        let file = self
            .client
            .get_file(&self.owner, &self.repo, path, self.branch.as_deref())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get file content: {}", e))?;

        Ok(RepoFile {
            sha: file.sha().to_string(),
            content: file.decoded,
        })
    }

    async fn put_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
    ) -> std::result::Result<(), RepoWriteError> {
        let request = PutFileRequest {
            message: message.to_string(),
            content: content.to_string(),
            sha: Some(sha.to_string()),
            branch: self.branch.clone(),
            committer: None,
        };

        match self
            .client
            .put_file(&self.owner, &self.repo, path, &request)
            .await
        {
            Ok(_) => Ok(()),
            Err(GithubError::Conflict { .. }) => Err(RepoWriteError::Conflict),
            Err(e) => Err(RepoWriteError::Other(anyhow::anyhow!(
                "Failed to create or update file content: {}",
                e
            ))),
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub chat: Arc<dyn BaseChatService>,
    pub tables: Arc<dyn BaseTableService>,
    pub repo: Arc<dyn BaseRepoContentService>,
    pub email: Arc<dyn BaseEmailService>,
    pub settings: BannerSettings,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        chat: Arc<dyn BaseChatService>,
        tables: Arc<dyn BaseTableService>,
        repo: Arc<dyn BaseRepoContentService>,
        email: Arc<dyn BaseEmailService>,
        settings: BannerSettings,
    ) -> Self {
        Self {
            chat,
            tables,
            repo,
            email,
            settings,
        }
    }
}
