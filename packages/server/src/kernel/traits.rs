// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The banner workflow lives in domains/banners and talks to the outside world
// exclusively through these capabilities.
//
// Naming convention: Base* for trait names (e.g., BaseChatService)

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use lark_client::AppTableRecord;

// =============================================================================
// Chat Trait (Infrastructure - interactive cards)
// =============================================================================

#[async_trait]
pub trait BaseChatService: Send + Sync {
    /// Render a card-builder template into a group chat
    async fn send_template_card(
        &self,
        chat_id: &str,
        template_id: &str,
        variables: Map<String, Value>,
    ) -> Result<()>;
}

// =============================================================================
// Table Trait (Infrastructure - bitable rows)
// =============================================================================

#[async_trait]
pub trait BaseTableService: Send + Sync {
    /// Fetch rows by id; ids that no longer exist are simply absent
    async fn batch_get_records(
        &self,
        app_token: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> Result<Vec<AppTableRecord>>;

    /// Append one row
    async fn create_record(
        &self,
        app_token: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> Result<()>;
}

// =============================================================================
// Repository Content Trait (Infrastructure - single file read/write)
// =============================================================================

/// A file read from the repository, with the content hash a write must echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub content: String,
    pub sha: String,
}

#[derive(Debug, Error)]
pub enum RepoWriteError {
    /// The file changed after it was read; re-read before writing again
    #[error("file changed since it was read")]
    Conflict,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait BaseRepoContentService: Send + Sync {
    async fn get_file(&self, path: &str) -> Result<RepoFile>;

    /// Overwrite `path` only if it still has content hash `sha`
    async fn put_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
    ) -> std::result::Result<(), RepoWriteError>;
}

// =============================================================================
// Email Trait (Infrastructure)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub body_plain_text: String,
    pub body_html: Option<String>,
}

#[async_trait]
pub trait BaseEmailService: Send + Sync {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<()>;
}
