// TestDependencies - mock implementations for testing
//
// Provides recording mocks for every capability trait so the banner workflow
// can be exercised without Lark or GitHub.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::{
    AppTableRecord, BaseChatService, BaseEmailService, BaseRepoContentService, BaseTableService,
    OutgoingEmail, RepoFile, RepoWriteError, ServerDeps,
};
use crate::domains::banners::BannerSettings;

// =============================================================================
// Mock Chat Service
// =============================================================================

/// A card captured by the mock
#[derive(Debug, Clone)]
pub struct SentCard {
    pub chat_id: String,
    pub template_id: String,
    pub variables: Map<String, Value>,
}

#[derive(Default)]
pub struct MockChatService {
    sent: Mutex<Vec<SentCard>>,
    fail: Mutex<bool>,
}

impl MockChatService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn fail_sends(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn sent_cards(&self) -> Vec<SentCard> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseChatService for MockChatService {
    async fn send_template_card(
        &self,
        chat_id: &str,
        template_id: &str,
        variables: Map<String, Value>,
    ) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("mock chat failure");
        }
        self.sent.lock().unwrap().push(SentCard {
            chat_id: chat_id.to_string(),
            template_id: template_id.to_string(),
            variables,
        });
        Ok(())
    }
}

// =============================================================================
// Mock Table Service
// =============================================================================

/// A row appended through the mock
#[derive(Debug, Clone)]
pub struct CreatedRecord {
    pub app_token: String,
    pub table_id: String,
    pub fields: Map<String, Value>,
}

/// Arguments captured from a batch query
#[derive(Debug, Clone)]
pub struct BatchGetCall {
    pub app_token: String,
    pub table_id: String,
    pub record_ids: Vec<String>,
}

#[derive(Default)]
pub struct MockTableService {
    records: Mutex<HashMap<String, AppTableRecord>>,
    batch_calls: Mutex<Vec<BatchGetCall>>,
    created: Mutex<Vec<CreatedRecord>>,
    fail_creates: Mutex<bool>,
}

impl MockTableService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row that batch queries can return
    pub fn insert_record(&self, record_id: &str, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.records.lock().unwrap().insert(
            record_id.to_string(),
            AppTableRecord {
                record_id: record_id.to_string(),
                fields,
            },
        );
    }

    pub fn fail_creates(&self) {
        *self.fail_creates.lock().unwrap() = true;
    }

    pub fn batch_calls(&self) -> Vec<BatchGetCall> {
        self.batch_calls.lock().unwrap().clone()
    }

    pub fn created_records(&self) -> Vec<CreatedRecord> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseTableService for MockTableService {
    async fn batch_get_records(
        &self,
        app_token: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> Result<Vec<AppTableRecord>> {
        self.batch_calls.lock().unwrap().push(BatchGetCall {
            app_token: app_token.to_string(),
            table_id: table_id.to_string(),
            record_ids: record_ids.to_vec(),
        });

        let records = self.records.lock().unwrap();
        Ok(record_ids
            .iter()
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }

    async fn create_record(
        &self,
        app_token: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> Result<()> {
        if *self.fail_creates.lock().unwrap() {
            anyhow::bail!("mock table failure");
        }
        self.created.lock().unwrap().push(CreatedRecord {
            app_token: app_token.to_string(),
            table_id: table_id.to_string(),
            fields,
        });
        Ok(())
    }
}

// =============================================================================
// Mock Repository Content Service
// =============================================================================

/// A successful write captured by the mock
#[derive(Debug, Clone)]
pub struct RepoWrite {
    pub path: String,
    pub message: String,
    pub content: String,
    pub sha: String,
}

/// In-memory single file with compare-and-swap writes.
///
/// Every accepted write bumps the sha, so a write carrying a stale sha is
/// rejected with `RepoWriteError::Conflict` exactly like the real API.
#[derive(Default)]
pub struct MockRepoContentService {
    file: Mutex<Option<RepoFile>>,
    revision: Mutex<u64>,
    /// Contents another writer commits just before our next write lands
    concurrent_edits: Mutex<VecDeque<String>>,
    writes: Mutex<Vec<RepoWrite>>,
    reads: Mutex<usize>,
    fail_writes: Mutex<bool>,
}

impl MockRepoContentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_file(&self, content: &str) {
        let sha = self.next_sha();
        *self.file.lock().unwrap() = Some(RepoFile {
            content: content.to_string(),
            sha,
        });
    }

    /// Queue an edit by some other writer that lands between our read and write
    pub fn push_concurrent_edit(&self, content: &str) {
        self.concurrent_edits
            .lock()
            .unwrap()
            .push_back(content.to_string());
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn current(&self) -> Option<RepoFile> {
        self.file.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<RepoWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        *self.reads.lock().unwrap()
    }

    fn next_sha(&self) -> String {
        let mut revision = self.revision.lock().unwrap();
        *revision += 1;
        format!("sha-{}", *revision)
    }
}

#[async_trait]
impl BaseRepoContentService for MockRepoContentService {
    async fn get_file(&self, path: &str) -> Result<RepoFile> {
        *self.reads.lock().unwrap() += 1;
        self.file
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("{} not found", path))
    }

    async fn put_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
    ) -> std::result::Result<(), RepoWriteError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(RepoWriteError::Other(anyhow::anyhow!("mock write failure")));
        }

        let concurrent = self.concurrent_edits.lock().unwrap().pop_front();
        if let Some(other) = concurrent {
            self.set_file(&other);
        }

        let current_sha = self.file.lock().unwrap().as_ref().map(|f| f.sha.clone());
        if current_sha.as_deref() != Some(sha) {
            return Err(RepoWriteError::Conflict);
        }

        let new_sha = self.next_sha();
        *self.file.lock().unwrap() = Some(RepoFile {
            content: content.to_string(),
            sha: new_sha,
        });
        self.writes.lock().unwrap().push(RepoWrite {
            path: path.to_string(),
            message: message.to_string(),
            content: content.to_string(),
            sha: sha.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock Email Service
// =============================================================================

#[derive(Default)]
pub struct MockEmailService {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: Mutex<bool>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_sends(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseEmailService for MockEmailService {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("mock email failure");
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks plus the settings the workflow reads.
///
/// Keep this value around for assertions and hand `server_deps()` to the code
/// under test.
pub struct TestDependencies {
    pub chat: Arc<MockChatService>,
    pub tables: Arc<MockTableService>,
    pub repo: Arc<MockRepoContentService>,
    pub email: Arc<MockEmailService>,
    pub settings: BannerSettings,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            chat: Arc::new(MockChatService::new()),
            tables: Arc::new(MockTableService::new()),
            repo: Arc::new(MockRepoContentService::new()),
            email: Arc::new(MockEmailService::new()),
            settings: BannerSettings {
                approve_card_id: "card_banner_approve".to_string(),
                approve_group_id: "oc_banner_approvers".to_string(),
                bitable_app_token: "bascn_banner".to_string(),
                application_table_id: "tbl_application".to_string(),
                usage_table_id: "tbl_usage".to_string(),
                app_config_path: "public/app_config.toml".to_string(),
                dev_email: None,
            },
        }
    }

    pub fn with_dev_email(mut self, email: &str) -> Self {
        self.settings.dev_email = Some(email.to_string());
        self
    }

    pub fn with_config_file(self, content: &str) -> Self {
        self.repo.set_file(content);
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.chat.clone(),
            self.tables.clone(),
            self.repo.clone(),
            self.email.clone(),
            self.settings.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
