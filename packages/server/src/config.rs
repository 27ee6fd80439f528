use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::banners::BannerSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,

    // Lark app credentials and the shared callback token
    pub lark_app_id: String,
    pub lark_app_secret: String,
    pub lark_verification_token: String,
    pub lark_base_url: Option<String>,

    // Mail is sent on behalf of a user mailbox
    pub lark_user_access_token: Option<String>,
    pub lark_mail_sender: String,
    pub lark_mail_sender_name: Option<String>,

    pub banner_approve_card_id: String,
    pub banner_bitable_app_token: String,
    pub banner_application_table_id: String,
    pub banner_usage_table_id: String,
    pub banner_approve_group_id: String,
    pub dev_email: Option<String>,

    pub github_token: String,
    pub github_repo_owner: String,
    pub github_repo_name: String,
    pub github_app_config_path: String,
    pub github_branch: Option<String>,
    pub github_base_url: Option<String>,
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    let value = lookup(name).with_context(|| format!("{} must be set", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("{} must not be empty", name);
    }
    Ok(value)
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| required(&lookup, name);
        let optional = |name: &str| optional(&lookup, name);

        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            lark_app_id: required("LARK_APP_ID")?,
            lark_app_secret: required("LARK_APP_SECRET")?,
            lark_verification_token: required("LARK_VERIFICATION_TOKEN")?,
            lark_base_url: optional("LARK_BASE_URL"),
            lark_user_access_token: optional("LARK_USER_ACCESS_TOKEN"),
            lark_mail_sender: optional("LARK_MAIL_SENDER").unwrap_or_else(|| "me".to_string()),
            lark_mail_sender_name: optional("LARK_MAIL_SENDER_NAME"),
            banner_approve_card_id: required("LARK_BANNER_APPROVE_CARD_ID")?,
            banner_bitable_app_token: required("LARK_BANNER_BITABLE_APP_TOKEN")?,
            banner_application_table_id: required("LARK_BANNER_BITABLE_APPLICATION_TABLE_ID")?,
            banner_usage_table_id: required("LARK_BANNER_BITABLE_USAGE_TABLE_ID")?,
            banner_approve_group_id: required("LARK_BANNER_APPROVE_GROUP_ID")?,
            dev_email: optional("DANTA_DEV_EMAIL"),
            github_token: required("GITHUB_PERSONAL_ACCESS_TOKEN")?,
            github_repo_owner: required("GITHUB_DANXI_REPO_OWNER")?,
            github_repo_name: required("GITHUB_DANXI_REPO_NAME")?,
            github_app_config_path: required("GITHUB_DANXI_REPO_APP_CONFIG_PATH")?,
            github_branch: optional("GITHUB_DANXI_REPO_BRANCH"),
            github_base_url: optional("GITHUB_API_BASE_URL"),
        })
    }

    /// The subset of configuration the banner workflow reads at runtime.
    pub fn banner_settings(&self) -> BannerSettings {
        BannerSettings {
            approve_card_id: self.banner_approve_card_id.clone(),
            approve_group_id: self.banner_approve_group_id.clone(),
            bitable_app_token: self.banner_bitable_app_token.clone(),
            application_table_id: self.banner_application_table_id.clone(),
            usage_table_id: self.banner_usage_table_id.clone(),
            app_config_path: self.github_app_config_path.clone(),
            dev_email: self.dev_email.clone(),
        }
    }
}
