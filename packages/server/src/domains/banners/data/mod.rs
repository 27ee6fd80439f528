//! Static wiring for the banner workflow: where things live on Lark/GitHub
//! and the names shared with the card template and the bitable tables.

/// Identifiers the workflow needs at runtime, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerSettings {
    /// Card-builder template rendered for each application
    pub approve_card_id: String,
    /// Group chat where operators approve or disapprove
    pub approve_group_id: String,
    /// Bitable app holding both the application and usage tables
    pub bitable_app_token: String,
    pub application_table_id: String,
    pub usage_table_id: String,
    /// Path of the TOML file inside the repository
    pub app_config_path: String,
    /// Developer copied on approval mails
    pub dev_email: Option<String>,
}

/// Column names of the application table (the questionnaire form).
pub mod application_fields {
    pub const TITLE: &str = "Banner";
    pub const ACTION: &str = "action";
    pub const BUTTON: &str = "button";
    pub const APPLICANT_EMAIL: &str = "联系邮箱";
}

/// Column names of the usage-log table.
pub mod usage_fields {
    pub const TITLE: &str = "Banner";
    pub const START_DATE: &str = "开始日期";
    pub const END_DATE: &str = "截止日期";
    pub const APPLICANT_EMAIL: &str = "联系邮箱";
    pub const ACTION: &str = "action";
    pub const BUTTON: &str = "button";
}

/// Keys shared by the card template variables and the button values.
///
/// The approve/disapprove buttons are configured in the card builder to echo
/// the template variables back together with an `action` key.
pub mod card_keys {
    pub const ACTION: &str = "action";
    pub const BANNER_TITLE: &str = "banner_title";
    pub const BANNER_ACTION: &str = "banner_action";
    pub const BANNER_BUTTON: &str = "banner_button";
    pub const APPLICANT_EMAIL: &str = "applicant_email";
}

/// Button tag Lark reports for clicks on a button component.
pub const BUTTON_TAG: &str = "button";

/// Attempts at the read-modify-write cycle before giving up on a busy file.
pub const MAX_PUBLISH_ATTEMPTS: usize = 3;
