//! Banners domain - approval of banner applications submitted through a
//! Lark questionnaire.
//!
//! Flow:
//!   bitable record added → approval card in the operators' group
//!   → button click → banner appended to the app config on GitHub
//!   → usage log row + mail to the applicant

pub mod actions;
pub mod data;
pub mod events;
pub mod models;

pub use actions::*;
pub use data::BannerSettings;
pub use events::BannerApprovalEvent;
pub use models::{Banner, BannerApplication, BannerStatus, CardDecision};
