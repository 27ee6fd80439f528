pub mod app_config;
pub mod banner;
pub mod status;
pub mod usage_log;

pub use app_config::{AppContentConfig, BannerConfigDocument, Celebration, ConfigDocumentError};
pub use banner::{
    application_from_record, ApplicationFieldNames, Banner, BannerApplication,
    RecordConversionError,
};
pub use status::{BannerStatus, CardDecision, UnknownDecision};
pub use usage_log::BannerUsageLog;
