use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::banner::BannerApplication;
use crate::domains::banners::data::usage_fields;

/// One row of the usage-log table, written when a banner goes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerUsageLog {
    pub application: BannerApplication,
    pub start_date: Option<DateTime<Utc>>,
    /// Left open until an operator takes the banner down.
    pub end_date: Option<DateTime<Utc>>,
}

impl BannerUsageLog {
    /// Log entry starting now with no end date.
    pub fn started(application: BannerApplication, at: DateTime<Utc>) -> Self {
        Self {
            application,
            start_date: Some(at),
            end_date: None,
        }
    }

    /// Bitable fields for this row. Date columns take epoch milliseconds;
    /// unset dates are left out so the cells stay empty.
    pub fn to_fields(&self) -> Map<String, Value> {
        let banner = &self.application.banner;
        let mut fields = Map::new();
        fields.insert(usage_fields::TITLE.to_string(), banner.title.clone().into());
        fields.insert(
            usage_fields::APPLICANT_EMAIL.to_string(),
            self.application.applicant_email.clone().into(),
        );
        fields.insert(usage_fields::ACTION.to_string(), banner.action.clone().into());
        fields.insert(usage_fields::BUTTON.to_string(), banner.button.clone().into());
        if let Some(start) = self.start_date {
            fields.insert(
                usage_fields::START_DATE.to_string(),
                start.timestamp_millis().into(),
            );
        }
        if let Some(end) = self.end_date {
            fields.insert(
                usage_fields::END_DATE.to_string(),
                end.timestamp_millis().into(),
            );
        }
        fields
    }
}
