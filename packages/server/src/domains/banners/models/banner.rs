use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::common::{is_valid_email, record_link, record_text};
use crate::domains::banners::data::{application_fields, card_keys};
use crate::kernel::AppTableRecord;

/// A banner slot as the client app reads it from `[[banners]]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub action: String,
    pub button: String,
}

/// A banner together with the address that asked for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BannerApplication {
    #[serde(flatten)]
    pub banner: Banner,
    pub applicant_email: String,
}

impl BannerApplication {
    pub fn title(&self) -> &str {
        &self.banner.title
    }

    /// Variables rendered into the approval card. The card's buttons echo
    /// these back so a click carries the whole application.
    pub fn card_variables(&self) -> Map<String, Value> {
        let mut variables = Map::new();
        variables.insert(
            card_keys::BANNER_TITLE.to_string(),
            Value::String(self.banner.title.clone()),
        );
        variables.insert(
            card_keys::BANNER_ACTION.to_string(),
            Value::String(self.banner.action.clone()),
        );
        variables.insert(
            card_keys::BANNER_BUTTON.to_string(),
            Value::String(self.banner.button.clone()),
        );
        variables.insert(
            card_keys::APPLICANT_EMAIL.to_string(),
            Value::String(self.applicant_email.clone()),
        );
        variables
    }
}

/// Column names an application is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationFieldNames {
    pub title: &'static str,
    pub action: &'static str,
    pub button: &'static str,
    pub applicant_email: &'static str,
}

impl Default for ApplicationFieldNames {
    fn default() -> Self {
        Self {
            title: application_fields::TITLE,
            action: application_fields::ACTION,
            button: application_fields::BUTTON,
            applicant_email: application_fields::APPLICANT_EMAIL,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordConversionError {
    #[error("record {record_id} is missing field {field:?}")]
    MissingField {
        record_id: String,
        field: &'static str,
    },

    #[error("record {record_id} has an invalid applicant email {email:?}")]
    InvalidEmail { record_id: String, email: String },
}

/// Build an application from a questionnaire row.
///
/// Cells may be plain strings or rich-text segments. The action column is
/// usually a hyperlink, so its link target wins over the display text.
pub fn application_from_record(
    record: &AppTableRecord,
    names: &ApplicationFieldNames,
) -> Result<BannerApplication, RecordConversionError> {
    let missing = |field: &'static str| RecordConversionError::MissingField {
        record_id: record.record_id.clone(),
        field,
    };

    let title = record_text(&record.fields, names.title).ok_or_else(|| missing(names.title))?;
    let action = record_link(&record.fields, names.action).ok_or_else(|| missing(names.action))?;
    let button = record_text(&record.fields, names.button).ok_or_else(|| missing(names.button))?;
    let email = record_text(&record.fields, names.applicant_email)
        .ok_or_else(|| missing(names.applicant_email))?;

    let email = email.trim_start_matches("mailto:").trim().to_string();
    if !is_valid_email(&email) {
        return Err(RecordConversionError::InvalidEmail {
            record_id: record.record_id.clone(),
            email,
        });
    }

    Ok(BannerApplication {
        banner: Banner {
            title,
            action,
            button,
        },
        applicant_email: email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: Value) -> AppTableRecord {
        AppTableRecord {
            record_id: "rec_1".to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn converts_rich_text_row() {
        let row = record(json!({
            "Banner": [{"type": "text", "text": "春季招新"}],
            "action": {"link": "https://danxi.fduhole.com/recruit", "text": "报名"},
            "button": "去看看",
            "联系邮箱": [{"type": "text", "text": " alice@fudan.edu.cn "}]
        }));

        let application = application_from_record(&row, &ApplicationFieldNames::default())
            .expect("row should convert");

        assert_eq!(application.banner.title, "春季招新");
        assert_eq!(application.banner.action, "https://danxi.fduhole.com/recruit");
        assert_eq!(application.banner.button, "去看看");
        assert_eq!(application.applicant_email, "alice@fudan.edu.cn");
    }

    #[test]
    fn reports_the_missing_column() {
        let row = record(json!({
            "Banner": "title",
            "action": "https://example.com",
            "联系邮箱": "alice@example.com"
        }));

        let err = application_from_record(&row, &ApplicationFieldNames::default()).unwrap_err();
        assert_eq!(
            err,
            RecordConversionError::MissingField {
                record_id: "rec_1".to_string(),
                field: "button",
            }
        );
    }

    #[test]
    fn rejects_malformed_email() {
        let row = record(json!({
            "Banner": "title",
            "action": "https://example.com",
            "button": "Go",
            "联系邮箱": "not-an-email"
        }));

        assert!(matches!(
            application_from_record(&row, &ApplicationFieldNames::default()),
            Err(RecordConversionError::InvalidEmail { .. })
        ));
    }

    #[test]
    fn accepts_mailto_links() {
        let row = record(json!({
            "Banner": "title",
            "action": "https://example.com",
            "button": "Go",
            "联系邮箱": {"link": "mailto:bob@example.com", "text": "mailto:bob@example.com"}
        }));

        let application =
            application_from_record(&row, &ApplicationFieldNames::default()).unwrap();
        assert_eq!(application.applicant_email, "bob@example.com");
    }

    #[test]
    fn card_variables_use_template_keys() {
        let application = BannerApplication {
            banner: Banner {
                title: "t".to_string(),
                action: "a".to_string(),
                button: "b".to_string(),
            },
            applicant_email: "e@example.com".to_string(),
        };

        assert_eq!(
            Value::Object(application.card_variables()),
            json!({
                "banner_title": "t",
                "banner_action": "a",
                "banner_button": "b",
                "applicant_email": "e@example.com"
            })
        );
    }
}
