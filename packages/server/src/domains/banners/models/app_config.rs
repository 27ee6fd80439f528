//! The remote app-content TOML file.
//!
//! [`AppContentConfig`] is the typed view used to validate the file.
//! [`BannerConfigDocument`] edits it in place so everything outside the
//! appended banner keeps its bytes, comments included.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml_edit::{ArrayOfTables, DocumentMut, InlineTable, Item, Table};

use super::banner::Banner;

const BANNERS_KEY: &str = "banners";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppContentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_log: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_tag_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub banners: Vec<Banner>,
    /// Semester id to start date. Values stay loose since both TOML dates
    /// and strings show up in practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester_start_date: Option<BTreeMap<String, toml::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celebrations: Option<Vec<Celebration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<BTreeMap<String, toml::Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Celebration {
    pub date: String,
    #[serde(default)]
    pub words: Vec<String>,
}

impl AppContentConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigDocumentError> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigDocumentError {
    #[error("config file is not valid TOML: {0}")]
    Syntax(#[from] toml_edit::TomlError),

    #[error("config file does not match the app content schema: {0}")]
    Schema(#[from] toml::de::Error),

    #[error("`banners` must be an array of tables, found {0}")]
    UnexpectedBannersType(&'static str),
}

/// Editable form of the config file.
#[derive(Debug, Clone)]
pub struct BannerConfigDocument {
    doc: DocumentMut,
}

impl BannerConfigDocument {
    /// Parse the file and check it against [`AppContentConfig`].
    pub fn parse(content: &str) -> Result<Self, ConfigDocumentError> {
        let doc = content.parse::<DocumentMut>()?;
        AppContentConfig::parse(content)?;
        Ok(Self { doc })
    }

    /// Append one banner after the existing ones.
    ///
    /// Works with both `[[banners]]` sections and an inline `banners = [..]`
    /// array; a file without the key gets a new `[[banners]]` section.
    pub fn append_banner(&mut self, banner: &Banner) -> Result<(), ConfigDocumentError> {
        if !self.doc.contains_key(BANNERS_KEY) {
            self.doc
                .insert(BANNERS_KEY, Item::ArrayOfTables(ArrayOfTables::new()));
        }

        match self.doc.get_mut(BANNERS_KEY) {
            Some(Item::ArrayOfTables(tables)) => {
                let mut table = Table::new();
                table.insert("title", toml_edit::value(banner.title.as_str()));
                table.insert("action", toml_edit::value(banner.action.as_str()));
                table.insert("button", toml_edit::value(banner.button.as_str()));
                tables.push(table);
            }
            Some(Item::Value(toml_edit::Value::Array(array))) => {
                let mut table = InlineTable::new();
                table.insert("title", banner.title.as_str().into());
                table.insert("action", banner.action.as_str().into());
                table.insert("button", banner.button.as_str().into());
                array.push(table);
            }
            Some(other) => {
                return Err(ConfigDocumentError::UnexpectedBannersType(
                    other.type_name(),
                ))
            }
            None => return Err(ConfigDocumentError::UnexpectedBannersType("none")),
        }

        AppContentConfig::parse(&self.doc.to_string())?;
        Ok(())
    }
}

impl fmt::Display for BannerConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.doc)
    }
}
