use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Where a decided application ends up. The pending state is never stored:
/// it lives in the approval card until an operator clicks a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStatus {
    Approved,
    Disapproved,
}

impl BannerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Disapproved => "disapproved",
        }
    }
}

impl fmt::Display for BannerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CardDecision> for BannerStatus {
    fn from(decision: CardDecision) -> Self {
        match decision {
            CardDecision::Approve => Self::Approved,
            CardDecision::Disapprove => Self::Disapproved,
        }
    }
}

/// The operator's choice, carried in the button value's `action` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardDecision {
    Approve,
    Disapprove,
}

impl CardDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Disapprove => "disapprove",
        }
    }
}

impl fmt::Display for CardDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action type: {0}")]
pub struct UnknownDecision(pub String);

impl FromStr for CardDecision {
    type Err = UnknownDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "disapprove" => Ok(Self::Disapprove),
            other => Err(UnknownDecision(other.to_string())),
        }
    }
}
