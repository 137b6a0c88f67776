use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::form::block_model::WidgetKind;

/// Why a block was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Block has no heading to resolve
    MissingLabel,
    /// No record key reached the confidence threshold
    NoMatchFound,
    /// Choice widget has no option equal to the record value
    OptionNotFound,
    /// None of the widget probes matched
    UnhandledType,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingLabel => "missing label",
            SkipReason::NoMatchFound => "no match found",
            SkipReason::OptionNotFound => "no matching option",
            SkipReason::UnhandledType => "unhandled type",
        };
        f.write_str(text)
    }
}

/// Failures contained at block level.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FillError {
    #[error("malformed date value '{value}': expected day/month/year")]
    MalformedDateValue { value: String },

    #[error("record has no value for key '{key}'")]
    MissingRecordValue { key: String },

    #[error("interaction failed: {0}")]
    InteractionFailure(String),
}

/// What happened to one block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOutcome {
    /// `value` is what was typed or the option label that was clicked
    Filled { kind: WidgetKind, value: String },
    Skipped(SkipReason),
    Error(FillError),
}

impl BlockOutcome {
    pub fn filled(kind: WidgetKind, value: impl Into<String>) -> Self {
        BlockOutcome::Filled {
            kind,
            value: value.into(),
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, BlockOutcome::Filled { .. })
    }

    /// Short status word for reports and traces.
    pub fn status(&self) -> &'static str {
        match self {
            BlockOutcome::Filled { .. } => "filled",
            BlockOutcome::Skipped(_) => "skipped",
            BlockOutcome::Error(_) => "error",
        }
    }

    /// Reason or error text; `None` for filled blocks.
    pub fn detail(&self) -> Option<String> {
        match self {
            BlockOutcome::Filled { .. } => None,
            BlockOutcome::Skipped(reason) => Some(reason.to_string()),
            BlockOutcome::Error(error) => Some(error.to_string()),
        }
    }
}
