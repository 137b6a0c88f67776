use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    form::{block_model::WidgetKind, outcome::BlockOutcome},
    matching::resolver::{MatchResult, MatchStrategy},
};

/// One line of the fill trace. Record values are never written; runs are
/// correlated through the record fingerprint.
#[derive(Debug, Serialize)]
pub struct BlockTraceEvent {
    pub timestamp_ms: u128,
    pub record_fingerprint: String,
    pub block_index: usize,

    pub label: Option<String>,

    pub matched_key: Option<String>,
    pub score: Option<f64>,
    pub strategy: Option<MatchStrategy>,

    pub widget: Option<WidgetKind>,
    pub status: String,
    pub detail: Option<String>,
}

impl BlockTraceEvent {
    pub fn now(record_fingerprint: &str, block_index: usize) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            record_fingerprint: record_fingerprint.to_string(),
            block_index,
            label: None,
            matched_key: None,
            score: None,
            strategy: None,
            widget: None,
            status: String::new(),
            detail: None,
        }
    }

    pub fn with_label(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_string);
        self
    }

    pub fn with_match(mut self, matched: Option<&MatchResult>) -> Self {
        if let Some(m) = matched {
            self.matched_key = m.key.clone();
            self.score = Some(m.score);
            self.strategy = Some(m.strategy);
        }
        self
    }

    pub fn with_widget(mut self, widget: Option<WidgetKind>) -> Self {
        self.widget = widget;
        self
    }

    pub fn with_outcome(mut self, outcome: &BlockOutcome) -> Self {
        self.status = outcome.status().to_string();
        self.detail = outcome.detail();
        self
    }
}
