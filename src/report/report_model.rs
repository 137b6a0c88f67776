use crate::form::outcome::BlockOutcome;
use crate::runner::orchestrator::BlockReport;

// ============================================================================
// Run report: per-block results of one fill run
// ============================================================================

/// Aggregated report for one form-fill run.
///
/// Built from the runner's `Vec<BlockReport>` via `from_blocks()` and
/// consumed by the console reporter and the completion checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Page the run targeted, when known
    pub url: Option<String>,

    /// SHA-1 of the field record used
    pub record_fingerprint: String,

    pub total: usize,
    pub filled: usize,
    pub skipped: usize,
    pub failed: usize,

    /// Total execution duration in milliseconds (optional)
    pub duration_ms: Option<u128>,

    /// Per-block results in document order
    pub blocks: Vec<BlockReport>,
}

impl RunReport {
    /// Build a run report, computing the filled/skipped/failed counts.
    pub fn from_blocks(record_fingerprint: &str, blocks: Vec<BlockReport>) -> Self {
        let total = blocks.len();
        let filled = blocks.iter().filter(|b| b.outcome.is_filled()).count();
        let failed = blocks
            .iter()
            .filter(|b| matches!(b.outcome, BlockOutcome::Error(_)))
            .count();
        Self {
            url: None,
            record_fingerprint: record_fingerprint.to_string(),
            total,
            filled,
            skipped: total - filled - failed,
            failed,
            duration_ms: None,
            blocks,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Blocks the operator has to look at: everything not filled.
    pub fn unresolved(&self) -> impl Iterator<Item = &BlockReport> {
        self.blocks.iter().filter(|b| !b.outcome.is_filled())
    }

    pub fn all_filled(&self) -> bool {
        self.filled == self.total
    }
}
