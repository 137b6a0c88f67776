use std::collections::HashMap;
use std::time::Instant;

use crate::browser::driver::{ElementHandle, PageDriver};
use crate::browser::error::DriverError;
use crate::form::block_model::{FormBlock, WidgetKind};
use crate::form::classifier::{FormSelectors, classify, probe_block};
use crate::form::filler::fill_widget;
use crate::form::outcome::{BlockOutcome, FillError, SkipReason};
use crate::matching::normalize::normalize;
use crate::matching::resolver::{MatchResult, Resolver};
use crate::record::field_record::FieldRecord;
use crate::report::report_model::RunReport;
use crate::runner::checkpoint::CompletionGate;
use crate::trace::{logger::TraceLogger, trace::BlockTraceEvent};

/// Grace period before enumerating blocks, in milliseconds.
pub const DEFAULT_LOAD_GRACE_MS: u64 = 3000;

/// Knobs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub load_grace_ms: u64,
    pub widget_order: Vec<WidgetKind>,
    pub selectors: FormSelectors,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            load_grace_ms: DEFAULT_LOAD_GRACE_MS,
            widget_order: WidgetKind::DEFAULT_ORDER.to_vec(),
            selectors: FormSelectors::default(),
        }
    }
}

/// What happened to one question block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockReport {
    pub index: usize,
    pub label: Option<String>,
    pub normalized_label: Option<String>,
    /// `None` when the run never got as far as resolving the label
    pub matched: Option<MatchResult>,
    /// `None` when the block was never classified
    pub widget: Option<WidgetKind>,
    pub outcome: BlockOutcome,
}

impl BlockReport {
    fn new(block: &FormBlock) -> Self {
        Self {
            index: block.index,
            label: block.label.clone(),
            normalized_label: block.label.as_deref().map(normalize),
            matched: None,
            widget: None,
            outcome: BlockOutcome::Skipped(SkipReason::MissingLabel),
        }
    }

    fn with_outcome(mut self, outcome: BlockOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Record key the block was filled from, if any.
    pub fn matched_key(&self) -> Option<&str> {
        self.matched.as_ref().and_then(|m| m.key.as_deref())
    }
}

/// Fills every question block on a loaded page from one field record.
///
/// Blocks are handled one at a time in document order; each driver call
/// completes before the next starts, and a failing block never stops the
/// ones after it.
pub struct FormRunner<'a> {
    resolver: &'a Resolver,
    settings: &'a RunSettings,
    tracer: Option<&'a TraceLogger>,
}

impl<'a> FormRunner<'a> {
    pub fn new(resolver: &'a Resolver, settings: &'a RunSettings) -> Self {
        Self {
            resolver,
            settings,
            tracer: None,
        }
    }

    pub fn with_tracer(mut self, tracer: &'a TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Fill the page and return one report per block, in block order.
    ///
    /// Errors only when the page cannot be waited on or its blocks cannot be
    /// listed at all.
    pub fn run<P: PageDriver + ?Sized>(
        &self,
        page: &mut P,
        record: &FieldRecord,
    ) -> Result<Vec<BlockReport>, DriverError> {
        page.wait_idle(self.settings.load_grace_ms)?;

        let handles = page.query_all(&self.settings.selectors.block, None)?;
        tracing::info!(blocks = handles.len(), fields = record.len(), "filling form");

        let keys = record.keys();
        let fingerprint = record.fingerprint();
        let mut claimed: HashMap<String, usize> = HashMap::new();
        let mut reports = Vec::with_capacity(handles.len());

        for (index, handle) in handles.into_iter().enumerate() {
            let report = self.process_block(page, index, handle, record, &keys);

            if let Some(key) = report.matched_key() {
                if let Some(first) = claimed.get(key) {
                    tracing::debug!(key, first_block = first, block = index, "record key used by more than one block");
                } else {
                    claimed.insert(key.to_string(), index);
                }
            }

            if let Some(tracer) = self.tracer {
                tracer.log(
                    &BlockTraceEvent::now(&fingerprint, report.index)
                        .with_label(report.label.as_deref())
                        .with_match(report.matched.as_ref())
                        .with_widget(report.widget)
                        .with_outcome(&report.outcome),
                );
            }

            reports.push(report);
        }

        Ok(reports)
    }

    /// Run, hand control to `gate` for manual completion, then close the page.
    pub fn run_to_completion<P, G>(
        &self,
        page: &mut P,
        record: &FieldRecord,
        gate: &mut G,
    ) -> Result<RunReport, DriverError>
    where
        P: PageDriver + ?Sized,
        G: CompletionGate + ?Sized,
    {
        let start = Instant::now();
        let blocks = match self.run(page, record) {
            Ok(blocks) => blocks,
            Err(e) => {
                let _ = page.close();
                return Err(e);
            }
        };

        let report = RunReport::from_blocks(&record.fingerprint(), blocks)
            .with_duration(start.elapsed().as_millis());

        gate.await_completion(&report);

        page.close()?;
        Ok(report)
    }

    fn process_block<P: PageDriver + ?Sized>(
        &self,
        page: &mut P,
        index: usize,
        handle: ElementHandle,
        record: &FieldRecord,
        keys: &[&str],
    ) -> BlockReport {
        let label = match read_label(page, &handle, &self.settings.selectors) {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!(block = index, error = %e, "could not read block label");
                let block = FormBlock { index, label: None, handle };
                return BlockReport::new(&block)
                    .with_outcome(BlockOutcome::Error(FillError::InteractionFailure(e.to_string())));
            }
        };

        let block = FormBlock { index, label, handle };
        let report = BlockReport::new(&block);

        let Some(label) = block.label.as_deref() else {
            tracing::warn!(block = index, "block has no label");
            return report;
        };

        let matched = self.resolver.resolve(label, keys);
        let mut report = BlockReport {
            matched: Some(matched.clone()),
            ..report
        };

        let Some(key) = matched.key else {
            tracing::warn!(
                block = index,
                label,
                cleaned = report.normalized_label.as_deref().unwrap_or(""),
                best_score = matched.score,
                "no match found"
            );
            return report.with_outcome(BlockOutcome::Skipped(SkipReason::NoMatchFound));
        };

        let Some(value) = record.value_text(&key) else {
            tracing::warn!(block = index, label, key = %key, "alias points at a key the record lacks");
            return report.with_outcome(BlockOutcome::Error(FillError::MissingRecordValue { key }));
        };

        let probe = match probe_block(page, &block.handle, &self.settings.selectors) {
            Ok(probe) => probe,
            Err(e) => {
                tracing::warn!(block = index, label, error = %e, "probing block failed");
                return report
                    .with_outcome(BlockOutcome::Error(FillError::InteractionFailure(e.to_string())));
            }
        };

        let widget = classify(label, &probe, &self.settings.widget_order);
        report.widget = Some(widget.kind());

        let outcome = fill_widget(page, &widget, &value, &self.settings.selectors);
        match &outcome {
            BlockOutcome::Filled { kind, .. } => {
                tracing::info!(block = index, label, key = %key, widget = %kind, "filled");
            }
            BlockOutcome::Skipped(reason) => {
                tracing::warn!(block = index, label, key = %key, reason = %reason, "skipped");
            }
            BlockOutcome::Error(error) => {
                tracing::warn!(block = index, label, key = %key, error = %error, "block error");
            }
        }

        report.with_outcome(outcome)
    }
}

/// Trimmed heading text of a block; `None` when there is no heading or it
/// is blank.
fn read_label<P: PageDriver + ?Sized>(
    page: &mut P,
    block: &ElementHandle,
    selectors: &FormSelectors,
) -> Result<Option<String>, DriverError> {
    let Some(heading) = page.query_first(&selectors.heading, Some(block))? else {
        return Ok(None);
    };
    Ok(page
        .text_content(&heading)?
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty()))
}
