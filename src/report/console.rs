use crate::form::outcome::BlockOutcome;
use crate::matching::resolver::MatchStrategy;
use crate::report::report_model::RunReport;
use crate::runner::orchestrator::BlockReport;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a run report for terminal output.
///
/// Produces output like:
/// ```text
/// === Form fill: https://forms.example.com/apply ===
///
/// ✓ FILLED   [0] Full Name → fullName (text, token-sort 100)
/// - SKIPPED  [1] Resume — no match found
/// ✗ ERROR    [2] Date of Birth → dob — malformed date value '1990-02-01': expected day/month/year
///
/// === Results: 1 filled, 1 skipped, 1 failed (3 blocks) ===
/// ```
pub fn format_console_report(report: &RunReport) -> String {
    let mut out = String::new();

    let target = report.url.as_deref().unwrap_or("(current page)");
    out.push_str(&format!("=== Form fill: {} ===\n\n", target));

    for block in &report.blocks {
        out.push_str(&format_block_line(block));
        out.push('\n');
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} filled, {} skipped, {} failed ({} blocks)",
        report.filled, report.skipped, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}

fn format_block_line(block: &BlockReport) -> String {
    let label = block.label.as_deref().unwrap_or("(no label)");
    let key = block
        .matched
        .as_ref()
        .and_then(|m| m.key.as_deref())
        .map(|k| format!(" \u{2192} {}", k))
        .unwrap_or_default();

    match &block.outcome {
        BlockOutcome::Filled { kind, .. } => {
            let how = block
                .matched
                .as_ref()
                .map(|m| format!(", {} {:.0}", strategy_name(m.strategy), m.score))
                .unwrap_or_default();
            format!(
                "\u{2713} FILLED   [{}] {}{} ({}{})",
                block.index, label, key, kind, how
            )
        }
        BlockOutcome::Skipped(reason) => {
            format!("- SKIPPED  [{}] {}{} \u{2014} {}", block.index, label, key, reason)
        }
        BlockOutcome::Error(error) => {
            format!("\u{2717} ERROR    [{}] {}{} \u{2014} {}", block.index, label, key, error)
        }
    }
}

fn strategy_name(strategy: MatchStrategy) -> &'static str {
    match strategy {
        MatchStrategy::ManualAlias => "alias",
        MatchStrategy::FuzzyTokenSort => "token-sort",
        MatchStrategy::FuzzyPartial => "partial",
        MatchStrategy::None => "none",
    }
}
