use std::io::{self, BufRead, Write};

use crate::report::report_model::RunReport;

/// Pause point between auto-fill and closing the page, where the operator
/// finishes whatever the run could not (uploads, unmatched questions).
pub trait CompletionGate {
    fn await_completion(&mut self, report: &RunReport);
}

/// Blocks on a line from stdin. A read error is logged and treated as
/// confirmation.
pub struct StdinGate;

impl CompletionGate for StdinGate {
    fn await_completion(&mut self, report: &RunReport) {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        let _ = writeln!(out);
        for block in report.unresolved() {
            let label = block.label.as_deref().unwrap_or("(no label)");
            let _ = writeln!(out, "  needs attention: [{}] {}", block.index, label);
        }
        let _ = write!(
            out,
            "Complete any manual uploads in the browser, then press Enter to close it... "
        );
        let _ = out.flush();
        drop(out);

        let mut line = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut line) {
            tracing::warn!(error = %e, "could not read confirmation, closing anyway");
        }
    }
}

/// Continues immediately. Used with `--no-pause` and in tests.
#[derive(Debug, Default)]
pub struct AutoContinue {
    pub calls: usize,
}

impl CompletionGate for AutoContinue {
    fn await_completion(&mut self, _report: &RunReport) {
        self.calls += 1;
    }
}
