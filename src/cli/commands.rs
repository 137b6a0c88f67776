use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, build_resolver, build_run_settings, build_session_options};
use crate::matching::normalize::normalize;
use crate::matching::resolver::MatchStrategy;
use crate::record::loader::load_record;
use crate::report::console::format_console_report;
use crate::report::report_model::RunReport;
use crate::runner::checkpoint::{AutoContinue, CompletionGate, StdinGate};
use crate::runner::orchestrator::FormRunner;
use crate::trace::logger::TraceLogger;

// ============================================================================
// Logging
// ============================================================================

/// Install the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

// ============================================================================
// fill subcommand
// ============================================================================

pub struct FillArgs<'a> {
    pub url: &'a str,
    pub record: &'a str,
    pub no_pause: bool,
    pub trace: Option<&'a str>,
    pub threshold: Option<f64>,
    pub headless: bool,
}

/// Fill one form and return the run report.
pub fn cmd_fill(
    args: &FillArgs<'_>,
    config: &AppConfig,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    let record = load_record(args.record)?;
    let resolver = build_resolver(&config.matching, args.threshold);
    let settings = build_run_settings(&config.form);
    let options = build_session_options(&config.driver, args.headless);

    let tracer = match args.trace.or(config.trace.path.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    if tracer.is_enabled() {
        tracing::debug!(fingerprint = %record.fingerprint(), "tracing block outcomes");
    }

    tracing::info!(url = args.url, fields = record.len(), "launching browser");
    let mut session = BrowserSession::launch(&options)?;
    session.navigate(args.url)?;

    let runner = FormRunner::new(&resolver, &settings).with_tracer(&tracer);

    let mut stdin_gate = StdinGate;
    let mut auto_gate = AutoContinue::default();
    let inner: &mut dyn CompletionGate = if args.no_pause {
        &mut auto_gate
    } else {
        &mut stdin_gate
    };
    let mut gate = PrintReport {
        url: args.url,
        inner,
    };

    let report = runner.run_to_completion(&mut session, &record, &mut gate)?;
    Ok(report.with_url(args.url))
}

/// Prints the console report before handing over to the wrapped gate.
struct PrintReport<'a> {
    url: &'a str,
    inner: &'a mut dyn CompletionGate,
}

impl CompletionGate for PrintReport<'_> {
    fn await_completion(&mut self, report: &RunReport) {
        let report = report.clone().with_url(self.url);
        print!("{}", format_console_report(&report));
        self.inner.await_completion(&report);
    }
}

// ============================================================================
// resolve subcommand
// ============================================================================

/// Resolve each label against the record's keys and print the results.
pub fn cmd_resolve(
    record_source: &str,
    labels: &[String],
    threshold: Option<f64>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = load_record(record_source)?;
    let resolver = build_resolver(&config.matching, threshold);
    let keys = record.keys();

    for label in labels {
        let result = resolver.resolve(label, &keys);
        let target = result.key.as_deref().unwrap_or("(no match)");
        let strategy = match result.strategy {
            MatchStrategy::ManualAlias => "manual_alias",
            MatchStrategy::FuzzyTokenSort => "fuzzy_token_sort",
            MatchStrategy::FuzzyPartial => "fuzzy_partial",
            MatchStrategy::None => "none",
        };
        println!(
            "{:<40} [{}] \u{2192} {} ({}, {:.1})",
            label,
            normalize(label),
            target,
            strategy,
            result.score
        );
    }

    Ok(())
}

// ============================================================================
// aliases subcommand
// ============================================================================

pub fn cmd_aliases(config: &AppConfig) {
    let resolver = build_resolver(&config.matching, None);
    for (phrase, key) in resolver.aliases().iter() {
        println!("{:<32} {}", phrase, key);
    }
    println!("{} aliases", resolver.aliases().len());
}
