use clap::Parser;
use form_autofill::cli::commands::level_for_verbosity;
use form_autofill::cli::config::{
    AppConfig, Cli, Commands, build_resolver, build_run_settings, build_session_options,
    load_config, parse_config,
};
use form_autofill::form::block_model::WidgetKind;
use form_autofill::matching::resolver::MatchStrategy;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_fill_minimal() {
    let cli = Cli::parse_from([
        "form-autofill",
        "fill",
        "--url",
        "https://forms.example.com/apply",
        "--record",
        "ann.json",
    ]);
    match cli.command {
        Commands::Fill {
            url,
            record,
            no_pause,
            trace,
            threshold,
            headless,
        } => {
            assert_eq!(url, "https://forms.example.com/apply");
            assert_eq!(record, "ann.json");
            assert!(!no_pause);
            assert_eq!(trace, None);
            assert_eq!(threshold, None);
            assert!(!headless);
        }
        _ => panic!("Expected Fill command"),
    }
    assert_eq!(cli.verbose, 0);
    assert_eq!(cli.config, None);
}

#[test]
fn cli_parse_fill_all_args() {
    let cli = Cli::parse_from([
        "form-autofill",
        "-vv",
        "--config",
        "custom.yaml",
        "fill",
        "--url",
        "https://f.example.com",
        "--record",
        "https://api.example.com/profile/7",
        "--no-pause",
        "--trace",
        "fill.jsonl",
        "--threshold",
        "80",
        "--headless",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Fill {
            no_pause,
            trace,
            threshold,
            headless,
            ..
        } => {
            assert!(no_pause);
            assert_eq!(trace.as_deref(), Some("fill.jsonl"));
            assert_eq!(threshold, Some(80.0));
            assert!(headless);
        }
        _ => panic!("Expected Fill command"),
    }
}

#[test]
fn cli_parse_resolve_repeated_labels() {
    let cli = Cli::parse_from([
        "form-autofill",
        "resolve",
        "--record",
        "ann.json",
        "--label",
        "Full Name",
        "--label",
        "Date of Birth",
    ]);
    match cli.command {
        Commands::Resolve { record, labels, .. } => {
            assert_eq!(record, "ann.json");
            assert_eq!(labels, vec!["Full Name", "Date of Birth"]);
        }
        _ => panic!("Expected Resolve command"),
    }
}

#[test]
fn cli_resolve_requires_a_label() {
    let result = Cli::try_parse_from(["form-autofill", "resolve", "--record", "ann.json"]);
    assert!(result.is_err());
}

#[test]
fn cli_fill_requires_url_and_record() {
    assert!(Cli::try_parse_from(["form-autofill", "fill", "--url", "https://x"]).is_err());
    assert!(Cli::try_parse_from(["form-autofill", "fill", "--record", "a.json"]).is_err());
}

#[test]
fn cli_threshold_outside_range_is_rejected() {
    for bad in ["700", "-1", "NaN", "high"] {
        let result = Cli::try_parse_from([
            "form-autofill",
            "resolve",
            "--record",
            "ann.json",
            "--label",
            "Name",
            "--threshold",
            bad,
        ]);
        assert!(result.is_err(), "accepted threshold {}", bad);
    }
}

#[test]
fn cli_threshold_bounds_are_inclusive() {
    for ok in ["0", "100", "70.5"] {
        let cli = Cli::try_parse_from([
            "form-autofill",
            "fill",
            "--url",
            "https://x",
            "--record",
            "a.json",
            "--threshold",
            ok,
        ]);
        assert!(cli.is_ok(), "rejected threshold {}", ok);
    }
}

#[test]
fn cli_parse_aliases() {
    let cli = Cli::parse_from(["form-autofill", "aliases"]);
    assert!(matches!(cli.command, Commands::Aliases));
}

#[test]
fn verbosity_maps_to_levels() {
    assert_eq!(level_for_verbosity(0), "warn");
    assert_eq!(level_for_verbosity(1), "info");
    assert_eq!(level_for_verbosity(2), "debug");
    assert_eq!(level_for_verbosity(9), "trace");
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn missing_config_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/form-autofill.yaml"));
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.matching.threshold, 70.0);
    assert_eq!(config.form.load_grace_ms, 3000);
    assert_eq!(config.form.widget_order, WidgetKind::DEFAULT_ORDER.to_vec());
    assert_eq!(config.driver.storage_state.as_deref(), Some("auth.json"));
    assert_eq!(config.trace.path, None);
}

#[test]
fn malformed_config_file_gives_defaults() {
    let path = std::env::temp_dir().join(format!("form_autofill_bad_{}.yaml", std::process::id()));
    std::fs::write(&path, "matching: [this is: not a map").unwrap();
    let config = load_config(path.to_str());
    let _ = std::fs::remove_file(&path);
    assert_eq!(config, AppConfig::default());
}

#[test]
fn partial_config_keeps_other_defaults() {
    let config = parse_config(
        r#"
matching:
  threshold: 85
  aliases:
    "Roll No.": rollNumber
form:
  widget_order: [dropdown, text]
  selectors:
    block: "div.question"
driver:
  headless: true
  storage_state: null
trace:
  path: runs.jsonl
"#,
    )
    .unwrap();

    assert_eq!(config.matching.threshold, 85.0);
    assert!(!config.matching.replace_default_aliases);
    assert_eq!(config.form.load_grace_ms, 3000);
    assert_eq!(config.form.widget_order, vec![WidgetKind::Dropdown, WidgetKind::Text]);
    assert_eq!(config.form.selectors.block, "div.question");
    assert_eq!(config.form.selectors.heading, "div[role='heading']");
    assert!(config.driver.headless);
    assert_eq!(config.driver.node, "node");
    assert_eq!(config.driver.storage_state, None);
    assert_eq!(config.trace.path.as_deref(), Some("runs.jsonl"));
}

#[test]
fn out_of_range_config_threshold_falls_back_to_default() {
    for yaml in ["matching:\n  threshold: 700\n", "matching:\n  threshold: .nan\n"] {
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.matching.threshold, 70.0);
    }
}

// ============================================================================
// Config Builder Tests
// ============================================================================

#[test]
fn build_resolver_merges_aliases_with_builtin() {
    let config = parse_config("matching:\n  aliases:\n    Roll No.: rollNumber\n").unwrap();
    let resolver = build_resolver(&config.matching, None);

    let roll = resolver.resolve("Roll No.", &["fullName"]);
    assert_eq!(roll.key.as_deref(), Some("rollNumber"));
    assert_eq!(roll.strategy, MatchStrategy::ManualAlias);

    assert_eq!(resolver.aliases().lookup("dob"), Some("dob"));
    assert_eq!(resolver.threshold(), 70.0);
}

#[test]
fn build_resolver_can_replace_builtin_aliases() {
    let config = parse_config(
        "matching:\n  replace_default_aliases: true\n  aliases:\n    Roll No.: rollNumber\n",
    )
    .unwrap();
    let resolver = build_resolver(&config.matching, Some(90.0));

    assert_eq!(resolver.aliases().len(), 1);
    assert_eq!(resolver.aliases().lookup("dob"), None);
    assert_eq!(resolver.threshold(), 90.0);
}

#[test]
fn build_run_settings_falls_back_on_empty_order() {
    let config = parse_config("form:\n  load_grace_ms: 500\n  widget_order: []\n").unwrap();
    let settings = build_run_settings(&config.form);
    assert_eq!(settings.load_grace_ms, 500);
    assert_eq!(settings.widget_order, WidgetKind::DEFAULT_ORDER.to_vec());
}

#[test]
fn build_session_options_cli_headless_wins() {
    let config = AppConfig::default();
    let options = build_session_options(&config.driver, true);
    assert!(options.headless);
    assert_eq!(options.script, "node/form_server.js");

    let options = build_session_options(&config.driver, false);
    assert!(!options.headless);
}
