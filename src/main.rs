use clap::Parser;
use form_autofill::cli::commands::{FillArgs, cmd_aliases, cmd_fill, cmd_resolve, init_logging};
use form_autofill::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Fill {
            url,
            record,
            no_pause,
            trace,
            threshold,
            headless,
        } => {
            let args = FillArgs {
                url: &url,
                record: &record,
                no_pause,
                trace: trace.as_deref(),
                threshold,
                headless,
            };
            let report = cmd_fill(&args, &config)?;
            if !report.all_filled() {
                tracing::info!(
                    unresolved = report.total - report.filled,
                    "some blocks were left for manual completion"
                );
            }
        }
        Commands::Resolve {
            record,
            labels,
            threshold,
        } => {
            cmd_resolve(&record, &labels, threshold, &config)?;
        }
        Commands::Aliases => cmd_aliases(&config),
    }

    Ok(())
}
