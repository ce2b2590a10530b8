use clap::Parser;
use qr_batch::config::prompt::InputCollector;
use qr_batch::config::toml_config::TomlConfig;
use qr_batch::core::runner::RunOutcome;
use qr_batch::utils::{logger, validation::Validate};
use qr_batch::{CliConfig, QrBatchError, RunConfig};

fn resolve_run_config(cli: &CliConfig) -> Result<RunConfig, QrBatchError> {
    cli.validate()?;

    if let Some(path) = &cli.config {
        tracing::info!("📁 Loading run configuration from: {}", path);
        let config = TomlConfig::from_file(path)?;
        config.validate()?;
        return config.to_run_config();
    }

    if cli.is_scripted() {
        return cli.to_run_config();
    }

    let stdin = std::io::stdin();
    InputCollector::new(stdin.lock(), std::io::stdout())
        .collect(&cli.output_root, cli.render_options())
}

fn fail(e: QrBatchError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting qr-batch");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match resolve_run_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(e),
    };
    let output_root = config.output_root.clone();

    match qr_batch::execute(config).await {
        Ok(RunOutcome::Single(outcome)) => {
            println!("{}", outcome.terminal);
            if let Some(path) = outcome.saved_to {
                println!("📁 Saved to: {}", output_root.join(path).display());
            }
        }
        Ok(RunOutcome::Batch(report)) => {
            println!(
                "✅ {} QR codes in {} groups",
                report.entries, report.groups
            );
            if report.saved() {
                println!(
                    "📁 Manifest and {} images saved under: {}",
                    report.images.len(),
                    output_root.display()
                );
            } else {
                println!("Nothing saved (save to file was not requested)");
            }
        }
        Err(e) => fail(e),
    }

    Ok(())
}
