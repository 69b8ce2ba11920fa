use anyhow::Context;
use clap::Parser;
use plastic_harvest::domain::model::StopReason;
use plastic_harvest::utils::{logger, validation::Validate};
use plastic_harvest::{CliArgs, EtlEngine, HarvestConfig, HarvestPipeline, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::debug!("CLI args: {:?}", args);

    let config = match args.resolve().and_then(|config: HarvestConfig| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::current_dir();
    let pipeline =
        HarvestPipeline::new(storage, config).context("failed to build the search client")?;
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            if let StopReason::FetchFailed { page, .. } = &summary.stop_reason {
                tracing::warn!(
                    "⚠️ Export is truncated: fetching stopped at page {}",
                    page
                );
            }
            println!(
                "Success! Saved {} rows to '{}'",
                summary.row_count, summary.output_path
            );
            println!("   Key Feature: Check the 'packaging_tags' column for your labels.");
        }
        Err(e) => {
            tracing::error!(
                "❌ Export failed: {} (Severity: {:?})",
                e,
                e.severity()
            );
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(if e.is_config_error() { 1 } else { 2 });
        }
    }

    Ok(())
}
