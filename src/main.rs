use api_export::utils::error::ExportError;
use api_export::utils::logger;
use api_export::{CliArgs, ExportEngine, ExportPipeline, LocalStorage, RunConfig};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        // --help / --version
        Err(e) => e.exit(),
    };

    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(args).await {
        report(&e);
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<(), ExportError> {
    let config = RunConfig::from_args(&args)?;
    config.log_summary();

    let pipeline = ExportPipeline::new(LocalStorage::new(), config.request, config.target);
    let summary = ExportEngine::new(pipeline).run().await?;

    for path in summary.written() {
        println!("{}", path.display());
    }
    tracing::info!("🎉 Done.");
    Ok(())
}

fn report(e: &ExportError) {
    tracing::error!(
        "❌ Export failed: {} (Category: {:?})",
        e,
        e.category()
    );
    tracing::debug!("💡 Suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ Error:");
    if let Some(status) = e.http_status() {
        eprintln!("• HTTP {}", status);
    }
    eprintln!("• {}", e);
    if let Some(snippet) = e.body_snippet() {
        eprintln!("• Details: {}", snippet);
    }
    eprintln!("💡 {}", e.recovery_suggestion());
}
