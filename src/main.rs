use clap::Parser;
use record_export::adapters::input::read_records;
use record_export::utils::error::{ExportError, ErrorSeverity};
use record_export::utils::logger;
use record_export::{CliConfig, Exporter, LocalSaver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting record-export");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match run(&cli).await {
        Ok(saved) => {
            for name in &saved {
                println!("📁 {}", name);
            }
            tracing::info!("✅ Exported {} file(s)", saved.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::High => 1,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> Result<Vec<String>, ExportError> {
    let config = cli.resolve()?;
    let records = read_records(config.input()?).await?;
    tracing::info!("Loaded {} records", records.len());

    let exporter = Exporter::new(LocalSaver::new(&config.export.output_path));
    let mut saved = Vec::with_capacity(config.export.formats.len());

    for format in &config.export.formats {
        let name = exporter
            .export(*format, &records, &config.export.filename, &config.options)
            .await?;
        saved.push(format!("{}/{}", config.export.output_path, name));
    }

    Ok(saved)
}
