use clap::Parser;
use sudrf_courts::utils::error::ErrorSeverity;
use sudrf_courts::utils::{logger, validation::Validate};
use sudrf_courts::{CliArgs, CourtPipeline, EtlEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 先讀設定檔，才知道日誌格式
    let file = match args.load_file() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e.user_friendly_message());
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let json_logs = args.json_logs || file.as_ref().map(|f| f.json_logs()).unwrap_or(false);
    if json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting sudrf-courts");
    let settings = args.resolve(file.as_ref());
    if args.verbose {
        tracing::debug!(
            "Settings: primary={}, secondary={}, mode={:?}, output={} ({:?}), regions={:?}",
            settings.primary_base_url,
            settings.secondary_base_url,
            settings.reconcile_mode,
            settings.output_path,
            settings.output_format,
            settings.regions
        );
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - configuration is valid, nothing fetched");
        println!("{}", serde_json::to_string_pretty(&settings.redacted())?);
        return Ok(());
    }

    let monitor_enabled =
        args.monitor || file.as_ref().map(|f| f.monitoring_enabled()).unwrap_or(false);
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = CourtPipeline::new(settings)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    let started = chrono::Local::now();

    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Finished in {}s",
                (chrono::Local::now() - started).num_seconds()
            );
            println!("✅ {} records written", summary.records_written);
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
