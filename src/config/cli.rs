use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::domain::ports::{OutputFormat, ReconcileMode};
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "sudrf-courts")]
#[command(about = "Collects magistrate courts from sudrf.ru and reconciles them with ej.sudrf.ru")]
pub struct CliArgs {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub primary_base_url: Option<String>,

    #[arg(long)]
    pub secondary_base_url: Option<String>,

    /// PHPSESSID cookie for ej.sudrf.ru
    #[arg(long)]
    pub session_id: Option<String>,

    #[arg(long, value_enum)]
    pub mode: Option<ReconcileMode>,

    /// Restrict the run to these two-digit region codes
    #[arg(long = "region", value_delimiter = ',')]
    pub regions: Vec<String>,

    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Pause between region requests
    #[arg(long)]
    pub delay_ms: Option<u64>,

    #[arg(long)]
    pub encoding: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU/memory after each phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Validate configuration and exit")]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn load_file(&self) -> Result<Option<TomlConfig>> {
        self.config.as_ref().map(TomlConfig::from_file).transpose()
    }

    /// 預設值 → TOML 檔案 → 命令列參數
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Settings {
        let mut settings = Settings::default();
        if let Some(file) = file {
            file.apply_to(&mut settings);
        }

        if let Some(v) = &self.primary_base_url {
            settings.primary_base_url = v.clone();
        }
        if let Some(v) = &self.secondary_base_url {
            settings.secondary_base_url = v.clone();
        }
        if let Some(v) = &self.session_id {
            settings.session_id = Some(v.clone());
        }
        if let Some(v) = self.mode {
            settings.reconcile_mode = v;
        }
        if !self.regions.is_empty() {
            settings.regions = self.regions.clone();
        }
        if let Some(v) = &self.output {
            settings.output_path = v.clone();
        }
        if let Some(v) = self.format {
            settings.output_format = v;
        }
        if let Some(v) = self.timeout_seconds {
            settings.timeout_seconds = v;
        }
        if let Some(v) = self.delay_ms {
            settings.request_delay_ms = v;
        }
        if let Some(v) = &self.encoding {
            settings.region_page_encoding = v.clone();
        }
        settings
    }
}
