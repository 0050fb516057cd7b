#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::DEFAULT_USER_AGENT;
use crate::core::endpoints::{DEFAULT_PRIMARY_BASE, DEFAULT_SECONDARY_BASE};
use crate::core::secondary::DEFAULT_COURT_MARKERS;
use crate::domain::ports::{ConfigProvider, OutputFormat, ReconcileMode};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENCODING: &str = "windows-1251";
pub const DEFAULT_OUTPUT_PATH: &str = "./output/courts.csv";

/// 一次執行的完整設定（CLI 與 TOML 合併後的結果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub primary_base_url: String,
    pub secondary_base_url: String,
    pub session_id: Option<String>,
    pub region_page_encoding: String,
    pub court_markers: Vec<String>,
    /// 空白代表全部區域
    pub regions: Vec<String>,
    pub output_path: String,
    pub output_format: OutputFormat,
    pub reconcile_mode: ReconcileMode,
    pub timeout_seconds: u64,
    pub request_delay_ms: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_base_url: DEFAULT_PRIMARY_BASE.to_string(),
            secondary_base_url: DEFAULT_SECONDARY_BASE.to_string(),
            session_id: None,
            region_page_encoding: DEFAULT_ENCODING.to_string(),
            court_markers: DEFAULT_COURT_MARKERS.iter().map(|m| m.to_string()).collect(),
            regions: Vec::new(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_format: OutputFormat::default(),
            reconcile_mode: ReconcileMode::default(),
            timeout_seconds: 30,
            request_delay_ms: 100,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// 用於日誌與 dry-run 輸出，隱藏 session
    pub fn redacted(&self) -> Settings {
        Settings {
            session_id: self.session_id.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }
}

impl ConfigProvider for Settings {
    fn primary_base_url(&self) -> &str {
        &self.primary_base_url
    }

    fn secondary_base_url(&self) -> &str {
        &self.secondary_base_url
    }

    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn region_page_encoding(&self) -> &str {
        &self.region_page_encoding
    }

    fn court_markers(&self) -> &[String] {
        &self.court_markers
    }

    fn region_filter(&self) -> &[String] {
        &self.regions
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    fn reconcile_mode(&self) -> ReconcileMode {
        self.reconcile_mode
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn request_delay_ms(&self) -> u64 {
        self.request_delay_ms
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("primary_base_url", &self.primary_base_url)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        validation::validate_encoding_label("region_page_encoding", &self.region_page_encoding)?;
        validation::validate_region_codes("regions", &self.regions)?;

        if self.reconcile_mode.needs_secondary() {
            validation::validate_url("secondary_base_url", &self.secondary_base_url)?;
            validation::validate_non_empty_list("court_markers", &self.court_markers)?;
            let session = self
                .session_id
                .as_ref()
                .filter(|s| !s.trim().is_empty());
            validation::validate_required_field("session_id", &session.cloned())?;
        }

        Ok(())
    }
}
