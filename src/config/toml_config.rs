use crate::config::Settings;
use crate::domain::ports::{OutputFormat, ReconcileMode};
use crate::utils::error::{CourtError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub primary: PrimaryConfig,
    #[serde(default)]
    pub secondary: SecondaryConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryConfig {
    pub base_url: Option<String>,
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecondaryConfig {
    pub base_url: Option<String>,
    pub session_id: Option<String>,
    pub court_markers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    pub mode: Option<ReconcileMode>,
    pub regions: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
    pub request_delay_ms: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CourtError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CourtError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUDRF_SESSION_ID})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 套用到既有設定上，只覆蓋檔案中有寫的欄位
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = &self.primary.base_url {
            settings.primary_base_url = v.clone();
        }
        if let Some(v) = &self.primary.encoding {
            settings.region_page_encoding = v.clone();
        }
        if let Some(v) = &self.secondary.base_url {
            settings.secondary_base_url = v.clone();
        }
        if let Some(v) = &self.secondary.session_id {
            // 未替換的 ${VAR} 視為沒有設定
            if !v.starts_with("${") {
                settings.session_id = Some(v.clone());
            }
        }
        if let Some(v) = &self.secondary.court_markers {
            settings.court_markers = v.clone();
        }
        if let Some(v) = self.run.mode {
            settings.reconcile_mode = v;
        }
        if let Some(v) = &self.run.regions {
            settings.regions = v.clone();
        }
        if let Some(v) = self.run.timeout_seconds {
            settings.timeout_seconds = v;
        }
        if let Some(v) = self.run.request_delay_ms {
            settings.request_delay_ms = v;
        }
        if let Some(v) = &self.run.user_agent {
            settings.user_agent = v.clone();
        }
        if let Some(v) = &self.output.path {
            settings.output_path = v.clone();
        }
        if let Some(v) = self.output.format {
            settings.output_format = v;
        }
    }

    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();
        self.apply_to(&mut settings);
        settings
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}
