use crate::domain::model::{CourtRecord, JoinSources, LoadSummary, RegionDirectory};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Jsonl,
}

/// 合併模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileMode {
    /// 只補地址，不查詢次要來源
    AddressOnly,
    /// 命中時旗標寫入次要來源的法院代碼
    #[default]
    PresenceCode,
    /// 命中時旗標寫入固定標記
    PresenceMarker,
}

impl ReconcileMode {
    pub fn needs_secondary(self) -> bool {
        !matches!(self, ReconcileMode::AddressOnly)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn primary_base_url(&self) -> &str;
    fn secondary_base_url(&self) -> &str;
    fn session_id(&self) -> Option<&str>;
    fn region_page_encoding(&self) -> &str;
    fn court_markers(&self) -> &[String];
    fn region_filter(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn reconcile_mode(&self) -> ReconcileMode;
    fn timeout_seconds(&self) -> u64;
    fn request_delay_ms(&self) -> u64;
    fn user_agent(&self) -> &str;
}

/// 逐筆寫出記錄的輸出端
pub trait RecordSink: Send {
    fn append(&mut self, record: &CourtRecord) -> Result<()>;
    /// 完成寫入並回傳輸出路徑
    fn finish(self: Box<Self>) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RegionDirectory>;
    async fn prepare(&self, regions: &RegionDirectory) -> Result<JoinSources>;
    async fn load(&self, regions: &RegionDirectory, sources: &JoinSources) -> Result<LoadSummary>;
}
