use crate::domain::model::LoadSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::disabled(),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<LoadSummary> {
        tracing::info!("🚀 Starting court reconciliation");

        // Extract：區域目錄失敗即中止
        tracing::info!("📥 Fetching region directory...");
        let regions = self.pipeline.extract().await?;
        tracing::info!("📥 {} regions to process", regions.len());
        self.monitor.log_phase("extract");

        // Prepare：地址與次要來源都是盡力而為
        tracing::info!("🔗 Building address map and secondary court set...");
        let sources = self.pipeline.prepare(&regions).await?;
        tracing::info!(
            "🔗 {} addresses, {} secondary courts",
            sources.addresses.len(),
            sources.secondary.as_ref().map(|s| s.len()).unwrap_or(0)
        );
        self.monitor.log_phase("prepare");

        // Load
        tracing::info!("📤 Streaming reconciled records...");
        let summary = self.pipeline.load(&regions, &sources).await?;
        tracing::info!("📁 Output saved to: {}", summary.output_path);
        self.monitor.log_phase("load");

        self.monitor.log_final_stats();
        Ok(summary)
    }
}
