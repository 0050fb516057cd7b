use crate::adapters::http::{TransportClient, TransportSettings};
use crate::adapters::sink;
use crate::core::primary::PrimaryCourtStream;
use crate::core::reconcile::{Reconciler, ABSENT_FLAG};
use crate::core::secondary::SecondaryCourtStream;
use crate::core::{addresses, regions};
use crate::domain::model::{JoinSources, LoadSummary, RegionDirectory};
use crate::domain::ports::{ConfigProvider, Pipeline, RecordSink, ReconcileMode};
use crate::utils::error::{CourtError, Result};
use std::time::Duration;

/// sudrf.ru + ej.sudrf.ru 的合併管道
pub struct CourtPipeline<C: ConfigProvider> {
    config: C,
    client: TransportClient,
}

impl<C: ConfigProvider> CourtPipeline<C> {
    pub fn new(config: C) -> Result<Self> {
        let client = TransportClient::new(&TransportSettings {
            timeout_seconds: config.timeout_seconds(),
            user_agent: config.user_agent().to_string(),
            session_id: config.session_id().map(str::to_string),
        })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.config.request_delay_ms())
    }

    /// 將合併後的記錄逐筆寫入 sink
    pub async fn stream_into(
        &self,
        regions: &RegionDirectory,
        sources: &JoinSources,
        sink: &mut dyn RecordSink,
    ) -> Result<LoadSummary> {
        let primary = PrimaryCourtStream::new(
            &self.client,
            self.config.primary_base_url(),
            regions.as_slice(),
        )
        .with_delay(self.delay());

        let mode = self.config.reconcile_mode();
        let mut reconciler = match (&sources.secondary, mode) {
            (Some(secondary), mode) if mode.needs_secondary() => {
                Reconciler::with_presence(primary, &sources.addresses, secondary, mode)
            }
            _ => Reconciler::address_only(primary, &sources.addresses),
        };

        let mut summary = LoadSummary::default();
        while let Some(record) = reconciler.next_record().await {
            sink.append(&record)?;
            summary.records_written += 1;
            if record.address.is_some() {
                summary.with_address += 1;
            }
            if record.code.is_none() {
                summary.null_codes += 1;
            }
            match record.presence_flag.as_deref() {
                None => {}
                Some(ABSENT_FLAG) => summary.absent += 1,
                Some(_) => summary.present += 1,
            }
        }

        if reconciler.failed_regions() > 0 {
            tracing::warn!(
                "⚠️ {} of {} regions could not be scraped",
                reconciler.failed_regions(),
                regions.len()
            );
        }
        Ok(summary)
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> Pipeline for CourtPipeline<C> {
    async fn extract(&self) -> Result<RegionDirectory> {
        let mut directory = regions::fetch_region_directory(
            &self.client,
            self.config.primary_base_url(),
            self.config.region_page_encoding(),
        )
        .await?;

        let filter = self.config.region_filter();
        if !filter.is_empty() {
            directory.retain_codes(filter);
            if directory.is_empty() {
                return Err(CourtError::InvalidConfigValueError {
                    field: "regions".to_string(),
                    value: filter.join(","),
                    reason: "None of the requested regions exist on the site".to_string(),
                });
            }
            tracing::info!("🔧 Region filter applied: {} regions selected", directory.len());
        }

        Ok(directory)
    }

    async fn prepare(&self, regions: &RegionDirectory) -> Result<JoinSources> {
        let mode = self.config.reconcile_mode();
        if mode.needs_secondary() && !self.client.has_session() {
            return Err(CourtError::MissingConfigError {
                field: "session_id".to_string(),
            });
        }

        let addresses =
            addresses::fetch_address_map(&self.client, self.config.primary_base_url()).await;

        let secondary = if mode.needs_secondary() {
            let set = SecondaryCourtStream::new(
                &self.client,
                self.config.secondary_base_url(),
                self.config.court_markers(),
                regions.as_slice(),
            )
            .with_delay(self.delay())
            .collect_set()
            .await;
            Some(set)
        } else {
            None
        };

        Ok(JoinSources {
            addresses,
            secondary,
        })
    }

    async fn load(&self, regions: &RegionDirectory, sources: &JoinSources) -> Result<LoadSummary> {
        let mut sink = sink::open_sink(self.config.output_path(), self.config.output_format())?;
        let mut summary = self.stream_into(regions, sources, sink.as_mut()).await?;
        summary.output_path = sink.finish()?;

        tracing::info!(
            "📝 Wrote {} records ({} with address, {} present, {} absent)",
            summary.records_written,
            summary.with_address,
            summary.present,
            summary.absent
        );
        if self.config.reconcile_mode() == ReconcileMode::AddressOnly {
            tracing::debug!("Presence flags skipped in address-only mode");
        }
        Ok(summary)
    }
}
