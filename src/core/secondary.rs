use crate::adapters::http::TransportClient;
use crate::core::endpoints;
use crate::domain::model::{Region, SecondaryCourt, SecondaryCourtSet};
use crate::utils::error::{CourtError, Result};
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Duration;

/// ZNACHATR 中代表治安法官的字根（мировой / мирового ...），區分大小寫
pub const DEFAULT_COURT_MARKERS: [&str; 2] = ["мирово", "Мирово"];

/// getCourtsInRegion 的回應外殼
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtsResponse {
    #[serde(default)]
    pub error: i64,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<ApiCourt>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct ApiCourt {
    pub vnkod: Option<String>,
    pub znachatr: Option<String>,
    pub adress: Option<String>,
    pub upkod: Option<String>,
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn is_lay_court(attribute: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .filter(|m| !m.is_empty())
        .any(|marker| attribute.contains(marker.as_str()))
}

/// 解析並篩選單一區域的回應
pub fn parse_courts_response(
    body: &[u8],
    region: &str,
    markers: &[String],
) -> Result<Vec<SecondaryCourt>> {
    let response: CourtsResponse = serde_json::from_slice(body)?;
    if response.error != 0 {
        return Err(CourtError::parse(format!(
            "API error {}: {}",
            response.error,
            response.error_msg.unwrap_or_default()
        )));
    }

    Ok(response
        .data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|court| {
            let attribute = court.znachatr.as_deref()?;
            if !is_lay_court(attribute, markers) {
                return None;
            }
            Some(SecondaryCourt {
                code: trimmed(court.vnkod.as_ref()),
                name: attribute.trim().to_string(),
                region: region.to_string(),
                address: trimmed(court.adress.as_ref()),
                parent_code: trimmed(court.upkod.as_ref()),
            })
        })
        .collect())
}

async fn fetch_region(
    client: &TransportClient,
    secondary_base: &str,
    region: &Region,
    markers: &[String],
) -> Result<Vec<SecondaryCourt>> {
    let url = endpoints::secondary_courts_url(secondary_base, &region.code)?;
    let body = client.get_with_session(&url).await?;
    parse_courts_response(&body, &region.name, markers)
}

/// ej.sudrf.ru 法院的惰性序列，每次推進最多呼叫一次 API
pub struct SecondaryCourtStream<'a> {
    client: &'a TransportClient,
    secondary_base: &'a str,
    markers: &'a [String],
    regions: std::slice::Iter<'a, Region>,
    pending: VecDeque<SecondaryCourt>,
    delay: Duration,
    fetched_any: bool,
    failed_regions: usize,
}

impl<'a> SecondaryCourtStream<'a> {
    pub fn new(
        client: &'a TransportClient,
        secondary_base: &'a str,
        markers: &'a [String],
        regions: &'a [Region],
    ) -> Self {
        Self {
            client,
            secondary_base,
            markers,
            regions: regions.iter(),
            pending: VecDeque::new(),
            delay: Duration::ZERO,
            fetched_any: false,
            failed_regions: 0,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failed_regions(&self) -> usize {
        self.failed_regions
    }

    pub async fn next_court(&mut self) -> Option<SecondaryCourt> {
        loop {
            if let Some(court) = self.pending.pop_front() {
                return Some(court);
            }

            let region = self.regions.next()?;
            if self.fetched_any && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.fetched_any = true;

            match fetch_region(self.client, self.secondary_base, region, self.markers).await {
                Ok(courts) => {
                    tracing::debug!("🔎 ej region {}: {} lay courts", region.code, courts.len());
                    self.pending.extend(courts);
                }
                Err(CourtError::MissingConfigError { field }) => {
                    // 沒有 session 時每個區域都會失敗，直接結束
                    tracing::warn!("⚠️ Secondary source disabled: missing {}", field);
                    self.failed_regions += 1 + self.regions.by_ref().count();
                    return None;
                }
                Err(e) => {
                    self.failed_regions += 1;
                    tracing::warn!("⚠️ Skipping ej region {} ({}): {}", region.code, region.name, e);
                }
            }
        }
    }

    /// 完整讀入，供 presence join 使用
    pub async fn collect_set(mut self) -> SecondaryCourtSet {
        let mut set = SecondaryCourtSet::new();
        while let Some(court) = self.next_court().await {
            set.push(court);
        }
        tracing::info!(
            "🔎 Secondary source: {} lay courts ({} regions failed)",
            set.len(),
            self.failed_regions
        );
        set
    }
}
