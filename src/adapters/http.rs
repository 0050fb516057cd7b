use crate::utils::error::{CourtError, Result};
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("sudrf-courts/", env!("CARGO_PKG_VERSION"));

/// 次要來源的 session cookie 名稱
pub const SESSION_COOKIE: &str = "PHPSESSID";

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub session_id: Option<String>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            session_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// reqwest 的薄包裝：gzip/deflate 自動解壓，可選的 PHPSESSID
///
/// 連線池隨 `Client` 一起釋放，不需要額外的清理。
#[derive(Debug, Clone)]
pub struct TransportClient {
    client: Client,
    session_id: Option<String>,
}

impl TransportClient {
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            session_id: settings
                .session_id
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }

    pub fn has_session(&self) -> bool {
        self.session_id.is_some()
    }

    pub async fn get(&self, url: &str) -> Result<FetchedPage> {
        self.send(self.client.get(url), url).await
    }

    /// 非 2xx 狀態視為錯誤
    pub async fn get_ok(&self, url: &str) -> Result<Vec<u8>> {
        let page = self.get(url).await?;
        Self::ensure_success(url, page)
    }

    pub async fn get_with_session(&self, url: &str) -> Result<Vec<u8>> {
        let session_id = self
            .session_id
            .as_deref()
            .ok_or_else(|| CourtError::MissingConfigError {
                field: "session_id".to_string(),
            })?;

        let request = self
            .client
            .get(url)
            .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, session_id));
        let page = self.send(request, url).await?;
        Self::ensure_success(url, page)
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<FetchedPage> {
        tracing::debug!("GET {}", url);
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchedPage { status, body })
    }

    fn ensure_success(url: &str, page: FetchedPage) -> Result<Vec<u8>> {
        if page.is_success() {
            Ok(page.body)
        } else {
            Err(CourtError::HttpStatusError {
                url: url.to_string(),
                status: page.status.as_u16(),
            })
        }
    }
}
