use crate::adapters::http::TransportClient;
use crate::core::endpoints;
use crate::domain::model::RegionDirectory;
use crate::utils::error::{CourtError, Result};
use encoding_rs::Encoding;
use scraper::{Html, Selector};

/// 「請選擇區域」的佔位選項
const PLACEHOLDER_REGION: i64 = 0;

/// 把舊式單位元組編碼的頁面轉成 UTF-8，只在這一層處理編碼
pub fn decode_legacy(bytes: &[u8], label: &str) -> Result<String> {
    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        CourtError::InvalidConfigValueError {
            field: "region_page_encoding".to_string(),
            value: label.to_string(),
            reason: "Unknown character encoding label".to_string(),
        }
    })?;
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!("Region page contained bytes invalid for {}", encoding.name());
    }
    Ok(text.into_owned())
}

/// 數值區域代碼補零成兩位數；`5` → `"05"`，`77` → `"77"`
pub fn format_region_code(value: i64) -> String {
    format!("{:02}", value)
}

/// 從已解碼的頁面取出 court_subj 下拉選單
pub fn parse_region_directory(html: &str) -> Result<RegionDirectory> {
    let document = Html::parse_document(html);
    let select = Selector::parse("select#court_subj")
        .map_err(|e| CourtError::parse(format!("invalid selector: {e}")))?;
    let option = Selector::parse("option")
        .map_err(|e| CourtError::parse(format!("invalid selector: {e}")))?;

    let control = document
        .select(&select)
        .next()
        .ok_or_else(|| CourtError::parse("region select control #court_subj not found"))?;

    let mut directory = RegionDirectory::new();
    for node in control.select(&option) {
        let raw = node.value().attr("value").unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }

        let value: i64 = match raw.parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("Skipping region option with non-numeric value '{}'", raw);
                continue;
            }
        };
        // 0 是佔位選項，負數不是有效區域
        if value <= PLACEHOLDER_REGION {
            continue;
        }

        let name = node.text().collect::<String>().trim().to_string();
        let code = format_region_code(value);
        if !directory.insert(code.clone(), name) {
            tracing::warn!("Duplicate region code {} ignored", code);
        }
    }

    if directory.is_empty() {
        return Err(CourtError::parse("region select control has no regions"));
    }
    Ok(directory)
}

/// 抓取並解析區域目錄；失敗即中止整次執行
pub async fn fetch_region_directory(
    client: &TransportClient,
    primary_base: &str,
    encoding_label: &str,
) -> Result<RegionDirectory> {
    let url = endpoints::region_page_url(primary_base)?;
    let bytes = client.get_ok(&url).await?;
    let html = decode_legacy(&bytes, encoding_label)?;
    let directory = parse_region_directory(&html)?;
    tracing::info!("🗺️ Loaded {} regions", directory.len());
    Ok(directory)
}
