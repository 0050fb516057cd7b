//! sudrf.ru 與 ej.sudrf.ru 的端點組裝

use crate::utils::error::{CourtError, Result};
use url::Url;

pub const DEFAULT_PRIMARY_BASE: &str = "https://sudrf.ru/index.php";
pub const DEFAULT_SECONDARY_BASE: &str = "https://ej.sudrf.ru";

const SECONDARY_COURTS_PATH: &str = "/api/appeal/getCourtsInRegion";

fn build(base: &str, params: &[(&str, &str)]) -> Result<String> {
    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| CourtError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: base.to_string(),
            reason: e.to_string(),
        })
}

/// 區域選擇頁（windows-1251）
pub fn region_page_url(primary_base: &str) -> Result<String> {
    build(primary_base, &[("id", "300"), ("var", "true")])
}

/// 單一區域的治安法官搜尋結果頁
pub fn region_results_url(primary_base: &str, region_code: &str) -> Result<String> {
    build(
        primary_base,
        &[
            ("id", "300"),
            ("act", "go_ms_search"),
            ("searchtype", "ms"),
            ("var", "true"),
            ("ms_type", "ms"),
            ("court_subj", region_code),
            ("ms_city", ""),
            ("ms_street", ""),
        ],
    )
}

/// 內嵌 balloons_user 指派的座標頁
pub fn address_page_url(primary_base: &str) -> Result<String> {
    build(
        primary_base,
        &[("id", "300"), ("act", "ya_coords"), ("type_suds", "mir")],
    )
}

pub fn secondary_courts_url(secondary_base: &str, region_code: &str) -> Result<String> {
    let base = format!("{}{}", secondary_base.trim_end_matches('/'), SECONDARY_COURTS_PATH);
    build(&base, &[("regionCode", region_code)])
}
