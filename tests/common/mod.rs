#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use sudrf_courts::{CourtRecord, OutputFormat, ReconcileMode, Settings};

pub const SESSION: &str = "test-session";

pub fn region_page(options: &[(&str, &str)]) -> Vec<u8> {
    let mut html = String::from(
        "<html><head><title>Мировые судьи</title></head><body><select id=\"court_subj\">\
         <option value=\"0\">Выберите субъект РФ</option>",
    );
    for (value, name) in options {
        html.push_str(&format!("<option value=\"{}\">{}</option>", value, name));
    }
    html.push_str("</select></body></html>");
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(&html);
    bytes.into_owned()
}

/// 每個元素是一格：(名稱, 網站, 代碼行)
pub fn results_page(cells: &[(&str, Option<&str>, &[&str])]) -> String {
    let mut html = String::from("<html><body><table class=\"msSearchResultTbl\">");
    for (name, website, codes) in cells {
        html.push_str(&format!("<tr><td><a href=\"#\">{}</a><div class=\"courtInfoCont\">", name));
        for code in codes.iter() {
            html.push_str(code);
            html.push_str("<br/>");
        }
        if let Some(site) = website {
            html.push_str(&format!("<a href=\"http://{0}\">{0}</a>", site));
        }
        html.push_str("</div></td></tr>");
    }
    html.push_str("</table></body></html>");
    html
}

pub fn balloons(entries: &[(&str, &str)]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, (code, address))| {
            format!(
                "balloons_user['{}'][{}]={{type:'mir',name:'Участок {}',adress:'{}',coord:[55.7,37.6]}};\n",
                code, i, i, address
            )
        })
        .collect()
}

pub fn secondary_body(codes: &[&str]) -> serde_json::Value {
    let data: Vec<serde_json::Value> = codes
        .iter()
        .map(|code| {
            serde_json::json!({
                "VNKOD": code,
                "ZNACHATR": format!("Мировой судья участка {}", code),
                "ADRESS": null,
                "UPKOD": null
            })
        })
        .collect();
    serde_json::json!({"error": 0, "errorMsg": "", "data": data})
}

pub fn mock_results<'a>(server: &'a MockServer, region: &str, body: String) -> Mock<'a> {
    let region = region.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path("/index.php")
            .query_param("act", "go_ms_search")
            .query_param("court_subj", region.as_str());
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(body);
    })
}

pub fn mock_addresses<'a>(server: &'a MockServer, body: String) -> Mock<'a> {
    server.mock(move |when, then| {
        when.method(GET)
            .path("/index.php")
            .query_param("act", "ya_coords")
            .query_param("type_suds", "mir");
        then.status(200).body(body);
    })
}

pub fn mock_secondary<'a>(server: &'a MockServer, region: &str, body: serde_json::Value) -> Mock<'a> {
    let region = region.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path("/api/appeal/getCourtsInRegion")
            .query_param("regionCode", region.as_str())
            .header("cookie", "PHPSESSID=test-session");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(body);
    })
}

/// 區域頁的條件最寬鬆，必須在其他 /index.php mock 之後建立（依建立順序比對）
pub fn mock_regions<'a>(server: &'a MockServer, body: Vec<u8>) -> Mock<'a> {
    server.mock(move |when, then| {
        when.method(GET)
            .path("/index.php")
            .query_param("id", "300")
            .query_param("var", "true");
        then.status(200)
            .header("content-type", "text/html; charset=windows-1251")
            .body(body);
    })
}

pub fn settings(server: &MockServer, output_path: &str, mode: ReconcileMode) -> Settings {
    Settings {
        primary_base_url: server.url("/index.php"),
        secondary_base_url: server.base_url(),
        session_id: Some(SESSION.to_string()),
        output_path: output_path.to_string(),
        output_format: OutputFormat::Csv,
        reconcile_mode: mode,
        request_delay_ms: 0,
        timeout_seconds: 5,
        ..Settings::default()
    }
}

pub fn read_csv(path: &str) -> Vec<CourtRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.deserialize().map(|row| row.unwrap()).collect()
}
