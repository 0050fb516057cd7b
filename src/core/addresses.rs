use crate::adapters::http::TransportClient;
use crate::core::endpoints;
use crate::domain::model::AddressMap;
use regex::Regex;
use std::sync::OnceLock;

/// balloons_user['<CODE>'][<idx>]={type:'mir',name:'<NAME>',adress:'<ADDR>',coord:...}
///
/// 只接受這一種字面形狀，name 僅用來定位。
fn balloon_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"balloons_user\['([^']*)'\]\[\d+\]=\{type:'mir',name:'([^']*)',adress:'([^']*)',coord:",
        )
        .expect("balloon pattern is valid")
    })
}

/// 掃描整份文字，重複的代碼以較後出現者為準
pub fn extract_addresses(text: &str) -> AddressMap {
    let mut addresses = AddressMap::new();
    for caps in balloon_pattern().captures_iter(text) {
        let code = caps[1].trim().to_string();
        let address = caps[3].trim().to_string();
        if let Some(previous) = addresses.insert(code.clone(), address) {
            tracing::debug!("Address for {} replaced (was '{}')", code, previous);
        }
    }
    addresses
}

/// 地址只是附加資訊：抓取失敗時回傳空表
pub async fn fetch_address_map(client: &TransportClient, primary_base: &str) -> AddressMap {
    let url = match endpoints::address_page_url(primary_base) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("⚠️ Address page URL could not be built: {}", e);
            return AddressMap::new();
        }
    };

    match client.get_ok(&url).await {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let addresses = extract_addresses(&text);
            tracing::info!("📮 Extracted {} court addresses", addresses.len());
            addresses
        }
        Err(e) => {
            tracing::warn!("⚠️ Address page unavailable, continuing without addresses: {}", e);
            AddressMap::new()
        }
    }
}
