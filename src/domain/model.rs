use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 一級行政區（主站的 court_subj 選項）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// 兩位數、補零的區域代碼，例如 "05"
    pub code: String,
    pub name: String,
}

/// 按頁面順序保存的區域目錄
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionDirectory {
    regions: Vec<Region>,
}

impl RegionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入區域；重複代碼保留第一次出現的值，回傳是否插入成功
    pub fn insert(&mut self, code: String, name: String) -> bool {
        if self.get(&code).is_some() {
            return false;
        }
        self.regions.push(Region { code, name });
        true
    }

    pub fn get(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// 只保留指定代碼，順序仍依照目錄
    pub fn retain_codes(&mut self, codes: &[String]) {
        self.regions.retain(|r| codes.iter().any(|c| c == &r.code));
    }
}

impl<'a> IntoIterator for &'a RegionDirectory {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl FromIterator<(String, String)> for RegionDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut directory = RegionDirectory::new();
        for (code, name) in iter {
            directory.insert(code, name);
        }
        directory
    }
}

/// 統一的法院記錄，欄位沿著 scraper → 地址 → reconciler 逐步填入
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtRecord {
    #[serde(rename = "Регион суда")]
    pub region: String,

    #[serde(rename = "Наименование суда")]
    pub name: String,

    #[serde(rename = "Код суда")]
    pub code: Option<String>,

    #[serde(rename = "Веб-сайт")]
    pub website: Option<String>,

    #[serde(rename = "Адрес суда")]
    pub address: Option<String>,

    #[serde(rename = "Код суда (ej.sudrf.ru) - признак наличия")]
    pub presence_flag: Option<String>,
}

impl CourtRecord {
    pub fn new(region: impl Into<String>, name: impl Into<String>, code: Option<String>) -> Self {
        Self {
            region: region.into(),
            name: name.into(),
            code,
            ..Default::default()
        }
    }

    pub fn with_website(mut self, website: Option<String>) -> Self {
        self.website = website;
        self
    }
}

/// 法院代碼 → 郵寄地址；重複鍵以最後一次為準
pub type AddressMap = HashMap<String, String>;

/// 次要來源（ej.sudrf.ru）的一筆法院資料
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryCourt {
    pub code: Option<String>,
    pub name: String,
    pub region: String,
    pub address: Option<String>,
    pub parent_code: Option<String>,
}

/// 完整讀入記憶體的次要來源集合，保留抓取順序
#[derive(Debug, Clone, Default)]
pub struct SecondaryCourtSet {
    courts: Vec<SecondaryCourt>,
    by_code: HashMap<String, usize>,
}

impl SecondaryCourtSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, court: SecondaryCourt) {
        if let Some(code) = &court.code {
            // 相同代碼以第一筆為準
            self.by_code
                .entry(code.clone())
                .or_insert(self.courts.len());
        }
        self.courts.push(court);
    }

    /// 精確字串比對，不做任何正規化；null 代碼永遠不會命中
    pub fn lookup(&self, code: Option<&str>) -> Option<&SecondaryCourt> {
        let index = self.by_code.get(code?)?;
        self.courts.get(*index)
    }

    pub fn len(&self) -> usize {
        self.courts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SecondaryCourt> {
        self.courts.iter()
    }
}

impl FromIterator<SecondaryCourt> for SecondaryCourtSet {
    fn from_iter<I: IntoIterator<Item = SecondaryCourt>>(iter: I) -> Self {
        let mut set = SecondaryCourtSet::new();
        for court in iter {
            set.push(court);
        }
        set
    }
}

/// 合併前的附加資料：地址表與（可選的）次要來源集合
#[derive(Debug, Clone, Default)]
pub struct JoinSources {
    pub addresses: AddressMap,
    pub secondary: Option<SecondaryCourtSet>,
}

/// 載入階段的統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub output_path: String,
    pub records_written: usize,
    pub with_address: usize,
    pub present: usize,
    pub absent: usize,
    pub null_codes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn court(code: Option<&str>, name: &str) -> SecondaryCourt {
        SecondaryCourt {
            code: code.map(str::to_string),
            name: name.to_string(),
            region: "Region A".to_string(),
            address: None,
            parent_code: None,
        }
    }

    #[test]
    fn test_region_directory_keeps_page_order_and_first_duplicate() {
        let directory: RegionDirectory = vec![
            ("77".to_string(), "Москва".to_string()),
            ("01".to_string(), "Адыгея".to_string()),
            ("77".to_string(), "Duplicate".to_string()),
        ]
        .into_iter()
        .collect();

        let codes: Vec<&str> = directory.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["77", "01"]);
        assert_eq!(directory.get("77").unwrap().name, "Москва");
    }

    #[test]
    fn test_region_directory_retain_codes() {
        let mut directory: RegionDirectory = vec![
            ("01".to_string(), "A".to_string()),
            ("02".to_string(), "B".to_string()),
            ("03".to_string(), "C".to_string()),
        ]
        .into_iter()
        .collect();

        directory.retain_codes(&["03".to_string(), "01".to_string()]);
        let codes: Vec<&str> = directory.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["01", "03"]);
    }

    #[test]
    fn test_secondary_set_lookup_is_exact() {
        let set: SecondaryCourtSet = vec![
            court(Some("100"), "first"),
            court(Some("100"), "second"),
            court(None, "no code"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.lookup(Some("100")).unwrap().name, "first");
        assert!(set.lookup(Some(" 100")).is_none());
        assert!(set.lookup(None).is_none());
    }
}
