use crate::adapters::http::TransportClient;
use crate::core::endpoints;
use crate::domain::model::{CourtRecord, Region};
use crate::utils::error::{CourtError, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::VecDeque;
use std::time::Duration;

const RESULTS_TABLE: &str = "table.msSearchResultTbl";
const INFO_NODE: &str = "div.courtInfoCont";

struct ResultSelectors {
    table: Selector,
    cell: Selector,
    anchor: Selector,
    info: Selector,
}

impl ResultSelectors {
    fn new() -> Result<Self> {
        let parse = |s: &str| {
            Selector::parse(s).map_err(|e| CourtError::parse(format!("invalid selector '{s}': {e}")))
        };
        Ok(Self {
            table: parse(RESULTS_TABLE)?,
            cell: parse("td")?,
            anchor: parse("a")?,
            info: parse(INFO_NODE)?,
        })
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// 一行代碼文字 → 代碼；`Код: 01MS0001` 只去掉第一個冒號前的標籤，值為空時回傳 None
pub fn parse_code_line(line: &str) -> Option<String> {
    let value = match line.split_once(':') {
        Some((_, value)) => value,
        None => line,
    };
    non_empty(value.trim().to_string())
}

/// 解析單一結果格；沒有名稱連結的格子不是法院列
fn parse_cell(cell: ElementRef<'_>, region: &str, selectors: &ResultSelectors) -> Vec<CourtRecord> {
    let info = cell.select(&selectors.info).next();

    let name_anchor = cell.select(&selectors.anchor).find(|anchor| match info {
        Some(info) => !anchor
            .ancestors()
            .any(|node| ElementRef::wrap(node) == Some(info)),
        None => true,
    });
    let (Some(name_anchor), Some(info)) = (name_anchor, info) else {
        return Vec::new();
    };

    let name = element_text(name_anchor);
    let website = info
        .select(&selectors.anchor)
        .next()
        .and_then(|a| non_empty(element_text(a)));

    info.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            CourtRecord::new(region, name.clone(), parse_code_line(line))
                .with_website(website.clone())
        })
        .collect()
}

/// 解析一個區域的結果頁，依列順序、再依代碼行順序輸出
pub fn parse_results_page(html: &str, region: &str) -> Result<Vec<CourtRecord>> {
    let selectors = ResultSelectors::new()?;
    let document = Html::parse_document(html);

    let table = document
        .select(&selectors.table)
        .next()
        .ok_or_else(|| CourtError::parse(format!("results table {} not found", RESULTS_TABLE)))?;

    Ok(table
        .select(&selectors.cell)
        .flat_map(|cell| parse_cell(cell, region, &selectors))
        .collect())
}

async fn fetch_region(
    client: &TransportClient,
    primary_base: &str,
    region: &Region,
) -> Result<Vec<CourtRecord>> {
    let url = endpoints::region_results_url(primary_base, &region.code)?;
    let bytes = client.get_ok(&url).await?;
    let html = String::from_utf8_lossy(&bytes);
    parse_results_page(&html, &region.name)
}

/// 主站法院的惰性序列：每次推進最多抓一個區域
///
/// 區域之間依序處理；單一區域失敗只記錄警告並跳過。
pub struct PrimaryCourtStream<'a> {
    client: &'a TransportClient,
    primary_base: &'a str,
    regions: std::slice::Iter<'a, Region>,
    pending: VecDeque<CourtRecord>,
    delay: Duration,
    fetched_any: bool,
    failed_regions: usize,
}

impl<'a> PrimaryCourtStream<'a> {
    pub fn new(client: &'a TransportClient, primary_base: &'a str, regions: &'a [Region]) -> Self {
        Self {
            client,
            primary_base,
            regions: regions.iter(),
            pending: VecDeque::new(),
            delay: Duration::ZERO,
            fetched_any: false,
            failed_regions: 0,
        }
    }

    /// 區域之間的禮貌延遲
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failed_regions(&self) -> usize {
        self.failed_regions
    }

    pub async fn next_record(&mut self) -> Option<CourtRecord> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(record);
            }

            let region = self.regions.next()?;
            if self.fetched_any && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.fetched_any = true;

            match fetch_region(self.client, self.primary_base, region).await {
                Ok(records) => {
                    tracing::debug!(
                        "📄 Region {} ({}): {} courts",
                        region.code,
                        region.name,
                        records.len()
                    );
                    self.pending.extend(records);
                }
                Err(e) => {
                    self.failed_regions += 1;
                    tracing::warn!("⚠️ Skipping region {} ({}): {}", region.code, region.name, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
<html><body>
<table class="msSearchResultTbl msFullSearchResultTbl">
  <tr>
    <td>
      <a href="/modules.php?name=sud&court=01MS0001" class="court-result">Судебный участок № 1 г. Майкопа</a>
      <div class="courtInfoCont">
        01MS0001
        <br/>
        01MS0011
        <br/>
           <br/>
        <a href="http://1.adg.msudrf.ru">1.adg.msudrf.ru</a>
      </div>
    </td>
  </tr>
  <tr>
    <td>Нет ссылки <div class="courtInfoCont">01MS0099</div></td>
  </tr>
  <tr>
    <td>
      <a href="/x">Судебный участок № 2</a>
      <div class="courtInfoCont">Код суда: 01MS0002<br/>Код суда:<br/></div>
    </td>
  </tr>
</table>
</body></html>"#;

    #[test]
    fn test_cell_with_two_code_lines_and_blank_line() {
        let records = parse_results_page(RESULTS_PAGE, "Республика Адыгея").unwrap();

        let first: Vec<&CourtRecord> = records
            .iter()
            .filter(|r| r.name == "Судебный участок № 1 г. Майкопа")
            .collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].code.as_deref(), Some("01MS0001"));
        assert_eq!(first[1].code.as_deref(), Some("01MS0011"));
        for record in &first {
            assert_eq!(record.region, "Республика Адыгея");
            assert_eq!(record.website.as_deref(), Some("1.adg.msudrf.ru"));
            assert!(record.address.is_none());
            assert!(record.presence_flag.is_none());
        }
    }

    #[test]
    fn test_cell_without_anchor_is_skipped() {
        let records = parse_results_page(RESULTS_PAGE, "Республика Адыгея").unwrap();
        assert!(records
            .iter()
            .all(|r| r.code.as_deref() != Some("01MS0099")));
    }

    #[test]
    fn test_labelled_and_malformed_code_lines() {
        let records = parse_results_page(RESULTS_PAGE, "Республика Адыгея").unwrap();

        let second: Vec<&CourtRecord> = records
            .iter()
            .filter(|r| r.name == "Судебный участок № 2")
            .collect();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].code.as_deref(), Some("01MS0002"));
        assert_eq!(second[1].code, None);
        assert_eq!(second[0].website, None);
    }

    #[test]
    fn test_row_order_is_preserved() {
        let records = parse_results_page(RESULTS_PAGE, "R").unwrap();
        let codes: Vec<Option<&str>> = records.iter().map(|r| r.code.as_deref()).collect();
        assert_eq!(
            codes,
            vec![Some("01MS0001"), Some("01MS0011"), Some("01MS0002"), None]
        );
    }

    #[test]
    fn test_missing_table_is_parse_error() {
        let err = parse_results_page("<html><body></body></html>", "R").unwrap_err();
        assert!(matches!(err, CourtError::ParseError { .. }));
    }

    #[test]
    fn test_parse_code_line() {
        assert_eq!(parse_code_line("100"), Some("100".to_string()));
        assert_eq!(parse_code_line("Код: 77MS0001 "), Some("77MS0001".to_string()));
        assert_eq!(parse_code_line("Код:"), None);
        assert_eq!(
            parse_code_line("Сайт: http://1.adg.msudrf.ru"),
            Some("http://1.adg.msudrf.ru".to_string())
        );
        assert_eq!(parse_code_line("Приём: 09:00"), Some("09:00".to_string()));
    }
}
