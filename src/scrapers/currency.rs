use crate::config::Config;
use crate::errors::{Result, ScraperError};
use crate::extract::{self, TableLocator};
use crate::fetch::HttpFetcher;
use crate::models::record::CurrencyRate;
use crate::normalize::{parse_market_cap, to_f64, to_i64};
use crate::scrapers::base::SourceScraper;
use crate::util;
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

/// 货币行情抓取器
pub struct CurrencyScraper;

impl CurrencyScraper {
    pub fn new() -> Self {
        Self
    }

    /// 解析货币表格，列序: 排名/名称/代码/市值/价格/涨跌幅
    pub fn parse(&self, html: &str) -> Result<Vec<Value>> {
        let locators = [
            TableLocator::HeadingText("Currencies by Market Cap"),
            TableLocator::Css("table.table-hover"),
        ];
        let table = extract::find_table(html, &locators, 6)?;

        let mut currencies = Vec::new();
        for row in &table.rows {
            match parse_row(row) {
                Ok(record) => currencies.push(serde_json::to_value(record)?),
                Err(e) => {
                    debug!("跳过无法解析的行 {:?}: {}", row, e);
                }
            }
        }

        if currencies.is_empty() {
            return Err(ScraperError::EmptyResult(
                "no valid currency rows".to_string(),
            ));
        }

        info!("成功解析 {} 条货币行情记录", currencies.len());
        Ok(currencies)
    }
}

fn parse_row(row: &[String]) -> Result<CurrencyRate> {
    if row.len() < 6 {
        return Err(ScraperError::DataError("row too short".to_string()));
    }

    Ok(CurrencyRate {
        rank: to_i64(&row[0])?,
        name: row[1].clone(),
        symbol: row[2].clone(),
        market_cap: parse_market_cap(&row[3])?,
        price: to_f64(&row[4])?,
        change_percent: to_f64(&row[5])?,
    })
}

impl Default for CurrencyScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceScraper for CurrencyScraper {
    fn source_name(&self) -> &'static str {
        "currency"
    }

    fn data_key(&self) -> &'static str {
        "currencies"
    }

    async fn scrape(&self, fetcher: &HttpFetcher, config: &Config) -> Result<Vec<Value>> {
        let url = format!("{}/currency", config.base_url);
        info!("获取货币行情列表");

        let html = fetcher.fetch(&url).await?;
        let mut records = self.parse(&html)?;
        util::limit_records(&mut records, config, self.source_name());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
      <h2>Currencies by Market Cap</h2>
      <table class="table table-hover">
        <thead><tr><th>#</th><th>Name</th><th>Symbol</th><th>Market Cap</th>
          <th>Price</th><th>% Chg</th></tr></thead>
        <tbody>
          <tr><td>1</td><td>Bitcoin</td><td>BTC</td><td>$1.92T</td>
            <td>$97,410.55</td><td>-1.04%</td></tr>
          <tr><td>2</td><td>Ethereum</td><td>ETH</td><td>$441.7B</td>
            <td>$3,661.20</td><td>+0.86%</td></tr>
        </tbody>
      </table>
    </body></html>"#;

    #[test]
    fn parses_currencies_with_market_cap_suffix() {
        let records = CurrencyScraper::new().parse(PAGE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["symbol"], "BTC");
        assert!((records[0]["marketCap"].as_f64().unwrap() - 1.92e12).abs() < 1e3);
        assert_eq!(records[1]["price"], 3661.2);
        assert_eq!(records[1]["changePercent"], 0.86);
    }
}
