use crate::config::Config;
use crate::errors::{Result, ScraperError};
use crate::extract::{self, TableLocator};
use crate::fetch::HttpFetcher;
use crate::models::record::IndexReturn;
use crate::normalize::{to_f64, to_i64};
use crate::scrapers::base::SourceScraper;
use crate::util;
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

/// 指数年度收益抓取器
pub struct ReturnsScraper;

impl ReturnsScraper {
    pub fn new() -> Self {
        Self
    }

    /// 解析年度收益表格，列序: 年份/年度总收益
    pub fn parse(&self, html: &str) -> Result<Vec<Value>> {
        let locators = [
            TableLocator::HeadingText("Annual Returns"),
            TableLocator::Css("table.table"),
        ];
        let table = extract::find_table(html, &locators, 2)?;

        let mut returns = Vec::new();
        for row in &table.rows {
            if row.len() < 2 {
                continue;
            }
            let record = match (to_i64(&row[0]), to_f64(&row[1])) {
                (Ok(year), Ok(total_return)) => IndexReturn { year, total_return },
                (year, total_return) => {
                    debug!("跳过无法解析的行 {:?}: {:?} {:?}", row, year.err(), total_return.err());
                    continue;
                }
            };
            returns.push(serde_json::to_value(record)?);
        }

        if returns.is_empty() {
            return Err(ScraperError::EmptyResult(
                "no valid annual return rows".to_string(),
            ));
        }

        info!("成功解析 {} 条年度收益记录", returns.len());
        Ok(returns)
    }
}

impl Default for ReturnsScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceScraper for ReturnsScraper {
    fn source_name(&self) -> &'static str {
        "returns"
    }

    fn data_key(&self) -> &'static str {
        "returns"
    }

    async fn scrape(&self, fetcher: &HttpFetcher, config: &Config) -> Result<Vec<Value>> {
        let url = format!("{}/sp500/returns", config.base_url);
        info!("获取指数年度收益列表");

        let html = fetcher.fetch(&url).await?;
        let mut records = self.parse(&html)?;
        util::limit_records(&mut records, config, self.source_name());
        Ok(records)
    }
}
