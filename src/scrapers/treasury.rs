use crate::config::Config;
use crate::errors::{Result, ScraperError};
use crate::extract;
use crate::fetch::HttpFetcher;
use crate::models::record::TreasuryRate;
use crate::scrapers::base::SourceScraper;
use crate::util;
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

// 页面内联脚本中的图表状态对象
const STATE_MARKER: &str = "var treasuryData =";

/// 国债收益率抓取器，数据嵌在页面脚本的状态对象里而非表格中
pub struct TreasuryScraper;

impl TreasuryScraper {
    pub fn new() -> Self {
        Self
    }

    /// 从嵌入状态对象的rates数组解析收益率记录
    pub fn parse(&self, html: &str) -> Result<Vec<Value>> {
        let state = extract::extract_state_object(html, STATE_MARKER)?;

        let mut rates = Vec::new();
        if let Some(list) = state.get("rates").and_then(|r| r.as_array()) {
            for item in list {
                let maturity = match item.get("maturity").and_then(|m| m.as_str()) {
                    Some(m) => m.to_string(),
                    None => {
                        debug!("跳过缺少maturity字段的条目: {}", item);
                        continue;
                    }
                };
                let rate = match item.get("rate").and_then(|r| r.as_f64()) {
                    Some(r) => r,
                    None => {
                        debug!("跳过缺少rate字段的条目: {}", item);
                        continue;
                    }
                };
                rates.push(serde_json::to_value(TreasuryRate { maturity, rate })?);
            }
        }

        if rates.is_empty() {
            return Err(ScraperError::EmptyResult(
                "no valid treasury rate entries".to_string(),
            ));
        }

        info!("成功解析 {} 条国债收益率记录", rates.len());
        Ok(rates)
    }
}

impl Default for TreasuryScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceScraper for TreasuryScraper {
    fn source_name(&self) -> &'static str {
        "treasury"
    }

    fn data_key(&self) -> &'static str {
        "rates"
    }

    async fn scrape(&self, fetcher: &HttpFetcher, config: &Config) -> Result<Vec<Value>> {
        let url = format!("{}/treasury", config.base_url);
        info!("获取国债收益率数据");

        let html = fetcher.fetch(&url).await?;
        let mut records = self.parse(&html)?;
        util::limit_records(&mut records, config, self.source_name());
        Ok(records)
    }
}
