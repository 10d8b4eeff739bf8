use crate::config::Config;
use crate::errors::{Result, ScraperError};
use crate::extract::{self, TableLocator};
use crate::fetch::HttpFetcher;
use crate::models::record::DividendPayment;
use crate::normalize::to_f64;
use crate::scrapers::base::SourceScraper;
use crate::util;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;

/// 个股分红历史抓取器，按配置的代码列表逐个顺序抓取
pub struct DividendScraper;

impl DividendScraper {
    pub fn new() -> Self {
        Self
    }

    /// 解析单个股票页面的分红表格，列序: 除息日/金额/登记日/发放日
    pub fn parse_symbol(&self, html: &str, symbol: &str) -> Result<Vec<Value>> {
        let locators = [
            TableLocator::HeadingText("Dividend History"),
            TableLocator::Css("table"),
        ];
        let table = extract::find_table(html, &locators, 4)?;

        let mut payments = Vec::new();
        for row in &table.rows {
            if row.len() < 4 {
                continue;
            }
            let amount = match to_f64(&row[1]) {
                Ok(a) => a,
                Err(e) => {
                    debug!("跳过无法解析的行 {:?}: {}", row, e);
                    continue;
                }
            };
            let record = DividendPayment {
                symbol: symbol.to_string(),
                ex_date: row[0].clone(),
                amount,
                pay_date: row[3].clone(),
            };
            payments.push(serde_json::to_value(record)?);
        }

        Ok(payments)
    }
}

impl Default for DividendScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceScraper for DividendScraper {
    fn source_name(&self) -> &'static str {
        "dividends"
    }

    fn site(&self) -> &'static str {
        "stockanalysis"
    }

    fn data_key(&self) -> &'static str {
        "dividends"
    }

    async fn scrape(&self, fetcher: &HttpFetcher, config: &Config) -> Result<Vec<Value>> {
        let mut symbols = config.symbols.clone();
        util::limit_records(&mut symbols, config, self.source_name());

        // 顺序逐个抓取，请求间隔由fetcher统一控制
        let mut records = Vec::new();
        for symbol in &symbols {
            let url = format!(
                "{}/stocks/{}/dividend/",
                config.dividend_base_url,
                symbol.to_lowercase()
            );
            info!("获取 {} 的分红历史", symbol);

            // 单个代码失败时跳过，不中断整个批次
            match fetcher.fetch(&url).await {
                Ok(html) => match self.parse_symbol(&html, symbol) {
                    Ok(payments) if payments.is_empty() => {
                        warn!("{} 页面没有可解析的分红记录", symbol);
                    }
                    Ok(payments) => {
                        debug!("{} 解析出 {} 条分红记录", symbol, payments.len());
                        records.extend(payments);
                    }
                    Err(e) => {
                        warn!("Failed to parse dividends for {}: {}", symbol, e);
                    }
                },
                Err(e) => {
                    warn!("Failed to fetch dividends for {}: {}", symbol, e);
                }
            }
        }

        if records.is_empty() {
            return Err(ScraperError::EmptyResult(format!(
                "no valid dividend rows across {} symbols",
                symbols.len()
            )));
        }

        info!("成功解析 {} 条分红记录", records.len());
        Ok(records)
    }
}
