use crate::config::Config;
use crate::errors::{Result, ScraperError};
use crate::extract::{self, TableLocator};
use crate::fetch::HttpFetcher;
use crate::models::record::Holding;
use crate::normalize::{to_f64, to_i64};
use crate::scrapers::base::SourceScraper;
use crate::util;
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

/// 支持的指数
#[derive(Debug, Clone, Copy)]
pub enum IndexKind {
    Sp500,
    Nasdaq100,
    DowJones,
}

impl IndexKind {
    fn path(&self) -> &'static str {
        match self {
            IndexKind::Sp500 => "sp500",
            IndexKind::Nasdaq100 => "nasdaq100",
            IndexKind::DowJones => "dowjones",
        }
    }
}

/// 指数成分股抓取器
pub struct HoldingsScraper {
    index: IndexKind,
}

impl HoldingsScraper {
    pub fn new(index: IndexKind) -> Self {
        Self { index }
    }

    /// 解析成分股表格，列序: 排名/公司/代码/权重/价格/涨跌/涨跌幅
    pub fn parse(&self, html: &str) -> Result<Vec<Value>> {
        let locators = [
            TableLocator::HeadingText("Components by Weight"),
            TableLocator::Css("table.table-hover"),
        ];
        let table = extract::find_table(html, &locators, 7)?;

        let mut holdings = Vec::new();
        for row in &table.rows {
            match parse_row(row) {
                Ok(record) => holdings.push(serde_json::to_value(record)?),
                Err(e) => {
                    debug!("跳过无法解析的行 {:?}: {}", row, e);
                }
            }
        }

        if holdings.is_empty() {
            return Err(ScraperError::EmptyResult(format!(
                "no valid holdings rows for {}",
                self.source_name()
            )));
        }

        info!("成功解析 {} 条成分股记录", holdings.len());
        Ok(holdings)
    }
}

fn parse_row(row: &[String]) -> Result<Holding> {
    if row.len() < 7 {
        return Err(ScraperError::DataError("row too short".to_string()));
    }

    Ok(Holding {
        rank: to_i64(&row[0])?,
        company: row[1].clone(),
        symbol: row[2].clone(),
        weight: to_f64(&row[3])?,
        price: to_f64(&row[4])?,
        change: to_f64(&row[5])?,
        change_percent: to_f64(&row[6])?,
    })
}

#[async_trait]
impl SourceScraper for HoldingsScraper {
    fn source_name(&self) -> &'static str {
        self.index.path()
    }

    fn data_key(&self) -> &'static str {
        "holdings"
    }

    async fn scrape(&self, fetcher: &HttpFetcher, config: &Config) -> Result<Vec<Value>> {
        let url = format!("{}/{}", config.base_url, self.index.path());
        info!("获取 {} 成分股列表", self.source_name());

        let html = fetcher.fetch(&url).await?;
        let mut records = self.parse(&html)?;
        util::limit_records(&mut records, config, self.source_name());
        Ok(records)
    }
}
