use crate::config::Config;
use crate::errors::{Result, ScraperError};
use crate::extract::{self, TableLocator};
use crate::fetch::HttpFetcher;
use crate::models::record::Mover;
use crate::normalize::{to_f64, to_i64};
use crate::scrapers::base::SourceScraper;
use crate::util;
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

/// 涨跌方向
#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Gainers,
    Losers,
}

impl Direction {
    fn path(&self) -> &'static str {
        match self {
            Direction::Gainers => "gainers",
            Direction::Losers => "losers",
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Direction::Gainers => "Top Gainers",
            Direction::Losers => "Top Losers",
        }
    }
}

/// 当日涨跌幅排行抓取器
pub struct MoversScraper {
    direction: Direction,
}

impl MoversScraper {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    /// 解析排行表格，列序: 排名/公司/代码/价格/涨跌/涨跌幅
    pub fn parse(&self, html: &str) -> Result<Vec<Value>> {
        let locators = [
            TableLocator::HeadingText(self.direction.heading()),
            TableLocator::Css("table.table-hover"),
        ];
        let table = extract::find_table(html, &locators, 6)?;

        let mut movers = Vec::new();
        for row in &table.rows {
            match parse_row(row) {
                Ok(record) => movers.push(serde_json::to_value(record)?),
                Err(e) => {
                    debug!("跳过无法解析的行 {:?}: {}", row, e);
                }
            }
        }

        if movers.is_empty() {
            return Err(ScraperError::EmptyResult(format!(
                "no valid mover rows for {}",
                self.source_name()
            )));
        }

        info!("成功解析 {} 条排行记录", movers.len());
        Ok(movers)
    }
}

fn parse_row(row: &[String]) -> Result<Mover> {
    if row.len() < 6 {
        return Err(ScraperError::DataError("row too short".to_string()));
    }

    Ok(Mover {
        rank: to_i64(&row[0])?,
        company: row[1].clone(),
        symbol: row[2].clone(),
        price: to_f64(&row[3])?,
        change: to_f64(&row[4])?,
        change_percent: to_f64(&row[5])?,
    })
}

#[async_trait]
impl SourceScraper for MoversScraper {
    fn source_name(&self) -> &'static str {
        self.direction.path()
    }

    fn data_key(&self) -> &'static str {
        "movers"
    }

    async fn scrape(&self, fetcher: &HttpFetcher, config: &Config) -> Result<Vec<Value>> {
        let url = format!("{}/{}", config.base_url, self.direction.path());
        info!("获取当日{}排行", self.source_name());

        let html = fetcher.fetch(&url).await?;
        let mut records = self.parse(&html)?;
        util::limit_records(&mut records, config, self.source_name());
        Ok(records)
    }
}
