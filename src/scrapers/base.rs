use crate::config::Config;
use crate::errors::Result;
use crate::fetch::HttpFetcher;
use async_trait::async_trait;
use serde_json::Value;

/// Base trait for market data scrapers
#[async_trait]
pub trait SourceScraper {
    /// 数据源名称，同时作为默认输出文件名
    fn source_name(&self) -> &'static str;

    /// payload中source字段标识的数据来源站点
    fn site(&self) -> &'static str {
        "slickcharts"
    }

    /// payload中记录数组的键名
    fn data_key(&self) -> &'static str;

    /// Fetch and parse records for this source
    /// Returns normalized records ready for payload assembly
    async fn scrape(&self, fetcher: &HttpFetcher, config: &Config) -> Result<Vec<Value>>;
}
