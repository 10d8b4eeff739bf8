use crate::config::Config;
use crate::errors::Result;
use crate::fetch::HttpFetcher;
use crate::history::HistoryDocument;
use crate::payload;
use crate::scrapers::base::SourceScraper;
use crate::util;
use chrono::NaiveDate;
use log::info;
use std::path::Path;
use std::sync::Arc;

/// 抓取流水线服务，处理数据的抓取、归档和写出
pub struct PipelineService {
    config: Config,
    fetcher: HttpFetcher,
}

impl PipelineService {
    /// 创建新的流水线服务实例
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行单个数据源的完整流水线：抓取 -> 快照或归档 -> 写出
    pub async fn run_source(
        &self,
        scraper: &dyn SourceScraper,
        date: &NaiveDate,
    ) -> Result<usize> {
        info!("Scraping from {}", scraper.source_name());
        let records = scraper.scrape(&self.fetcher, &self.config).await?;
        let count = records.len();

        let path_str = util::output_path(&self.config, scraper.source_name());
        let path = Path::new(&path_str);

        let doc = if self.config.cumulative {
            // 加载现有历史，先剪枝再合并当日快照，整体重写回磁盘
            let mut history = HistoryDocument::load(path, scraper.data_key());
            let pruned = history.prune(date, self.config.retention_days);
            if pruned > 0 {
                info!(
                    "Pruned {} stale history entries for {}",
                    pruned,
                    scraper.source_name()
                );
            }
            history.merge_today(date, records);
            payload::cumulative_payload(scraper.site(), &history)
        } else {
            payload::snapshot_payload(scraper.site(), scraper.data_key(), records)
        };

        payload::write_json(path, &doc, self.config.pretty)?;

        // 记录数输出到标准输出，供外部调度方观察
        println!("{}: {} records -> {}", scraper.source_name(), count, path.display());
        info!(
            "Successfully processed {} records for {}",
            count,
            scraper.source_name()
        );
        Ok(count)
    }

    /// 依次运行多个数据源，任一数据源失败即中止
    pub async fn run_all(
        &self,
        scrapers: &[Arc<dyn SourceScraper + Send + Sync>],
        date: &NaiveDate,
    ) -> Result<usize> {
        let mut total = 0;
        for scraper in scrapers {
            total += self.run_source(scraper.as_ref(), date).await?;
        }
        Ok(total)
    }
}
