use crate::config::Config;
use crate::errors::{Result, ScraperError};
use log::debug;
use reqwest::Client;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// 共享的HTTP抓取层，统一超时、UA和请求频率控制
pub struct HttpFetcher {
    client: Client,
    last_request: Mutex<Option<Instant>>,
    request_interval: Duration,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ScraperError::RequestError)?;

        Ok(Self {
            client,
            last_request: Mutex::new(None),
            request_interval: Duration::from_millis(config.request_interval_ms),
        })
    }

    /// 等待请求频率限制
    async fn wait_for_rate_limit(&self) {
        let now = Instant::now();
        let should_wait = {
            let mut last = self.last_request.lock().unwrap();
            let should_wait = if let Some(instant) = *last {
                let elapsed = instant.elapsed();
                if elapsed < self.request_interval {
                    Some(self.request_interval - elapsed)
                } else {
                    None
                }
            } else {
                None
            };
            *last = Some(now);
            should_wait
        };

        if let Some(wait_time) = should_wait {
            debug!("等待 {:?} 以遵守频率限制", wait_time);
            tokio::time::sleep(wait_time).await;
        }
    }

    /// 抓取页面原始HTML文本，非2xx状态码视为失败
    pub async fn fetch(&self, url: &str) -> Result<String> {
        // 限制请求频率
        self.wait_for_rate_limit().await;

        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::FetchError(format!(
                "{}: HTTP status {}",
                url, status
            )));
        }

        let text = response.text().await?;
        debug!("成功获取响应，{} 字节", text.len());
        Ok(text)
    }
}
