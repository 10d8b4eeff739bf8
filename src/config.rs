pub struct Config {
    pub data_dir: String,
    pub output_path: Option<String>,
    pub pretty: bool,
    pub cumulative: bool,
    pub retention_days: i64,
    pub base_url: String,
    pub dividend_base_url: String,
    pub symbols: Vec<String>,
    pub request_timeout_secs: u64,
    pub request_interval_ms: u64,
    pub user_agent: String,
    pub debug_mode: bool,
    pub debug_record_limit: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            data_dir: "data".to_string(),
            output_path: None,
            pretty: false,
            cumulative: false,
            retention_days: 90,
            base_url: "https://www.slickcharts.com".to_string(),
            dividend_base_url: "https://stockanalysis.com".to_string(),
            symbols: vec![
                "AAPL".to_string(),
                "MSFT".to_string(),
                "JNJ".to_string(),
                "KO".to_string(),
                "PG".to_string(),
            ],
            request_timeout_secs: 30,
            request_interval_ms: 500,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            debug_mode: false,
            debug_record_limit: 10,
        }
    }

    pub fn with_data_dir(mut self, dir: &str) -> Self {
        self.data_dir = dir.to_string();
        self
    }

    pub fn with_output_path(mut self, path: Option<String>) -> Self {
        self.output_path = path;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_cumulative(mut self, cumulative: bool) -> Self {
        self.cumulative = cumulative;
        self
    }

    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_dividend_base_url(mut self, url: &str) -> Self {
        self.dividend_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_request_interval_ms(mut self, interval: u64) -> Self {
        self.request_interval_ms = interval;
        self
    }

    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    pub fn with_debug_record_limit(mut self, limit: usize) -> Self {
        self.debug_record_limit = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
