use chrono::{NaiveDate, Utc};
use log::info;
use crate::config::Config;
use crate::errors::Result;

// 日期转换工具
pub fn parse_iso_date(date_str: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?)
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 当前UTC时间的ISO-8601时间戳，用于payload的updated字段
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// 计算某个数据源的输出文件路径
pub fn output_path(config: &Config, source_name: &str) -> String {
    match &config.output_path {
        Some(path) => path.clone(),
        None => format!("{}/{}.json", config.data_dir, source_name),
    }
}

// 调试模式下限制记录数量
pub fn limit_records<T>(records: &mut Vec<T>, config: &Config, source_name: &str) {
    if config.debug_mode && records.len() > config.debug_record_limit {
        info!(
            "DEBUG MODE: Processing only {} out of {} records from {}",
            config.debug_record_limit,
            records.len(),
            source_name
        );
        records.truncate(config.debug_record_limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        let date = parse_iso_date("2026-01-04").unwrap();
        assert_eq!(format_iso_date(&date), "2026-01-04");
        assert!(parse_iso_date("01/04/2026").is_err());
    }

    #[test]
    fn default_output_path_uses_data_dir() {
        let config = Config::new().with_data_dir("out");
        assert_eq!(output_path(&config, "sp500"), "out/sp500.json");

        let config = config.with_output_path(Some("custom.json".to_string()));
        assert_eq!(output_path(&config, "sp500"), "custom.json");
    }
}
