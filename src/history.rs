use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::util::format_iso_date;

/// 单个日历日期的归档条目
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub records: Vec<Value>,
}

/// 按日期归档的累计历史文档
/// 条目保持新日期在前，每个日历日期最多一个条目
#[derive(Debug)]
pub struct HistoryDocument {
    data_key: String,
    entries: Vec<HistoryEntry>,
}

impl HistoryDocument {
    pub fn new(data_key: &str) -> Self {
        Self {
            data_key: data_key.to_string(),
            entries: Vec::new(),
        }
    }

    /// 从磁盘加载历史文件
    /// 文件缺失或无法解析时按首次运行处理，返回空历史而不报错
    pub fn load(path: &Path, data_key: &str) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No existing history at {}: {}", path.display(), e);
                return Self::new(data_key);
            }
        };

        let json: Value = match serde_json::from_str(&text) {
            Ok(json) => json,
            Err(e) => {
                warn!("历史文件无法解析，按空历史处理 {}: {}", path.display(), e);
                return Self::new(data_key);
            }
        };

        let mut entries = Vec::new();
        if let Some(list) = json.get("history").and_then(|h| h.as_array()) {
            for item in list {
                let date_str = match item.get("date").and_then(|d| d.as_str()) {
                    Some(s) => s,
                    None => {
                        warn!("跳过缺少date字段的历史条目");
                        continue;
                    }
                };
                let date = match crate::util::parse_iso_date(date_str) {
                    Ok(date) => date,
                    Err(e) => {
                        warn!("跳过无效日期的历史条目 {}: {}", date_str, e);
                        continue;
                    }
                };
                let records = item
                    .get(data_key)
                    .and_then(|r| r.as_array())
                    .cloned()
                    .unwrap_or_default();
                entries.push(HistoryEntry { date, records });
            }
        }

        Self {
            data_key: data_key.to_string(),
            entries,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 剪除保留窗口之外的旧条目，窗口为截至today的最近retention_days个日历日。
    /// 不改变剩余条目的顺序，返回剪除数量
    pub fn prune(&mut self, today: &NaiveDate, retention_days: i64) -> usize {
        let cutoff = *today - Duration::days(retention_days);
        let before = self.entries.len();
        self.entries.retain(|entry| entry.date > cutoff);
        before - self.entries.len()
    }

    /// 合并当日快照：已存在当日条目则替换其记录，否则插入到最前
    pub fn merge_today(&mut self, today: &NaiveDate, records: Vec<Value>) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.date == *today) {
            entry.records = records;
        } else {
            self.entries.insert(
                0,
                HistoryEntry {
                    date: *today,
                    records,
                },
            );
        }
    }

    /// 序列化为history数组，条目形如 { "date": "YYYY-MM-DD", "<dataKey>": [...] }
    pub fn to_value(&self) -> Value {
        let list: Vec<Value> = self
            .entries
            .iter()
            .map(|entry| {
                let mut obj = Map::new();
                obj.insert(
                    "date".to_string(),
                    Value::String(format_iso_date(&entry.date)),
                );
                obj.insert(self.data_key.clone(), Value::Array(entry.records.clone()));
                Value::Object(obj)
            })
            .collect();
        Value::Array(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn seeded(dates: &[&str]) -> HistoryDocument {
        let mut doc = HistoryDocument::new("holdings");
        for d in dates {
            doc.entries.push(HistoryEntry {
                date: date(d),
                records: vec![json!({"symbol": "ACM"})],
            });
        }
        doc
    }

    #[test]
    fn missing_file_is_first_run() {
        let doc = HistoryDocument::load(Path::new("/nonexistent/history.json"), "holdings");
        assert!(doc.is_empty());
    }

    #[test]
    fn corrupt_file_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let doc = HistoryDocument::load(&path, "holdings");
        assert!(doc.is_empty());
    }

    #[test]
    fn load_skips_entries_with_bad_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let text = json!({
            "updated": "2026-01-03T12:00:00Z",
            "source": "slickcharts",
            "history": [
                {"date": "2026-01-03", "holdings": [{"symbol": "ACM"}]},
                {"date": "not-a-date", "holdings": []},
                {"holdings": []}
            ]
        });
        fs::write(&path, text.to_string()).unwrap();

        let doc = HistoryDocument::load(&path, "holdings");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.entries()[0].date, date("2026-01-03"));
        assert_eq!(doc.entries()[0].records.len(), 1);
    }

    #[test]
    fn merge_replaces_same_date_entry() {
        let mut doc = seeded(&["2026-01-03", "2026-01-02"]);
        let today = date("2026-01-03");

        doc.merge_today(&today, vec![json!({"symbol": "GLX"}), json!({"symbol": "INI"})]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.entries()[0].records.len(), 2);

        // 同一天再跑一次，长度不变
        doc.merge_today(&today, vec![json!({"symbol": "GLX"})]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.entries()[0].records.len(), 1);
    }

    #[test]
    fn merge_prepends_new_date() {
        let mut doc = seeded(&["2026-01-03"]);
        doc.merge_today(&date("2026-01-04"), vec![json!({"symbol": "ACM"})]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.entries()[0].date, date("2026-01-04"));
        assert_eq!(doc.entries()[1].date, date("2026-01-03"));
    }

    #[test]
    fn prune_then_merge_retention_scenario() {
        let mut doc = seeded(&["2026-01-03", "2026-01-02", "2026-01-01"]);
        let today = date("2026-01-04");

        let pruned = doc.prune(&today, 2);
        assert_eq!(pruned, 2);
        doc.merge_today(&today, vec![json!({"symbol": "ACM"})]);

        let dates: Vec<NaiveDate> = doc.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date("2026-01-04"), date("2026-01-03")]);
    }

    #[test]
    fn prune_keeps_most_recent_window() {
        let mut dates = Vec::new();
        let today = date("2026-04-30");
        for offset in 0..120 {
            dates.push(format_iso_date(&(today - Duration::days(offset))));
        }
        let refs: Vec<&str> = dates.iter().map(|s| s.as_str()).collect();
        let mut doc = seeded(&refs);

        let pruned = doc.prune(&today, 90);
        assert_eq!(pruned, 30);
        assert_eq!(doc.len(), 90);
        assert!(doc.entries().iter().all(|e| e.date > today - Duration::days(90)));
        // 剪除不改变顺序
        assert_eq!(doc.entries()[0].date, today);
    }

    #[test]
    fn to_value_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut doc = HistoryDocument::new("rates");
        doc.merge_today(&date("2026-01-04"), vec![json!({"maturity": "1 Mo", "rate": 5.35})]);

        let mut payload = Map::new();
        payload.insert("history".to_string(), doc.to_value());
        fs::write(&path, Value::Object(payload).to_string()).unwrap();

        let loaded = HistoryDocument::load(&path, "rates");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries()[0].records[0]["rate"], 5.35);
    }
}
