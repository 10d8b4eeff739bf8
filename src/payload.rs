use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::history::HistoryDocument;
use crate::util::utc_timestamp;

/// 组装快照模式payload: { updated, source, count, <dataKey>: [...] }
pub fn snapshot_payload(site: &str, data_key: &str, records: Vec<Value>) -> Value {
    let mut doc = Map::new();
    doc.insert("updated".to_string(), Value::String(utc_timestamp()));
    doc.insert("source".to_string(), Value::String(site.to_string()));
    doc.insert("count".to_string(), Value::from(records.len()));
    doc.insert(data_key.to_string(), Value::Array(records));
    Value::Object(doc)
}

/// 组装累计模式payload: { updated, source, history: [...] }
pub fn cumulative_payload(site: &str, history: &HistoryDocument) -> Value {
    let mut doc = Map::new();
    doc.insert("updated".to_string(), Value::String(utc_timestamp()));
    doc.insert("source".to_string(), Value::String(site.to_string()));
    doc.insert("history".to_string(), history.to_value());
    Value::Object(doc)
}

/// 写出JSON文件，直接整体覆盖旧文件，必要时创建父目录
pub fn write_json(path: &Path, payload: &Value, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let text = if pretty {
        serde_json::to_string_pretty(payload)?
    } else {
        serde_json::to_string(payload)?
    };
    fs::write(path, text)?;
    Ok(())
}
