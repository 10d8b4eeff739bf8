use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    // 默认读取sp500累计历史文件，可通过参数指定
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "data/sp500.json".to_string());

    if !Path::new(&path).exists() {
        bail!("数据文件不存在，请先运行 'cargo run -- scrape --source sp500 -c'");
    }

    let latest = latest_history_date(&path)?;
    println!("{}", latest);
    Ok(())
}

/// 查找累计历史文件中最新的归档日期
fn latest_history_date(path: &str) -> Result<String> {
    let text = fs::read_to_string(path).with_context(|| format!("无法读取历史文件 {}", path))?;
    let json: Value =
        serde_json::from_str(&text).with_context(|| format!("无法解析历史文件 {}", path))?;

    let history = match json.get("history").and_then(|h| h.as_array()) {
        Some(history) => history,
        None => bail!("{} 不是累计模式的历史文件", path),
    };

    // 历史通常新日期在前，但仍扫描全部条目以防乱序
    let mut latest: Option<&str> = None;
    for entry in history {
        if let Some(date) = entry.get("date").and_then(|d| d.as_str()) {
            if latest.map_or(true, |l| date > l) {
                latest = Some(date);
            }
        }
    }

    match latest {
        Some(date) => Ok(date.to_string()),
        None => bail!("{} 中没有任何历史日期", path),
    }
}
