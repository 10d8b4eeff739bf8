use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::process::Command;

fn main() -> Result<()> {
    // 获取最新归档日期
    let latest_date = latest_history_date("data/sp500.json")?;

    // 将日期转换为 YYYY.M.D 格式（移除前导零）
    let parts: Vec<&str> = latest_date.split('-').collect();
    if parts.len() != 3 {
        bail!("无效的日期格式: {}", latest_date);
    }

    let year = parts[0];
    let month = parts[1].parse::<u32>()?.to_string(); // 移除前导零
    let day = parts[2].parse::<u32>()?.to_string(); // 移除前导零
    let version = format!("{}.{}.{}", year, month, day);

    println!("准备发布版本: {}", version);

    // 读取Cargo.toml
    let cargo_toml_path = "Cargo.toml";
    let cargo_toml = fs::read_to_string(cargo_toml_path)?;

    // 更新版本号
    let version_pattern = cargo_toml
        .lines()
        .find(|line| line.trim().starts_with("version = "))
        .unwrap_or("version = \"0.1.0\"");

    let current_version = version_pattern
        .trim()
        .trim_start_matches("version = ")
        .trim_matches('"');

    let updated_toml = cargo_toml.replace(
        &format!("version = \"{}\"", current_version),
        &format!("version = \"{}\"", version),
    );

    // 写回Cargo.toml
    fs::write(cargo_toml_path, updated_toml)?;

    println!("已更新版本号: {} -> {}", current_version, version);

    // 执行git命令
    println!("添加所有更改到git...");
    run_git(&["add", "-A"])?;

    println!("提交更改...");
    run_git(&["commit", "-m", &format!("Release {}", version)])?;

    println!("创建标签 v{}...", version);
    run_git(&["tag", &format!("v{}", version)])?;

    println!("推送到远程仓库...");
    run_git(&["push"])?;
    run_git(&["push", "--tags"])?;

    println!("发布完成: v{}", version);
    Ok(())
}

fn run_git(args: &[&str]) -> Result<()> {
    let status = Command::new("git")
        .args(args)
        .status()
        .with_context(|| format!("无法执行 git {:?}", args))?;
    if !status.success() {
        bail!("git {:?} 执行失败: {}", args, status);
    }
    Ok(())
}

/// 查找累计历史文件中最新的归档日期
fn latest_history_date(path: &str) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("数据文件不存在，请先运行 'cargo run -- scrape --source sp500 -c' ({})", path))?;
    let json: Value = serde_json::from_str(&text)?;

    let history = match json.get("history").and_then(|h| h.as_array()) {
        Some(history) => history,
        None => bail!("{} 不是累计模式的历史文件", path),
    };

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
