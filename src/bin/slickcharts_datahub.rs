use slickcharts_datahub::config::Config;
use slickcharts_datahub::scrapers::base::SourceScraper;
use slickcharts_datahub::scrapers::currency::CurrencyScraper;
use slickcharts_datahub::scrapers::dividends::DividendScraper;
use slickcharts_datahub::scrapers::holdings::{HoldingsScraper, IndexKind};
use slickcharts_datahub::scrapers::movers::{Direction, MoversScraper};
use slickcharts_datahub::scrapers::returns::ReturnsScraper;
use slickcharts_datahub::scrapers::treasury::TreasuryScraper;
use slickcharts_datahub::services::pipeline::PipelineService;

use clap::{App, Arg, SubCommand};
use log::{error, info};
use serde_json::Value;
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();

    // 创建基本的命令行应用
    let app = App::new("SlickChartsHub")
        .version("1.0.0")
        .author("SlickChartsHub Team")
        .about("Market index data scraping system");

    // 在开发模式下添加调试参数
    #[cfg(debug_assertions)]
    let app = app
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .help("Enable debug mode")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("debug-limit")
                .long("debug-limit")
                .help("Limit the number of records to process in debug mode")
                .takes_value(true)
                .default_value("2"),
        );

    // 添加子命令
    let app = app
        .subcommand(
            SubCommand::with_name("scrape")
                .about("Scrape market data from various sources")
                .arg(
                    Arg::with_name("source")
                        .short('s')
                        .long("source")
                        .value_name("SOURCE")
                        .help("Source to scrape (sp500, nasdaq100, dowjones, returns, gainers, losers, treasury, currency, dividends, all)")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Output file path (default: <data-dir>/<source>.json)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("data-dir")
                        .long("data-dir")
                        .value_name("DIR")
                        .help("Directory for default output files")
                        .takes_value(true)
                        .default_value("data"),
                )
                .arg(
                    Arg::with_name("pretty")
                        .short('p')
                        .long("pretty")
                        .help("Pretty-print the output JSON")
                        .takes_value(false),
                )
                .arg(
                    Arg::with_name("cumulative")
                        .short('c')
                        .long("cumulative")
                        .help("Merge today's snapshot into a retained history file")
                        .takes_value(false),
                )
                .arg(
                    Arg::with_name("retention-days")
                        .long("retention-days")
                        .value_name("DAYS")
                        .help("History retention window in days (cumulative mode)")
                        .takes_value(true)
                        .default_value("90"),
                )
                .arg(
                    Arg::with_name("date")
                        .short('d')
                        .long("date")
                        .value_name("DATE")
                        .help("Date to record the snapshot under (YYYY-MM-DD)")
                        .takes_value(true)
                        .default_value(&today),
                )
                .arg(
                    Arg::with_name("symbols")
                        .long("symbols")
                        .value_name("SYMBOLS")
                        .help("Comma-separated ticker list for symbol-level sources")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("explore")
                .about("Explore a previously written payload file")
                .arg(
                    Arg::with_name("file")
                        .short('f')
                        .long("file")
                        .value_name("PATH")
                        .help("Payload file to inspect")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("limit")
                        .short('l')
                        .long("limit")
                        .value_name("LIMIT")
                        .help("Limit the number of entries to display")
                        .takes_value(true)
                        .default_value("10"),
                ),
        );

    let matches = app.get_matches();

    // 获取调试模式设置
    #[cfg(debug_assertions)]
    let debug_mode = matches.is_present("debug");
    #[cfg(not(debug_assertions))]
    let debug_mode = false;

    #[cfg(debug_assertions)]
    let debug_record_limit = matches
        .value_of("debug-limit")
        .unwrap_or("2")
        .parse::<usize>()
        .unwrap_or(2);
    #[cfg(not(debug_assertions))]
    let debug_record_limit = usize::MAX;

    if let Some(matches) = matches.subcommand_matches("scrape") {
        let source = matches.value_of("source").unwrap();
        let date_str = matches.value_of("date").unwrap();
        let date = slickcharts_datahub::util::parse_iso_date(date_str)?;

        let retention_days = matches
            .value_of("retention-days")
            .unwrap_or("90")
            .parse::<i64>()
            .unwrap_or(90);

        // Create scrapers
        let scrapers = match build_scrapers(source) {
            Some(scrapers) => scrapers,
            None => {
                error!("Unknown source: {}", source);
                return Err(format!("Unknown source: {}", source).into());
            }
        };

        let output = matches.value_of("output").map(|s| s.to_string());
        if output.is_some() && scrapers.len() > 1 {
            error!("--output requires a single source, got '{}'", source);
            return Err("--output requires a single source".into());
        }

        // 创建配置
        let mut config = Config::new()
            .with_data_dir(matches.value_of("data-dir").unwrap_or("data"))
            .with_output_path(output)
            .with_pretty(matches.is_present("pretty"))
            .with_cumulative(matches.is_present("cumulative"))
            .with_retention_days(retention_days)
            .with_debug_mode(debug_mode)
            .with_debug_record_limit(debug_record_limit);

        if let Some(symbols) = matches.value_of("symbols") {
            let symbols: Vec<String> = symbols
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            config = config.with_symbols(symbols);
        }

        info!("Using retention window: {} days", config.retention_days);
        if config.cumulative {
            info!("Cumulative history mode enabled");
        }

        // 创建流水线服务
        let service = PipelineService::new(config)?;

        if let Err(e) = service.run_all(&scrapers, &date).await {
            error!("{}", e);
            std::process::exit(1);
        }
    } else if let Some(matches) = matches.subcommand_matches("explore") {
        let file = matches.value_of("file").unwrap();
        let limit = matches
            .value_of("limit")
            .unwrap_or("10")
            .parse::<usize>()
            .unwrap_or(10);

        if let Err(e) = explore_payload(file, limit) {
            error!("{}", e);
            std::process::exit(1);
        }
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}

/// 按名称创建数据源抓取器
fn build_scrapers(source: &str) -> Option<Vec<Arc<dyn SourceScraper + Send + Sync>>> {
    let scrapers: Vec<Arc<dyn SourceScraper + Send + Sync>> = match source.to_lowercase().as_str()
    {
        "sp500" => vec![Arc::new(HoldingsScraper::new(IndexKind::Sp500))],
        "nasdaq100" => vec![Arc::new(HoldingsScraper::new(IndexKind::Nasdaq100))],
        "dowjones" => vec![Arc::new(HoldingsScraper::new(IndexKind::DowJones))],
        "returns" => vec![Arc::new(ReturnsScraper::new())],
        "gainers" => vec![Arc::new(MoversScraper::new(Direction::Gainers))],
        "losers" => vec![Arc::new(MoversScraper::new(Direction::Losers))],
        "treasury" => vec![Arc::new(TreasuryScraper::new())],
        "currency" => vec![Arc::new(CurrencyScraper::new())],
        "dividends" => vec![Arc::new(DividendScraper::new())],
        "all" => vec![
            Arc::new(HoldingsScraper::new(IndexKind::Sp500)),
            Arc::new(HoldingsScraper::new(IndexKind::Nasdaq100)),
            Arc::new(HoldingsScraper::new(IndexKind::DowJones)),
            Arc::new(ReturnsScraper::new()),
            Arc::new(MoversScraper::new(Direction::Gainers)),
            Arc::new(MoversScraper::new(Direction::Losers)),
            Arc::new(TreasuryScraper::new()),
            Arc::new(CurrencyScraper::new()),
            Arc::new(DividendScraper::new()),
        ],
        _ => return None,
    };
    Some(scrapers)
}

/// 打印payload文件的概要信息
fn explore_payload(file: &str, limit: usize) -> Result<(), Box<dyn Error>> {
    let text = std::fs::read_to_string(file)?;
    let json: Value = serde_json::from_str(&text)?;

    println!("file:    {}", file);
    if let Some(updated) = json.get("updated").and_then(|u| u.as_str()) {
        println!("updated: {}", updated);
    }
    if let Some(source) = json.get("source").and_then(|s| s.as_str()) {
        println!("source:  {}", source);
    }

    if let Some(history) = json.get("history").and_then(|h| h.as_array()) {
        println!("history: {} entries", history.len());
        for entry in history.iter().take(limit) {
            let date = entry.get("date").and_then(|d| d.as_str()).unwrap_or("?");
            let count = entry
                .as_object()
                .and_then(|obj| obj.values().find_map(|v| v.as_array()))
                .map(|records| records.len())
                .unwrap_or(0);
            println!("  {} - {} records", date, count);
        }
        if history.len() > limit {
            println!("  ... and {} more entries", history.len() - limit);
        }
        return Ok(());
    }

    // 快照模式：找出记录数组字段并打印前几条
    if let Some(count) = json.get("count").and_then(|c| c.as_u64()) {
        println!("count:   {}", count);
    }
    if let Some(obj) = json.as_object() {
        for (key, value) in obj {
            if let Some(records) = value.as_array() {
                println!("{}:", key);
                for record in records.iter().take(limit) {
                    println!("  {}", record);
                }
                if records.len() > limit {
                    println!("  ... and {} more records", records.len() - limit);
                }
            }
        }
    }

    Ok(())
}
