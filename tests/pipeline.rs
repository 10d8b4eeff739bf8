use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slickcharts_datahub::config::Config;
use slickcharts_datahub::scrapers::holdings::{HoldingsScraper, IndexKind};
use slickcharts_datahub::services::pipeline::PipelineService;
use slickcharts_datahub::ScraperError;

const HOLDINGS_PAGE: &str = r#"<html><body>
  <h2>S&amp;P 500 Components by Weight</h2>
  <table class="table table-hover">
    <thead><tr><th>#</th><th>Company</th><th>Symbol</th><th>Weight</th>
      <th>Price</th><th>Chg</th><th>% Chg</th></tr></thead>
    <tbody>
      <tr><td>1</td><td>Acme Corp</td><td>ACM</td><td>7.25%</td>
        <td>$123.45</td><td>-1.20</td><td>-0.96%</td></tr>
      <tr><td>2</td><td>Globex</td><td>GLX</td><td>6.10%</td>
        <td>$452.00</td><td>3.15</td><td>0.70%</td></tr>
      <tr><td>3</td><td>Initech</td><td>INI</td><td>5.55%</td>
        <td>$88.20</td><td>(0.44)</td><td>(0.50)%</td></tr>
    </tbody>
  </table>
</body></html>"#;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn serve_sp500(body: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sp500"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn service_for(server: &MockServer, out: &std::path::Path, cumulative: bool) -> PipelineService {
    let config = Config::new()
        .with_base_url(&server.uri())
        .with_output_path(Some(out.to_str().unwrap().to_string()))
        .with_cumulative(cumulative)
        .with_retention_days(90)
        .with_request_interval_ms(0)
        .with_pretty(true);
    PipelineService::new(config).unwrap()
}

#[tokio::test]
async fn snapshot_pipeline_writes_payload() {
    let server = serve_sp500(HOLDINGS_PAGE, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sp500.json");

    let service = service_for(&server, &out, false);
    let scraper = HoldingsScraper::new(IndexKind::Sp500);
    let count = service
        .run_source(&scraper, &date("2026-01-04"))
        .await
        .unwrap();
    assert_eq!(count, 3);

    let payload: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(payload["source"], "slickcharts");
    assert_eq!(payload["count"], 3);

    let holdings = payload["holdings"].as_array().unwrap();
    assert_eq!(holdings.len(), 3);
    assert_eq!(holdings[0]["rank"], 1);
    assert_eq!(holdings[0]["company"], "Acme Corp");
    assert_eq!(holdings[0]["symbol"], "ACM");
    assert_eq!(holdings[0]["weight"], 7.25);
    assert_eq!(holdings[0]["price"], 123.45);
    assert_eq!(holdings[0]["change"], -1.2);
    assert_eq!(holdings[0]["changePercent"], -0.96);
}

#[tokio::test]
async fn cumulative_rerun_replaces_same_day_entry() {
    let server = serve_sp500(HOLDINGS_PAGE, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sp500.json");

    let service = service_for(&server, &out, true);
    let scraper = HoldingsScraper::new(IndexKind::Sp500);
    let today = date("2026-01-04");

    service.run_source(&scraper, &today).await.unwrap();
    service.run_source(&scraper, &today).await.unwrap();

    let payload: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let history = payload["history"].as_array().unwrap();
    // 同一天重复运行是替换而不是追加
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["date"], "2026-01-04");
    assert_eq!(history[0]["holdings"].as_array().unwrap().len(), 3);

    // 次日运行则前插新条目
    service.run_source(&scraper, &date("2026-01-05")).await.unwrap();
    let payload: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let history = payload["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["date"], "2026-01-05");
    assert_eq!(history[1]["date"], "2026-01-04");
}

#[tokio::test]
async fn cumulative_run_prunes_stale_entries() {
    let server = serve_sp500(HOLDINGS_PAGE, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sp500.json");

    // 预置含三天历史的文件
    let seeded = json!({
        "updated": "2026-01-03T21:00:00Z",
        "source": "slickcharts",
        "history": [
            {"date": "2026-01-03", "holdings": [{"symbol": "ACM"}]},
            {"date": "2026-01-02", "holdings": [{"symbol": "ACM"}]},
            {"date": "2026-01-01", "holdings": [{"symbol": "ACM"}]}
        ]
    });
    fs::write(&out, seeded.to_string()).unwrap();

    let config = Config::new()
        .with_base_url(&server.uri())
        .with_output_path(Some(out.to_str().unwrap().to_string()))
        .with_cumulative(true)
        .with_retention_days(2)
        .with_request_interval_ms(0);
    let service = PipelineService::new(config).unwrap();
    let scraper = HoldingsScraper::new(IndexKind::Sp500);

    service.run_source(&scraper, &date("2026-01-04")).await.unwrap();

    let payload: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let dates: Vec<&str> = payload["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2026-01-04", "2026-01-03"]);
}

#[tokio::test]
async fn corrupt_history_is_treated_as_first_run() {
    let server = serve_sp500(HOLDINGS_PAGE, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sp500.json");
    fs::write(&out, "{ definitely not json").unwrap();

    let service = service_for(&server, &out, true);
    let scraper = HoldingsScraper::new(IndexKind::Sp500);
    service.run_source(&scraper, &date("2026-01-04")).await.unwrap();

    let payload: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(payload["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn http_error_aborts_run() {
    let server = serve_sp500("service unavailable", 503).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sp500.json");

    let service = service_for(&server, &out, false);
    let scraper = HoldingsScraper::new(IndexKind::Sp500);
    let err = service
        .run_source(&scraper, &date("2026-01-04"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::FetchError(_)));
    assert!(!out.exists());
}

#[tokio::test]
async fn layout_change_aborts_with_extraction_error() {
    let server = serve_sp500("<html><body><p>redesigned</p></body></html>", 200).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sp500.json");

    let service = service_for(&server, &out, false);
    let scraper = HoldingsScraper::new(IndexKind::Sp500);
    let err = service
        .run_source(&scraper, &date("2026-01-04"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::TableNotFound(_)));
}
