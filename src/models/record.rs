use serde::Serialize;

/// 指数成分股持仓记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub rank: i64,
    pub company: String,
    pub symbol: String,
    pub weight: f64,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// 指数年度收益记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReturn {
    pub year: i64,
    pub total_return: f64,
}

/// 当日涨跌幅排行记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    pub rank: i64,
    pub company: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// 国债收益率记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryRate {
    pub maturity: String,
    pub rate: f64,
}

/// 货币行情记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRate {
    pub rank: i64,
    pub name: String,
    pub symbol: String,
    pub market_cap: f64,
    pub price: f64,
    pub change_percent: f64,
}

/// 个股分红记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendPayment {
    pub symbol: String,
    pub ex_date: String,
    pub amount: f64,
    pub pay_date: String,
}
