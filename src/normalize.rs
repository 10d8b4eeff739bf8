use crate::errors::Result;

/// 清理显示字符串中的货币符号、千位分隔符、百分号等，
/// 括号记法视为负数，返回可直接交给数值解析的字符串
pub fn clean_number(text: &str) -> String {
    let trimmed = text.trim();
    let negative = (trimmed.starts_with('(') && trimmed.ends_with(')')) || trimmed.contains('-');

    let mut cleaned = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            '$' | ',' | '%' | '(' | ')' | '+' | '-' | ' ' => {}
            _ => cleaned.push(ch),
        }
    }

    if negative && !cleaned.is_empty() {
        format!("-{}", cleaned)
    } else {
        cleaned
    }
}

pub fn to_f64(text: &str) -> Result<f64> {
    Ok(clean_number(text).parse::<f64>()?)
}

pub fn to_i64(text: &str) -> Result<i64> {
    Ok(clean_number(text).parse::<i64>()?)
}

/// 解析带T/B/M后缀的市值字符串，如 "$2.85T" -> 2.85e12
pub fn parse_market_cap(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let (body, multiplier) = match trimmed.chars().last() {
        Some('T') | Some('t') => (&trimmed[..trimmed.len() - 1], 1e12),
        Some('B') | Some('b') => (&trimmed[..trimmed.len() - 1], 1e9),
        Some('M') | Some('m') => (&trimmed[..trimmed.len() - 1], 1e6),
        _ => (trimmed, 1.0),
    };
    Ok(to_f64(body)? * multiplier)
}
