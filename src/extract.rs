use crate::errors::{Result, ScraperError};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

/// 从HTML表格中提取出的规范化文本数据
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// 表格定位策略，按顺序尝试，先匹配者生效
#[derive(Debug, Clone, Copy)]
pub enum TableLocator {
    /// 匹配包含指定文本的标题（h1-h6），取其后的第一个表格
    HeadingText(&'static str),
    /// CSS选择器直接匹配
    Css(&'static str),
}

/// 按策略顺序查找表格，列数不足min_cols的行视为装饰行直接跳过
pub fn find_table(html_text: &str, locators: &[TableLocator], min_cols: usize) -> Result<Table> {
    let doc = Html::parse_document(html_text);
    let table_sel = Selector::parse("table").map_err(|_| "selector error: table")?;

    for locator in locators {
        let found = match locator {
            TableLocator::HeadingText(phrase) => table_after_heading(&doc, phrase, &table_sel),
            TableLocator::Css(css) => {
                let sel = Selector::parse(css)
                    .map_err(|_| ScraperError::DataError(format!("invalid selector: {}", css)))?;
                doc.select(&sel).next()
            }
        };

        if let Some(table) = found {
            return read_table(table, min_cols);
        }
    }

    Err(ScraperError::TableNotFound(describe_locators(locators)))
}

/// 查找文本包含phrase的标题，返回其后第一个表格（兄弟节点或其子孙）
fn table_after_heading<'a>(
    doc: &'a Html,
    phrase: &str,
    table_sel: &Selector,
) -> Option<ElementRef<'a>> {
    let heading_sel = Selector::parse("h1, h2, h3, h4, h5, h6").ok()?;
    let needle = phrase.to_lowercase();

    for heading in doc.select(&heading_sel) {
        let text = heading.text().collect::<String>().to_lowercase();
        if !text.contains(&needle) {
            continue;
        }

        for sibling in heading.next_siblings() {
            if let Some(element) = ElementRef::wrap(sibling) {
                if element.value().name() == "table" {
                    return Some(element);
                }
                if let Some(table) = element.select(table_sel).next() {
                    return Some(table);
                }
            }
        }
    }

    None
}

fn read_table(table: ElementRef, min_cols: usize) -> Result<Table> {
    let tr_sel = Selector::parse("tr").map_err(|_| "selector error: tr")?;
    let th_sel = Selector::parse("th").map_err(|_| "selector error: th")?;
    let td_sel = Selector::parse("td").map_err(|_| "selector error: td")?;

    // 表头取第一个含th的行
    let mut headers = Vec::new();
    for tr in table.select(&tr_sel) {
        let cells: Vec<String> = tr
            .select(&th_sel)
            .map(|th| norm_text(&th.text().collect::<String>()))
            .filter(|s| !s.is_empty())
            .collect();
        if !cells.is_empty() {
            headers = cells;
            break;
        }
    }

    let mut rows = Vec::new();
    for tr in table.select(&tr_sel) {
        let cells: Vec<String> = tr
            .select(&td_sel)
            .map(|td| norm_text(&td.text().collect::<String>()))
            .collect();
        if cells.len() < min_cols {
            continue;
        }
        rows.push(cells);
    }

    Ok(Table { headers, rows })
}

fn describe_locators(locators: &[TableLocator]) -> String {
    locators
        .iter()
        .map(|locator| match locator {
            TableLocator::HeadingText(phrase) => format!("heading '{}'", phrase),
            TableLocator::Css(css) => format!("css '{}'", css),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// 折叠空白并去除首尾空格
pub fn norm_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// 从页面内联脚本中提取命名JS对象字面量。
/// 从marker之后的第一个 { 开始按花括号深度扫描，
/// 跳过双引号字符串内部的花括号（含反斜杠转义）。
pub fn extract_state_object(html: &str, marker: &str) -> Result<Value> {
    let pos = html
        .find(marker)
        .ok_or_else(|| ScraperError::StateNotFound(format!("marker not found: {}", marker)))?;
    let after = &html[pos + marker.len()..];
    let open = after
        .find('{')
        .ok_or_else(|| ScraperError::StateNotFound(format!("no object literal after {}", marker)))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in after[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let literal = &after[open..open + i + 1];
                    return Ok(serde_json::from_str(literal)?);
                }
            }
            _ => {}
        }
    }

    Err(ScraperError::StateNotFound(format!(
        "unbalanced object literal after {}",
        marker
    )))
}
