use super::Argb;
use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;

/// CSS 色名，編譯時嵌入
const NAMED_COLORS_JSON: &str = include_str!("data/named_colors.json");

fn named_colors() -> Result<HashMap<String, Argb>> {
    serde_json::from_str(NAMED_COLORS_JSON).context("無法解析嵌入的色名表")
}

/// 色名比對時忽略大小寫與 `_`、`-`、空白，`hot_pink` 等同 `hotpink`
fn normalize_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// 解析 CSS 色名或 `#rgb` / `#rrggbb` 色碼，色名優先
pub fn parse_color(value: &str) -> Result<Argb> {
    let trimmed = value.trim();
    if let Some(color) = named_colors()?.get(&normalize_name(trimmed)) {
        return Ok(*color);
    }

    Argb::from_hex(trimmed).map_err(|_| anyhow!("無法辨識的顏色: {value}（請使用色名或 #rrggbb）"))
}
