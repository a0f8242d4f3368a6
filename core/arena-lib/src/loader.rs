//! 棋盤載入器

use crate::*;
use std::collections::HashMap;

/// 從 ASCII 格式載入棋盤
///
/// 每行用空格分隔，每個符號代表一格：
/// - 第一個字元為區域：`b` = Near（藍方）、`r` = Far（紅方）
/// - 其餘字元（若有）為標記，相同標記會收集成 Vec
///
/// 例如：
/// ```text
/// rE r  r
/// b  bS b
/// ```
pub fn load_from_ascii(ascii: &str) -> Result<(Board, HashMap<String, Vec<Pos>>), Error> {
    let func = "load_from_ascii";

    let lines: Vec<&str> = ascii
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(Error::Load {
            func,
            detail: "棋盤為空".to_string(),
        });
    }

    let cols = lines[0].split_whitespace().count();
    let rows = lines.len();
    let mut zones = Vec::with_capacity(rows * cols);
    let mut markers: HashMap<String, Vec<Pos>> = HashMap::new();

    for (row, line) in lines.iter().enumerate() {
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() != cols {
            return Err(Error::Load {
                func,
                detail: format!("第 {row} 行有 {} 格，應為 {cols} 格", cells.len()),
            });
        }
        for (col, cell) in cells.into_iter().enumerate() {
            let mut chars = cell.chars();
            let zone = match chars.next() {
                Some('b') => Zone::Near,
                Some('r') => Zone::Far,
                _ => {
                    return Err(Error::Load {
                        func,
                        detail: format!("無法辨識的區域符號 `{cell}`"),
                    });
                }
            };
            zones.push(zone);
            let marker: String = chars.collect();
            if !marker.is_empty() {
                markers.entry(marker).or_default().push(Pos { row, col });
            }
        }
    }

    let board = Board::from_zones(rows, cols, zones).map_err(|e| Error::Wrap {
        func,
        source: Box::new(e),
    })?;
    Ok((board, markers))
}
