//! board.rs：
//! - 固定大小的矩形棋盤：座標與索引互轉、邊界判斷、區域（Zone）劃分。
//! - 區域在建立棋盤時決定，之後不可變更。
//! - 不處理單位、移動點數或戰鬥判定。
use crate::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// 鄰格檢查順序：下、上、右、左
/// BFS 擴展與路徑回溯都使用同一順序，路徑因此可重現
pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, Default, Display, EnumIter, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Zone {
    /// 靠近玩家的半邊（藍方）
    #[default]
    Near,
    /// 對面的半邊（紅方）
    Far,
}

/// 單位可通行的區域
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ZoneRule {
    Any,
    Only(Zone),
}

impl ZoneRule {
    pub fn allows(&self, board: &Board, pos: Pos) -> bool {
        match (self, board.zone_of(pos)) {
            (_, None) => false,
            (ZoneRule::Any, Some(_)) => true,
            (ZoneRule::Only(zone), Some(cell)) => *zone == cell,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    zones: Vec<Zone>,
}

impl Board {
    /// 上半部（row < split_row）為 Far，其餘為 Near
    pub fn new(rows: usize, cols: usize, split_row: usize) -> Self {
        let zones = (0..rows * cols)
            .map(|i| if i / cols.max(1) < split_row { Zone::Far } else { Zone::Near })
            .collect();
        Self { rows, cols, zones }
    }

    pub fn from_zones(rows: usize, cols: usize, zones: Vec<Zone>) -> Result<Self, Error> {
        let func = "Board::from_zones";

        if rows == 0 || cols == 0 {
            return Err(Error::InvalidParameter {
                func,
                detail: format!("棋盤大小 {rows}x{cols} 不合法"),
            });
        }
        if zones.len() != rows * cols {
            return Err(Error::InvalidParameter {
                func,
                detail: format!("區域數量 {} 與棋盤 {rows}x{cols} 不符", zones.len()),
            });
        }
        Ok(Self { rows, cols, zones })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn index_to_pos(&self, index: usize) -> Pos {
        Pos {
            row: index / self.cols,
            col: index % self.cols,
        }
    }

    pub fn pos_to_index(&self, pos: Pos) -> usize {
        pos.row * self.cols + pos.col
    }

    /// 接受負值座標，方便鄰格計算
    pub fn is_inside(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn zone_of(&self, pos: Pos) -> Option<Zone> {
        if !self.contains(pos) {
            return None;
        }
        self.zones.get(self.pos_to_index(pos)).copied()
    }

    /// 棋盤內的上下左右鄰格，依 DIRECTIONS 順序
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        DIRECTIONS
            .iter()
            .filter_map(|(dr, dc)| pos.offset(*dr, *dc))
            .filter(|p| self.contains(*p))
            .collect()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cell_count()).map(|i| self.index_to_pos(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_conversion_is_bijective() {
        let board = Board::new(DEFAULT_ROWS, DEFAULT_COLS, DEFAULT_ZONE_SPLIT_ROW);
        assert_eq!(board.cell_count(), 24);
        for index in 0..board.cell_count() {
            let pos = board.index_to_pos(index);
            assert!(board.contains(pos));
            assert_eq!(board.pos_to_index(pos), index);
        }
        assert_eq!(board.index_to_pos(23), Pos::new(5, 3));
        assert_eq!(board.pos_to_index(Pos::new(1, 2)), 6);
    }

    #[test]
    fn test_is_inside() {
        let board = Board::new(6, 4, 3);
        assert!(board.is_inside(0, 0));
        assert!(board.is_inside(5, 3));
        assert!(!board.is_inside(-1, 0));
        assert!(!board.is_inside(0, -1));
        assert!(!board.is_inside(6, 0));
        assert!(!board.is_inside(0, 4));
    }

    #[test]
    fn test_default_zones() {
        let board = Board::new(6, 4, 3);
        for pos in board.positions() {
            let expect = if pos.row < 3 { Zone::Far } else { Zone::Near };
            assert_eq!(board.zone_of(pos), Some(expect), "{pos:?}");
        }
        assert_eq!(board.zone_of(Pos::new(6, 0)), None);
    }

    #[test]
    fn test_zone_rule() {
        let board = Board::new(6, 4, 3);
        let near = ZoneRule::Only(Zone::Near);
        assert!(near.allows(&board, Pos::new(3, 0)));
        assert!(!near.allows(&board, Pos::new(2, 0)));
        assert!(ZoneRule::Any.allows(&board, Pos::new(2, 0)));
        assert!(!ZoneRule::Any.allows(&board, Pos::new(9, 9)));
    }

    #[test]
    fn test_neighbors_order() {
        let board = Board::new(6, 4, 3);
        assert_eq!(
            board.neighbors(Pos::new(2, 1)),
            vec![Pos::new(3, 1), Pos::new(1, 1), Pos::new(2, 2), Pos::new(2, 0)]
        );
        // 角落只剩兩個鄰格
        assert_eq!(board.neighbors(Pos::new(0, 0)), vec![Pos::new(1, 0), Pos::new(0, 1)]);
    }

    #[test]
    fn test_from_zones_errors() {
        assert!(Board::from_zones(0, 4, vec![]).is_err());
        assert!(Board::from_zones(2, 2, vec![Zone::Near; 3]).is_err());
        let board = Board::from_zones(1, 2, vec![Zone::Far, Zone::Near]).unwrap();
        assert_eq!(board.zone_of(Pos::new(0, 0)), Some(Zone::Far));
    }
}
