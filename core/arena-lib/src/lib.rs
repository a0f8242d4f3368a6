use serde::{Deserialize, Serialize};

mod action;
mod battle;
mod board;
mod config;
mod constants;
mod cue;
mod error;
mod loader;
mod unit;

pub use action::*;
pub use battle::*;
pub use board::*;
pub use config::*;
pub use constants::*;
pub use cue::*;
pub use error::*;
pub use loader::*;
pub use unit::*;

/// PV / PA / PM 皆允許暫時為負，不做下限截斷
pub type Points = i32;
pub type MovementCost = u32;
pub type Seconds = u32;
pub type SlotIndex = usize;

/// 棋盤座標，row 由上往下、col 由左往右
#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 位移後的座標，負值回傳 None（不檢查棋盤上界）
    pub fn offset(self, dr: isize, dc: isize) -> Option<Pos> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Pos { row, col })
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}
