//! 繪製提示：戰鬥邏輯只產生提示，由前端依序取出並播放
use crate::*;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Placement {
    /// 角落提示，例如「輪到誰」
    Corner,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// 把單位畫在指定格
    MountUnit { unit: UnitId, pos: Pos },
    HighlightReachable { unit: UnitId, cells: Vec<Pos> },
    HighlightAttackable { unit: UnitId, cells: Vec<Pos> },
    ClearHighlights,
    /// 逐格移動動畫，播完後前端需呼叫 Battle::step_complete
    MoveStep { unit: UnitId, from: Pos, to: Pos },
    Attack { attacker: UnitId, defender: UnitId },
    FloatingDelta {
        unit: UnitId,
        stat: Stat,
        amount: Points,
    },
    Message { text: String, placement: Placement },
    /// 回合剩餘秒數
    Countdown { seconds: Seconds },
    ShowOutcome(Outcome),
}

impl Cue {
    pub fn corner(text: impl Into<String>) -> Self {
        Cue::Message {
            text: text.into(),
            placement: Placement::Corner,
        }
    }

    pub fn center(text: impl Into<String>) -> Self {
        Cue::Message {
            text: text.into(),
            placement: Placement::Center,
        }
    }
}
