//! 遊戲常數定義（BattleConfig 的預設值）

use crate::{MovementCost, Points, Pos, Seconds, SlotIndex};

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 4;

/// 小於此列的格子屬於遠端（紅方）區域
pub const DEFAULT_ZONE_SPLIT_ROW: usize = 3;

pub const BASE_MAX_PV: Points = 10;
pub const TURN_ACTION_POINTS: Points = 6;
pub const TURN_MOVE_POINTS: Points = 3;

pub const TURN_SECONDS: Seconds = 30;
pub const INTRO_SECONDS: Seconds = 3;

pub const PUNCH_COST: Points = 3;
pub const PUNCH_DAMAGE: Points = 2;
pub const PUNCH_RANGE: MovementCost = 1;

/// T 字形沿攻擊軸延伸的格數（不含攻擊者）
pub const T_SHAPE_LENGTH: isize = 3;

pub const BLUE_START: Pos = Pos::new(5, 3);
pub const RED_START: Pos = Pos::new(0, 0);

/// 第 0 格固定為拳頭
pub const INNATE_SLOT: SlotIndex = 0;
/// 含拳頭在內的格子數
pub const SLOT_COUNT: usize = 4;
