// 戰鬥邏輯錯誤型別，攜帶 function name 與 context，支援來源錯誤巢狀
// 對玩家而言這些錯誤都是「點了沒反應」，由 Battle::click 吞掉並記錄
use crate::*;
use items_lib::ItemID;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("`{func}`: 參數錯誤: {detail}")]
    InvalidParameter { func: &'static str, detail: String },

    #[error("`{func}`: 設定錯誤: {detail}")]
    InvalidConfig { func: &'static str, detail: String },

    #[error("設定解析失敗: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("`{func}`: 棋盤解析失敗: {detail}")]
    Load { func: &'static str, detail: String },

    #[error("`{func}`: 位置 {pos:?} 不在棋盤上")]
    OutOfBounds { func: &'static str, pos: Pos },

    #[error("`{func}`: 戰鬥尚未開始或已結束")]
    NotRunning { func: &'static str },

    #[error("`{func}`: 單位移動中")]
    MoveInProgress { func: &'static str },

    #[error("`{func}`: 沒有進行中的移動")]
    NoMoveInFlight { func: &'static str },

    #[error("`{func}`: 目標 {pos:?} 不可到達")]
    NotReachable { func: &'static str, pos: Pos },

    #[error("`{func}`: 距離表顯示 {pos:?} 可到達，卻無法重建路徑")]
    PathInconsistent { func: &'static str, pos: Pos },

    #[error("`{func}`: 點數不足（需要 {need}，剩餘 {have}）")]
    NotEnoughPoints {
        func: &'static str,
        need: Points,
        have: Points,
    },

    #[error("`{func}`: 未選擇攻擊")]
    NoActionSelected { func: &'static str },

    #[error("`{func}`: {pos:?} 不在攻擊範圍內")]
    NotAttackable { func: &'static str, pos: Pos },

    #[error("`{func}`: {pos:?} 沒有可命中的敵人")]
    NoTarget { func: &'static str, pos: Pos },

    #[error("`{func}`: 第 {slot} 格不存在")]
    SlotOutOfRange { func: &'static str, slot: SlotIndex },

    #[error("`{func}`: 第 {slot} 格是空的")]
    EmptySlot { func: &'static str, slot: SlotIndex },

    #[error("`{func}`: 拳頭格不可替換")]
    InnateSlot { func: &'static str },

    #[error("`{func}`: 道具 {item_id} 不存在")]
    ItemNotFound { func: &'static str, item_id: ItemID },

    #[error("`{func}`: 道具 {item_id} 無法主動使用")]
    NotActivatable { func: &'static str, item_id: ItemID },

    #[error("`{func}`: 包裝: {source}")]
    Wrap {
        func: &'static str,
        #[source]
        source: Box<Error>,
    },
}

pub fn root_error(err: &Error) -> &Error {
    let mut err = err;
    while let Error::Wrap { source, .. } = err {
        err = source.as_ref();
    }
    err
}
