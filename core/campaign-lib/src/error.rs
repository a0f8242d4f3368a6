// 流程錯誤型別，攜帶 function name 與 context
use crate::*;
use arena_lib::Outcome;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("戰鬥錯誤: {0}")]
    Arena(#[from] arena_lib::Error),

    #[error("道具表錯誤: {0}")]
    Items(#[from] items_lib::Error),

    #[error("設定解析失敗: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("存檔序列化失敗: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{func}`: 設定錯誤: {detail}")]
    InvalidConfig { func: &'static str, detail: String },

    #[error("`{func}`: 目前在 {screen} 畫面，無法執行")]
    WrongScreen { func: &'static str, screen: Screen },

    #[error("`{func}`: 所有關卡都已完成")]
    NoStageLeft { func: &'static str },

    #[error("`{func}`: 戰鬥尚未分出勝負")]
    BattleNotOver { func: &'static str },

    #[error("`{func}`: 戰鬥結果為 {outcome}，無法執行")]
    WrongOutcome {
        func: &'static str,
        outcome: Outcome,
    },

    #[error("`{func}`: 第 {index} 個獎勵不存在")]
    OfferOutOfRange { func: &'static str, index: usize },

    #[error("`{func}`: 背包已滿，需先選擇要替換的格子")]
    ReplacementPending { func: &'static str },

    #[error("`{func}`: 沒有等待替換的道具")]
    NoPendingItem { func: &'static str },

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
