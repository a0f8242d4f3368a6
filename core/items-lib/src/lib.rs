//! 道具資料：只描述道具本身，不負責套用效果（由 arena-lib 處理）。
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

pub type ItemID = String;

/// 內建道具表，編譯時嵌入
pub const BUILTIN_ITEMS_TOML: &str = include_str!("../data/items.toml");

/// 道具資料結構
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Item {
    pub id: ItemID,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub action_cost: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub effect_text: String,
    /// 使用一次後移除
    #[serde(default)]
    pub consumable: bool,
    /// true: 佔用背包格; false: 拾取時立即生效
    #[serde(default = "default_usable")]
    pub usable: bool,
    #[serde(default)]
    pub pattern: Pattern,
    /// 攻擊可選目標的曼哈頓距離，0 視為相鄰
    #[serde(default)]
    pub range: u32,
    #[serde(default)]
    pub effect: Effect,
}

/// 攻擊範圍形狀
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
#[strum(serialize_all = "snake_case")]
pub enum Pattern {
    /// 非攻擊道具
    #[default]
    None,
    /// 單一目標
    Line,
    /// 朝向敵人的 T 字形
    TShape,
    /// 以目標格為中心的十字（radius 1）或菱形範圍
    Cross { radius: u32 },
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
#[strum(serialize_all = "snake_case")]
pub enum Effect {
    /// 攻擊道具的傷害另外依情境計算
    #[default]
    None,
    Heal {
        value: i32,
    },
    /// 永久提高生命上限（被動）
    MaxPv {
        value: i32,
    },
    ActionPoints {
        value: i32,
    },
    MovePoints {
        value: i32,
    },
}

#[derive(Debug, Clone, Copy, Display, EnumIter, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    Attack,
    Consumable,
    Passive,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        if self.pattern != Pattern::None {
            ItemKind::Attack
        } else if self.consumable {
            ItemKind::Consumable
        } else {
            ItemKind::Passive
        }
    }

    /// 裝備中即生效的生命上限加成
    pub fn max_pv_bonus(&self) -> i32 {
        match (self.kind(), self.effect) {
            (ItemKind::Passive, Effect::MaxPv { value }) => value,
            _ => 0,
        }
    }

    /// 沒有設定距離的道具只能打相鄰格
    pub fn effective_range(&self) -> u32 {
        self.range.max(1)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("道具表解析失敗: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("道具 {item_id} 重複定義")]
    DuplicateItem { item_id: ItemID },
    #[error("道具表為空")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<Item>,
}

/// 唯讀道具表，保留檔案中的順序（抽獎以此順序均勻抽取）
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn from_toml_str(data: &str) -> Result<Self, Error> {
        let file: CatalogFile = toml::from_str(data)?;
        Self::from_items(file.items)
    }

    pub fn from_items(items: Vec<Item>) -> Result<Self, Error> {
        if items.is_empty() {
            return Err(Error::Empty);
        }
        let mut seen = BTreeSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(Error::DuplicateItem {
                    item_id: item.id.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    pub fn builtin() -> Result<Self, Error> {
        Self::from_toml_str(BUILTIN_ITEMS_TOML)
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn default_usable() -> bool {
    true
}
