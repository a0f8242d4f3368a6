//! unit.rs：
//! - 定義單位（Unit）、背包（Inventory）等資料結構，只負責保存狀態。
//! - 模型本身不做合法性檢查，點數是否足夠由呼叫端（battle、action）判斷。
//! - 生命上限等衍生值的計算放在這裡。
use crate::*;
use items_lib::{Catalog, Effect, ItemID};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, Display, EnumIter, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnitId {
    Blue,
    Red,
}

impl UnitId {
    pub fn other(self) -> UnitId {
        match self {
            UnitId::Blue => UnitId::Red,
            UnitId::Red => UnitId::Blue,
        }
    }

    pub fn home_zone(self) -> Zone {
        match self {
            UnitId::Blue => Zone::Near,
            UnitId::Red => Zone::Far,
        }
    }

    pub fn zone_rule(self) -> ZoneRule {
        ZoneRule::Only(self.home_zone())
    }
}

/// 飄字用的屬性種類
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Stat {
    Pv,
    MaxPv,
    Pa,
    Pm,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub enum Slot {
    /// 拳頭，永遠在第 0 格
    Innate,
    #[default]
    Empty,
    Equipped(ItemID),
}

impl Slot {
    pub fn item_id(&self) -> Option<&ItemID> {
        match self {
            Slot::Equipped(id) => Some(id),
            Slot::Innate | Slot::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    slots: [Slot; SLOT_COUNT],
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            slots: [Slot::Innate, Slot::Empty, Slot::Empty, Slot::Empty],
        }
    }

    /// 依存檔中的道具 ID 重建背包，不存在或不佔格的道具略過，超出格數的捨棄
    pub fn from_ids<S: AsRef<str>>(ids: &[S], catalog: &Catalog) -> Self {
        let mut inventory = Self::new();
        for id in ids {
            let id = id.as_ref();
            let Some(item) = catalog.get(id) else {
                log::warn!("存檔中的道具 {id} 不存在，略過");
                continue;
            };
            if !item.usable {
                continue;
            }
            let Some(slot) = inventory.first_empty() else {
                log::warn!("背包已滿，捨棄存檔中的道具 {id}");
                break;
            };
            inventory.slots[slot] = Slot::Equipped(item.id.clone());
        }
        inventory
    }

    pub fn slots(&self) -> &[Slot; SLOT_COUNT] {
        &self.slots
    }

    pub fn slot(&self, slot: SlotIndex) -> Option<&Slot> {
        self.slots.get(slot)
    }

    /// 依格子順序列出道具 ID（不含拳頭）
    pub fn item_ids(&self) -> Vec<ItemID> {
        self.slots.iter().filter_map(|s| s.item_id().cloned()).collect()
    }

    pub fn first_empty(&self) -> Option<SlotIndex> {
        self.slots.iter().position(|s| *s == Slot::Empty)
    }

    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    /// 放入道具，回傳被替換掉的道具
    pub fn equip(&mut self, slot: SlotIndex, item_id: ItemID) -> Result<Option<ItemID>, Error> {
        let func = "Inventory::equip";

        match self.slots.get(slot) {
            None => Err(Error::SlotOutOfRange { func, slot }),
            Some(Slot::Innate) => Err(Error::InnateSlot { func }),
            Some(_) => {
                let prev = std::mem::replace(&mut self.slots[slot], Slot::Equipped(item_id));
                Ok(match prev {
                    Slot::Equipped(id) => Some(id),
                    Slot::Innate | Slot::Empty => None,
                })
            }
        }
    }

    pub fn remove(&mut self, slot: SlotIndex) -> Option<ItemID> {
        let target = self.slots.get_mut(slot)?;
        if !matches!(target, Slot::Equipped(_)) {
            return None;
        }
        std::mem::take(target).item_id().cloned()
    }

    pub fn max_pv_bonus(&self, catalog: &Catalog) -> Points {
        self.slots
            .iter()
            .filter_map(|s| s.item_id())
            .filter_map(|id| catalog.get(id))
            .map(|item| item.max_pv_bonus())
            .sum()
    }
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub pv: Points,
    pub max_pv: Points,
    /// 不含裝備加成的生命上限
    pub base_max_pv: Points,
    pub pa: Points,
    pub pm: Points,
    pub pos: Pos,
    pub zone_rule: ZoneRule,
    pub inventory: Inventory,
}

impl Unit {
    pub fn new(id: UnitId, config: &BattleConfig) -> Self {
        Self {
            id,
            pv: config.max_pv,
            max_pv: config.max_pv,
            base_max_pv: config.max_pv,
            pa: config.action_points,
            pm: config.move_points,
            pos: config.start_of(id),
            zone_rule: id.zone_rule(),
            inventory: Inventory::new(),
        }
    }

    /// 戰鬥開始時恢復初始數值與位置，背包保留
    pub fn reset(&mut self, config: &BattleConfig) {
        let inventory = std::mem::take(&mut self.inventory);
        *self = Self {
            inventory,
            ..Self::new(self.id, config)
        };
    }

    pub fn reset_turn_points(&mut self, config: &BattleConfig) {
        self.pa = config.action_points;
        self.pm = config.move_points;
    }

    pub fn is_down(&self) -> bool {
        self.pv <= 0
    }

    pub fn can_enter(&self, board: &Board, pos: Pos) -> bool {
        self.zone_rule.allows(board, pos)
    }

    /// 套用道具效果，回傳 (屬性, 變化量) 供飄字使用
    pub fn apply_effect(&mut self, effect: &Effect) -> Option<(Stat, Points)> {
        match *effect {
            Effect::None => None,
            Effect::Heal { value } => {
                self.pv += value;
                Some((Stat::Pv, value))
            }
            Effect::MaxPv { value } => {
                self.base_max_pv += value;
                self.max_pv += value;
                self.pv += value;
                Some((Stat::MaxPv, value))
            }
            Effect::ActionPoints { value } => {
                self.pa += value;
                Some((Stat::Pa, value))
            }
            Effect::MovePoints { value } => {
                self.pm += value;
                Some((Stat::Pm, value))
            }
        }
    }

    /// 依目前裝備重算生命上限，PV 跟著差值調整且不超過上限，回傳差值
    pub fn recalc_max_pv(&mut self, catalog: &Catalog) -> Points {
        let prev = self.max_pv;
        self.max_pv = self.base_max_pv + self.inventory.max_pv_bonus(catalog);
        let diff = self.max_pv - prev;
        self.pv = (self.pv + diff).min(self.max_pv);
        diff
    }
}

/// 一場戰鬥中的兩個單位
#[derive(Debug, Clone)]
pub struct Units {
    blue: Unit,
    red: Unit,
}

impl Units {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            blue: Unit::new(UnitId::Blue, config),
            red: Unit::new(UnitId::Red, config),
        }
    }

    pub fn get(&self, id: UnitId) -> &Unit {
        match id {
            UnitId::Blue => &self.blue,
            UnitId::Red => &self.red,
        }
    }

    pub fn get_mut(&mut self, id: UnitId) -> &mut Unit {
        match id {
            UnitId::Blue => &mut self.blue,
            UnitId::Red => &mut self.red,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        [&self.blue, &self.red].into_iter()
    }

    pub fn reset(&mut self, config: &BattleConfig) {
        self.blue.reset(config);
        self.red.reset(config);
    }

    /// 佔據該格的單位
    pub fn at(&self, pos: Pos) -> Option<UnitId> {
        self.iter().find(|u| u.pos == pos).map(|u| u.id)
    }
}
