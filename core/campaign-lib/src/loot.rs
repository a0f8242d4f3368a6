//! loot.rs：
//! - 勝利獎勵的抽取（可重複）與拾取後放進背包的規則。
//! - 套用立即生效道具到單位身上由 campaign.rs 處理。
use arena_lib::Inventory;
use items_lib::{Catalog, Effect, Item, ItemID};
use rand::Rng;

/// 從道具表中獨立抽取 count 個獎勵，同一道具可重複出現
pub fn draw_offers<R: Rng + ?Sized>(catalog: &Catalog, count: usize, rng: &mut R) -> Vec<ItemID> {
    let items = catalog.items();
    if items.is_empty() {
        return vec![];
    }
    (0..count)
        .map(|_| items[rng.random_range(0..items.len())].id.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pickup {
    /// 不佔格的道具，效果立即套用
    Instant(Effect),
    Equipped { slot: usize },
    /// 背包已滿，等待選擇要替換的格子
    Pending,
}

/// 嘗試把拾取的道具放進背包：不佔格的回傳效果，否則放進第一個空格
pub fn place_item(inventory: &mut Inventory, item: &Item) -> Pickup {
    if !item.usable {
        return Pickup::Instant(item.effect);
    }
    let Some(slot) = inventory.first_empty() else {
        return Pickup::Pending;
    };
    match inventory.equip(slot, item.id.clone()) {
        Ok(_) => Pickup::Equipped { slot },
        // first_empty 不會回傳拳頭格
        Err(_) => Pickup::Pending,
    }
}

/// 一次勝利的獎勵狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootState {
    pub offers: Vec<ItemID>,
    /// 已選擇但背包已滿、尚未放入的道具
    pub pending: Option<ItemID>,
}

impl LootState {
    pub fn new(offers: Vec<ItemID>) -> Self {
        Self {
            offers,
            pending: None,
        }
    }

    /// 是否必須先替換背包格才能離開
    pub fn is_blocked(&self) -> bool {
        self.pending.is_some()
    }
}
