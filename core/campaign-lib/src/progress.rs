//! progress.rs：
//! - 關卡地圖與存檔中的進度（關卡索引、played 標記、背包道具 ID）。
//! - 存檔內容損壞時回到預設值並記錄 warn，不視為錯誤。
use crate::*;
use arena_lib::Inventory;
use items_lib::ItemID;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeState {
    Past,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageNode {
    pub index: usize,
    pub state: NodeState,
}

/// 線性排列的關卡
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageMap {
    count: usize,
}

impl StageMap {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 依目前關卡標示每個節點；全部完成時所有節點皆為 Past
    pub fn nodes(&self, current: usize) -> Vec<StageNode> {
        (0..self.count)
            .map(|index| StageNode {
                index,
                state: match index.cmp(&current) {
                    std::cmp::Ordering::Less => NodeState::Past,
                    std::cmp::Ordering::Equal => NodeState::Current,
                    std::cmp::Ordering::Greater => NodeState::Upcoming,
                },
            })
            .collect()
    }

    pub fn is_playable(&self, stage: usize) -> bool {
        stage < self.count
    }
}

pub fn read_stage(store: &impl KeyValueStore) -> usize {
    let Some(raw) = store.get(STAGE_KEY) else {
        return 0;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        log::warn!("存檔關卡 `{raw}` 無法解析，從 0 開始");
        0
    })
}

pub fn write_stage(store: &mut impl KeyValueStore, stage: usize) {
    store.set(STAGE_KEY, stage.to_string());
}

/// 顯示地圖前呼叫：讀取關卡並清除 played 標記
pub fn enter_map(store: &mut impl KeyValueStore) -> usize {
    let stage = read_stage(&*store);
    if store.contains(PLAYED_KEY) {
        log::debug!("剛完成戰鬥，回到第 {stage} 關");
        store.remove(PLAYED_KEY);
    }
    write_stage(store, stage);
    stage
}

/// 勝利後前進一關並標記 played
pub fn advance_stage(store: &mut impl KeyValueStore) -> usize {
    let stage = read_stage(&*store) + 1;
    write_stage(store, stage);
    store.set(PLAYED_KEY, "true".to_string());
    log::info!("前進到第 {stage} 關");
    stage
}

/// 新遊戲：清除所有存檔，從第 0 關開始
pub fn reset_progress(store: &mut impl KeyValueStore) {
    store.clear();
    write_stage(store, 0);
}

pub fn load_inventory_ids(store: &impl KeyValueStore) -> Vec<ItemID> {
    let Some(raw) = store.get(INVENTORY_KEY) else {
        return vec![];
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        log::warn!("存檔背包 `{raw}` 無法解析: {err}");
        vec![]
    })
}

/// 依格子順序存下道具 ID，不含拳頭
pub fn save_inventory(store: &mut impl KeyValueStore, inventory: &Inventory) -> Result<(), Error> {
    let raw = serde_json::to_string(&inventory.item_ids())?;
    store.set(INVENTORY_KEY, raw);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_nodes() {
        let map = StageMap::new(5);
        let states: Vec<_> = map.nodes(2).into_iter().map(|n| n.state).collect();
        assert_eq!(
            states,
            vec![
                NodeState::Past,
                NodeState::Past,
                NodeState::Current,
                NodeState::Upcoming,
                NodeState::Upcoming,
            ]
        );
        assert!(map.is_playable(4));
        assert!(!map.is_playable(5));
        assert!(map.nodes(5).iter().all(|n| n.state == NodeState::Past));
    }

    #[test]
    fn test_read_stage() {
        let mut store = MemoryStore::new();
        assert_eq!(read_stage(&store), 0);
        store.set(STAGE_KEY, "3".to_string());
        assert_eq!(read_stage(&store), 3);
        store.set(STAGE_KEY, "abc".to_string());
        assert_eq!(read_stage(&store), 0);
    }

    #[test]
    fn test_advance_and_enter_map() {
        let mut store = MemoryStore::new();
        reset_progress(&mut store);
        assert_eq!(advance_stage(&mut store), 1);
        assert_eq!(store.get(PLAYED_KEY), Some("true".to_string()));

        assert_eq!(enter_map(&mut store), 1);
        assert!(!store.contains(PLAYED_KEY));
        // 再讀一次不會重複前進
        assert_eq!(enter_map(&mut store), 1);
    }

    #[test]
    fn test_reset_progress() {
        let mut store = MemoryStore::new();
        store.set(STAGE_KEY, "4".to_string());
        store.set(INVENTORY_KEY, r#"["sword"]"#.to_string());
        reset_progress(&mut store);
        assert_eq!(store.get(STAGE_KEY), Some("0".to_string()));
        assert!(!store.contains(INVENTORY_KEY));
    }

    #[test]
    fn test_inventory_roundtrip_and_corrupt() {
        let catalog = items_lib::Catalog::builtin().unwrap();
        let mut store = MemoryStore::new();
        let inventory = Inventory::from_ids(&["bomb", "shield"], &catalog);
        save_inventory(&mut store, &inventory).unwrap();
        assert_eq!(store.get(INVENTORY_KEY), Some(r#"["bomb","shield"]"#.to_string()));
        assert_eq!(load_inventory_ids(&store), vec!["bomb", "shield"]);

        store.set(INVENTORY_KEY, "{not json".to_string());
        assert!(load_inventory_ids(&store).is_empty());
    }
}
