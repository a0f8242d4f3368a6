//! campaign.rs：
//! - 串接畫面流程：開始畫面 → 地圖 → 戰鬥 → 獎勵 → 地圖。
//! - 存檔讀寫集中在這裡，戰鬥本身不碰存檔。
//! - 背包已滿時獎勵畫面會卡住，直到玩家選擇要替換的格子。
use crate::*;
use arena_lib::{Battle, Inventory, Outcome, Points, SlotIndex, Stat, UnitId};
use items_lib::{Catalog, ItemID};
use rand::Rng;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Screen {
    Start,
    Map,
    Battle,
    Loot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    /// 立即生效的道具，已套用在藍方身上
    Applied {
        item_id: ItemID,
        delta: Option<(Stat, Points)>,
    },
    Equipped {
        item_id: ItemID,
        slot: SlotIndex,
    },
    /// 背包已滿，需呼叫 replace_slot
    Pending { item_id: ItemID },
}

#[derive(Debug)]
pub struct Campaign<S: KeyValueStore> {
    config: CampaignConfig,
    catalog: Catalog,
    store: S,
    stage_map: StageMap,
    screen: Screen,
    stage: usize,
    battle: Option<Battle>,
    loot: Option<LootState>,
}

impl<S: KeyValueStore> Campaign<S> {
    pub fn new(config: CampaignConfig, catalog: Catalog, store: S) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            stage_map: StageMap::new(config.stage_count),
            config,
            catalog,
            store,
            screen: Screen::Start,
            stage: 0,
            battle: None,
            loot: None,
        })
    }

    pub fn with_builtin_catalog(config: CampaignConfig, store: S) -> Result<Self, Error> {
        Self::new(config, Catalog::builtin()?, store)
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn stage_map(&self) -> StageMap {
        self.stage_map
    }

    pub fn nodes(&self) -> Vec<StageNode> {
        self.stage_map.nodes(self.stage)
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn battle_mut(&mut self) -> Option<&mut Battle> {
        self.battle.as_mut()
    }

    pub fn loot(&self) -> Option<&LootState> {
        self.loot.as_ref()
    }

    /// 是否有可以「繼續」的存檔
    pub fn has_save(&self) -> bool {
        self.store.contains(STAGE_KEY)
    }

    pub fn can_play(&self) -> bool {
        self.screen == Screen::Map && self.stage_map.is_playable(self.stage)
    }

    /// 清除存檔並從第 0 關開始
    pub fn new_game(&mut self) -> Result<(), Error> {
        self.ensure_screen("Campaign::new_game", Screen::Start)?;
        log::info!("開始新遊戲");
        reset_progress(&mut self.store);
        self.show_map();
        Ok(())
    }

    pub fn continue_game(&mut self) -> Result<(), Error> {
        self.ensure_screen("Campaign::continue_game", Screen::Start)?;
        self.show_map();
        Ok(())
    }

    /// 以存檔中的背包開始目前關卡的戰鬥
    pub fn play(&mut self) -> Result<&mut Battle, Error> {
        let func = "Campaign::play";

        self.ensure_screen(func, Screen::Map)?;
        if !self.stage_map.is_playable(self.stage) {
            return Err(Error::NoStageLeft { func });
        }
        let blue = self.load_inventory();
        let battle = Battle::new(self.config.battle.clone(), blue, Inventory::new(), &self.catalog)?;
        log::info!("開始第 {} 關", self.stage);
        self.screen = Screen::Battle;
        Ok(self.battle.insert(battle))
    }

    /// 勝利後打開寶箱：存下戰後背包並抽出獎勵
    pub fn claim_loot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&[ItemID], Error> {
        let func = "Campaign::claim_loot";

        let battle = self.finished_battle(func)?;
        match battle.outcome() {
            Some(Outcome::Victory) => {}
            Some(outcome) => return Err(Error::WrongOutcome { func, outcome }),
            None => return Err(Error::BattleNotOver { func }),
        }
        let inventory = battle.unit(UnitId::Blue).inventory.clone();
        save_inventory(&mut self.store, &inventory)?;

        let offers = draw_offers(&self.catalog, self.config.loot_count, rng);
        log::debug!("獎勵: {offers:?}");
        self.screen = Screen::Loot;
        Ok(&self.loot.insert(LootState::new(offers)).offers)
    }

    /// 戰敗後離開：與新遊戲相同，清除所有存檔
    pub fn exit_defeat(&mut self) -> Result<(), Error> {
        let func = "Campaign::exit_defeat";

        let battle = self.finished_battle(func)?;
        match battle.outcome() {
            Some(Outcome::Defeat) => {}
            Some(outcome) => return Err(Error::WrongOutcome { func, outcome }),
            None => return Err(Error::BattleNotOver { func }),
        }
        log::info!("戰敗，清除存檔");
        self.store.clear();
        self.battle = None;
        self.stage = 0;
        self.screen = Screen::Start;
        Ok(())
    }

    /// 選擇一個獎勵；放得下就直接前進到下一關
    pub fn pick_offer(&mut self, index: usize) -> Result<PickResult, Error> {
        let func = "Campaign::pick_offer";

        self.ensure_screen(func, Screen::Loot)?;
        let Some(loot) = self.loot.as_ref() else {
            return Err(Error::WrongScreen {
                func,
                screen: self.screen,
            });
        };
        if loot.is_blocked() {
            return Err(Error::ReplacementPending { func });
        }
        let item_id = loot
            .offers
            .get(index)
            .cloned()
            .ok_or(Error::OfferOutOfRange { func, index })?;
        let item = self
            .catalog
            .get(&item_id)
            .cloned()
            .ok_or_else(|| arena_lib::Error::ItemNotFound {
                func,
                item_id: item_id.clone(),
            })?;

        let mut inventory = self.load_inventory();
        match place_item(&mut inventory, &item) {
            Pickup::Instant(effect) => {
                let delta = self
                    .battle
                    .as_mut()
                    .and_then(|b| b.apply_effect(UnitId::Blue, &effect));
                self.complete_loot();
                Ok(PickResult::Applied { item_id, delta })
            }
            Pickup::Equipped { slot } => {
                self.store_inventory(inventory)?;
                self.complete_loot();
                Ok(PickResult::Equipped { item_id, slot })
            }
            Pickup::Pending => {
                log::debug!("背包已滿，{item_id} 等待替換");
                if let Some(loot) = self.loot.as_mut() {
                    loot.pending = Some(item_id.clone());
                }
                Ok(PickResult::Pending { item_id })
            }
        }
    }

    /// 以等待中的道具替換背包格，回傳被替換的道具
    pub fn replace_slot(&mut self, slot: SlotIndex) -> Result<Option<ItemID>, Error> {
        let func = "Campaign::replace_slot";

        self.ensure_screen(func, Screen::Loot)?;
        let pending = self
            .loot
            .as_ref()
            .and_then(|loot| loot.pending.clone())
            .ok_or(Error::NoPendingItem { func })?;
        let mut inventory = self.load_inventory();
        let evicted = inventory.equip(slot, pending)?;
        self.store_inventory(inventory)?;
        self.complete_loot();
        Ok(evicted)
    }

    fn ensure_screen(&self, func: &'static str, expect: Screen) -> Result<(), Error> {
        if self.screen != expect {
            return Err(Error::WrongScreen {
                func,
                screen: self.screen,
            });
        }
        Ok(())
    }

    fn finished_battle(&self, func: &'static str) -> Result<&Battle, Error> {
        self.ensure_screen(func, Screen::Battle)?;
        self.battle.as_ref().ok_or(Error::WrongScreen {
            func,
            screen: self.screen,
        })
    }

    fn load_inventory(&self) -> Inventory {
        Inventory::from_ids(&load_inventory_ids(&self.store), &self.catalog)
    }

    /// 存檔並同步到戰後的藍方，被動道具在此重算生命上限
    fn store_inventory(&mut self, inventory: Inventory) -> Result<(), Error> {
        save_inventory(&mut self.store, &inventory)?;
        if let Some(battle) = self.battle.as_mut() {
            battle.set_inventory(UnitId::Blue, inventory, &self.catalog);
        }
        Ok(())
    }

    fn complete_loot(&mut self) {
        advance_stage(&mut self.store);
        self.show_map();
    }

    fn show_map(&mut self) {
        self.stage = enter_map(&mut self.store);
        self.battle = None;
        self.loot = None;
        self.screen = Screen::Map;
    }
}
