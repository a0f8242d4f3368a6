//! 畫面流程測試：地圖、戰鬥、獎勵與存檔

use arena_lib::{Outcome, Stat, UnitId};
use campaign_lib::*;
use items_lib::Catalog;
use rand::{SeedableRng, rngs::StdRng};

const SHIELD_ONLY: &str = r#"
[[items]]
id = "shield"
effect = { type = "max_pv", value = 3 }
"#;

const APPLE_ONLY: &str = r#"
[[items]]
id = "apple"
consumable = true
usable = false
effect = { type = "heal", value = 3 }
"#;

fn campaign_with(catalog: &str, store: MemoryStore) -> Campaign<MemoryStore> {
    let catalog = Catalog::from_toml_str(catalog).unwrap();
    Campaign::new(CampaignConfig::default(), catalog, store).unwrap()
}

fn finish_battle(campaign: &mut Campaign<MemoryStore>, loser: UnitId) -> Outcome {
    let battle = campaign.battle_mut().unwrap();
    battle.units_mut().get_mut(loser).pv = 0;
    battle.check_game_over().unwrap()
}

#[test]
fn test_victory_advances_one_stage() {
    let mut campaign = campaign_with(SHIELD_ONLY, MemoryStore::new());
    assert_eq!(campaign.screen(), Screen::Start);
    assert!(!campaign.has_save());

    campaign.new_game().unwrap();
    assert_eq!(campaign.screen(), Screen::Map);
    assert_eq!(campaign.stage(), 0);
    assert_eq!(campaign.nodes()[0].state, NodeState::Current);
    assert!(campaign.can_play());

    campaign.play().unwrap();
    assert_eq!(campaign.screen(), Screen::Battle);
    assert_eq!(finish_battle(&mut campaign, UnitId::Red), Outcome::Victory);

    let mut rng = StdRng::seed_from_u64(42);
    let offers = campaign.claim_loot(&mut rng).unwrap().to_vec();
    assert_eq!(offers, vec!["shield"; 3]);
    assert_eq!(campaign.screen(), Screen::Loot);

    let picked = campaign.pick_offer(1).unwrap();
    assert_eq!(
        picked,
        PickResult::Equipped {
            item_id: "shield".to_string(),
            slot: 1,
        }
    );
    assert_eq!(campaign.screen(), Screen::Map);
    assert_eq!(campaign.stage(), 1);
    assert_eq!(campaign.store().get(STAGE_KEY), Some("1".to_string()));
    // 地圖讀取後清除 played
    assert!(!campaign.store().contains(PLAYED_KEY));
    assert_eq!(
        campaign.store().get(INVENTORY_KEY),
        Some(r#"["shield"]"#.to_string())
    );

    // 下一場戰鬥帶著盾牌
    let battle = campaign.play().unwrap();
    assert_eq!(battle.unit(UnitId::Blue).max_pv, 13);
    assert_eq!(battle.unit(UnitId::Blue).pv, 13);
}

#[test]
fn test_full_inventory_blocks_until_replaced() {
    let mut store = MemoryStore::new();
    store.set(STAGE_KEY, "2".to_string());
    store.set(INVENTORY_KEY, r#"["shield","shield","shield"]"#.to_string());
    let mut campaign = campaign_with(SHIELD_ONLY, store);
    campaign.continue_game().unwrap();
    assert_eq!(campaign.stage(), 2);

    campaign.play().unwrap();
    finish_battle(&mut campaign, UnitId::Red);
    campaign.claim_loot(&mut StdRng::seed_from_u64(0)).unwrap();

    assert_eq!(
        campaign.pick_offer(0).unwrap(),
        PickResult::Pending {
            item_id: "shield".to_string()
        }
    );
    assert!(campaign.loot().unwrap().is_blocked());
    assert_eq!(campaign.screen(), Screen::Loot);
    assert_eq!(campaign.store().get(STAGE_KEY), Some("2".to_string()));

    assert!(matches!(
        campaign.pick_offer(1),
        Err(Error::ReplacementPending { .. })
    ));
    assert!(matches!(campaign.play(), Err(Error::WrongScreen { .. })));
    // 拳頭格不可替換，仍在等待
    assert!(matches!(
        campaign.replace_slot(0),
        Err(Error::Arena(arena_lib::Error::InnateSlot { .. }))
    ));
    assert_eq!(campaign.stage(), 2);

    assert_eq!(campaign.replace_slot(2).unwrap(), Some("shield".to_string()));
    assert_eq!(campaign.screen(), Screen::Map);
    assert_eq!(campaign.stage(), 3);
    assert!(matches!(
        campaign.replace_slot(2),
        Err(Error::WrongScreen { .. })
    ));
}

#[test]
fn test_instant_item_is_not_stored() {
    let mut campaign = campaign_with(APPLE_ONLY, MemoryStore::new());
    campaign.new_game().unwrap();
    campaign.play().unwrap();
    finish_battle(&mut campaign, UnitId::Red);
    campaign.claim_loot(&mut StdRng::seed_from_u64(3)).unwrap();

    let picked = campaign.pick_offer(2).unwrap();
    assert_eq!(
        picked,
        PickResult::Applied {
            item_id: "apple".to_string(),
            delta: Some((Stat::Pv, 3)),
        }
    );
    assert_eq!(campaign.stage(), 1);
    assert_eq!(campaign.store().get(INVENTORY_KEY), Some("[]".to_string()));
}

#[test]
fn test_defeat_wipes_save() {
    let mut store = MemoryStore::new();
    store.set(STAGE_KEY, "3".to_string());
    store.set(INVENTORY_KEY, r#"["shield"]"#.to_string());
    let mut campaign = campaign_with(SHIELD_ONLY, store);
    campaign.continue_game().unwrap();
    campaign.play().unwrap();

    assert!(matches!(
        campaign.exit_defeat(),
        Err(Error::BattleNotOver { .. })
    ));
    assert_eq!(finish_battle(&mut campaign, UnitId::Blue), Outcome::Defeat);
    assert!(matches!(
        campaign.claim_loot(&mut StdRng::seed_from_u64(0)),
        Err(Error::WrongOutcome {
            outcome: Outcome::Defeat,
            ..
        })
    ));

    campaign.exit_defeat().unwrap();
    assert_eq!(campaign.screen(), Screen::Start);
    assert!(!campaign.has_save());
    assert!(campaign.store().is_empty());
}

#[test]
fn test_continue_clears_played_flag() {
    let mut store = MemoryStore::new();
    store.set(STAGE_KEY, "2".to_string());
    store.set(PLAYED_KEY, "true".to_string());
    let mut campaign = campaign_with(SHIELD_ONLY, store);
    assert!(campaign.has_save());

    campaign.continue_game().unwrap();
    assert_eq!(campaign.stage(), 2);
    assert!(!campaign.store().contains(PLAYED_KEY));
}

#[test]
fn test_new_game_resets_save() {
    let mut store = MemoryStore::new();
    store.set(STAGE_KEY, "4".to_string());
    store.set(INVENTORY_KEY, r#"["shield"]"#.to_string());
    let mut campaign = campaign_with(SHIELD_ONLY, store);

    campaign.new_game().unwrap();
    assert_eq!(campaign.stage(), 0);
    assert!(!campaign.store().contains(INVENTORY_KEY));
    assert!(matches!(campaign.new_game(), Err(Error::WrongScreen { .. })));
}

#[test]
fn test_no_stage_after_last() {
    let mut store = MemoryStore::new();
    store.set(STAGE_KEY, STAGE_COUNT.to_string());
    let mut campaign = campaign_with(SHIELD_ONLY, store);
    campaign.continue_game().unwrap();

    assert!(!campaign.can_play());
    assert!(matches!(campaign.play(), Err(Error::NoStageLeft { .. })));
    assert!(
        campaign
            .nodes()
            .iter()
            .all(|node| node.state == NodeState::Past)
    );
}
