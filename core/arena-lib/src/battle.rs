//! battle.rs：
//! - 負責戰鬥流程：開場倒數、回合切換、回合計時、點擊分派與勝負判定。
//! - 移動與攻擊的規則本身在 action 模組，這裡只負責扣點後的流程與繪製提示。
//! - 所有非法輸入都回傳 Err 且不改變狀態，由 click 吞掉並記錄在 debug。
use crate::*;
use items_lib::{Catalog, Effect, ItemID, ItemKind};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 開場倒數，期間不接受輸入
    Intro { remaining: Seconds },
    Running { countdown: Seconds },
    Over(Outcome),
}

/// 進行中的逐格移動；next 為下一個要抵達的路徑索引
#[derive(Debug, Clone, PartialEq, Eq)]
struct MoveInFlight {
    unit: UnitId,
    path: Vec<Pos>,
    next: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveProgress {
    Stepping { to: Pos },
    Arrived(Pos),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotUse {
    /// 切換後的攻擊選擇
    Selected(Selection),
    Consumed {
        item_id: ItemID,
        delta: Option<(Stat, Points)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Moved(MovePlan),
    Attacked(AttackReport),
}

#[derive(Debug, Clone)]
pub struct Battle {
    config: BattleConfig,
    board: Board,
    units: Units,
    active: UnitId,
    phase: Phase,
    selection: Selection,
    moving: Option<MoveInFlight>,
    cues: Vec<Cue>,
}

impl Battle {
    /// 建立戰鬥：單位回到初始數值與位置，依裝備重算生命上限，進入開場倒數
    pub fn new(
        config: BattleConfig,
        blue: Inventory,
        red: Inventory,
        catalog: &Catalog,
    ) -> Result<Self, Error> {
        config.validate()?;
        let board = config.board();
        let mut units = Units::new(&config);
        units.get_mut(UnitId::Blue).inventory = blue;
        units.get_mut(UnitId::Red).inventory = red;
        for id in [UnitId::Blue, UnitId::Red] {
            units.get_mut(id).recalc_max_pv(catalog);
        }

        let mounts = units
            .iter()
            .map(|u| Cue::MountUnit {
                unit: u.id,
                pos: u.pos,
            })
            .collect();
        let mut battle = Self {
            phase: Phase::Intro {
                remaining: config.intro_seconds,
            },
            config,
            board,
            units,
            active: UnitId::Blue,
            selection: Selection::None,
            moving: None,
            cues: mounts,
        };
        match battle.phase {
            Phase::Intro { remaining: 0 } => battle.start_running(),
            Phase::Intro { remaining } => battle.cues.push(Cue::center(remaining.to_string())),
            _ => {}
        }
        Ok(battle)
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    /// 直接修改單位狀態，不做任何檢查
    pub fn units_mut(&mut self) -> &mut Units {
        &mut self.units
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        self.units.get(id)
    }

    pub fn active(&self) -> UnitId {
        self.active
    }

    pub fn active_unit(&self) -> &Unit {
        self.units.get(self.active)
    }

    pub fn inactive_unit(&self) -> &Unit {
        self.units.get(self.active.other())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn countdown(&self) -> Option<Seconds> {
        match self.phase {
            Phase::Running { countdown } => Some(countdown),
            _ => None,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_moving(&self) -> bool {
        self.moving.is_some()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// 取出累積的繪製提示
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// 每秒呼叫一次：推進開場倒數或回合計時，計時歸零時自動結束回合
    pub fn tick(&mut self) {
        match self.phase {
            Phase::Intro { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.start_running();
                } else {
                    self.phase = Phase::Intro { remaining };
                    self.cues.push(Cue::center(remaining.to_string()));
                }
            }
            Phase::Running { countdown } => {
                let countdown = countdown.saturating_sub(1);
                self.phase = Phase::Running { countdown };
                self.cues.push(Cue::Countdown { seconds: countdown });
                if countdown == 0 {
                    log::info!("{} 回合時間到，自動結束回合", self.active);
                    self.finish_move();
                    self.advance_turn();
                }
            }
            Phase::Over(_) => {}
        }
    }

    pub fn pass_turn(&mut self) -> Result<(), Error> {
        self.ensure_input("Battle::pass_turn")?;
        self.advance_turn();
        Ok(())
    }

    /// 選擇或取消拳頭
    pub fn select_punch(&mut self) -> Result<Selection, Error> {
        self.ensure_input("Battle::select_punch")?;
        let spec = AttackSpec::punch(&self.config);
        self.toggle_selection(Selection::Punch, &spec);
        Ok(self.selection)
    }

    /// 使用背包格：攻擊道具切換選擇，消耗品立即生效並移除，被動道具不可使用
    pub fn select_slot(&mut self, slot: SlotIndex, catalog: &Catalog) -> Result<SlotUse, Error> {
        let func = "Battle::select_slot";

        self.ensure_input(func)?;
        if slot == INNATE_SLOT {
            return self.select_punch().map(SlotUse::Selected);
        }
        let unit = self.units.get(self.active);
        let item_id = match unit.inventory.slot(slot) {
            None => return Err(Error::SlotOutOfRange { func, slot }),
            Some(Slot::Equipped(id)) => id.clone(),
            Some(_) => return Err(Error::EmptySlot { func, slot }),
        };
        let item = catalog.get(&item_id).ok_or_else(|| Error::ItemNotFound {
            func,
            item_id: item_id.clone(),
        })?;

        match item.kind() {
            ItemKind::Attack => {
                let spec = AttackSpec::from_slot(unit, slot, catalog, &self.config)?;
                self.toggle_selection(Selection::Slot(slot), &spec);
                Ok(SlotUse::Selected(self.selection))
            }
            ItemKind::Consumable => {
                if unit.pa < item.action_cost {
                    return Err(Error::NotEnoughPoints {
                        func,
                        need: item.action_cost,
                        have: unit.pa,
                    });
                }
                let active = self.active;
                let unit = self.units.get_mut(active);
                unit.pa -= item.action_cost;
                let delta = unit.apply_effect(&item.effect);
                unit.inventory.remove(slot);

                if item.action_cost != 0 {
                    self.cues.push(Cue::FloatingDelta {
                        unit: active,
                        stat: Stat::Pa,
                        amount: -item.action_cost,
                    });
                }
                if let Some((stat, amount)) = delta {
                    self.cues.push(Cue::FloatingDelta {
                        unit: active,
                        stat,
                        amount,
                    });
                }
                log::debug!("{active} 使用 {item_id}");
                if matches!(delta, Some((Stat::Pm, _))) && self.selection == Selection::None {
                    self.cues.push(Cue::ClearHighlights);
                    self.show_reachable();
                }
                Ok(SlotUse::Consumed { item_id, delta })
            }
            ItemKind::Passive => Err(Error::NotActivatable { func, item_id }),
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection == Selection::None {
            return;
        }
        self.selection = Selection::None;
        self.cues.push(Cue::ClearHighlights);
        if self.outcome().is_none() {
            self.show_reachable();
        }
    }

    /// 點擊棋盤格：有選擇攻擊時嘗試攻擊，否則嘗試移動
    /// 不合法的點擊不改變狀態
    pub fn click(&mut self, pos: Pos, catalog: &Catalog) -> Option<Resolution> {
        let result = match self.selection {
            Selection::None => self.move_active(pos).map(Resolution::Moved),
            _ => self.attack(pos, catalog).map(Resolution::Attacked),
        };
        match result {
            Ok(resolution) => Some(resolution),
            Err(err) => {
                log::debug!("忽略點擊 {pos:?}: {err}");
                None
            }
        }
    }

    /// 扣除移動點數並開始逐格移動，之後每格由 step_complete 推進
    pub fn move_active(&mut self, to: Pos) -> Result<MovePlan, Error> {
        self.ensure_input("Battle::move_active")?;
        let active = self.active;
        let plan = plan_move(&self.board, self.units.get(active), to)?;

        self.units.get_mut(active).pm -= plan.cost;
        self.cues.push(Cue::ClearHighlights);
        self.cues.push(Cue::FloatingDelta {
            unit: active,
            stat: Stat::Pm,
            amount: -plan.cost,
        });
        if let [from, next, ..] = plan.path[..] {
            self.cues.push(Cue::MoveStep {
                unit: active,
                from,
                to: next,
            });
        }
        self.moving = Some(MoveInFlight {
            unit: active,
            path: plan.path.clone(),
            next: 1,
        });
        Ok(plan)
    }

    /// 前端播完一格移動動畫後呼叫，單位落在該格
    pub fn step_complete(&mut self) -> Result<MoveProgress, Error> {
        let func = "Battle::step_complete";

        let Some(mv) = self.moving.as_mut() else {
            return Err(Error::NoMoveInFlight { func });
        };
        let unit = mv.unit;
        let Some(pos) = mv.path.get(mv.next).copied() else {
            self.moving = None;
            return Err(Error::NoMoveInFlight { func });
        };
        mv.next += 1;
        let following = mv.path.get(mv.next).copied();

        self.units.get_mut(unit).pos = pos;
        self.cues.push(Cue::MountUnit { unit, pos });
        match following {
            Some(to) => {
                self.cues.push(Cue::MoveStep {
                    unit,
                    from: pos,
                    to,
                });
                Ok(MoveProgress::Stepping { to })
            }
            None => {
                self.moving = None;
                if self.outcome().is_none() && unit == self.active {
                    self.show_reachable();
                }
                Ok(MoveProgress::Arrived(pos))
            }
        }
    }

    /// 跳過剩餘動畫，直接完成移動
    pub fn finish_move(&mut self) -> Option<Pos> {
        let mut arrived = None;
        while self.moving.is_some() {
            match self.step_complete() {
                Ok(MoveProgress::Arrived(pos)) => arrived = Some(pos),
                Ok(MoveProgress::Stepping { .. }) => {}
                Err(_) => break,
            }
        }
        arrived
    }

    /// 以目前選擇的攻擊打向 target
    pub fn attack(&mut self, target: Pos, catalog: &Catalog) -> Result<AttackReport, Error> {
        self.ensure_input("Battle::attack")?;
        let attacker = self.active;
        let spec = AttackSpec::from_selection(
            self.units.get(attacker),
            self.selection,
            catalog,
            &self.config,
        )?;
        let report = resolve_attack(&self.board, &mut self.units, attacker, &spec, target)?;

        self.cues.push(Cue::Attack {
            attacker,
            defender: attacker.other(),
        });
        self.cues.push(Cue::FloatingDelta {
            unit: attacker,
            stat: Stat::Pa,
            amount: -report.cost,
        });
        for &id in &report.hits {
            self.cues.push(Cue::FloatingDelta {
                unit: id,
                stat: Stat::Pv,
                amount: -report.damage,
            });
            self.cues.push(Cue::MountUnit {
                unit: id,
                pos: self.units.get(id).pos,
            });
        }
        log::debug!(
            "{attacker} 以 {} 攻擊 {target:?}，命中 {:?}",
            report.pattern,
            report.hits
        );

        if self.check_game_over().is_none() {
            if let Some(item_id) = &report.consumed {
                log::debug!("{attacker} 的 {item_id} 已用完");
            }
            self.selection = Selection::None;
            self.cues.push(Cue::ClearHighlights);
            self.show_reachable();
        }
        Ok(report)
    }

    /// 對單位套用道具效果（例如戰後拾取的立即生效道具）
    pub fn apply_effect(&mut self, unit: UnitId, effect: &Effect) -> Option<(Stat, Points)> {
        let delta = self.units.get_mut(unit).apply_effect(effect)?;
        self.cues.push(Cue::FloatingDelta {
            unit,
            stat: delta.0,
            amount: delta.1,
        });
        Some(delta)
    }

    /// 替換單位背包並重算生命上限，回傳上限變化量
    pub fn set_inventory(&mut self, unit: UnitId, inventory: Inventory, catalog: &Catalog) -> Points {
        let target = self.units.get_mut(unit);
        target.inventory = inventory;
        let diff = target.recalc_max_pv(catalog);
        if diff != 0 {
            self.cues.push(Cue::FloatingDelta {
                unit,
                stat: Stat::MaxPv,
                amount: diff,
            });
        }
        diff
    }

    /// 勝負判定：藍方倒下優先判定為敗北
    pub fn check_game_over(&mut self) -> Option<Outcome> {
        if let Phase::Over(outcome) = self.phase {
            return Some(outcome);
        }
        let outcome = if self.units.get(UnitId::Blue).is_down() {
            Outcome::Defeat
        } else if self.units.get(UnitId::Red).is_down() {
            Outcome::Victory
        } else {
            return None;
        };

        log::info!("戰鬥結束: {outcome}");
        self.phase = Phase::Over(outcome);
        self.selection = Selection::None;
        self.cues.push(Cue::ClearHighlights);
        self.cues.push(Cue::ShowOutcome(outcome));
        Some(outcome)
    }

    fn ensure_input(&self, func: &'static str) -> Result<(), Error> {
        match self.phase {
            Phase::Running { .. } if self.moving.is_some() => Err(Error::MoveInProgress { func }),
            Phase::Running { .. } => Ok(()),
            Phase::Intro { .. } | Phase::Over(_) => Err(Error::NotRunning { func }),
        }
    }

    fn start_running(&mut self) {
        self.phase = Phase::Running {
            countdown: self.config.turn_seconds,
        };
        self.cues.push(Cue::Countdown {
            seconds: self.config.turn_seconds,
        });
        self.begin_turn();
    }

    /// 結束回合：重置結束方的點數、換手、清除選擇並重新計時
    fn advance_turn(&mut self) {
        let finished = self.active;
        self.units
            .get_mut(finished)
            .reset_turn_points(&self.config);
        self.active = finished.other();
        self.selection = Selection::None;
        self.cues.push(Cue::ClearHighlights);
        self.phase = Phase::Running {
            countdown: self.config.turn_seconds,
        };
        self.cues.push(Cue::Countdown {
            seconds: self.config.turn_seconds,
        });
        if self.check_game_over().is_none() {
            self.begin_turn();
        }
    }

    fn begin_turn(&mut self) {
        log::info!("輪到 {}", self.active);
        self.cues.push(Cue::corner(format!("輪到 {}", self.active)));
        self.show_reachable();
    }

    fn show_reachable(&mut self) {
        let unit = self.units.get(self.active);
        if unit.pm <= 0 {
            return;
        }
        let cells = movable_cells(&self.board, unit);
        self.cues.push(Cue::HighlightReachable {
            unit: unit.id,
            cells,
        });
    }

    fn toggle_selection(&mut self, selection: Selection, spec: &AttackSpec) {
        self.cues.push(Cue::ClearHighlights);
        if self.selection == selection {
            self.selection = Selection::None;
            self.show_reachable();
            return;
        }
        self.selection = selection;
        let cells = attackable_area(&self.board, &self.units, self.active, spec);
        self.cues.push(Cue::HighlightAttackable {
            unit: self.active,
            cells,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_battle() -> Battle {
        let config = BattleConfig {
            intro_seconds: 0,
            ..Default::default()
        };
        let catalog = Catalog::builtin().unwrap();
        Battle::new(config, Inventory::new(), Inventory::new(), &catalog).unwrap()
    }

    #[test]
    fn test_intro_refuses_input() {
        let catalog = Catalog::builtin().unwrap();
        let mut battle = Battle::new(
            BattleConfig::default(),
            Inventory::new(),
            Inventory::new(),
            &catalog,
        )
        .unwrap();
        assert_eq!(battle.phase(), Phase::Intro { remaining: 3 });
        assert!(battle.cues().contains(&Cue::center("3")));

        for remaining in [2, 1] {
            assert!(matches!(battle.pass_turn(), Err(Error::NotRunning { .. })));
            assert_eq!(battle.click(Pos::new(4, 3), &catalog), None);
            battle.tick();
            assert_eq!(battle.phase(), Phase::Intro { remaining });
        }
        battle.tick();
        assert_eq!(battle.phase(), Phase::Running { countdown: 30 });
        assert_eq!(battle.active(), UnitId::Blue);
        assert!(battle.cues().contains(&Cue::corner("輪到 blue")));
    }

    #[test]
    fn test_pass_turn_resets_and_alternates() {
        let mut battle = running_battle();
        battle.units_mut().get_mut(UnitId::Blue).pa = 1;
        battle.units_mut().get_mut(UnitId::Blue).pm = 0;
        battle.tick();
        assert_eq!(battle.countdown(), Some(29));

        battle.pass_turn().unwrap();
        assert_eq!(battle.active(), UnitId::Red);
        let blue = battle.unit(UnitId::Blue);
        assert_eq!((blue.pa, blue.pm), (6, 3));
        assert_eq!(battle.countdown(), Some(30));
        assert_eq!(battle.selection(), Selection::None);

        battle.pass_turn().unwrap();
        assert_eq!(battle.active(), UnitId::Blue);
    }

    #[test]
    fn test_countdown_auto_pass() {
        let mut battle = running_battle();
        for _ in 0..29 {
            battle.tick();
        }
        assert_eq!(battle.active(), UnitId::Blue);
        assert_eq!(battle.countdown(), Some(1));
        battle.tick();
        assert_eq!(battle.active(), UnitId::Red);
        assert_eq!(battle.countdown(), Some(30));
    }

    #[test]
    fn test_move_steps() {
        let catalog = Catalog::builtin().unwrap();
        let mut battle = running_battle();
        battle.take_cues();

        let Some(Resolution::Moved(plan)) = battle.click(Pos::new(4, 2), &catalog) else {
            panic!("move rejected");
        };
        assert_eq!(plan.cost, 2);
        // 點數先扣，位置等動畫
        assert_eq!(battle.active_unit().pm, 1);
        assert_eq!(battle.active_unit().pos, Pos::new(5, 3));
        assert!(battle.is_moving());
        assert!(matches!(battle.pass_turn(), Err(Error::MoveInProgress { .. })));
        assert!(battle.cues().contains(&Cue::MoveStep {
            unit: UnitId::Blue,
            from: Pos::new(5, 3),
            to: Pos::new(5, 2),
        }));

        assert_eq!(
            battle.step_complete().unwrap(),
            MoveProgress::Stepping { to: Pos::new(4, 2) }
        );
        assert_eq!(battle.active_unit().pos, Pos::new(5, 2));
        assert_eq!(
            battle.step_complete().unwrap(),
            MoveProgress::Arrived(Pos::new(4, 2))
        );
        assert!(!battle.is_moving());
        assert!(matches!(
            battle.step_complete(),
            Err(Error::NoMoveInFlight { .. })
        ));

        // 剩 1 PM，兩格外的點擊無效
        assert_eq!(battle.click(Pos::new(4, 0), &catalog), None);
        assert_eq!(battle.active_unit().pm, 1);
    }

    #[test]
    fn test_punch_to_victory() {
        let catalog = Catalog::builtin().unwrap();
        let mut battle = running_battle();
        battle.units_mut().get_mut(UnitId::Blue).pos = Pos::new(3, 0);
        battle.units_mut().get_mut(UnitId::Red).pos = Pos::new(2, 0);
        battle.units_mut().get_mut(UnitId::Red).pv = 2;

        assert_eq!(battle.select_punch().unwrap(), Selection::Punch);
        let Some(Resolution::Attacked(report)) = battle.click(Pos::new(2, 0), &catalog) else {
            panic!("punch rejected");
        };
        assert_eq!(report.hits, vec![UnitId::Red]);
        assert_eq!(battle.unit(UnitId::Red).pv, 0);
        assert_eq!(battle.outcome(), Some(Outcome::Victory));
        assert!(battle.cues().contains(&Cue::ShowOutcome(Outcome::Victory)));

        // 結束後不再處理輸入與計時
        assert!(battle.pass_turn().is_err());
        battle.tick();
        assert_eq!(battle.phase(), Phase::Over(Outcome::Victory));
    }

    #[test]
    fn test_pass_turn_checks_game_over() {
        let mut battle = running_battle();
        battle.units_mut().get_mut(UnitId::Red).pv = 0;
        battle.pass_turn().unwrap();
        assert_eq!(battle.outcome(), Some(Outcome::Victory));
        assert_eq!(battle.countdown(), None);
        assert!(battle.cues().contains(&Cue::ShowOutcome(Outcome::Victory)));

        let mut battle = running_battle();
        battle.units_mut().get_mut(UnitId::Blue).pv = -1;
        battle.pass_turn().unwrap();
        assert_eq!(battle.outcome(), Some(Outcome::Defeat));
        assert_eq!(battle.countdown(), None);
        assert!(matches!(battle.pass_turn(), Err(Error::NotRunning { .. })));
    }

    #[test]
    fn test_select_toggle() {
        let mut battle = running_battle();
        assert_eq!(battle.select_punch().unwrap(), Selection::Punch);
        assert_eq!(battle.select_punch().unwrap(), Selection::None);
        battle.select_punch().unwrap();
        battle.clear_selection();
        assert_eq!(battle.selection(), Selection::None);
    }
}
