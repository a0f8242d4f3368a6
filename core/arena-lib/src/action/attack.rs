//! attack.rs：
//! - 負責攻擊選擇、攻擊範圍形狀（相鄰、直線、T 字、十字）與傷害結算。
//! - 僅處理攻擊本身，不負責回合流程、勝負判定或動畫提示。
//! - 結算失敗時不改變任何狀態。
use crate::*;
use items_lib::{Catalog, ItemID, ItemKind, Pattern};

/// 目前選擇的攻擊
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Punch,
    Slot(SlotIndex),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackSource {
    Punch,
    Item {
        slot: SlotIndex,
        item_id: ItemID,
        consumable: bool,
    },
}

/// 攻擊的數值與形狀，由拳頭或道具轉換而來
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackSpec {
    pub cost: Points,
    pub damage: Points,
    pub pattern: Pattern,
    pub range: MovementCost,
    pub source: AttackSource,
}

impl AttackSpec {
    pub fn punch(config: &BattleConfig) -> Self {
        Self {
            cost: config.punch.cost,
            damage: config.punch.damage,
            pattern: Pattern::Line,
            range: PUNCH_RANGE,
            source: AttackSource::Punch,
        }
    }

    pub fn from_slot(
        unit: &Unit,
        slot: SlotIndex,
        catalog: &Catalog,
        config: &BattleConfig,
    ) -> Result<Self, Error> {
        let func = "AttackSpec::from_slot";

        let item_id = match unit.inventory.slot(slot) {
            None => return Err(Error::SlotOutOfRange { func, slot }),
            Some(Slot::Innate) => return Ok(Self::punch(config)),
            Some(Slot::Empty) => return Err(Error::EmptySlot { func, slot }),
            Some(Slot::Equipped(id)) => id,
        };
        let item = catalog.get(item_id).ok_or_else(|| Error::ItemNotFound {
            func,
            item_id: item_id.clone(),
        })?;
        if item.kind() != ItemKind::Attack {
            return Err(Error::NotActivatable {
                func,
                item_id: item_id.clone(),
            });
        }
        Ok(Self {
            cost: item.action_cost,
            damage: item.damage,
            pattern: item.pattern,
            range: item.effective_range(),
            source: AttackSource::Item {
                slot,
                item_id: item.id.clone(),
                consumable: item.consumable,
            },
        })
    }

    pub fn from_selection(
        unit: &Unit,
        selection: Selection,
        catalog: &Catalog,
        config: &BattleConfig,
    ) -> Result<Self, Error> {
        match selection {
            Selection::None => Err(Error::NoActionSelected {
                func: "AttackSpec::from_selection",
            }),
            Selection::Punch => Ok(Self::punch(config)),
            Selection::Slot(slot) => Self::from_slot(unit, slot, catalog, config),
        }
    }
}

/// 曼哈頓距離介於 [min, max] 的棋盤格，依索引排序
pub fn manhattan_area(board: &Board, center: Pos, min: MovementCost, max: MovementCost) -> Vec<Pos> {
    board
        .positions()
        .filter(|p| {
            let d = center.manhattan(*p) as MovementCost;
            d >= min && d <= max
        })
        .collect()
}

/// 拳頭可攻擊的上下左右四格
pub fn punch_area(board: &Board, from: Pos) -> Vec<Pos> {
    manhattan_area(board, from, 1, PUNCH_RANGE)
}

/// 以 center 為中心、半徑 radius 的十字（radius 1）或菱形範圍，含中心
pub fn cross_area(board: &Board, center: Pos, radius: u32) -> Vec<Pos> {
    manhattan_area(board, center, 0, radius)
}

/// 朝向 toward 的 T 字形：沿攻擊軸 3 格，加上最遠一格的左右兩格
///
/// 攻擊軸取 row/col 差值絕對值較大者；相等時藍方取縱向、紅方取橫向
pub fn t_shape_area(board: &Board, attacker: UnitId, from: Pos, toward: Pos) -> Vec<Pos> {
    if from == toward {
        return vec![];
    }
    let dr = toward.row as isize - from.row as isize;
    let dc = toward.col as isize - from.col as isize;
    let vertical = match dr.abs().cmp(&dc.abs()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => attacker == UnitId::Blue,
    };
    let (sr, sc) = if vertical { (dr.signum(), 0) } else { (0, dc.signum()) };
    // 垂直於攻擊軸的方向
    let (pr, pc) = (sc.abs(), sr.abs());

    let (fr, fc) = (from.row as isize, from.col as isize);
    let far = (fr + sr * T_SHAPE_LENGTH, fc + sc * T_SHAPE_LENGTH);
    let mut cells: Vec<(isize, isize)> = (1..=T_SHAPE_LENGTH)
        .map(|k| (fr + sr * k, fc + sc * k))
        .collect();
    cells.push((far.0 - pr, far.1 - pc));
    cells.push((far.0 + pr, far.1 + pc));

    cells
        .into_iter()
        .filter(|(r, c)| board.is_inside(*r, *c))
        .map(|(r, c)| Pos::new(r as usize, c as usize))
        .collect()
}

/// 目前可以點選的攻擊格
pub fn attackable_area(board: &Board, units: &Units, attacker: UnitId, spec: &AttackSpec) -> Vec<Pos> {
    let from = units.get(attacker).pos;
    match spec.pattern {
        Pattern::None => vec![],
        Pattern::Line => manhattan_area(board, from, 1, spec.range),
        Pattern::TShape => t_shape_area(board, attacker, from, units.get(attacker.other()).pos),
        // 十字攻擊可選擇任何射程內的中心，包含自己腳下
        Pattern::Cross { .. } => manhattan_area(board, from, 0, spec.range),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: UnitId,
    pub cost: Points,
    pub damage: Points,
    pub pattern: Pattern,
    /// 實際受到波及的格子
    pub covered: Vec<Pos>,
    pub hits: Vec<UnitId>,
    pub consumed: Option<ItemID>,
}

/// 結算一次攻擊：扣除 PA、造成傷害、移除消耗品
/// 任何檢查失敗都不改變狀態；數值不做下限截斷
pub fn resolve_attack(
    board: &Board,
    units: &mut Units,
    attacker: UnitId,
    spec: &AttackSpec,
    target: Pos,
) -> Result<AttackReport, Error> {
    let func = "resolve_attack";

    let area = attackable_area(board, units, attacker, spec);
    if !area.contains(&target) {
        return Err(Error::NotAttackable { func, pos: target });
    }
    let defender = attacker.other();
    let defender_pos = units.get(defender).pos;

    let (covered, hits) = match spec.pattern {
        Pattern::None => return Err(Error::NotAttackable { func, pos: target }),
        Pattern::Line => {
            if defender_pos != target {
                return Err(Error::NoTarget { func, pos: target });
            }
            (vec![target], vec![defender])
        }
        Pattern::TShape => {
            if !area.contains(&defender_pos) {
                return Err(Error::NoTarget { func, pos: target });
            }
            (area, vec![defender])
        }
        Pattern::Cross { radius } => {
            let covered = cross_area(board, target, radius);
            let hits = units
                .iter()
                .filter(|u| covered.contains(&u.pos))
                .map(|u| u.id)
                .collect();
            (covered, hits)
        }
    };

    let have = units.get(attacker).pa;
    if have < spec.cost {
        return Err(Error::NotEnoughPoints {
            func,
            need: spec.cost,
            have,
        });
    }

    units.get_mut(attacker).pa -= spec.cost;
    for id in &hits {
        units.get_mut(*id).pv -= spec.damage;
    }

    let consumed = match &spec.source {
        AttackSource::Item {
            slot,
            consumable: true,
            ..
        } => units.get_mut(attacker).inventory.remove(*slot),
        _ => None,
    };

    Ok(AttackReport {
        attacker,
        cost: spec.cost,
        damage: spec.damage,
        pattern: spec.pattern,
        covered,
        hits,
        consumed,
    })
}
