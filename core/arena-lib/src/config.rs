//! 戰鬥設定：可由 TOML 覆寫，缺少的欄位使用 constants.rs 的預設值
use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PunchConfig {
    pub cost: Points,
    pub damage: Points,
}

impl Default for PunchConfig {
    fn default() -> Self {
        Self {
            cost: PUNCH_COST,
            damage: PUNCH_DAMAGE,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BattleConfig {
    pub rows: usize,
    pub cols: usize,
    pub zone_split_row: usize,
    pub max_pv: Points,
    pub action_points: Points,
    pub move_points: Points,
    pub turn_seconds: Seconds,
    pub intro_seconds: Seconds,
    pub punch: PunchConfig,
    pub blue_start: Pos,
    pub red_start: Pos,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            zone_split_row: DEFAULT_ZONE_SPLIT_ROW,
            max_pv: BASE_MAX_PV,
            action_points: TURN_ACTION_POINTS,
            move_points: TURN_MOVE_POINTS,
            turn_seconds: TURN_SECONDS,
            intro_seconds: INTRO_SECONDS,
            punch: PunchConfig::default(),
            blue_start: BLUE_START,
            red_start: RED_START,
        }
    }
}

impl BattleConfig {
    pub fn from_toml_str(data: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn board(&self) -> Board {
        Board::new(self.rows, self.cols, self.zone_split_row)
    }

    pub fn start_of(&self, id: UnitId) -> Pos {
        match id {
            UnitId::Blue => self.blue_start,
            UnitId::Red => self.red_start,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let func = "BattleConfig::validate";

        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidConfig {
                func,
                detail: format!("棋盤大小 {}x{} 不合法", self.rows, self.cols),
            });
        }
        if self.turn_seconds == 0 {
            return Err(Error::InvalidConfig {
                func,
                detail: "回合秒數必須大於 0".to_string(),
            });
        }
        let board = self.board();
        for id in [UnitId::Blue, UnitId::Red] {
            let start = self.start_of(id);
            if !id.zone_rule().allows(&board, start) {
                return Err(Error::InvalidConfig {
                    func,
                    detail: format!("{id} 的起始位置 {start:?} 不在其區域內"),
                });
            }
        }
        if self.blue_start == self.red_start {
            return Err(Error::InvalidConfig {
                func,
                detail: "兩個單位的起始位置重疊".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BattleConfig::default();
        config.validate().unwrap();
        assert_eq!(config.max_pv, 10);
        assert_eq!(config.action_points, 6);
        assert_eq!(config.move_points, 3);
        assert_eq!(config.turn_seconds, 30);
        assert_eq!(config.punch, PunchConfig { cost: 3, damage: 2 });
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let data = r#"
            turn_seconds = 10

            [punch]
            damage = 4
        "#;
        let config = BattleConfig::from_toml_str(data).unwrap();
        assert_eq!(config.turn_seconds, 10);
        assert_eq!(config.punch.damage, 4);
        assert_eq!(config.punch.cost, PUNCH_COST);
        assert_eq!(config.rows, DEFAULT_ROWS);
        assert_eq!(config.blue_start, BLUE_START);
    }

    #[test]
    fn test_invalid_config() {
        let test_data = [
            "rows = 0",
            "turn_seconds = 0",
            // 藍方不能站在紅方區域
            "blue_start = { row = 0, col = 1 }",
            "rows = [1]",
        ];
        for data in test_data {
            assert!(BattleConfig::from_toml_str(data).is_err(), "{data}");
        }
    }
}
