//! 流程設定：關卡數、獎勵數與戰鬥設定
use crate::*;
use arena_lib::BattleConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CampaignConfig {
    pub stage_count: usize,
    pub loot_count: usize,
    pub battle: BattleConfig,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            stage_count: STAGE_COUNT,
            loot_count: LOOT_COUNT,
            battle: BattleConfig::default(),
        }
    }
}

impl CampaignConfig {
    pub fn from_toml_str(data: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let func = "CampaignConfig::validate";

        if self.stage_count == 0 {
            return Err(Error::InvalidConfig {
                func,
                detail: "至少需要一個關卡".to_string(),
            });
        }
        if self.loot_count == 0 {
            return Err(Error::InvalidConfig {
                func,
                detail: "至少需要一個獎勵".to_string(),
            });
        }
        self.battle.validate().map_err(|e| Error::Wrap {
            func,
            source: Box::new(e.into()),
        })
    }
}
