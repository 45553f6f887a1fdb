//! Mission records handed to the engine by the surrounding city UI

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Which minigame a mission runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinigameKind {
    Asteroids,
    #[serde(rename = "Tower Defense", alias = "TowerDefense")]
    TowerDefense,
    Survival,
}

impl MinigameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MinigameKind::Asteroids => "Asteroids",
            MinigameKind::TowerDefense => "Tower Defense",
            MinigameKind::Survival => "Survival",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "asteroids" => Some(MinigameKind::Asteroids),
            "towerdefense" | "td" => Some(MinigameKind::TowerDefense),
            "survival" => Some(MinigameKind::Survival),
            _ => None,
        }
    }
}

/// A mission as issued by an office
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Number of objectives to complete for victory
    #[serde(alias = "objectivesTarget")]
    pub objectives: u32,
    /// eWave tokens paid out on victory
    #[serde(alias = "rewardAmount")]
    pub reward: u64,
    #[serde(alias = "minigameKind")]
    pub minigame_type: MinigameKind,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
}

fn default_difficulty() -> u32 {
    1
}

impl Mission {
    pub fn new(kind: MinigameKind, objectives: u32, reward: u64, difficulty: u32) -> Self {
        Self {
            id: String::new(),
            name: format!("{} drill", kind.as_str()),
            objectives,
            reward,
            minigame_type: kind,
            location: String::new(),
            difficulty,
        }
    }

    /// Parse a mission record from JSON
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let mission: Mission = serde_json::from_str(json)?;
        mission.validate()?;
        Ok(mission)
    }

    /// Reject records the engine cannot run
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.objectives == 0 {
            return Err(EngineError::InvalidMission {
                reason: format!("mission '{}' has zero objectives", self.name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_office_mission() {
        let json = r#"{
            "id": "mineriaBuild-mission-2",
            "name": "Operation Titan: Tower Defense Challenge for Mineria",
            "location": "Titan",
            "reward": 300,
            "minigameType": "Tower Defense",
            "difficulty": 3,
            "objectives": 15
        }"#;
        let mission = Mission::from_json(json).unwrap();
        assert_eq!(mission.minigame_type, MinigameKind::TowerDefense);
        assert_eq!(mission.objectives, 15);
        assert_eq!(mission.reward, 300);
        assert_eq!(mission.difficulty, 3);
    }

    #[test]
    fn test_parse_interface_aliases() {
        let json = r#"{"objectivesTarget": 5, "rewardAmount": 100, "minigameKind": "Asteroids"}"#;
        let mission = Mission::from_json(json).unwrap();
        assert_eq!(mission.objectives, 5);
        assert_eq!(mission.difficulty, 1);
    }

    #[test]
    fn test_zero_objectives_rejected() {
        let mission = Mission::new(MinigameKind::Survival, 0, 100, 1);
        assert!(matches!(
            mission.validate(),
            Err(EngineError::InvalidMission { .. })
        ));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(MinigameKind::from_str("tower-defense"), Some(MinigameKind::TowerDefense));
        assert_eq!(MinigameKind::from_str("SURVIVAL"), Some(MinigameKind::Survival));
        assert_eq!(MinigameKind::from_str("pong"), None);
    }
}
