//! Player account ledger
//!
//! In-memory eWave token and mineral balances. Mission rewards arrive
//! through `RewardSink`; the host may also credit named categories directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::sim::{MineralKind, MineralTally, RewardSink};

/// One credited mission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub reward: u64,
    pub minerals: MineralTally,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerAccount {
    pub ewave_tokens: u64,
    pub minerals: MineralTally,
    /// Every mission credited, oldest first
    pub history: Vec<CompletionRecord>,
}

impl PlayerAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ewaves(&mut self, amount: u64) {
        self.ewave_tokens = self.ewave_tokens.saturating_add(amount);
    }

    /// Credit a mineral category by name. Unknown names are ignored.
    pub fn add_minerals(&mut self, category: &str, amount: u32) -> bool {
        match MineralKind::from_str(category) {
            Some(kind) => {
                self.minerals.add(kind, amount);
                true
            }
            None => {
                log::warn!("Attempted to add unknown mineral type: {}", category);
                false
            }
        }
    }

    /// Credit a completion whose minerals come keyed by category name
    pub fn record_named(&mut self, reward: u64, minerals: &BTreeMap<String, u32>) {
        let mut tally = MineralTally::default();
        for (category, &amount) in minerals {
            if amount == 0 {
                continue;
            }
            match MineralKind::from_str(category) {
                Some(kind) => tally.add(kind, amount),
                None => log::warn!("Attempted to add unknown mineral type: {}", category),
            }
        }
        self.record_mission_completion(reward, &tally);
    }

    pub fn missions_completed(&self) -> usize {
        self.history.len()
    }
}

impl RewardSink for PlayerAccount {
    fn record_mission_completion(&mut self, reward: u64, minerals: &MineralTally) {
        self.add_ewaves(reward);
        self.minerals.merge(minerals);
        self.history.push(CompletionRecord {
            reward,
            minerals: *minerals,
        });
        log::info!(
            "Mission completed. Rewarded: {} eWaves, minerals: {:?}",
            reward,
            minerals.iter().collect::<Vec<_>>()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_credits_tokens_and_minerals() {
        let mut account = PlayerAccount::new();
        let mut tally = MineralTally::default();
        tally.add(MineralKind::Tamita, 3);
        account.record_mission_completion(200, &tally);
        account.record_mission_completion(100, &MineralTally::default());

        assert_eq!(account.ewave_tokens, 300);
        assert_eq!(account.minerals.get(MineralKind::Tamita), 3);
        assert_eq!(account.missions_completed(), 2);
    }

    #[test]
    fn test_unknown_category_is_ignored() {
        let mut account = PlayerAccount::new();
        assert!(!account.add_minerals("unobtainium", 5));
        assert!(account.add_minerals("Janita", 2));
        assert_eq!(account.minerals.total(), 2);

        let named: BTreeMap<String, u32> = [("elenita".to_string(), 1), ("kryptonite".to_string(), 9)]
            .into_iter()
            .collect();
        account.record_named(50, &named);
        assert_eq!(account.ewave_tokens, 50);
        assert_eq!(account.minerals.get(MineralKind::Elenita), 1);
        assert_eq!(account.minerals.total(), 3);
    }

    #[test]
    fn test_shared_account_as_sink() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let account = Rc::new(RefCell::new(PlayerAccount::new()));
        let mut sink = account.clone();
        sink.record_mission_completion(75, &MineralTally::default());
        assert_eq!(account.borrow().ewave_tokens, 75);
    }
}
