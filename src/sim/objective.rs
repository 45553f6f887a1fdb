//! Mission objective tracking and outcome resolution

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Mineral categories that can drop from destroyed hostiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MineralKind {
    Tamita,
    Janita,
    Elenita,
}

impl MineralKind {
    pub const ALL: [MineralKind; 3] = [MineralKind::Tamita, MineralKind::Janita, MineralKind::Elenita];

    pub fn as_str(&self) -> &'static str {
        match self {
            MineralKind::Tamita => "tamita",
            MineralKind::Janita => "janita",
            MineralKind::Elenita => "elenita",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tamita" => Some(MineralKind::Tamita),
            "janita" => Some(MineralKind::Janita),
            "elenita" => Some(MineralKind::Elenita),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            MineralKind::Tamita => 0,
            MineralKind::Janita => 1,
            MineralKind::Elenita => 2,
        }
    }
}

/// Mineral counts by category. Serializes as `{"tamita": n, "janita": n, "elenita": n}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<MineralKind, u32>", from = "BTreeMap<MineralKind, u32>")]
pub struct MineralTally {
    counts: [u32; 3],
}

impl From<MineralTally> for BTreeMap<MineralKind, u32> {
    fn from(tally: MineralTally) -> Self {
        MineralKind::ALL.into_iter().map(|k| (k, tally.get(k))).collect()
    }
}

impl From<BTreeMap<MineralKind, u32>> for MineralTally {
    fn from(map: BTreeMap<MineralKind, u32>) -> Self {
        let mut tally = MineralTally::default();
        for (kind, amount) in map {
            tally.add(kind, amount);
        }
        tally
    }
}

impl MineralTally {
    pub fn get(&self, kind: MineralKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn add(&mut self, kind: MineralKind, amount: u32) {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(amount);
    }

    pub fn merge(&mut self, other: &MineralTally) {
        for kind in MineralKind::ALL {
            self.add(kind, other.get(kind));
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Non-empty categories in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (MineralKind, u32)> + '_ {
        MineralKind::ALL
            .into_iter()
            .map(|k| (k, self.get(k)))
            .filter(|(_, n)| *n > 0)
    }
}

/// One independent Bernoulli draw per category
pub fn roll_minerals(rng: &mut Pcg32, odds: &[f32; 3]) -> MineralTally {
    let mut tally = MineralTally::default();
    for kind in MineralKind::ALL {
        let p = odds[kind.index()].clamp(0.0, 1.0) as f64;
        if rng.random_bool(p) {
            tally.add(kind, 1);
        }
    }
    tally
}

/// Terminal state of a mission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Victory,
    Defeat,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }
}

/// Receiver for mission rewards (the player account ledger)
pub trait RewardSink {
    fn record_mission_completion(&mut self, reward: u64, minerals: &MineralTally);
}

impl<T: RewardSink> RewardSink for Rc<RefCell<T>> {
    fn record_mission_completion(&mut self, reward: u64, minerals: &MineralTally) {
        self.borrow_mut().record_mission_completion(reward, minerals);
    }
}

/// Depletable base health for defense play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseHealth {
    pub current: i32,
    pub max: i32,
    pub breach_damage: i32,
}

#[derive(Debug, Clone)]
pub struct ObjectiveTracker {
    progress: u32,
    target: u32,
    outcome: Outcome,
    score: u64,
    minerals: MineralTally,
    reward_amount: u64,
    base: Option<BaseHealth>,
    eliminated: bool,
    reward_recorded: bool,
}

impl ObjectiveTracker {
    pub fn new(target: u32, reward_amount: u64, base: Option<BaseHealth>) -> Self {
        Self {
            progress: 0,
            target,
            outcome: Outcome::InProgress,
            score: 0,
            minerals: MineralTally::default(),
            reward_amount,
            base,
            eliminated: false,
            reward_recorded: false,
        }
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn minerals(&self) -> &MineralTally {
        &self.minerals
    }

    pub fn base_health(&self) -> Option<BaseHealth> {
        self.base
    }

    /// Score that does not advance progress (e.g. splitting a large rock)
    pub fn add_score(&mut self, points: u64) {
        if !self.is_terminal() {
            self.score += points;
        }
    }

    /// One objective completed. Progress saturates at the target.
    pub fn record_objective(&mut self, points: u64, drops: &MineralTally) {
        if self.is_terminal() {
            return;
        }
        self.progress = (self.progress + 1).min(self.target);
        self.score += points;
        self.minerals.merge(drops);
    }

    /// An enemy reached the base. Returns remaining health.
    pub fn record_breach(&mut self) -> Option<i32> {
        if self.is_terminal() {
            return self.base.map(|b| b.current);
        }
        let base = self.base.as_mut()?;
        base.current = (base.current - base.breach_damage).max(0);
        if base.current == 0 {
            self.eliminated = true;
        }
        Some(base.current)
    }

    /// The player was destroyed
    pub fn record_player_eliminated(&mut self) {
        if !self.is_terminal() {
            self.eliminated = true;
        }
    }

    /// Decide the outcome. Returns the new outcome on the step it becomes
    /// terminal; the reward sink is called exactly once, on victory.
    pub fn evaluate(&mut self, rewards: &mut dyn RewardSink) -> Option<Outcome> {
        if self.is_terminal() {
            return None;
        }

        if self.eliminated {
            self.outcome = Outcome::Defeat;
        } else if self.progress >= self.target {
            self.outcome = Outcome::Victory;
            if !self.reward_recorded {
                self.reward_recorded = true;
                rewards.record_mission_completion(self.reward_amount, &self.minerals);
            }
        } else {
            return None;
        }

        log::info!(
            "Mission resolved: {:?} (progress {}/{}, score {})",
            self.outcome,
            self.progress,
            self.target,
            self.score
        );
        Some(self.outcome)
    }
}

/// Reward sink that keeps every call, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<(u64, MineralTally)>,
}

impl RewardSink for RecordingSink {
    fn record_mission_completion(&mut self, reward: u64, minerals: &MineralTally) {
        self.calls.push((reward, *minerals));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_tally_serializes_by_category() {
        let mut tally = MineralTally::default();
        tally.add(MineralKind::Tamita, 2);
        tally.add(MineralKind::Elenita, 1);
        let json = serde_json::to_value(tally).unwrap();
        assert_eq!(json, serde_json::json!({"tamita": 2, "janita": 0, "elenita": 1}));

        let back: MineralTally = serde_json::from_str(r#"{"janita": 4}"#).unwrap();
        assert_eq!(back.get(MineralKind::Janita), 4);
        assert_eq!(back.total(), 4);
    }

    #[test]
    fn test_victory_pays_once() {
        let mut sink = RecordingSink::default();
        let mut tracker = ObjectiveTracker::new(2, 200, None);
        let mut drops = MineralTally::default();
        drops.add(MineralKind::Janita, 1);

        tracker.record_objective(10, &drops);
        assert_eq!(tracker.evaluate(&mut sink), None);
        tracker.record_objective(10, &MineralTally::default());
        assert_eq!(tracker.evaluate(&mut sink), Some(Outcome::Victory));
        assert_eq!(tracker.evaluate(&mut sink), None);

        assert_eq!(sink.calls.len(), 1);
        assert_eq!(sink.calls[0].0, 200);
        assert_eq!(sink.calls[0].1.get(MineralKind::Janita), 1);
    }

    #[test]
    fn test_progress_never_exceeds_target() {
        let mut tracker = ObjectiveTracker::new(3, 0, None);
        let mut last = 0;
        for _ in 0..10 {
            tracker.record_objective(1, &MineralTally::default());
            assert!(tracker.progress() >= last);
            assert!(tracker.progress() <= tracker.target());
            last = tracker.progress();
        }
        assert_eq!(tracker.progress(), 3);
    }

    #[test]
    fn test_defeat_pays_nothing() {
        let mut sink = RecordingSink::default();
        let mut tracker = ObjectiveTracker::new(5, 100, None);
        tracker.record_player_eliminated();
        assert_eq!(tracker.evaluate(&mut sink), Some(Outcome::Defeat));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_defeat_wins_same_step_tie() {
        let mut sink = RecordingSink::default();
        let mut tracker = ObjectiveTracker::new(1, 100, None);
        tracker.record_objective(10, &MineralTally::default());
        tracker.record_player_eliminated();
        assert_eq!(tracker.evaluate(&mut sink), Some(Outcome::Defeat));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut sink = RecordingSink::default();
        let mut tracker = ObjectiveTracker::new(1, 100, None);
        tracker.record_objective(10, &MineralTally::default());
        tracker.evaluate(&mut sink);

        tracker.record_objective(10, &MineralTally::default());
        tracker.add_score(99);
        tracker.record_player_eliminated();
        assert_eq!(tracker.score(), 10);
        assert_eq!(tracker.evaluate(&mut sink), None);
        assert_eq!(tracker.outcome(), Outcome::Victory);
    }

    #[test]
    fn test_base_breaches_lead_to_defeat() {
        let mut sink = RecordingSink::default();
        let mut tracker = ObjectiveTracker::new(
            50,
            100,
            Some(BaseHealth {
                current: 30,
                max: 30,
                breach_damage: 10,
            }),
        );
        assert_eq!(tracker.record_breach(), Some(20));
        assert_eq!(tracker.record_breach(), Some(10));
        assert_eq!(tracker.evaluate(&mut sink), None);
        assert_eq!(tracker.record_breach(), Some(0));
        assert_eq!(tracker.evaluate(&mut sink), Some(Outcome::Defeat));
    }

    #[test]
    fn test_mineral_odds_are_independent() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut totals = MineralTally::default();
        for _ in 0..2000 {
            totals.merge(&roll_minerals(&mut rng, &[0.5, 0.3, 0.0]));
        }
        assert_eq!(totals.get(MineralKind::Elenita), 0);
        let tamita = totals.get(MineralKind::Tamita);
        let janita = totals.get(MineralKind::Janita);
        assert!((850..1150).contains(&tamita), "tamita {}", tamita);
        assert!((450..750).contains(&janita), "janita {}", janita);
    }
}
