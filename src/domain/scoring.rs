//! Performance model: derived ratings from skills and daily condition.
//!
//! Every function here is pure and total over valid skill and condition
//! ranges. The weight constants are tuning values and must not change.

use crate::domain::condition::PlayerCondition;
use crate::domain::player::PlayerSkills;
use serde::Serialize;

pub const NEUTRAL_CONDITION_FACTOR: f64 = 1.0;
pub const MIN_CONDITION_FACTOR: f64 = 0.5;
pub const MAX_CONDITION_FACTOR: f64 = 1.2;

/// Normalizer for health - fatigue + motivation
const CONDITION_SCALE: f64 = 15.0;
const CONDITION_GAIN: f64 = 1.2;

/// Weights for the static overall rating (sum to 1.0)
pub mod overall_weights {
    pub const SPIKE: f64 = 0.20;
    pub const BLOCK: f64 = 0.15;
    pub const RECEIVE: f64 = 0.20;
    pub const SERVE: f64 = 0.15;
    pub const TOSS: f64 = 0.10;
    pub const CONNECT: f64 = 0.10;
    pub const DECISION: f64 = 0.10;
}

/// Front-row attacking profile
pub mod attack_weights {
    pub const SPIKE: f64 = 0.5;
    pub const DECISION: f64 = 0.2;
    pub const CONNECT: f64 = 0.3;
}

/// Back-row defensive profile
pub mod defense_weights {
    pub const RECEIVE: f64 = 0.6;
    pub const DECISION: f64 = 0.2;
    pub const CONNECT: f64 = 0.2;
}

/// One on-court player as seen by the performance metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringInput {
    pub skills: PlayerSkills,
    pub condition: Option<PlayerCondition>,
}

impl ScoringInput {
    pub fn new(skills: PlayerSkills, condition: Option<PlayerCondition>) -> Self {
        Self { skills, condition }
    }
}

/// Multiplier in [0.5, 1.2] from the day's condition; 1.0 when unknown
pub fn condition_factor(condition: Option<&PlayerCondition>) -> f64 {
    let Some(c) = condition else {
        return NEUTRAL_CONDITION_FACTOR;
    };

    let raw = (f64::from(c.health) - f64::from(c.fatigue) + f64::from(c.motivation))
        / CONDITION_SCALE;
    (MIN_CONDITION_FACTOR + raw * CONDITION_GAIN).clamp(MIN_CONDITION_FACTOR, MAX_CONDITION_FACTOR)
}

/// Condition-independent weighted rating in [0, 100]
pub fn overall_skill(skills: &PlayerSkills) -> f64 {
    use overall_weights::*;

    f64::from(skills.spike) * SPIKE
        + f64::from(skills.block) * BLOCK
        + f64::from(skills.receive) * RECEIVE
        + f64::from(skills.serve) * SERVE
        + f64::from(skills.toss) * TOSS
        + f64::from(skills.connect) * CONNECT
        + f64::from(skills.decision) * DECISION
}

/// Mean of `base(skills) * condition_factor` over the given players
fn conditioned_average(players: &[ScoringInput], base: impl Fn(&PlayerSkills) -> f64) -> f64 {
    if players.is_empty() {
        return 0.0;
    }

    let sum: f64 = players
        .iter()
        .map(|p| base(&p.skills) * condition_factor(p.condition.as_ref()))
        .sum();

    sum / players.len() as f64
}

pub fn attack_power(front_row: &[ScoringInput]) -> f64 {
    conditioned_average(front_row, |s| {
        f64::from(s.spike) * attack_weights::SPIKE
            + f64::from(s.decision) * attack_weights::DECISION
            + f64::from(s.connect) * attack_weights::CONNECT
    })
}

pub fn defense_power(back_row: &[ScoringInput]) -> f64 {
    conditioned_average(back_row, |s| {
        f64::from(s.receive) * defense_weights::RECEIVE
            + f64::from(s.decision) * defense_weights::DECISION
            + f64::from(s.connect) * defense_weights::CONNECT
    })
}

/// Averaged over everyone on court, regardless of row
pub fn serve_power(players: &[ScoringInput]) -> f64 {
    conditioned_average(players, |s| f64::from(s.serve))
}

pub fn block_power(front_row: &[ScoringInput]) -> f64 {
    conditioned_average(front_row, |s| f64::from(s.block))
}

/// The four team metrics for one rotation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TeamMetrics {
    pub attack: f64,
    pub defense: f64,
    pub serve: f64,
    pub block: f64,
}

impl TeamMetrics {
    pub fn compute(front_row: &[ScoringInput], back_row: &[ScoringInput]) -> Self {
        let everyone: Vec<ScoringInput> = front_row.iter().chain(back_row).copied().collect();

        Self {
            attack: attack_power(front_row),
            defense: defense_power(back_row),
            serve: serve_power(&everyone),
            block: block_power(front_row),
        }
    }
}

/// Rating band used when presenting a single skill value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkillTier {
    Excellent,
    Good,
    Average,
    Weak,
}

impl SkillTier {
    pub fn of(value: f64) -> Self {
        if value >= 80.0 {
            SkillTier::Excellent
        } else if value >= 60.0 {
            SkillTier::Good
        } else if value >= 40.0 {
            SkillTier::Average
        } else {
            SkillTier::Weak
        }
    }
}

/// Quick read of a condition record from health against fatigue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConditionTone {
    Good,
    Fair,
    Poor,
}

impl ConditionTone {
    pub fn of(health: u8, fatigue: u8) -> Self {
        let score = i16::from(health) - i16::from(fatigue);
        if score >= 2 {
            ConditionTone::Good
        } else if score >= 0 {
            ConditionTone::Fair
        } else {
            ConditionTone::Poor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_skills() -> PlayerSkills {
        PlayerSkills {
            spike: 80,
            block: 70,
            receive: 75,
            serve: 70,
            toss: 60,
            connect: 65,
            decision: 70,
        }
    }

    fn good() -> PlayerCondition {
        PlayerCondition::new(5, 1, 5)
    }

    fn bad() -> PlayerCondition {
        PlayerCondition::new(1, 5, 1)
    }

    #[test]
    fn test_condition_factor_absent_is_neutral() {
        assert_eq!(condition_factor(None), 1.0);
    }

    #[test]
    fn test_condition_factor_good_day_is_capped() {
        let factor = condition_factor(Some(&good()));
        assert!(factor > 1.0);
        assert!(factor <= 1.2);
        assert_eq!(factor, MAX_CONDITION_FACTOR);
    }

    #[test]
    fn test_condition_factor_bad_day_hits_floor() {
        let factor = condition_factor(Some(&bad()));
        assert!(factor >= 0.5);
        assert!(factor < 1.0);
        assert_eq!(factor, MIN_CONDITION_FACTOR);
    }

    #[test]
    fn test_condition_factor_middle_of_range() {
        // (3 - 3 + 3) / 15 = 0.2 -> 0.5 + 0.24
        let factor = condition_factor(Some(&PlayerCondition::new(3, 3, 3)));
        assert!((factor - 0.74).abs() < 1e-9);
    }

    #[test]
    fn test_overall_weights_sum_to_one() {
        use overall_weights::*;
        let total = SPIKE + BLOCK + RECEIVE + SERVE + TOSS + CONNECT + DECISION;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overall_all_fifty_is_exactly_fifty() {
        assert_eq!(overall_skill(&PlayerSkills::uniform(50)), 50.0);
    }

    #[test]
    fn test_overall_sample_profile() {
        let overall = overall_skill(&sample_skills());
        assert!(overall > 0.0 && overall <= 100.0);
        assert!((overall - 71.5).abs() < 1e-9);
    }

    #[test]
    fn test_overall_bounds() {
        assert_eq!(overall_skill(&PlayerSkills::uniform(0)), 0.0);
        assert!((overall_skill(&PlayerSkills::uniform(100)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_groups_score_zero() {
        assert_eq!(attack_power(&[]), 0.0);
        assert_eq!(defense_power(&[]), 0.0);
        assert_eq!(serve_power(&[]), 0.0);
        assert_eq!(block_power(&[]), 0.0);
    }

    #[test]
    fn test_attack_power_without_condition() {
        let players = [ScoringInput::new(sample_skills(), None); 3];
        // 80*0.5 + 70*0.2 + 65*0.3
        assert!((attack_power(&players) - 73.5).abs() < 1e-9);
    }

    #[test]
    fn test_attack_power_orders_by_condition() {
        let with_good = attack_power(&[ScoringInput::new(sample_skills(), Some(good()))]);
        let without = attack_power(&[ScoringInput::new(sample_skills(), None)]);
        let with_bad = attack_power(&[ScoringInput::new(sample_skills(), Some(bad()))]);

        assert!(with_good > without);
        assert!(without > with_bad);
    }

    #[test]
    fn test_defense_power_weights() {
        let players = [ScoringInput::new(sample_skills(), None); 3];
        // 75*0.6 + 70*0.2 + 65*0.2
        assert!((defense_power(&players) - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_serve_and_block_apply_factor_per_player() {
        let players = [
            ScoringInput::new(sample_skills(), Some(good())),
            ScoringInput::new(sample_skills(), Some(bad())),
        ];
        // serve 70: (70*1.2 + 70*0.5) / 2
        assert!((serve_power(&players) - 59.5).abs() < 1e-9);
        // block 70, same factors
        assert!((block_power(&players) - 59.5).abs() < 1e-9);
    }

    #[test]
    fn test_team_metrics_use_row_subsets() {
        let mut hitter = sample_skills();
        hitter.block = 90;
        let front = [ScoringInput::new(hitter, None); 3];
        let back = [ScoringInput::new(PlayerSkills::uniform(40), None); 3];

        let metrics = TeamMetrics::compute(&front, &back);
        assert!((metrics.block - 90.0).abs() < 1e-9);
        assert!((metrics.defense - 40.0).abs() < 1e-9);
        assert!((metrics.serve - 55.0).abs() < 1e-9);
        assert!((metrics.attack - 73.5).abs() < 1e-9);
    }

    #[test]
    fn test_skill_tiers() {
        assert_eq!(SkillTier::of(80.0), SkillTier::Excellent);
        assert_eq!(SkillTier::of(79.9), SkillTier::Good);
        assert_eq!(SkillTier::of(40.0), SkillTier::Average);
        assert_eq!(SkillTier::of(12.0), SkillTier::Weak);
    }

    #[test]
    fn test_condition_tone() {
        assert_eq!(ConditionTone::of(5, 3), ConditionTone::Good);
        assert_eq!(ConditionTone::of(3, 3), ConditionTone::Fair);
        assert_eq!(ConditionTone::of(2, 4), ConditionTone::Poor);
    }
}
