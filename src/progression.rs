//! Rule-Based Progression Advisor
//!
//! Looks at the per-day top sets of one exercise and suggests the next target.
//!
//! Key principles:
//! - Only the trailing three sessions matter
//! - Two consecutive increases = keep adding load
//! - Flat or dipping = chase reps before load
//! - Deterministic, no external calls

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::top_sets_by_day;
use crate::llm::LlmError;
use crate::models::{DayTopSet, LoggedSet};

/// Absolute increment suggested after an upward trend (lb)
pub const TREND_INCREMENT_LB: f64 = 5.0;

/// Number of trailing sessions the advisor inspects
pub const TREND_WINDOW: usize = 3;

pub const NOT_ENOUGH_DATA: &str = "Log more sessions before a trend can be suggested.";

// ---------------------------------------------------------------------------
/// Trend Decision: what the rules concluded
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrendDecision {
    /// No sessions yet
    NotEnoughData,
    /// One session logged: repeat the weight, chase a rep
    FirstSession { weight: f64 },
    /// At least two increases in the window: add load
    Upward { next_weight: f64 },
    /// Same rounded weight across the window
    Plateau,
    /// Last session below the window's best
    Dip { last_weight: f64 },
    /// Anything else
    Consistent,
}

impl TrendDecision {
    /// Classify a day-ordered top set series
    pub fn classify(top_sets: &[DayTopSet]) -> Self {
        match top_sets {
            [] => return TrendDecision::NotEnoughData,
            [only] => {
                return TrendDecision::FirstSession {
                    weight: only.top_weight,
                }
            }
            _ => {}
        }

        let start = top_sets.len().saturating_sub(TREND_WINDOW);
        let window: Vec<f64> = top_sets[start..].iter().map(|t| t.top_weight).collect();

        let increases = window.windows(2).filter(|pair| pair[1] > pair[0]).count();
        let last = window[window.len() - 1];

        if increases >= 2 {
            return TrendDecision::Upward {
                next_weight: last + TREND_INCREMENT_LB,
            };
        }

        // Halves round to even: 102.5 rounds to 102
        let first_rounded = window[0].round_ties_even();
        if window.iter().all(|w| w.round_ties_even() == first_rounded) {
            return TrendDecision::Plateau;
        }

        let window_max = window.iter().copied().fold(f64::MIN, f64::max);
        if last < window_max {
            return TrendDecision::Dip { last_weight: last };
        }

        TrendDecision::Consistent
    }

    /// Human readable recommendation for this decision
    pub fn message(&self) -> String {
        match self {
            TrendDecision::NotEnoughData => NOT_ENOUGH_DATA.to_string(),
            TrendDecision::FirstSession { weight } => format!(
                "Next time, try repeating {:.0} lb and add +1 rep if it felt manageable.",
                weight
            ),
            TrendDecision::Upward { next_weight } => format!(
                "Nice upward trend! Consider {:.0} lb for your top set; keep reps similar to last session.",
                next_weight
            ),
            TrendDecision::Plateau => {
                "You've plateaued at the same top weight. Try +2.5–5 lb OR keep weight and add +1–2 reps."
                    .to_string()
            }
            TrendDecision::Dip { last_weight } => format!(
                "Bit of a dip last time. Repeat ~{:.0} lb and aim +1–2 reps to regain momentum.",
                last_weight
            ),
            TrendDecision::Consistent => {
                "Solid consistency. Try a small +2.5–5 lb increase or add +1 rep at the same top weight."
                    .to_string()
            }
        }
    }
}

/// Suggest the next goal from the sets of a single exercise
pub fn suggest_next_goal(sets: &[LoggedSet]) -> String {
    if sets.is_empty() {
        return NOT_ENOUGH_DATA.to_string();
    }
    TrendDecision::classify(&top_sets_by_day(sets)).message()
}

// ---------------------------------------------------------------------------
/// Advisor Strategy
// ---------------------------------------------------------------------------

/// Anything that can turn an exercise history into a next-session suggestion
#[async_trait]
pub trait GoalAdvisor: Send + Sync {
    /// Short name shown next to the suggestion
    fn name(&self) -> &'static str;

    async fn suggest_next_goal(&self, sets: &[LoggedSet]) -> Result<String, LlmError>;
}

/// Default advisor: the deterministic decision tree above
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAdvisor;

#[async_trait]
impl GoalAdvisor for RuleBasedAdvisor {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn suggest_next_goal(&self, sets: &[LoggedSet]) -> Result<String, LlmError> {
        Ok(suggest_next_goal(sets))
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
