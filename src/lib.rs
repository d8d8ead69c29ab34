pub mod analysis;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod models;
pub mod progression;
pub mod session;
pub mod store;
pub mod units;
pub mod view;

#[cfg(test)]
mod test_utils;

pub use analysis::{estimate_one_rep_max, personal_records, top_sets_by_day};
pub use error::AppError;
pub use progression::{suggest_next_goal, GoalAdvisor, RuleBasedAdvisor};
pub use session::Session;
pub use units::{to_pounds, WeightUnit};
