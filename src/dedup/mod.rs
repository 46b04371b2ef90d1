//! Professor-name deduplication engine.
//!
//! Leaves first: [`names`] normalizes and tokenizes, [`distance`] scores
//! typos, [`classifier`] decides pairs, [`planner`] turns verdicts into a plan.

pub mod classifier;
pub mod distance;
mod errors;
pub mod models;
pub mod names;
pub mod planner;

pub use classifier::{MatchConfig, classify};
pub use errors::InputError;
pub use models::{
    Action, ActionKind, MatchReason, MatchVerdict, NameRecord, Plan, PlanStats, RecordId, Side,
    SkipReason, Skipped,
};
pub use planner::{plan_roster, plan_self_merge};
