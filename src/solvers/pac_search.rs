//! Search with probably approximately correct stopping conditions.
//!
//! With probability at least `1 - delta`, the solution returned is at most `1 + epsilon` times
//! the optimal cost.

mod batch;
mod conditions;
mod config;
mod context;
mod framework;
mod states_collector;

pub use batch::{run_batch, BatchReport, InstanceSummary};
pub use conditions::{
    validate_epsilon_delta, ConditionKind, ConditionState, OpenBasedRule, PacCondition,
    ThresholdRule,
};
pub use config::PacConfig;
pub use context::PacContext;
pub use framework::{AnytimeAlgorithm, PacSearchFramework, THRESHOLD_KEY};
pub use states_collector::{collect_states, StatesCollector};
