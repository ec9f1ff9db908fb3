//! Anytime heuristic search with probably approximately correct (PAC) stopping conditions.
//!
//! An anytime best-first search finds a first solution quickly and keeps improving it while
//! maintaining a lower bound on the optimal cost.
//! A PAC condition stops the search once, with probability at least `1 - delta`,
//! the incumbent is at most `1 + epsilon` times the optimal cost.
//! The probability is estimated from statistics of previously solved instances.

mod domain;
mod error;
pub mod io;
pub mod solvers;
pub mod statistics;
pub mod timer;

pub use domain::SearchDomain;
pub use error::{ConfigError, PacError, StatisticsError};
pub use solvers::{SearchParameters, SearchResult, Solution};
pub use statistics::{BucketedCdf, EmpiricalCdf, EmpiricalCdfBuilder, PacStatistics};

pub mod prelude {
    pub use super::solvers::{
        AnytimeAlgorithm, AnytimeSearch, AnytimeSearchEngine, ConditionKind, NodeOrder,
        PacCondition, PacConfig, PacContext, PacSearchFramework, SearchParameters, SearchResult,
        SearchStatus, Solution, StopRule,
    };
    pub use super::{PacError, SearchDomain};
}
