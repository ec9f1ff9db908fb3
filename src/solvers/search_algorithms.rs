//! Anytime best-first search.

mod anytime_search;
mod f_bound_tracker;
mod priority_frontier;
mod search;
mod search_nodes;

pub use anytime_search::{AnytimeSearchEngine, EnginePhase, FrontierObserver};
pub use f_bound_tracker::FBoundTracker;
pub use priority_frontier::PriorityFrontier;
pub use search::{
    AnytimeSearch, ExtraValue, IterationRecord, SearchCounters, SearchParameters, SearchResult,
    SearchStatus, Solution, StopRule, DISCREPANCY_KEY, FMIN_KEY, MAX_FMIN_KEY, SATISFIED_KEY,
};
pub use search_nodes::{
    ArenaFull, ClosedTable, FrontierKey, NodeArena, NodeId, NodeOrder, SearchNode,
};
