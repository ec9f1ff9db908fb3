use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;

/// Key of the extra holding the minimum f-value in the frontier.
pub const FMIN_KEY: &str = "fmin";
/// Key of the extra holding the best lower bound proven.
pub const MAX_FMIN_KEY: &str = "max-fmin";
/// Key of the extra naming the rule that stopped the search.
pub const SATISFIED_KEY: &str = "pac-condition-satisfied";
/// Key of the extra holding the difference between a goal's g-value and its reconstructed cost.
pub const DISCREPANCY_KEY: &str = "solution-cost-discrepancy";

/// Search parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchParameters {
    /// Whether to reinsert closed nodes into the frontier when a cheaper path is found.
    pub reopen: bool,
    /// Whether to suppress progress output.
    pub quiet: bool,
    /// Time limit in seconds.
    pub time_limit: Option<f64>,
    /// Maximum number of nodes to expand.
    pub expansion_limit: Option<usize>,
    /// Maximum number of nodes to store.
    pub node_limit: Option<usize>,
    /// Initial capacity of the closed table.
    pub initial_registry_capacity: Option<usize>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            reopen: true,
            quiet: false,
            time_limit: None,
            expansion_limit: None,
            node_limit: None,
            initial_registry_capacity: None,
        }
    }
}

/// Rule that certified the quality of the incumbent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopRule {
    /// The incumbent is within `1 + epsilon` of the proven lower bound.
    FMin,
    /// The incumbent is at most the statistical cost threshold.
    Threshold,
    /// The frontier is unlikely to contain a path invalidating the incumbent.
    OpenBased,
    /// The frontier became empty, so the incumbent is optimal.
    Optimal,
    /// The incumbent is within `1 + epsilon` of the known optimal cost.
    Oracle,
}

impl fmt::Display for StopRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FMin => "fmin",
            Self::Threshold => "threshold",
            Self::OpenBased => "open-based",
            Self::Optimal => "optimal",
            Self::Oracle => "oracle",
        };

        f.write_str(name)
    }
}

/// Reason a search phase ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchStatus {
    /// The search has not run yet.
    #[default]
    NotStarted,
    /// A solution better than the incumbent was found.
    GoalFound,
    /// The frontier became empty.
    Exhausted,
    /// A stopping condition certified the incumbent.
    Satisfied(StopRule),
    /// The time limit is reached.
    TimeLimitReached,
    /// The expansion limit is reached.
    ExpansionLimitReached,
    /// The node limit is reached or memory could not be allocated.
    ResourceExhausted,
}

impl SearchStatus {
    /// Returns whether the search cannot continue.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NotStarted | Self::GoalFound)
    }
}

/// Search statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchCounters {
    /// Number of nodes expanded.
    pub expanded: usize,
    /// Number of nodes generated.
    pub generated: usize,
    /// Number of generated nodes whose state was already registered.
    pub duplicates: usize,
    /// Number of closed nodes returned to the frontier.
    pub reopened: usize,
    /// Number of frontier nodes whose path was replaced by a cheaper one.
    pub open_updated: usize,
}

impl AddAssign for SearchCounters {
    fn add_assign(&mut self, other: Self) {
        self.expanded += other.expanded;
        self.generated += other.generated;
        self.duplicates += other.duplicates;
        self.reopened += other.reopened;
        self.open_updated += other.open_updated;
    }
}

/// Path from the initial state to a goal.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<O, S> {
    /// Operators applied from the initial state.
    pub operators: Vec<O>,
    /// States from the initial state to the goal.
    pub states: Vec<S>,
    /// Sum of the operator costs.
    pub cost: f64,
}

/// Value of an extra entry.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtraValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ExtraValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Record of one search phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    /// Incumbent cost after the phase.
    pub incumbent: Option<f64>,
    /// Best lower bound after the phase.
    pub max_fmin: f64,
    /// Cumulative number of expanded nodes.
    pub expanded: usize,
    /// Cumulative number of generated nodes.
    pub generated: usize,
    /// Cumulative elapsed time in seconds.
    pub time: f64,
}

/// Result of a search.
///
/// A result describes either a single phase or, when accumulated, a whole anytime search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<O, S> {
    /// Solutions in the order found, each strictly cheaper than the previous.
    pub solutions: Vec<Solution<O, S>>,
    pub counters: SearchCounters,
    /// Elapsed wall-clock time in seconds.
    pub time: f64,
    /// Elapsed CPU time in seconds.
    pub cpu_time: f64,
    pub status: SearchStatus,
    pub iterations: Vec<IterationRecord>,
    pub extras: BTreeMap<String, ExtraValue>,
}

impl<O, S> Default for SearchResult<O, S> {
    fn default() -> Self {
        Self {
            solutions: Vec::new(),
            counters: SearchCounters::default(),
            time: 0.0,
            cpu_time: 0.0,
            status: SearchStatus::default(),
            iterations: Vec::new(),
            extras: BTreeMap::new(),
        }
    }
}

impl<O, S> SearchResult<O, S> {
    pub fn has_solution(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// Returns the cheapest solution.
    pub fn get_best_solution(&self) -> Option<&Solution<O, S>> {
        self.solutions.last()
    }

    /// Returns the cost of the cheapest solution.
    pub fn get_best_cost(&self) -> Option<f64> {
        self.get_best_solution().map(|s| s.cost)
    }

    pub fn set_extra(&mut self, key: &str, value: ExtraValue) {
        self.extras.insert(key.to_string(), value);
    }

    pub fn get_extra(&self, key: &str) -> Option<&ExtraValue> {
        self.extras.get(key)
    }

    /// Returns a numeric extra.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.extras.get(key) {
            Some(ExtraValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns the minimum f-value in the frontier at the end of the search.
    pub fn get_fmin(&self) -> Option<f64> {
        self.get_number(FMIN_KEY)
    }

    /// Returns the best lower bound on the optimal cost proven.
    pub fn get_max_fmin(&self) -> Option<f64> {
        self.get_number(MAX_FMIN_KEY)
    }

    /// Returns the rule that certified the incumbent, if any.
    pub fn get_satisfied_by(&self) -> Option<StopRule> {
        match self.status {
            SearchStatus::Satisfied(rule) => Some(rule),
            _ => None,
        }
    }
}

/// Trait for anytime searches.
pub trait AnytimeSearch {
    type Operator;
    type State;

    /// Starts the search and runs it until the first solution or termination.
    fn start(&mut self) -> SearchResult<Self::Operator, Self::State>;

    /// Resumes the search until a strictly better solution or termination.
    fn continue_search(&mut self) -> SearchResult<Self::Operator, Self::State>;

    /// Returns the statistics accumulated over every phase.
    fn get_total_result(&self) -> &SearchResult<Self::Operator, Self::State>;

    /// Performs the search until termination and returns the accumulated result.
    fn search(&mut self) -> SearchResult<Self::Operator, Self::State>
    where
        Self::Operator: Clone,
        Self::State: Clone,
    {
        let mut result = self.start();

        while result.status == SearchStatus::GoalFound {
            result = self.continue_search();
        }

        self.get_total_result().clone()
    }
}
