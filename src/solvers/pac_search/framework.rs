use super::conditions::{validate_epsilon_delta, ConditionKind, ConditionState, PacCondition};
use super::context::PacContext;
use crate::domain::SearchDomain;
use crate::error::{ConfigError, PacError};
use crate::solvers::search_algorithms::{
    AnytimeSearchEngine, ExtraValue, NodeOrder, SearchParameters, SearchResult, SearchStatus,
    StopRule, SATISFIED_KEY,
};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Key of the extra holding the cost threshold of a threshold condition.
pub const THRESHOLD_KEY: &str = "pac-threshold";

/// Anytime search driven by the framework.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnytimeAlgorithm {
    /// Anytime potential search.
    #[default]
    Potential,
    /// Anytime A*.
    AStar,
}

impl AnytimeAlgorithm {
    /// Returns the frontier order of the algorithm.
    pub fn node_order(self) -> NodeOrder {
        match self {
            Self::Potential => NodeOrder::Potential,
            Self::AStar => NodeOrder::AStar,
        }
    }
}

impl FromStr for AnytimeAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apts" | "anytime-pts" | "potential" => Ok(Self::Potential),
            "astar" | "a*" | "anytime-astar" => Ok(Self::AStar),
            _ => Err(ConfigError::UnknownSelector {
                kind: "anytime search",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AnytimeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Potential => f.write_str("anytime-pts"),
            Self::AStar => f.write_str("anytime-astar"),
        }
    }
}

/// Anytime search that stops once a PAC condition certifies the incumbent.
///
/// The framework runs the anytime search until its first solution and then continues it
/// until the condition is satisfied or no better solution exists.
/// A framework holds no per-instance state, so it can search many instances.
///
/// # Examples
///
/// ```
/// use pac_search::prelude::*;
///
/// # struct Line;
/// # impl SearchDomain for Line {
/// #     type State = i32;
/// #     type Operator = i32;
/// #     type Packed = i32;
/// #     fn initial_state(&self) -> i32 { 3 }
/// #     fn is_goal(&self, state: &i32) -> bool { *state == 0 }
/// #     fn num_operators(&self, _: &i32) -> usize { 1 }
/// #     fn operator(&self, _: &i32, _: usize) -> i32 { -1 }
/// #     fn apply_operator(&self, state: &i32, op: i32) -> i32 { state + op }
/// #     fn operator_cost(&self, _: i32, _: &i32, _: &i32) -> f64 { 1.0 }
/// #     fn reverse_operator(&self, _: i32, _: &i32) -> Option<i32> { None }
/// #     fn pack(&self, state: &i32) -> i32 { *state }
/// #     fn unpack(&self, packed: &i32) -> i32 { *packed }
/// #     fn heuristic(&self, state: &i32) -> f64 { f64::from(*state) }
/// # }
/// let framework = PacSearchFramework::new(
///     0.1,
///     0.05,
///     AnytimeAlgorithm::Potential,
///     ConditionKind::FMin,
/// )
/// .unwrap();
/// let result = framework.search(Line, &PacContext::new()).unwrap();
/// assert_eq!(result.get_best_cost(), Some(3.0));
/// assert_eq!(result.get_satisfied_by(), Some(StopRule::FMin));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PacSearchFramework {
    epsilon: f64,
    delta: f64,
    algorithm: AnytimeAlgorithm,
    condition: ConditionKind,
    parameters: SearchParameters,
    optimal_cost: Option<f64>,
}

impl PacSearchFramework {
    pub fn new(
        epsilon: f64,
        delta: f64,
        algorithm: AnytimeAlgorithm,
        condition: ConditionKind,
    ) -> Result<Self, ConfigError> {
        validate_epsilon_delta(epsilon, delta)?;

        Ok(Self {
            epsilon,
            delta,
            algorithm,
            condition,
            parameters: SearchParameters::default(),
            optimal_cost: None,
        })
    }

    pub fn with_parameters(mut self, parameters: SearchParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the known optimal cost, used by the oracle condition.
    pub fn with_optimal_cost(mut self, cost: f64) -> Self {
        self.optimal_cost = Some(cost);
        self
    }

    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn get_delta(&self) -> f64 {
        self.delta
    }

    pub fn get_algorithm(&self) -> AnytimeAlgorithm {
        self.algorithm
    }

    pub fn get_condition(&self) -> ConditionKind {
        self.condition
    }

    pub fn get_parameters(&self) -> &SearchParameters {
        &self.parameters
    }

    /// Returns a name identifying the algorithm and the condition.
    pub fn name(&self) -> String {
        format!("{}+{}", self.algorithm, self.condition)
    }

    /// Searches an instance until the condition is satisfied or the search terminates.
    ///
    /// Returns the result accumulated over every phase of the anytime search.
    /// If a rule certified the incumbent, the status is `Satisfied` with that rule,
    /// which is also recorded in the extras.
    pub fn search<D>(
        &self,
        domain: D,
        context: &PacContext,
    ) -> Result<SearchResult<D::Operator, D::State>, PacError>
    where
        D: SearchDomain,
        D::State: Clone,
    {
        let mut condition = PacCondition::new(self.condition);

        if let Some(cost) = self.optimal_cost {
            condition = condition.with_optimal_cost(cost);
        }

        condition.setup(&domain, context, self.epsilon, self.delta)?;

        let order = condition
            .get_node_order()
            .unwrap_or_else(|| self.algorithm.node_order());
        debug!(name = %self.name(), ?order, "Starting PAC search");
        let mut engine = AnytimeSearchEngine::new(domain, self.parameters.clone())
            .with_order(order)
            .with_pac_epsilon(self.epsilon);

        let mut result = engine.start_with(&mut condition);

        loop {
            match result.status {
                SearchStatus::GoalFound => {}
                SearchStatus::Satisfied(rule) => {
                    condition.mark_satisfied(rule);
                    break;
                }
                SearchStatus::Exhausted => {
                    if engine.is_proven_optimal() {
                        condition.mark_satisfied(StopRule::Optimal);
                    } else if engine
                        .get_incumbent()
                        .is_some_and(|cost| cost <= engine.get_max_fmin() * (1.0 + self.epsilon))
                    {
                        condition.mark_satisfied(StopRule::FMin);
                    }

                    break;
                }
                _ => break,
            }

            if condition.is_search_aware() {
                if let Some(incumbent) = engine.get_incumbent() {
                    condition.on_new_incumbent(incumbent, engine.frontier_nodes());
                }
            }

            if condition.should_stop(&result) {
                break;
            }

            result = engine.continue_with(&mut condition);
        }

        let mut total = engine.into_total_result();

        if let Some(threshold) = condition.get_threshold() {
            total.set_extra(THRESHOLD_KEY, ExtraValue::Number(threshold));
        }

        if let ConditionState::Satisfied(rule) = condition.get_state() {
            total.status = SearchStatus::Satisfied(rule);
            total.set_extra(SATISFIED_KEY, ExtraValue::Text(rule.to_string()));

            let quiet = self.parameters.quiet;
            let cost = total.get_best_cost().unwrap_or(f64::INFINITY);
            let max_fmin = total.get_max_fmin().unwrap_or(f64::NEG_INFINITY);

            if quiet {
                debug!(%rule, cost, max_fmin, "PAC condition satisfied");
            } else {
                info!(%rule, cost, max_fmin, "PAC condition satisfied");
            }
        }

        Ok(total)
    }
}
