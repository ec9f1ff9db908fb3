//! Stopping conditions of PAC search.
//!
//! Every condition stops when the incumbent is within `1 + epsilon` of the proven lower bound.
//! The statistical conditions may stop earlier, when the incumbent is likely within `1 + epsilon`
//! of the optimal cost.

mod open_based;
mod threshold;

pub use open_based::OpenBasedRule;
pub use threshold::ThresholdRule;

use super::context::PacContext;
use crate::domain::SearchDomain;
use crate::error::{ConfigError, PacError};
use crate::solvers::search_algorithms::{
    FrontierObserver, NodeOrder, SearchNode, SearchResult, StopRule,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Variant of a stopping condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// Only the proven lower bound.
    FMin,
    /// Threshold on the distribution of optimal costs.
    Trivial,
    /// Threshold on the distribution of `h*/h` at the initial state.
    RatioBased,
    /// Ratio-based threshold that also drives a bounded-cost frontier order.
    BoundedCost,
    /// Probability over the frontier nodes.
    OpenBased,
    /// Known optimal cost.
    Oracle,
}

impl FromStr for ConditionKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fmin" | "fmin-only" => Ok(Self::FMin),
            "trivial" => Ok(Self::Trivial),
            "ratio-based" | "ratio" => Ok(Self::RatioBased),
            "bounded-cost" => Ok(Self::BoundedCost),
            "open-based" | "search-aware" => Ok(Self::OpenBased),
            "oracle" => Ok(Self::Oracle),
            _ => Err(ConfigError::UnknownSelector {
                kind: "PAC condition",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FMin => "fmin",
            Self::Trivial => "trivial",
            Self::RatioBased => "ratio-based",
            Self::BoundedCost => "bounded-cost",
            Self::OpenBased => "open-based",
            Self::Oracle => "oracle",
        };

        f.write_str(name)
    }
}

/// Lifecycle of a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionState {
    Unconfigured,
    Armed,
    Satisfied(StopRule),
}

#[derive(Clone, Debug)]
enum Rule {
    FMin,
    Threshold(ThresholdRule),
    OpenBased(OpenBasedRule),
    Oracle { optimal: f64 },
}

/// Checks that epsilon is finite and non-negative and delta is in [0, 1].
pub fn validate_epsilon_delta(epsilon: f64, delta: f64) -> Result<(), ConfigError> {
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(ConfigError::InvalidEpsilon(epsilon));
    }

    if !(0.0..=1.0).contains(&delta) {
        return Err(ConfigError::InvalidDelta(delta));
    }

    Ok(())
}

/// Stopping condition guaranteeing that, with probability at least `1 - delta`,
/// the incumbent cost is at most `1 + epsilon` times the optimal cost.
///
/// # Examples
///
/// ```
/// use pac_search::prelude::*;
/// use pac_search::solvers::pac_search::{ConditionState, PacCondition};
///
/// let mut condition = PacCondition::new(ConditionKind::Oracle).with_optimal_cost(10.0);
/// # struct Unit;
/// # impl SearchDomain for Unit {
/// #     type State = ();
/// #     type Operator = ();
/// #     type Packed = ();
/// #     fn initial_state(&self) {}
/// #     fn is_goal(&self, _: &()) -> bool { true }
/// #     fn num_operators(&self, _: &()) -> usize { 0 }
/// #     fn operator(&self, _: &(), _: usize) {}
/// #     fn apply_operator(&self, _: &(), _: ()) {}
/// #     fn operator_cost(&self, _: (), _: &(), _: &()) -> f64 { 0.0 }
/// #     fn reverse_operator(&self, _: (), _: &()) -> Option<()> { None }
/// #     fn pack(&self, _: &()) {}
/// #     fn unpack(&self, _: &()) {}
/// #     fn heuristic(&self, _: &()) -> f64 { 0.0 }
/// # }
/// condition.setup(&Unit, &PacContext::new(), 0.2, 0.1).unwrap();
/// assert_eq!(condition.get_state(), ConditionState::Armed);
/// ```
#[derive(Clone, Debug)]
pub struct PacCondition {
    kind: ConditionKind,
    epsilon: f64,
    delta: f64,
    optimal_cost: Option<f64>,
    state: ConditionState,
    rule: Rule,
}

impl PacCondition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            epsilon: 0.0,
            delta: 0.0,
            optimal_cost: None,
            state: ConditionState::Unconfigured,
            rule: Rule::FMin,
        }
    }

    /// Sets the optimal cost of the instance, required by the oracle condition.
    pub fn with_optimal_cost(mut self, cost: f64) -> Self {
        self.optimal_cost = Some(cost);
        self
    }

    /// Validates the parameters and precomputes the statistics of the condition for an instance.
    pub fn setup<D: SearchDomain>(
        &mut self,
        domain: &D,
        context: &PacContext,
        epsilon: f64,
        delta: f64,
    ) -> Result<(), PacError> {
        if self.state != ConditionState::Unconfigured {
            return Err(ConfigError::AlreadyConfigured.into());
        }

        validate_epsilon_delta(epsilon, delta)?;

        let rule = match self.kind {
            ConditionKind::FMin => Rule::FMin,
            ConditionKind::Trivial => {
                let statistics = context
                    .get_statistics()
                    .ok_or(ConfigError::MissingStatistics("trivial"))?;
                let cdf = statistics.optimal_cost_cdf()?;

                Rule::Threshold(ThresholdRule::new(&cdf, epsilon, delta)?)
            }
            ConditionKind::RatioBased | ConditionKind::BoundedCost => {
                let statistics = context
                    .get_statistics()
                    .ok_or(ConfigError::MissingStatistics("ratio-based"))?;
                let initial_h = domain.heuristic(&domain.initial_state());
                let cdf = statistics.ratio_cdf()?.scaled(initial_h);

                Rule::Threshold(ThresholdRule::new(&cdf, epsilon, delta)?)
            }
            ConditionKind::OpenBased => {
                let cdfs = context
                    .get_ratio_cdfs()
                    .ok_or(ConfigError::MissingStatistics("open-based"))?;

                Rule::OpenBased(OpenBasedRule::new(Arc::clone(cdfs), epsilon, delta))
            }
            ConditionKind::Oracle => Rule::Oracle {
                optimal: self.optimal_cost.ok_or(ConfigError::MissingOptimalCost)?,
            },
        };

        self.epsilon = epsilon;
        self.delta = delta;
        self.rule = rule;
        self.state = ConditionState::Armed;

        debug!(
            condition = %self.kind,
            epsilon,
            delta,
            threshold = ?self.get_threshold(),
            "PAC condition armed"
        );

        Ok(())
    }

    /// Returns whether the best solution of the result satisfies the guarantee.
    ///
    /// Once this returns `true`, the condition is satisfied and must not be queried again.
    pub fn should_stop<O, S>(&mut self, result: &SearchResult<O, S>) -> bool {
        debug_assert!(
            !matches!(self.state, ConditionState::Satisfied(_)),
            "queried a satisfied condition"
        );

        if self.state != ConditionState::Armed {
            return false;
        }

        let Some(incumbent) = result.get_best_cost() else {
            return false;
        };
        let max_fmin = result.get_max_fmin().unwrap_or(f64::NEG_INFINITY);

        let rule = if incumbent <= max_fmin * (1.0 + self.epsilon) {
            Some(StopRule::FMin)
        } else {
            match &self.rule {
                Rule::FMin => None,
                Rule::Threshold(rule) => rule.is_satisfied(incumbent).then_some(StopRule::Threshold),
                Rule::OpenBased(rule) => rule.is_satisfied().then_some(StopRule::OpenBased),
                Rule::Oracle { optimal } => {
                    (incumbent <= optimal * (1.0 + self.epsilon)).then_some(StopRule::Oracle)
                }
            }
        };

        if let Some(rule) = rule {
            self.mark_satisfied(rule);

            true
        } else {
            false
        }
    }

    /// Recomputes the frontier statistics for a new incumbent.
    pub fn on_new_incumbent<'a, P: 'a, O: 'a>(
        &mut self,
        incumbent: f64,
        frontier: impl IntoIterator<Item = &'a SearchNode<P, O>>,
    ) {
        if self.state != ConditionState::Armed {
            return;
        }

        if let Rule::OpenBased(rule) = &mut self.rule {
            rule.reset(incumbent, frontier.into_iter().map(|node| (node.g, node.h)));
            debug!(
                incumbent,
                log_probability = rule.get_log_probability(),
                zero_count = rule.get_zero_count(),
                "Recomputed frontier probability"
            );
        }
    }

    /// Records that the search stopped because of `rule`.
    pub fn mark_satisfied(&mut self, rule: StopRule) {
        self.state = ConditionState::Satisfied(rule);
    }

    /// Returns the frontier order the condition requires, if any.
    pub fn get_node_order(&self) -> Option<NodeOrder> {
        match (self.kind, &self.rule) {
            (ConditionKind::BoundedCost, Rule::Threshold(rule)) => Some(NodeOrder::BoundedCost {
                threshold: rule.get_threshold(),
            }),
            _ => None,
        }
    }

    /// Returns whether the condition observes frontier changes.
    pub fn is_search_aware(&self) -> bool {
        self.kind == ConditionKind::OpenBased
    }

    pub fn get_kind(&self) -> ConditionKind {
        self.kind
    }

    pub fn get_state(&self) -> ConditionState {
        self.state
    }

    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn get_delta(&self) -> f64 {
        self.delta
    }

    /// Returns the cost threshold of a threshold condition.
    pub fn get_threshold(&self) -> Option<f64> {
        match &self.rule {
            Rule::Threshold(rule) => Some(rule.get_threshold()),
            _ => None,
        }
    }

    /// Returns the rule tracking the frontier of the open-based condition.
    pub fn get_open_based_rule(&self) -> Option<&OpenBasedRule> {
        match &self.rule {
            Rule::OpenBased(rule) => Some(rule),
            _ => None,
        }
    }
}

impl<P, O> FrontierObserver<P, O> for PacCondition {
    fn added_to_open(&mut self, node: &SearchNode<P, O>) {
        if let (ConditionState::Armed, Rule::OpenBased(rule)) = (self.state, &mut self.rule) {
            rule.add(node.g, node.h);
        }
    }

    fn removed_from_open(&mut self, node: &SearchNode<P, O>) {
        if let (ConditionState::Armed, Rule::OpenBased(rule)) = (self.state, &mut self.rule) {
            rule.remove(node.g, node.h);
        }
    }
}
