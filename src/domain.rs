use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state-space search problems.
///
/// A domain enumerates the operators applicable in a state, applies them,
/// and evaluates heuristic estimates.
/// States are stored in the search tables as packed fingerprints,
/// so two states with equal fingerprints are treated as the same state.
///
/// Operator costs must be non-negative.
/// The heuristic must be admissible for the lower bound reported by the search to be valid.
///
/// # Examples
///
/// ```
/// use pac_search::prelude::*;
///
/// // Walk from `start` to 0 on a line, paying 1 per step.
/// struct Line {
///     start: i32,
/// }
///
/// impl SearchDomain for Line {
///     type State = i32;
///     type Operator = i32;
///     type Packed = i32;
///
///     fn initial_state(&self) -> Self::State {
///         self.start
///     }
///
///     fn is_goal(&self, state: &Self::State) -> bool {
///         *state == 0
///     }
///
///     fn num_operators(&self, _: &Self::State) -> usize {
///         2
///     }
///
///     fn operator(&self, _: &Self::State, index: usize) -> Self::Operator {
///         if index == 0 { -1 } else { 1 }
///     }
///
///     fn apply_operator(&self, state: &Self::State, op: Self::Operator) -> Self::State {
///         state + op
///     }
///
///     fn operator_cost(&self, _: Self::Operator, _: &Self::State, _: &Self::State) -> f64 {
///         1.0
///     }
///
///     fn reverse_operator(&self, op: Self::Operator, _: &Self::State) -> Option<Self::Operator> {
///         Some(-op)
///     }
///
///     fn pack(&self, state: &Self::State) -> Self::Packed {
///         *state
///     }
///
///     fn unpack(&self, packed: &Self::Packed) -> Self::State {
///         *packed
///     }
///
///     fn heuristic(&self, state: &Self::State) -> f64 {
///         f64::from(state.abs())
///     }
/// }
///
/// let mut search = AnytimeSearchEngine::new(Line { start: 4 }, SearchParameters::default());
/// let result = search.search();
/// let solution = result.get_best_solution().unwrap();
/// assert_eq!(solution.cost, 4.0);
/// assert_eq!(solution.operators, vec![-1, -1, -1, -1]);
/// assert_eq!(solution.states, vec![4, 3, 2, 1, 0]);
/// ```
pub trait SearchDomain {
    /// Type of the state.
    type State;
    /// Type of the operator.
    type Operator: Copy + PartialEq + Debug;
    /// Type of the packed fingerprint of a state.
    type Packed: Hash + Eq + Clone;

    /// Returns the initial state.
    fn initial_state(&self) -> Self::State;

    /// Returns whether the state is a goal.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Returns the number of operators applicable in the state.
    fn num_operators(&self, state: &Self::State) -> usize;

    /// Returns the `index`-th operator applicable in the state.
    fn operator(&self, state: &Self::State, index: usize) -> Self::Operator;

    /// Applies the operator and returns the successor state.
    fn apply_operator(&self, state: &Self::State, op: Self::Operator) -> Self::State;

    /// Returns the cost of reaching `state` from `parent` with the operator.
    fn operator_cost(&self, op: Self::Operator, state: &Self::State, parent: &Self::State) -> f64;

    /// Returns the operator undoing `op`, which was applied to `parent`.
    ///
    /// The search does not apply the reverse of the incoming operator when expanding a node.
    fn reverse_operator(&self, op: Self::Operator, parent: &Self::State) -> Option<Self::Operator>;

    /// Packs the state into a fingerprint.
    fn pack(&self, state: &Self::State) -> Self::Packed;

    /// Restores a state from its fingerprint.
    fn unpack(&self, packed: &Self::Packed) -> Self::State;

    /// Returns a lower bound on the cost from the state to a goal.
    fn heuristic(&self, state: &Self::State) -> f64;

    /// Returns an estimate of the number of operators from the state to a goal.
    fn distance_estimate(&self, state: &Self::State) -> f64 {
        self.heuristic(state)
    }
}
