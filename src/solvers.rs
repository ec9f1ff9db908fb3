pub mod pac_search;
pub mod search_algorithms;

pub use pac_search::{
    AnytimeAlgorithm, ConditionKind, PacCondition, PacConfig, PacContext, PacSearchFramework,
};
pub use search_algorithms::{
    AnytimeSearch, AnytimeSearchEngine, NodeOrder, SearchParameters, SearchResult, SearchStatus,
    Solution, StopRule,
};

use crate::domain::SearchDomain;

/// Creates an anytime search with the frontier order of the algorithm.
///
/// Anytime A* orders nodes by f-value.
/// Anytime potential search orders nodes by `(U - g) / h`, where `U` is the incumbent cost,
/// and by h-value until the first solution is found.
///
/// # Examples
///
/// ```
/// use pac_search::prelude::*;
/// use pac_search::solvers;
///
/// // Unit-cost grid walk from (0, 0) to (2, 1).
/// struct Grid;
///
/// impl SearchDomain for Grid {
///     type State = (i32, i32);
///     type Operator = (i32, i32);
///     type Packed = (i32, i32);
///
///     fn initial_state(&self) -> Self::State {
///         (0, 0)
///     }
///
///     fn is_goal(&self, state: &Self::State) -> bool {
///         *state == (2, 1)
///     }
///
///     fn num_operators(&self, _: &Self::State) -> usize {
///         4
///     }
///
///     fn operator(&self, _: &Self::State, index: usize) -> Self::Operator {
///         [(1, 0), (-1, 0), (0, 1), (0, -1)][index]
///     }
///
///     fn apply_operator(&self, state: &Self::State, op: Self::Operator) -> Self::State {
///         (state.0 + op.0, state.1 + op.1)
///     }
///
///     fn operator_cost(&self, _: Self::Operator, _: &Self::State, _: &Self::State) -> f64 {
///         1.0
///     }
///
///     fn reverse_operator(&self, op: Self::Operator, _: &Self::State) -> Option<Self::Operator> {
///         Some((-op.0, -op.1))
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
///         f64::from((2 - state.0).abs() + (1 - state.1).abs())
///     }
/// }
///
/// let parameters = SearchParameters {
///     quiet: true,
///     ..Default::default()
/// };
/// let mut solver = solvers::create_anytime_search(Grid, parameters, AnytimeAlgorithm::AStar);
/// let result = solver.search();
/// assert_eq!(result.get_best_cost(), Some(3.0));
/// assert_eq!(result.status, SearchStatus::Exhausted);
/// assert_eq!(result.get_max_fmin(), Some(3.0));
/// ```
pub fn create_anytime_search<D>(
    domain: D,
    parameters: SearchParameters,
    algorithm: AnytimeAlgorithm,
) -> impl AnytimeSearch<Operator = D::Operator, State = D::State>
where
    D: SearchDomain,
    D::State: Clone,
{
    AnytimeSearchEngine::new(domain, parameters).with_order(algorithm.node_order())
}
