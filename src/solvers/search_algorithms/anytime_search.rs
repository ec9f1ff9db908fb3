use super::f_bound_tracker::FBoundTracker;
use super::priority_frontier::PriorityFrontier;
use super::search::{
    AnytimeSearch, ExtraValue, IterationRecord, SearchParameters, SearchResult, SearchStatus,
    Solution, StopRule, DISCREPANCY_KEY, FMIN_KEY, MAX_FMIN_KEY,
};
use super::search_nodes::{
    ArenaFull, ClosedTable, FrontierKey, NodeArena, NodeId, NodeOrder, SearchNode,
};
use crate::domain::SearchDomain;
use crate::timer::Timer;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

const COST_TOLERANCE: f64 = 1e-9;

macro_rules! progress {
    ($quiet:expr, $($arg:tt)+) => {
        if $quiet {
            debug!($($arg)+)
        } else {
            info!($($arg)+)
        }
    };
}

/// Receiver of frontier insertions and removals.
pub trait FrontierObserver<P, O> {
    /// Called after a node enters the frontier or its path in the frontier changes.
    fn added_to_open(&mut self, node: &SearchNode<P, O>) {
        let _ = node;
    }

    /// Called after a node leaves the frontier or before its path in the frontier changes.
    fn removed_from_open(&mut self, node: &SearchNode<P, O>) {
        let _ = node;
    }
}

impl<P, O> FrontierObserver<P, O> for () {}

/// Lifecycle of an anytime search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Searching,
    /// The last phase found a better solution, so the search can continue.
    GoalFound,
    /// The frontier is empty.
    Exhausted,
    /// A budget, a resource limit, or a stopping rule ended the search.
    Stopped,
}

/// Anytime best-first search.
///
/// The search returns as soon as a goal is found and can be continued to find strictly
/// better solutions, while maintaining a lower bound on the optimal cost (`max_fmin`).
/// Nodes whose f-value is not smaller than the incumbent cost are pruned.
pub struct AnytimeSearchEngine<D: SearchDomain> {
    domain: D,
    parameters: SearchParameters,
    initial_order: NodeOrder,
    order: NodeOrder,
    pac_epsilon: Option<f64>,
    arena: NodeArena<D::Packed, D::Operator>,
    frontier: PriorityFrontier,
    closed: ClosedTable<D::Packed>,
    tracker: FBoundTracker,
    incumbent: f64,
    phase: EnginePhase,
    total: SearchResult<D::Operator, D::State>,
    timer: Timer,
}

impl<D> AnytimeSearchEngine<D>
where
    D: SearchDomain,
    D::State: Clone,
{
    /// Creates a new anytime search ordering nodes by potential.
    pub fn new(domain: D, parameters: SearchParameters) -> Self {
        let closed = parameters
            .initial_registry_capacity
            .map(ClosedTable::with_capacity)
            .unwrap_or_default();
        let arena = NodeArena::with_node_limit(parameters.node_limit);
        Self {
            domain,
            parameters,
            initial_order: NodeOrder::Potential,
            order: NodeOrder::Potential,
            pac_epsilon: None,
            arena,
            frontier: PriorityFrontier::default(),
            closed,
            tracker: FBoundTracker::default(),
            incumbent: f64::INFINITY,
            phase: EnginePhase::Idle,
            total: SearchResult::default(),
            timer: Timer::default(),
        }
    }

    /// Sets the order of the frontier.
    pub fn with_order(mut self, order: NodeOrder) -> Self {
        self.initial_order = order;
        self.order = order;
        self
    }

    /// Stops the search as soon as the incumbent is within `1 + epsilon` of the lower bound.
    ///
    /// The same factor raises the threshold of a bounded-cost order.
    pub fn with_pac_epsilon(mut self, epsilon: f64) -> Self {
        self.pac_epsilon = Some(epsilon);
        self
    }

    /// Starts the search from the initial state, notifying `observer` of frontier changes.
    pub fn start_with<B>(&mut self, observer: &mut B) -> SearchResult<D::Operator, D::State>
    where
        B: FrontierObserver<D::Packed, D::Operator> + ?Sized,
    {
        self.reset();
        self.timer.start();

        let mut result = SearchResult::default();
        let state = self.domain.initial_state();
        let h = self.domain.heuristic(&state);
        let d = self.domain.distance_estimate(&state);
        let packed = self.domain.pack(&state);

        let root = match self.arena.push(SearchNode::root(h, d, packed.clone())) {
            Ok(root) => root,
            Err(error) => return self.finish_phase(result, Self::exhausted_resources(error)),
        };

        if self.domain.is_goal(&state) {
            self.tracker.close(0.0);
            self.register_goal(root, &mut result);

            return self.finish_phase(result, SearchStatus::GoalFound);
        }

        let key = self.key_of(root);
        let stored = self
            .closed
            .insert(packed, root)
            .and_then(|_| self.frontier.push(&mut self.arena, root, key));

        if let Err(error) = stored {
            return self.finish_phase(result, Self::exhausted_resources(error));
        }

        self.tracker.reset(h);
        observer.added_to_open(&self.arena[root]);
        self.phase = EnginePhase::Searching;

        let status = self.run(&mut result, observer);

        self.finish_phase(result, status)
    }

    /// Resumes the search to find a solution strictly better than the incumbent.
    ///
    /// Returns a result without a solution if the search cannot continue.
    pub fn continue_with<B>(&mut self, observer: &mut B) -> SearchResult<D::Operator, D::State>
    where
        B: FrontierObserver<D::Packed, D::Operator> + ?Sized,
    {
        match self.phase {
            EnginePhase::GoalFound => {}
            EnginePhase::Idle | EnginePhase::Searching => return SearchResult::default(),
            EnginePhase::Exhausted | EnginePhase::Stopped => {
                return SearchResult {
                    status: self.total.status,
                    ..Default::default()
                };
            }
        }

        self.timer.start();
        self.phase = EnginePhase::Searching;

        let mut result = SearchResult::default();
        let status = self.run(&mut result, observer);

        self.finish_phase(result, status)
    }

    fn reset(&mut self) {
        self.frontier.clear(&mut self.arena);
        self.arena.clear();
        self.closed.clear();
        self.tracker = FBoundTracker::default();
        self.order = self.initial_order;
        self.incumbent = f64::INFINITY;
        self.total = SearchResult::default();
        self.timer = self
            .parameters
            .time_limit
            .map(Timer::with_time_limit)
            .unwrap_or_default();
    }

    fn run<B>(&mut self, result: &mut SearchResult<D::Operator, D::State>, observer: &mut B) -> SearchStatus
    where
        B: FrontierObserver<D::Packed, D::Operator> + ?Sized,
    {
        loop {
            if self.timer.check_time_limit() {
                return SearchStatus::TimeLimitReached;
            }

            if self
                .parameters
                .expansion_limit
                .is_some_and(|limit| self.total.counters.expanded + result.counters.expanded >= limit)
            {
                return SearchStatus::ExpansionLimitReached;
            }

            let Some(id) = self.frontier.pop(&mut self.arena) else {
                return SearchStatus::Exhausted;
            };

            let f = self.arena[id].f();
            self.tracker.remove(f);
            observer.removed_from_open(&self.arena[id]);

            let goal = if f < self.incumbent {
                match self.expand(id, result, observer) {
                    Ok(goal) => goal,
                    Err(error) => return Self::exhausted_resources(error),
                }
            } else {
                None
            };

            if let Some(goal) = goal {
                self.register_goal(goal, result);
            }

            if self.tracker.refresh(self.incumbent) {
                self.notify_dual_bound(result);

                if self.is_fmin_satisfied() {
                    return SearchStatus::Satisfied(StopRule::FMin);
                }
            }

            if goal.is_some() {
                return SearchStatus::GoalFound;
            }
        }
    }

    /// Expands a node and returns the cheapest goal among its children, if any.
    fn expand<B>(
        &mut self,
        id: NodeId,
        result: &mut SearchResult<D::Operator, D::State>,
        observer: &mut B,
    ) -> Result<Option<NodeId>, ArenaFull>
    where
        B: FrontierObserver<D::Packed, D::Operator> + ?Sized,
    {
        let node = &self.arena[id];
        let g = node.g;
        let incoming_reverse = node.reverse_op;
        let state = self.domain.unpack(&node.packed);
        let operators = (0..self.domain.num_operators(&state))
            .map(|i| self.domain.operator(&state, i))
            .filter(|op| incoming_reverse != Some(*op))
            .collect::<SmallVec<[_; 16]>>();
        let mut best_goal: Option<NodeId> = None;

        for op in operators {
            result.counters.generated += 1;

            let successor = self.domain.apply_operator(&state, op);
            let successor_g = g + self.domain.operator_cost(op, &successor, &state);
            let successor_h = self.domain.heuristic(&successor);

            if successor_g + successor_h >= self.incumbent {
                continue;
            }

            let reverse_op = self.domain.reverse_operator(op, &state);

            if self.domain.is_goal(&successor) {
                if best_goal.is_none_or(|goal| successor_g < self.arena[goal].g) {
                    let node = SearchNode::child(
                        successor_g,
                        successor_h,
                        self.domain.distance_estimate(&successor),
                        self.domain.pack(&successor),
                        op,
                        reverse_op,
                        id,
                    );
                    best_goal = Some(self.arena.push(node)?);
                }

                continue;
            }

            let packed = self.domain.pack(&successor);

            if let Some(duplicate) = self.closed.get(&packed) {
                result.counters.duplicates += 1;

                if self.arena[duplicate].g <= successor_g {
                    continue;
                }

                let in_frontier = self.frontier.contains(&self.arena, duplicate);
                let old_f = self.arena[duplicate].f();

                if in_frontier {
                    observer.removed_from_open(&self.arena[duplicate]);
                }

                self.arena[duplicate].splice(successor_g, op, reverse_op, id);
                let new_f = self.arena[duplicate].f();

                if in_frontier {
                    result.counters.open_updated += 1;
                    let key = self.key_of(duplicate);
                    self.frontier.update(&mut self.arena, duplicate, key);
                    self.tracker.add(new_f);
                    self.tracker.remove(old_f);
                    observer.added_to_open(&self.arena[duplicate]);
                } else if self.parameters.reopen {
                    result.counters.reopened += 1;
                    let key = self.key_of(duplicate);
                    self.frontier.push(&mut self.arena, duplicate, key)?;
                    self.tracker.add(new_f);
                    observer.added_to_open(&self.arena[duplicate]);
                } else {
                    // Parked nodes still bound the optimal cost from below.
                    if self.closed.is_inconsistent(&packed) {
                        self.tracker.remove(old_f);
                    }

                    self.tracker.add(new_f);
                    self.closed.mark_inconsistent(packed, duplicate)?;
                }

                continue;
            }

            let node = SearchNode::child(
                successor_g,
                successor_h,
                self.domain.distance_estimate(&successor),
                packed.clone(),
                op,
                reverse_op,
                id,
            );
            let child = self.arena.push(node)?;
            self.closed.insert(packed, child)?;
            let key = self.key_of(child);
            self.frontier.push(&mut self.arena, child, key)?;
            self.tracker.add(successor_g + successor_h);
            observer.added_to_open(&self.arena[child]);
        }

        result.counters.expanded += 1;

        Ok(best_goal)
    }

    fn register_goal(&mut self, goal: NodeId, result: &mut SearchResult<D::Operator, D::State>) {
        let solution = self.construct_solution(goal, result);

        if solution.cost >= self.incumbent {
            debug!(cost = solution.cost, incumbent = self.incumbent, "Goal does not improve the incumbent");

            return;
        }

        self.incumbent = solution.cost;

        progress!(
            self.parameters.quiet,
            "New primal bound: {cost}, expanded: {expanded}, generated: {generated}, elapsed time: {time}s.",
            cost = solution.cost,
            expanded = self.total.counters.expanded + result.counters.expanded,
            generated = self.total.counters.generated + result.counters.generated,
            time = self.timer.get_elapsed_time()
        );

        result.solutions.push(solution);

        if self.order.depends_on_incumbent() {
            self.rerank();
        }
    }

    /// Builds the path to a goal, summing the operator costs along the parent links.
    fn construct_solution(
        &self,
        goal: NodeId,
        result: &mut SearchResult<D::Operator, D::State>,
    ) -> Solution<D::Operator, D::State> {
        let path = self.arena.get_path(goal);
        let states = path
            .iter()
            .map(|id| self.domain.unpack(&self.arena[*id].packed))
            .collect::<Vec<_>>();
        let mut operators = Vec::with_capacity(path.len().saturating_sub(1));
        let mut cost = 0.0;

        for (i, id) in path.iter().enumerate().skip(1) {
            if let Some(op) = self.arena[*id].op {
                cost += self.domain.operator_cost(op, &states[i], &states[i - 1]);
                operators.push(op);
            }
        }

        let g = self.arena[goal].g;

        if (g - cost).abs() > COST_TOLERANCE * g.abs().max(1.0) {
            if cost > g {
                warn!(g, cost, "Reconstructed solution cost exceeds the g-value of the goal");
            } else {
                debug!(g, cost, "Goal was reached through an outdated path cost");
            }

            result.set_extra(DISCREPANCY_KEY, ExtraValue::Number(g - cost));
        }

        Solution {
            operators,
            states,
            cost,
        }
    }

    fn notify_dual_bound(&mut self, result: &SearchResult<D::Operator, D::State>) {
        let max_fmin = self.tracker.get_max_fmin();

        progress!(
            self.parameters.quiet,
            "New dual bound: {max_fmin}, expanded: {expanded}, generated: {generated}, elapsed time: {time}s.",
            expanded = self.total.counters.expanded + result.counters.expanded,
            generated = self.total.counters.generated + result.counters.generated,
            time = self.timer.get_elapsed_time()
        );

        if let NodeOrder::BoundedCost { threshold } = self.order {
            let raised = max_fmin * (1.0 + self.pac_epsilon.unwrap_or(0.0));

            if raised > threshold {
                debug!(threshold, raised, "Raising the cost threshold of the frontier order");
                self.order = NodeOrder::BoundedCost { threshold: raised };
                self.rerank();
            }
        }
    }

    fn is_fmin_satisfied(&self) -> bool {
        self.pac_epsilon.is_some_and(|epsilon| {
            self.incumbent.is_finite()
                && self.incumbent <= self.tracker.get_max_fmin() * (1.0 + epsilon)
        })
    }

    fn key_of(&self, id: NodeId) -> FrontierKey {
        let node = &self.arena[id];

        self.order.key(node.g, node.h, id, self.incumbent)
    }

    fn rerank(&mut self) {
        let order = self.order;
        let incumbent = self.incumbent;

        self.frontier.rebuild(&mut self.arena, |arena, id| {
            order.key(arena[id].g, arena[id].h, id, incumbent)
        });
    }

    fn exhausted_resources(error: ArenaFull) -> SearchStatus {
        warn!(?error, "Search ran out of node storage");

        SearchStatus::ResourceExhausted
    }

    fn finish_phase(
        &mut self,
        mut result: SearchResult<D::Operator, D::State>,
        status: SearchStatus,
    ) -> SearchResult<D::Operator, D::State> {
        let quiet = self.parameters.quiet;

        match status {
            SearchStatus::Exhausted => {
                if self.tracker.refresh(self.incumbent) {
                    self.notify_dual_bound(&result);
                }

                if self.is_proven_optimal() {
                    progress!(quiet, "Optimal solution found.");
                } else if self.incumbent.is_finite() {
                    progress!(quiet, "Frontier exhausted with unexpanded cheaper paths.");
                } else {
                    progress!(quiet, "Proved infeasible.");
                }
            }
            SearchStatus::TimeLimitReached => progress!(quiet, "Time limit reached."),
            SearchStatus::ExpansionLimitReached => progress!(quiet, "Expansion limit reached."),
            _ => {}
        }

        self.phase = match status {
            SearchStatus::GoalFound => EnginePhase::GoalFound,
            SearchStatus::Exhausted => EnginePhase::Exhausted,
            _ => EnginePhase::Stopped,
        };

        result.status = status;
        result.time = self.timer.get_elapsed_time();
        result.cpu_time = self.timer.get_cpu_time();
        result.set_extra(FMIN_KEY, ExtraValue::Number(self.tracker.get_fmin()));
        result.set_extra(MAX_FMIN_KEY, ExtraValue::Number(self.tracker.get_max_fmin()));

        self.total.counters += result.counters;
        self.total.solutions.extend(result.solutions.iter().cloned());
        self.total.time = result.time;
        self.total.cpu_time = result.cpu_time;
        self.total.status = status;
        self.total.extras.extend(result.extras.clone());

        let record = IterationRecord {
            iteration: self.total.iterations.len(),
            incumbent: self.get_incumbent(),
            max_fmin: self.tracker.get_max_fmin(),
            expanded: self.total.counters.expanded,
            generated: self.total.counters.generated,
            time: result.time,
        };
        self.total.iterations.push(record);
        result.iterations.push(record);

        self.timer.stop();

        result
    }

    /// Returns the domain.
    pub fn get_domain(&self) -> &D {
        &self.domain
    }

    pub fn get_parameters(&self) -> &SearchParameters {
        &self.parameters
    }

    /// Returns the current order of the frontier.
    pub fn get_order(&self) -> NodeOrder {
        self.order
    }

    pub fn get_phase(&self) -> EnginePhase {
        self.phase
    }

    /// Returns the cost of the best solution found.
    pub fn get_incumbent(&self) -> Option<f64> {
        self.incumbent.is_finite().then_some(self.incumbent)
    }

    /// Returns whether the incumbent is known to be optimal.
    ///
    /// An empty frontier proves optimality only if no parked inconsistent node
    /// could still lead to a cheaper solution.
    pub fn is_proven_optimal(&self) -> bool {
        self.incumbent.is_finite()
            && self.frontier.is_empty()
            && (self.closed.inconsistent_len() == 0
                || self.incumbent <= self.tracker.get_max_fmin())
    }

    /// Returns the smallest f-value among the frontier and the parked inconsistent nodes.
    pub fn get_fmin(&self) -> f64 {
        self.tracker.get_fmin()
    }

    /// Returns the best lower bound on the optimal cost proven so far.
    pub fn get_max_fmin(&self) -> f64 {
        self.tracker.get_max_fmin()
    }

    /// Iterates over the nodes in the frontier.
    pub fn frontier_nodes(&self) -> impl Iterator<Item = &SearchNode<D::Packed, D::Operator>> + '_ {
        self.frontier.iter().map(|id| &self.arena[id])
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Returns the number of registered states.
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Returns the number of closed nodes with a cheaper path that were not reopened.
    pub fn inconsistent_len(&self) -> usize {
        self.closed.inconsistent_len()
    }

    /// Returns the node registered for a state.
    pub fn get_node(&self, state: &D::State) -> Option<&SearchNode<D::Packed, D::Operator>> {
        self.closed
            .get(&self.domain.pack(state))
            .map(|id| &self.arena[id])
    }

    /// Returns the statistics accumulated over every phase.
    pub fn into_total_result(self) -> SearchResult<D::Operator, D::State> {
        self.total
    }
}

impl<D> AnytimeSearch for AnytimeSearchEngine<D>
where
    D: SearchDomain,
    D::State: Clone,
{
    type Operator = D::Operator;
    type State = D::State;

    fn start(&mut self) -> SearchResult<D::Operator, D::State> {
        self.start_with(&mut ())
    }

    fn continue_search(&mut self) -> SearchResult<D::Operator, D::State> {
        self.continue_with(&mut ())
    }

    fn get_total_result(&self) -> &SearchResult<D::Operator, D::State> {
        &self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tests::GraphDomain;

    #[derive(Default)]
    struct CountingObserver {
        added: usize,
        removed: usize,
    }

    impl FrontierObserver<usize, usize> for CountingObserver {
        fn added_to_open(&mut self, _: &SearchNode<usize, usize>) {
            self.added += 1;
        }

        fn removed_from_open(&mut self, _: &SearchNode<usize, usize>) {
            self.removed += 1;
        }
    }

    fn quiet() -> SearchParameters {
        SearchParameters {
            quiet: true,
            ..Default::default()
        }
    }

    fn two_routes() -> GraphDomain {
        GraphDomain::new(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)], &[2])
    }

    #[test]
    fn test_anytime_improvement() {
        let mut search = AnytimeSearchEngine::new(two_routes(), quiet()).with_order(NodeOrder::AStar);

        let first = search.start();
        assert_eq!(first.status, SearchStatus::GoalFound);
        assert_eq!(first.get_best_cost(), Some(5.0));
        assert_eq!(first.get_best_solution().unwrap().states, vec![0, 2]);
        assert_eq!(search.get_incumbent(), Some(5.0));
        assert_eq!(search.get_phase(), EnginePhase::GoalFound);

        let second = search.continue_search();
        assert_eq!(second.status, SearchStatus::GoalFound);
        assert_eq!(second.get_best_cost(), Some(2.0));
        assert_eq!(second.get_best_solution().unwrap().operators, vec![1, 2]);

        let third = search.continue_search();
        assert_eq!(third.status, SearchStatus::Exhausted);
        assert!(!third.has_solution());
        assert_eq!(third.get_max_fmin(), Some(2.0));

        let total = search.get_total_result();
        assert_eq!(total.solutions.len(), 2);
        assert_eq!(total.iterations.len(), 3);
        assert_eq!(total.counters.expanded, 2);
        assert_eq!(total.counters.generated, 3);
        assert_eq!(search.get_phase(), EnginePhase::Exhausted);
    }

    #[test]
    fn test_search_until_termination() {
        let mut search = AnytimeSearchEngine::new(two_routes(), quiet());
        let result = search.search();
        assert_eq!(result.status, SearchStatus::Exhausted);
        assert_eq!(result.get_best_cost(), Some(2.0));
        assert_eq!(result.get_max_fmin(), Some(2.0));
    }

    #[test]
    fn test_continue_after_termination() {
        let mut search = AnytimeSearchEngine::new(two_routes(), quiet());
        search.search();
        let result = search.continue_search();
        assert!(!result.has_solution());
        assert_eq!(result.status, SearchStatus::Exhausted);
    }

    #[test]
    fn test_continue_before_start() {
        let mut search = AnytimeSearchEngine::new(two_routes(), quiet());
        let result = search.continue_search();
        assert!(!result.has_solution());
        assert_eq!(result.status, SearchStatus::NotStarted);
    }

    #[test]
    fn test_cheapest_sibling_goal() {
        let domain = GraphDomain::new(3, &[(0, 1, 4.0), (0, 2, 2.0)], &[1, 2]);
        let mut search = AnytimeSearchEngine::new(domain, quiet()).with_order(NodeOrder::AStar);
        let result = search.start();
        assert_eq!(result.solutions.len(), 1);
        assert_eq!(result.get_best_cost(), Some(2.0));
        assert_eq!(result.counters.generated, 2);
    }

    #[test]
    fn test_initial_state_is_goal() {
        let domain = GraphDomain::new(2, &[(0, 1, 1.0)], &[0]);
        let mut search = AnytimeSearchEngine::new(domain, quiet());
        let result = search.start();
        assert_eq!(result.status, SearchStatus::GoalFound);
        let solution = result.get_best_solution().unwrap();
        assert_eq!(solution.cost, 0.0);
        assert_eq!(solution.states, vec![0]);
        assert!(solution.operators.is_empty());
        assert_eq!(result.get_max_fmin(), Some(0.0));
        assert_eq!(result.counters.expanded, 0);

        let next = search.continue_search();
        assert_eq!(next.status, SearchStatus::Exhausted);
        assert_eq!(search.get_max_fmin(), 0.0);
    }

    #[test]
    fn test_no_solution() {
        let domain = GraphDomain::new(3, &[(0, 1, 1.0), (1, 2, 1.0)], &[]);
        let mut search = AnytimeSearchEngine::new(domain, quiet());
        let result = search.start();
        assert_eq!(result.status, SearchStatus::Exhausted);
        assert!(!result.has_solution());
        assert_eq!(result.counters.expanded, 3);
        assert_eq!(result.counters.generated, 2);
        assert_eq!(result.get_max_fmin(), Some(f64::INFINITY));
        assert_eq!(search.get_incumbent(), None);
    }

    #[test]
    fn test_open_update_keeps_cheaper_path() {
        let domain = GraphDomain::new(
            5,
            &[(0, 1, 1.0), (0, 2, 2.0), (1, 3, 5.0), (2, 3, 1.0), (3, 4, 1.0)],
            &[4],
        );
        let mut search = AnytimeSearchEngine::new(domain, quiet()).with_order(NodeOrder::AStar);
        let result = search.start();

        assert_eq!(result.get_best_cost(), Some(4.0));
        assert_eq!(result.counters.duplicates, 1);
        assert_eq!(result.counters.open_updated, 1);
        assert_eq!(result.counters.reopened, 0);
        assert_eq!(search.get_node(&3).map(|n| n.g), Some(3.0));
        assert_eq!(search.get_node(&3).and_then(|n| n.op), Some(3));
    }

    fn inconsistent_graph() -> GraphDomain {
        GraphDomain::new(
            5,
            &[(0, 1, 1.0), (0, 2, 4.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 10.0)],
            &[4],
        )
        .with_heuristic(&[0.0, 5.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn test_reopening() {
        let mut search =
            AnytimeSearchEngine::new(inconsistent_graph(), quiet()).with_order(NodeOrder::AStar);
        let result = search.search();

        assert_eq!(
            result.solutions.iter().map(|s| s.cost).collect::<Vec<_>>(),
            vec![15.0, 13.0]
        );
        assert_eq!(result.counters.reopened, 2);
        assert_eq!(search.inconsistent_len(), 0);
        assert!(search.is_proven_optimal());
        assert_eq!(result.get_max_fmin(), Some(13.0));
    }

    #[test]
    fn test_no_reopening_parks_inconsistent_nodes() {
        let parameters = SearchParameters {
            reopen: false,
            ..quiet()
        };
        let mut search =
            AnytimeSearchEngine::new(inconsistent_graph(), parameters).with_order(NodeOrder::AStar);
        let mut observer = CountingObserver::default();

        let mut result = search.start_with(&mut observer);

        while result.status == SearchStatus::GoalFound {
            result = search.continue_with(&mut observer);
        }

        let total = search.get_total_result();
        assert_eq!(total.counters.reopened, 0);
        assert_eq!(total.get_best_cost(), Some(15.0));
        assert_eq!(search.inconsistent_len(), 1);
        assert_eq!(search.get_node(&2).map(|n| n.g), Some(2.0));
        assert!(!search.get_node(&2).unwrap().is_in_frontier());
        assert!(search.get_max_fmin() <= 13.0);
        assert!(!search.is_proven_optimal());
        assert_eq!(observer.added, observer.removed + search.frontier_len());
    }

    #[test]
    fn test_observer_balance() {
        let mut search = AnytimeSearchEngine::new(inconsistent_graph(), quiet());
        let mut observer = CountingObserver::default();
        search.start_with(&mut observer);
        assert_eq!(observer.added, observer.removed + search.frontier_len());
        assert_eq!(search.frontier_nodes().count(), search.frontier_len());
    }

    #[test]
    fn test_fmin_satisfied_during_expansion() {
        let domain = GraphDomain::new(4, &[(0, 1, 2.0), (0, 3, 3.0), (1, 2, 5.0), (2, 3, 1.0)], &[3]);
        let mut search = AnytimeSearchEngine::new(domain, quiet())
            .with_order(NodeOrder::AStar)
            .with_pac_epsilon(0.5);
        let result = search.start();

        assert_eq!(result.status, SearchStatus::Satisfied(StopRule::FMin));
        assert_eq!(result.get_best_cost(), Some(3.0));
        assert_eq!(result.get_max_fmin(), Some(2.0));
        assert_eq!(search.get_phase(), EnginePhase::Stopped);
    }

    #[test]
    fn test_without_epsilon_goal_is_returned() {
        let domain = GraphDomain::new(4, &[(0, 1, 2.0), (0, 3, 3.0), (1, 2, 5.0), (2, 3, 1.0)], &[3]);
        let mut search = AnytimeSearchEngine::new(domain, quiet()).with_order(NodeOrder::AStar);
        let result = search.start();
        assert_eq!(result.status, SearchStatus::GoalFound);
    }

    #[test]
    fn test_bounded_cost_threshold_raised() {
        let mut search = AnytimeSearchEngine::new(two_routes(), quiet())
            .with_order(NodeOrder::BoundedCost { threshold: 0.0 })
            .with_pac_epsilon(0.0);
        search.search();
        assert_eq!(
            search.get_order(),
            NodeOrder::BoundedCost {
                threshold: search.get_max_fmin()
            }
        );
    }

    #[test]
    fn test_expansion_limit() {
        let parameters = SearchParameters {
            expansion_limit: Some(1),
            ..quiet()
        };
        let domain = GraphDomain::new(3, &[(0, 1, 1.0), (1, 2, 1.0)], &[2]);
        let mut search = AnytimeSearchEngine::new(domain, parameters);
        let result = search.start();
        assert_eq!(result.status, SearchStatus::ExpansionLimitReached);
        assert_eq!(result.counters.expanded, 1);
        assert!(!result.has_solution());
        assert_eq!(search.get_phase(), EnginePhase::Stopped);
    }

    #[test]
    fn test_time_limit() {
        let parameters = SearchParameters {
            time_limit: Some(0.0),
            ..quiet()
        };
        let mut search = AnytimeSearchEngine::new(two_routes(), parameters);
        let result = search.start();
        assert_eq!(result.status, SearchStatus::TimeLimitReached);
        assert_eq!(result.counters.expanded, 0);
    }

    #[test]
    fn test_node_limit() {
        let parameters = SearchParameters {
            node_limit: Some(1),
            ..quiet()
        };
        let mut search = AnytimeSearchEngine::new(two_routes(), parameters);
        let result = search.start();
        assert_eq!(result.status, SearchStatus::ResourceExhausted);
        assert_eq!(result.counters.generated, 1);
        assert!(!result.has_solution());
    }

    #[test]
    fn test_restart_resets_state() {
        let mut search = AnytimeSearchEngine::new(two_routes(), quiet());
        search.search();
        let result = search.start();
        assert_eq!(search.get_total_result().iterations.len(), 1);
        assert_eq!(result.iterations[0].iteration, 0);
    }
}
