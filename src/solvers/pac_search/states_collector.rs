use crate::domain::SearchDomain;
use crate::solvers::search_algorithms::{
    AnytimeSearchEngine, FrontierObserver, NodeOrder, SearchNode, SearchParameters, SearchStatus,
};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Frontier observer picking one state uniformly at random for every observed h-value.
///
/// The representative of an h-value is replaced by the `n`-th state with that h-value
/// with probability `1 / n`, so every state inserted into the frontier is equally likely to be kept.
#[derive(Clone, Debug)]
pub struct StatesCollector<P> {
    rng: StdRng,
    counts: BTreeMap<OrderedFloat<f64>, usize>,
    representatives: BTreeMap<OrderedFloat<f64>, P>,
}

impl<P> StatesCollector<P> {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            counts: BTreeMap::new(),
            representatives: BTreeMap::new(),
        }
    }

    /// Returns the number of frontier insertions with the h-value.
    pub fn get_count(&self, h: f64) -> usize {
        self.counts.get(&OrderedFloat(h)).copied().unwrap_or(0)
    }

    /// Returns the representative state of the h-value.
    pub fn get_representative(&self, h: f64) -> Option<&P> {
        self.representatives.get(&OrderedFloat(h))
    }

    /// Iterates over the observed h-values in ascending order with their counts and representatives.
    pub fn iter(&self) -> impl Iterator<Item = (f64, usize, &P)> + '_ {
        self.representatives
            .iter()
            .map(|(h, packed)| (h.0, self.counts.get(h).copied().unwrap_or(0), packed))
    }

    /// Returns the number of distinct h-values observed.
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }
}

impl<P: Clone, O> FrontierObserver<P, O> for StatesCollector<P> {
    fn added_to_open(&mut self, node: &SearchNode<P, O>) {
        let key = OrderedFloat(node.h);
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;

        if *count == 1 || self.rng.gen_range(0..*count) == 0 {
            self.representatives.insert(key, node.packed.clone());
        }
    }
}

/// Runs anytime A* to completion and collects a representative state for every h-value
/// inserted into the frontier.
///
/// Returns the collector and the status that ended the search.
pub fn collect_states<D>(
    domain: D,
    parameters: SearchParameters,
    seed: u64,
) -> (StatesCollector<D::Packed>, SearchStatus)
where
    D: SearchDomain,
    D::State: Clone,
{
    let mut collector = StatesCollector::new(seed);
    let mut engine = AnytimeSearchEngine::new(domain, parameters).with_order(NodeOrder::AStar);
    let mut result = engine.start_with(&mut collector);

    while result.status == SearchStatus::GoalFound {
        result = engine.continue_with(&mut collector);
    }

    (collector, result.status)
}
