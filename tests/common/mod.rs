#![allow(dead_code)]

use pac_search::prelude::*;

/// Pancake sorting with unit flip costs and the gap heuristic.
///
/// Operator `k` reverses the top `k` pancakes.
#[derive(Clone, Debug)]
pub struct Pancake {
    pub initial: Vec<u8>,
}

impl Pancake {
    pub fn new(initial: &[u8]) -> Self {
        Self {
            initial: initial.to_vec(),
        }
    }
}

impl SearchDomain for Pancake {
    type State = Vec<u8>;
    type Operator = usize;
    type Packed = Vec<u8>;

    fn initial_state(&self) -> Self::State {
        self.initial.clone()
    }

    fn is_goal(&self, state: &Self::State) -> bool {
        state.iter().enumerate().all(|(i, &p)| usize::from(p) == i)
    }

    fn num_operators(&self, state: &Self::State) -> usize {
        state.len().saturating_sub(1)
    }

    fn operator(&self, _: &Self::State, index: usize) -> Self::Operator {
        index + 2
    }

    fn apply_operator(&self, state: &Self::State, op: Self::Operator) -> Self::State {
        let mut successor = state.clone();
        successor[..op].reverse();
        successor
    }

    fn operator_cost(&self, _: Self::Operator, _: &Self::State, _: &Self::State) -> f64 {
        1.0
    }

    fn reverse_operator(&self, op: Self::Operator, _: &Self::State) -> Option<Self::Operator> {
        Some(op)
    }

    fn pack(&self, state: &Self::State) -> Self::Packed {
        state.clone()
    }

    fn unpack(&self, packed: &Self::Packed) -> Self::State {
        packed.clone()
    }

    fn heuristic(&self, state: &Self::State) -> f64 {
        let plate = state.len() as i32;
        let gaps = state
            .iter()
            .map(|&p| i32::from(p))
            .chain(std::iter::once(plate))
            .collect::<Vec<_>>()
            .windows(2)
            .filter(|w| (w[0] - w[1]).abs() != 1)
            .count();

        gaps as f64
    }
}

/// Walk on `0..size` without any goal.
#[derive(Clone, Debug)]
pub struct Unsolvable {
    pub size: i32,
}

impl SearchDomain for Unsolvable {
    type State = i32;
    type Operator = i32;
    type Packed = i32;

    fn initial_state(&self) -> Self::State {
        0
    }

    fn is_goal(&self, _: &Self::State) -> bool {
        false
    }

    fn num_operators(&self, state: &Self::State) -> usize {
        if *state == 0 || *state == self.size - 1 {
            1
        } else {
            2
        }
    }

    fn operator(&self, state: &Self::State, index: usize) -> Self::Operator {
        if *state == 0 {
            1
        } else if *state == self.size - 1 || index == 0 {
            -1
        } else {
            1
        }
    }

    fn apply_operator(&self, state: &Self::State, op: Self::Operator) -> Self::State {
        state + op
    }

    fn operator_cost(&self, _: Self::Operator, _: &Self::State, _: &Self::State) -> f64 {
        1.0
    }

    fn reverse_operator(&self, op: Self::Operator, _: &Self::State) -> Option<Self::Operator> {
        Some(-op)
    }

    fn pack(&self, state: &Self::State) -> Self::Packed {
        *state
    }

    fn unpack(&self, packed: &Self::Packed) -> Self::State {
        *packed
    }

    fn heuristic(&self, _: &Self::State) -> f64 {
        0.0
    }
}

/// Directed graph with weighted edges, starting at node 0.
#[derive(Clone, Debug)]
pub struct Graph {
    pub edges: Vec<Vec<(usize, f64)>>,
    pub h: Vec<f64>,
    pub goal: usize,
}

impl Graph {
    pub fn new(n: usize, edges: &[(usize, usize, f64)], goal: usize) -> Self {
        let mut adjacency = vec![Vec::new(); n];

        for &(from, to, cost) in edges {
            if from != to && adjacency[from].iter().all(|&(t, _)| t != to) {
                adjacency[from].push((to, cost));
            }
        }

        Self {
            edges: adjacency,
            h: vec![0.0; n],
            goal,
        }
    }

    /// Returns the cheapest cost from every node to the goal.
    pub fn distances_to_goal(&self) -> Vec<f64> {
        let n = self.edges.len();
        let mut distance = vec![f64::INFINITY; n];
        distance[self.goal] = 0.0;

        for _ in 0..n {
            for from in 0..n {
                for &(to, cost) in &self.edges[from] {
                    if distance[to] + cost < distance[from] {
                        distance[from] = distance[to] + cost;
                    }
                }
            }
        }

        distance
    }

    /// Uses a scaled true distance as the heuristic.
    pub fn with_scaled_heuristic(mut self, factor: f64) -> Self {
        self.h = self
            .distances_to_goal()
            .into_iter()
            .map(|d| if d.is_finite() { d * factor } else { 0.0 })
            .collect();
        self
    }
}

impl SearchDomain for Graph {
    type State = usize;
    type Operator = usize;
    type Packed = usize;

    fn initial_state(&self) -> Self::State {
        0
    }

    fn is_goal(&self, state: &Self::State) -> bool {
        *state == self.goal
    }

    fn num_operators(&self, state: &Self::State) -> usize {
        self.edges[*state].len()
    }

    fn operator(&self, state: &Self::State, index: usize) -> Self::Operator {
        self.edges[*state][index].0
    }

    fn apply_operator(&self, _: &Self::State, op: Self::Operator) -> Self::State {
        op
    }

    fn operator_cost(&self, op: Self::Operator, _: &Self::State, parent: &Self::State) -> f64 {
        self.edges[*parent]
            .iter()
            .find(|(to, _)| *to == op)
            .map_or(f64::INFINITY, |(_, cost)| *cost)
    }

    fn reverse_operator(&self, _: Self::Operator, _: &Self::State) -> Option<Self::Operator> {
        None
    }

    fn pack(&self, state: &Self::State) -> Self::Packed {
        *state
    }

    fn unpack(&self, packed: &Self::Packed) -> Self::State {
        *packed
    }

    fn heuristic(&self, state: &Self::State) -> f64 {
        self.h[*state]
    }
}

pub fn quiet() -> SearchParameters {
    SearchParameters {
        quiet: true,
        ..Default::default()
    }
}
