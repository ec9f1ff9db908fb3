use crate::statistics::BucketedCdf;
use std::sync::Arc;

/// Stops once the frontier is unlikely to lead to a solution invalidating the incumbent.
///
/// For each frontier node, the probability that no path through it is cheaper than
/// `incumbent / (1 + epsilon)` is estimated from the distribution of `h*/h` in the bucket of
/// the node's h. The rule keeps the sum of the logarithms of these probabilities over the
/// frontier, counting nodes with probability 0 separately.
#[derive(Clone, Debug)]
pub struct OpenBasedRule {
    cdfs: Arc<BucketedCdf>,
    epsilon: f64,
    log_threshold: f64,
    incumbent: Option<f64>,
    log_sum: f64,
    zero_count: usize,
}

impl OpenBasedRule {
    pub fn new(cdfs: Arc<BucketedCdf>, epsilon: f64, delta: f64) -> Self {
        Self {
            cdfs,
            epsilon,
            log_threshold: (1.0 - delta).ln(),
            incumbent: None,
            log_sum: 0.0,
            zero_count: 0,
        }
    }

    /// Returns the probability that a node does not lead to a solution invalidating the incumbent.
    pub fn probability(&self, g: f64, h: f64) -> f64 {
        let Some(incumbent) = self.incumbent else {
            return 1.0;
        };

        if incumbent <= (1.0 + self.epsilon) * (g + h) {
            return 1.0;
        }

        if h <= 0.0 {
            return 0.0;
        }

        let sufficient_ratio = (incumbent / (1.0 + self.epsilon) - g) / h;

        self.cdfs.bucket_for(h).probability_at_least(sufficient_ratio)
    }

    /// Accounts for a node entering the frontier.
    ///
    /// The sum stays current between incumbents, but the framework only checks the rule
    /// right after `reset`, which recomputes it from the frontier.
    pub fn add(&mut self, g: f64, h: f64) {
        let probability = self.probability(g, h);

        if probability > 0.0 {
            self.log_sum += probability.ln();
        } else {
            self.zero_count += 1;
        }
    }

    /// Accounts for a node leaving the frontier.
    pub fn remove(&mut self, g: f64, h: f64) {
        let probability = self.probability(g, h);

        if probability > 0.0 {
            self.log_sum -= probability.ln();
        } else {
            debug_assert!(self.zero_count > 0, "removed a node that was never added");
            self.zero_count = self.zero_count.saturating_sub(1);
        }
    }

    /// Recomputes the statistics over the frontier for a new incumbent.
    pub fn reset(&mut self, incumbent: f64, frontier: impl IntoIterator<Item = (f64, f64)>) {
        self.incumbent = Some(incumbent);
        self.log_sum = 0.0;
        self.zero_count = 0;

        for (g, h) in frontier {
            self.add(g, h);
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.incumbent.is_some() && self.zero_count == 0 && self.log_sum >= self.log_threshold
    }

    /// Returns the logarithm of the probability that the incumbent is not invalidated,
    /// ignoring nodes with probability 0.
    pub fn get_log_probability(&self) -> f64 {
        self.log_sum
    }

    /// Returns the number of frontier nodes with probability 0.
    pub fn get_zero_count(&self) -> usize {
        self.zero_count
    }
}
