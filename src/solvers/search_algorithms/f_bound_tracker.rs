use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

/// Histogram of the f-values in a frontier.
///
/// Tracks the minimum f-value in the frontier (`fmin`) and the largest certified lower bound seen
/// so far (`max_fmin`), which never decreases.
#[derive(Clone, Debug)]
pub struct FBoundTracker {
    counts: FxHashMap<OrderedFloat<f64>, usize>,
    fmin: f64,
    max_fmin: f64,
}

impl Default for FBoundTracker {
    fn default() -> Self {
        Self {
            counts: FxHashMap::default(),
            fmin: f64::INFINITY,
            max_fmin: f64::NEG_INFINITY,
        }
    }
}

impl FBoundTracker {
    /// Starts tracking a frontier holding only the initial node.
    pub fn reset(&mut self, f: f64) {
        self.counts.clear();
        self.counts.insert(OrderedFloat(f), 1);
        self.fmin = f;
        self.max_fmin = f;
    }

    /// Starts tracking a search whose optimal cost is already known.
    pub fn close(&mut self, cost: f64) {
        self.counts.clear();
        self.fmin = f64::INFINITY;
        self.max_fmin = cost;
    }

    /// Records a node entering the frontier.
    #[inline]
    pub fn add(&mut self, f: f64) {
        *self.counts.entry(OrderedFloat(f)).or_insert(0) += 1;

        if f < self.fmin {
            self.fmin = f;
        }
    }

    /// Records a node leaving the frontier.
    #[inline]
    pub fn remove(&mut self, f: f64) {
        if let Some(count) = self.counts.get_mut(&OrderedFloat(f)) {
            *count -= 1;

            if *count == 0 {
                self.counts.remove(&OrderedFloat(f));
            }
        } else {
            debug_assert!(false, "f-value {f} is not tracked");
        }
    }

    /// Recomputes fmin if no frontier node has that f-value anymore, and raises max_fmin.
    ///
    /// The new lower bound is capped by `incumbent`, as no solution cheaper than the incumbent
    /// remains once every frontier node has an f-value at least the incumbent.
    /// Returns whether max_fmin increased.
    pub fn refresh(&mut self, incumbent: f64) -> bool {
        if !self.counts.contains_key(&OrderedFloat(self.fmin)) {
            self.fmin = self
                .counts
                .keys()
                .min()
                .map_or(f64::INFINITY, |f| f.into_inner());
        }

        let bound = self.fmin.min(incumbent);

        if bound > self.max_fmin {
            self.max_fmin = bound;

            true
        } else {
            false
        }
    }

    /// Returns the smallest f-value in the frontier, or infinity if it is empty.
    pub fn get_fmin(&self) -> f64 {
        self.fmin
    }

    /// Returns the largest lower bound on the optimal cost proven so far.
    pub fn get_max_fmin(&self) -> f64 {
        self.max_fmin
    }

    /// Returns the number of tracked nodes.
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
