use crate::error::StatisticsError;
use crate::statistics::EmpiricalCdf;

/// Stops once the incumbent cost is at most a precomputed threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdRule {
    threshold: f64,
}

impl ThresholdRule {
    /// Computes the threshold from a distribution of optimal costs.
    pub fn new(cdf: &EmpiricalCdf, epsilon: f64, delta: f64) -> Result<Self, StatisticsError> {
        let threshold = cdf.threshold(epsilon, delta)?;

        Ok(Self { threshold })
    }

    pub fn get_threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_satisfied(&self, incumbent: f64) -> bool {
        incumbent <= self.threshold
    }
}
