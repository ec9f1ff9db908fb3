//! Empirical distributions of optimal solution costs and heuristic error ratios.
//!
//! Distributions are built offline from solved instances and shared read-only during search.

use crate::error::StatisticsError;
use itertools::Itertools;
use num_traits::ToPrimitive;
use std::mem;

/// Maximum distance of the final cumulative probability from 1.
pub const CDF_TOLERANCE: f64 = 1e-4;

/// Default minimum number of samples in an h range.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 2;

/// Maximum difference of average ratios for adjacent h ranges to be merged.
const RATIO_MERGE_TOLERANCE: f64 = 0.1;

const PROBABILITY_EPSILON: f64 = 1e-12;

/// Empirical cumulative distribution function.
///
/// Values are strictly increasing, cumulative probabilities are non-decreasing, and the last
/// cumulative probability is exactly 1.
#[derive(Clone, Debug, PartialEq)]
pub struct EmpiricalCdf {
    points: Vec<(f64, f64)>,
}

impl EmpiricalCdf {
    /// Creates a distribution from `(value, cumulative probability)` pairs sorted by value.
    ///
    /// A final probability within `CDF_TOLERANCE` of 1 is snapped to 1.
    pub fn from_points(mut points: Vec<(f64, f64)>) -> Result<Self, StatisticsError> {
        let mut previous: Option<(f64, f64)> = None;

        for &(value, probability) in &points {
            if !value.is_finite() {
                return Err(StatisticsError::NonFiniteSample(value));
            }

            if !probability.is_finite() || probability < 0.0 {
                return Err(StatisticsError::NonMonotoneCdf { value });
            }

            if let Some((previous_value, previous_probability)) = previous {
                if value <= previous_value {
                    return Err(StatisticsError::UnsortedKeys(value));
                }

                if probability < previous_probability {
                    return Err(StatisticsError::NonMonotoneCdf { value });
                }
            }

            previous = Some((value, probability));
        }

        let last = points.last_mut().ok_or(StatisticsError::EmptySamples)?;

        if (last.1 - 1.0).abs() > CDF_TOLERANCE {
            return Err(StatisticsError::IncompleteCdf(last.1));
        }

        last.1 = 1.0;

        Ok(Self { points })
    }

    /// Returns the `(value, cumulative probability)` pairs.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the probability that a sample is at most `value`.
    pub fn cumulative_at(&self, value: f64) -> f64 {
        let index = self.points.partition_point(|(v, _)| *v <= value);

        if index == 0 {
            0.0
        } else {
            self.points[index - 1].1
        }
    }

    /// Returns a conservative estimate of the probability that a sample is at least `threshold`.
    ///
    /// Uses the first recorded value not smaller than `threshold` and returns the probability
    /// mass strictly above it, or 0 if every recorded value is smaller.
    pub fn probability_at_least(&self, threshold: f64) -> f64 {
        let index = self.points.partition_point(|(v, _)| *v < threshold);

        self.points
            .get(index)
            .map_or(0.0, |(_, cumulative)| (1.0 - cumulative).max(0.0))
    }

    /// Returns the distribution with every value multiplied by `factor`.
    ///
    /// A non-positive factor collapses the distribution onto 0.
    pub fn scaled(&self, factor: f64) -> Self {
        if factor > 0.0 {
            let points = self.points.iter().map(|&(v, p)| (v * factor, p)).collect();

            Self { points }
        } else {
            Self {
                points: vec![(0.0, 1.0)],
            }
        }
    }

    /// Returns the cost threshold below which the optimal cost lies with probability at most `delta`,
    /// scaled by `1 + epsilon`.
    ///
    /// Entries are scanned in order: an entry whose cumulative probability equals `delta` yields its
    /// own value, and the first entry exceeding `delta` yields the previous value (0 for the first entry).
    pub fn threshold(&self, epsilon: f64, delta: f64) -> Result<f64, StatisticsError> {
        let mut previous = 0.0;

        for &(value, cumulative) in &self.points {
            if (cumulative - delta).abs() <= PROBABILITY_EPSILON {
                return Ok(value * (1.0 + epsilon));
            }

            if cumulative > delta {
                return Ok(previous * (1.0 + epsilon));
            }

            previous = value;
        }

        Err(StatisticsError::DeltaNotReached(delta))
    }
}

/// Empirical distributions of `h*/h` ratios partitioned by ranges of `h`.
///
/// Each bucket is keyed by the inclusive upper end of its range, and the last bucket is open-ended.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketedCdf {
    buckets: Vec<(f64, EmpiricalCdf)>,
}

impl BucketedCdf {
    /// Creates bucketed distributions from `(upper h, distribution)` pairs sorted by the upper h.
    pub fn from_buckets(buckets: Vec<(f64, EmpiricalCdf)>) -> Result<Self, StatisticsError> {
        if buckets.is_empty() {
            return Err(StatisticsError::EmptySamples);
        }

        for ((previous, _), (upper, _)) in buckets.iter().tuple_windows() {
            if upper <= previous {
                return Err(StatisticsError::UnsortedKeys(*upper));
            }
        }

        Ok(Self { buckets })
    }

    /// Returns the distribution of the first bucket whose upper end is at least `h`.
    pub fn bucket_for(&self, h: f64) -> &EmpiricalCdf {
        let index = self.buckets.partition_point(|(upper, _)| *upper < h);

        &self.buckets[index.min(self.buckets.len() - 1)].1
    }

    /// Returns the `(upper h, distribution)` pairs.
    pub fn buckets(&self) -> &[(f64, EmpiricalCdf)] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Heuristic value and optimal cost-to-go of a state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HSample {
    pub h: f64,
    pub optimal: f64,
}

impl HSample {
    /// Returns `h*/h`.
    pub fn ratio(&self) -> f64 {
        self.optimal / self.h
    }
}

/// Builder of empirical distributions from samples.
///
/// # Examples
///
/// ```
/// use pac_search::EmpiricalCdfBuilder;
///
/// let mut builder = EmpiricalCdfBuilder::new();
/// builder.extend([3, 1, 3, 2]).unwrap();
/// let cdf = builder.build().unwrap();
///
/// assert_eq!(cdf.points(), &[(1.0, 0.25), (2.0, 0.5), (3.0, 1.0)]);
/// assert_eq!(cdf.cumulative_at(2.5), 0.5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EmpiricalCdfBuilder {
    values: Vec<f64>,
}

impl EmpiricalCdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sample of any numeric type.
    pub fn add_sample<T: ToPrimitive>(&mut self, value: T) -> Result<(), StatisticsError> {
        let value = value.to_f64().unwrap_or(f64::NAN);

        if !value.is_finite() {
            return Err(StatisticsError::NonFiniteSample(value));
        }

        self.values.push(value);

        Ok(())
    }

    /// Adds every sample of the iterator.
    pub fn extend<T: ToPrimitive>(
        &mut self,
        values: impl IntoIterator<Item = T>,
    ) -> Result<(), StatisticsError> {
        values.into_iter().try_for_each(|value| self.add_sample(value))
    }

    /// Adds the ratio of an optimal cost to a heuristic value.
    pub fn add_ratio(&mut self, optimal: f64, h: f64) -> Result<(), StatisticsError> {
        self.add_sample(optimal / h)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds the empirical distribution of the samples added so far.
    pub fn build(&self) -> Result<EmpiricalCdf, StatisticsError> {
        if self.values.is_empty() {
            return Err(StatisticsError::EmptySamples);
        }

        let mut values = self.values.clone();
        values.sort_by(f64::total_cmp);

        let n = values.len() as f64;
        let mut cumulative = 0;
        let points = values
            .iter()
            .dedup_with_count()
            .map(|(count, value)| {
                cumulative += count;
                (*value, cumulative as f64 / n)
            })
            .collect();

        EmpiricalCdf::from_points(points)
    }

    /// Builds distributions of `h*/h` ratios bucketed by ranges of `h`.
    ///
    /// Samples sorted by `h` are grouped into runs of at least `min_group_size` samples,
    /// where a run only ends where `h` changes. Remaining samples join the last run.
    /// Adjacent runs whose average ratios differ by at most 0.1 are then merged, except that runs of
    /// perfect heuristic values at the start (average ratio 1) only merge with each other.
    ///
    /// Samples with a non-positive `h` or a negative optimal cost are ignored.
    pub fn build_bucketed(
        samples: &[HSample],
        min_group_size: usize,
    ) -> Result<BucketedCdf, StatisticsError> {
        let mut samples = samples
            .iter()
            .copied()
            .filter(|s| s.h > 0.0 && s.h.is_finite() && s.optimal >= 0.0 && s.optimal.is_finite())
            .collect::<Vec<_>>();

        if samples.is_empty() {
            return Err(StatisticsError::EmptySamples);
        }

        samples.sort_by(|a, b| a.h.total_cmp(&b.h));

        let min_group_size = min_group_size.max(1);
        let mut runs = Vec::new();
        let mut current: Vec<HSample> = Vec::new();

        for sample in samples {
            if current.len() >= min_group_size && current.last().is_some_and(|s| s.h != sample.h)
            {
                runs.push(mem::take(&mut current));
            }

            current.push(sample);
        }

        match runs.last_mut() {
            Some(last) => last.extend(current),
            None => runs.push(current),
        }

        let average = |run: &[HSample]| run.iter().map(HSample::ratio).sum::<f64>() / run.len() as f64;
        let is_perfect = |ratio: f64| (ratio - 1.0).abs() <= PROBABILITY_EPSILON;

        let mut groups: Vec<Vec<HSample>> = Vec::new();
        let mut reference = 0.0;
        let mut in_perfect_group = false;

        for run in runs {
            let run_average = average(run.as_slice());
            let merge = match groups.last() {
                None => false,
                Some(_) if in_perfect_group => is_perfect(run_average),
                Some(_) => (run_average - reference).abs() <= RATIO_MERGE_TOLERANCE,
            };

            match groups.last_mut() {
                Some(group) if merge => group.extend(run),
                _ => {
                    in_perfect_group = groups.is_empty() && is_perfect(run_average);
                    reference = run_average;
                    groups.push(run);
                }
            }
        }

        let n_groups = groups.len();
        let buckets = groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                let upper = if i + 1 == n_groups {
                    f64::INFINITY
                } else {
                    group.last().map_or(f64::INFINITY, |s| s.h)
                };
                let mut builder = EmpiricalCdfBuilder::new();
                builder.extend(group.iter().map(HSample::ratio))?;

                Ok((upper, builder.build()?))
            })
            .collect::<Result<Vec<_>, StatisticsError>>()?;

        BucketedCdf::from_buckets(buckets)
    }
}

/// Initial heuristic value and optimal cost of a solved instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceStatistics {
    pub instance: usize,
    pub initial_h: f64,
    pub optimal: f64,
}

/// Statistics of solved instances of a domain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PacStatistics {
    instances: Vec<InstanceStatistics>,
}

impl PacStatistics {
    pub fn new(instances: Vec<InstanceStatistics>) -> Self {
        Self { instances }
    }

    pub fn push(&mut self, instance: InstanceStatistics) {
        self.instances.push(instance);
    }

    pub fn instances(&self) -> &[InstanceStatistics] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Returns the recorded optimal cost of an instance.
    pub fn get_optimal_cost(&self, instance: usize) -> Option<f64> {
        self.instances
            .iter()
            .find(|s| s.instance == instance)
            .map(|s| s.optimal)
    }

    /// Returns the distribution of optimal costs divided by initial heuristic values.
    ///
    /// Instances with a non-positive initial heuristic value are ignored.
    pub fn ratio_cdf(&self) -> Result<EmpiricalCdf, StatisticsError> {
        let mut builder = EmpiricalCdfBuilder::new();

        for s in self.instances.iter().filter(|s| s.initial_h > 0.0) {
            builder.add_ratio(s.optimal, s.initial_h)?;
        }

        builder.build()
    }

    /// Returns the distribution of optimal costs.
    pub fn optimal_cost_cdf(&self) -> Result<EmpiricalCdf, StatisticsError> {
        let mut builder = EmpiricalCdfBuilder::new();
        builder.extend(self.instances.iter().map(|s| s.optimal))?;

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(h: f64, optimal: f64) -> HSample {
        HSample { h, optimal }
    }

    #[test]
    fn test_from_points_snaps_final_probability() {
        let cdf = EmpiricalCdf::from_points(vec![(1.0, 0.5), (2.0, 0.99995)]).unwrap();
        assert_eq!(cdf.points(), &[(1.0, 0.5), (2.0, 1.0)]);
    }

    #[test]
    fn test_from_points_incomplete() {
        let result = EmpiricalCdf::from_points(vec![(1.0, 0.5), (2.0, 0.9)]);
        assert_eq!(result, Err(StatisticsError::IncompleteCdf(0.9)));
    }

    #[test]
    fn test_from_points_non_monotone() {
        let result = EmpiricalCdf::from_points(vec![(1.0, 0.6), (2.0, 0.5), (3.0, 1.0)]);
        assert_eq!(result, Err(StatisticsError::NonMonotoneCdf { value: 2.0 }));
    }

    #[test]
    fn test_from_points_unsorted() {
        let result = EmpiricalCdf::from_points(vec![(2.0, 0.5), (1.0, 1.0)]);
        assert_eq!(result, Err(StatisticsError::UnsortedKeys(1.0)));
    }

    #[test]
    fn test_from_points_empty() {
        assert_eq!(
            EmpiricalCdf::from_points(vec![]),
            Err(StatisticsError::EmptySamples)
        );
    }

    #[test]
    fn test_cumulative_at() {
        let cdf = EmpiricalCdf::from_points(vec![(1.0, 0.25), (2.0, 0.5), (3.0, 1.0)]).unwrap();
        assert_eq!(cdf.cumulative_at(0.5), 0.0);
        assert_eq!(cdf.cumulative_at(1.0), 0.25);
        assert_eq!(cdf.cumulative_at(2.9), 0.5);
        assert_eq!(cdf.cumulative_at(10.0), 1.0);
    }

    #[test]
    fn test_probability_at_least() {
        let cdf = EmpiricalCdf::from_points(vec![(1.0, 0.25), (2.0, 0.5), (3.0, 1.0)]).unwrap();
        assert_eq!(cdf.probability_at_least(0.5), 0.75);
        assert_eq!(cdf.probability_at_least(1.5), 0.5);
        assert_eq!(cdf.probability_at_least(2.0), 0.5);
        assert_eq!(cdf.probability_at_least(3.0), 0.0);
        assert_eq!(cdf.probability_at_least(4.0), 0.0);
    }

    #[test]
    fn test_scaled() {
        let cdf = EmpiricalCdf::from_points(vec![(1.0, 0.5), (1.5, 1.0)]).unwrap();
        assert_eq!(cdf.scaled(4.0).points(), &[(4.0, 0.5), (6.0, 1.0)]);
        assert_eq!(cdf.scaled(0.0).points(), &[(0.0, 1.0)]);
    }

    #[test]
    fn test_threshold_exact_delta() {
        let cdf = EmpiricalCdf::from_points(vec![(10.0, 0.25), (20.0, 0.5), (30.0, 1.0)]).unwrap();
        assert_relative_eq!(cdf.threshold(0.1, 0.25).unwrap(), 11.0);
        assert_relative_eq!(cdf.threshold(0.0, 1.0).unwrap(), 30.0);
    }

    #[test]
    fn test_threshold_between_entries() {
        let cdf = EmpiricalCdf::from_points(vec![(10.0, 0.25), (20.0, 0.5), (30.0, 1.0)]).unwrap();
        assert_relative_eq!(cdf.threshold(0.0, 0.3).unwrap(), 10.0);
        assert_relative_eq!(cdf.threshold(1.0, 0.6).unwrap(), 40.0);
    }

    #[test]
    fn test_threshold_zero_delta() {
        let cdf = EmpiricalCdf::from_points(vec![(10.0, 0.25), (30.0, 1.0)]).unwrap();
        assert_eq!(cdf.threshold(0.5, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_threshold_delta_not_reached() {
        let cdf = EmpiricalCdf::from_points(vec![(10.0, 1.0)]).unwrap();
        assert_eq!(
            cdf.threshold(0.0, 1.5),
            Err(StatisticsError::DeltaNotReached(1.5))
        );
    }

    #[test]
    fn test_builder_counts_duplicates() {
        let mut builder = EmpiricalCdfBuilder::new();
        builder.extend([2.0, 1.0, 2.0, 2.0]).unwrap();
        assert_eq!(builder.len(), 4);

        let cdf = builder.build().unwrap();
        assert_eq!(cdf.points(), &[(1.0, 0.25), (2.0, 1.0)]);
    }

    #[test]
    fn test_builder_integer_samples() {
        let mut builder = EmpiricalCdfBuilder::new();
        builder.extend([5u32, 7, 9]).unwrap();
        let cdf = builder.build().unwrap();
        assert_eq!(cdf.len(), 3);
        assert_relative_eq!(cdf.points()[0].1, 1.0 / 3.0);
    }

    #[test]
    fn test_builder_rejects_non_finite() {
        let mut builder = EmpiricalCdfBuilder::new();
        assert_eq!(
            builder.add_ratio(1.0, 0.0),
            Err(StatisticsError::NonFiniteSample(f64::INFINITY))
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn test_builder_empty() {
        let builder = EmpiricalCdfBuilder::new();
        assert_eq!(builder.build(), Err(StatisticsError::EmptySamples));
    }

    #[test]
    fn test_bucket_for() {
        let low = EmpiricalCdf::from_points(vec![(1.0, 1.0)]).unwrap();
        let high = EmpiricalCdf::from_points(vec![(2.0, 1.0)]).unwrap();
        let buckets =
            BucketedCdf::from_buckets(vec![(3.0, low.clone()), (f64::INFINITY, high.clone())])
                .unwrap();

        assert_eq!(buckets.bucket_for(0.5), &low);
        assert_eq!(buckets.bucket_for(3.0), &low);
        assert_eq!(buckets.bucket_for(3.5), &high);
        assert_eq!(buckets.bucket_for(100.0), &high);
    }

    #[test]
    fn test_bucket_for_beyond_last_finite_bucket() {
        let cdf = EmpiricalCdf::from_points(vec![(1.0, 1.0)]).unwrap();
        let buckets = BucketedCdf::from_buckets(vec![(3.0, cdf.clone())]).unwrap();
        assert_eq!(buckets.bucket_for(7.0), &cdf);
    }

    #[test]
    fn test_from_buckets_unsorted() {
        let cdf = EmpiricalCdf::from_points(vec![(1.0, 1.0)]).unwrap();
        let result = BucketedCdf::from_buckets(vec![(3.0, cdf.clone()), (2.0, cdf)]);
        assert_eq!(result, Err(StatisticsError::UnsortedKeys(2.0)));
    }

    #[test]
    fn test_build_bucketed_single_run() {
        let samples = [sample(1.0, 1.0), sample(1.0, 2.0), sample(2.0, 2.0)];
        let buckets = EmpiricalCdfBuilder::build_bucketed(&samples, 5).unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.buckets()[0].0, f64::INFINITY);
        assert_eq!(buckets.buckets()[0].1.points(), &[(1.0, 2.0 / 3.0), (2.0, 1.0)]);
    }

    #[test]
    fn test_build_bucketed_splits_by_ratio() {
        let samples = [
            sample(1.0, 2.0),
            sample(1.0, 2.0),
            sample(2.0, 4.0),
            sample(2.0, 4.0),
            sample(5.0, 5.5),
            sample(5.0, 5.5),
            sample(6.0, 6.6),
            sample(7.0, 7.7),
        ];
        let buckets = EmpiricalCdfBuilder::build_bucketed(&samples, 2).unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.buckets()[0].0, 2.0);
        assert_eq!(buckets.buckets()[0].1.points(), &[(2.0, 1.0)]);
        assert_eq!(buckets.buckets()[1].0, f64::INFINITY);
        assert_relative_eq!(buckets.buckets()[1].1.points()[0].0, 1.1);
        assert!(std::ptr::eq(buckets.bucket_for(1.5), &buckets.buckets()[0].1));
        assert!(std::ptr::eq(buckets.bucket_for(5.0), &buckets.buckets()[1].1));
    }

    #[test]
    fn test_build_bucketed_perfect_prefix() {
        let samples = [
            sample(1.0, 1.0),
            sample(1.0, 1.0),
            sample(2.0, 2.0),
            sample(2.0, 2.0),
            sample(3.0, 3.15),
            sample(3.0, 3.15),
        ];
        let buckets = EmpiricalCdfBuilder::build_bucketed(&samples, 2).unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.buckets()[0].0, 2.0);
        assert_eq!(buckets.buckets()[0].1.points(), &[(1.0, 1.0)]);
    }

    #[test]
    fn test_build_bucketed_ignores_invalid_samples() {
        let samples = [sample(0.0, 3.0), sample(2.0, -1.0)];
        assert_eq!(
            EmpiricalCdfBuilder::build_bucketed(&samples, 2),
            Err(StatisticsError::EmptySamples)
        );
    }

    #[test]
    fn test_pac_statistics_distributions() {
        let statistics = PacStatistics::new(vec![
            InstanceStatistics {
                instance: 0,
                initial_h: 4.0,
                optimal: 6.0,
            },
            InstanceStatistics {
                instance: 1,
                initial_h: 5.0,
                optimal: 5.0,
            },
            InstanceStatistics {
                instance: 2,
                initial_h: 0.0,
                optimal: 3.0,
            },
        ]);

        let ratios = statistics.ratio_cdf().unwrap();
        assert_eq!(ratios.points(), &[(1.0, 0.5), (1.5, 1.0)]);

        let costs = statistics.optimal_cost_cdf().unwrap();
        assert_eq!(costs.points(), &[(3.0, 1.0 / 3.0), (5.0, 2.0 / 3.0), (6.0, 1.0)]);

        assert_eq!(statistics.get_optimal_cost(1), Some(5.0));
        assert_eq!(statistics.get_optimal_cost(7), None);
    }
}
