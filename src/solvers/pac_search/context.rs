use crate::statistics::{BucketedCdf, PacStatistics};
use std::sync::Arc;

/// Read-only statistics shared by PAC searches over instances of a domain.
///
/// Cloning a context only clones the shared handles.
#[derive(Clone, Debug, Default)]
pub struct PacContext {
    statistics: Option<Arc<PacStatistics>>,
    ratio_cdfs: Option<Arc<BucketedCdf>>,
}

impl PacContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the statistics of solved instances, used by the threshold conditions.
    pub fn with_statistics(mut self, statistics: impl Into<Arc<PacStatistics>>) -> Self {
        self.statistics = Some(statistics.into());
        self
    }

    /// Adds the h-bucketed distributions of `h*/h`, used by the open-based condition.
    pub fn with_ratio_cdfs(mut self, cdfs: impl Into<Arc<BucketedCdf>>) -> Self {
        self.ratio_cdfs = Some(cdfs.into());
        self
    }

    pub fn get_statistics(&self) -> Option<&Arc<PacStatistics>> {
        self.statistics.as_ref()
    }

    pub fn get_ratio_cdfs(&self) -> Option<&Arc<BucketedCdf>> {
        self.ratio_cdfs.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::{EmpiricalCdf, InstanceStatistics};

    #[test]
    fn test_empty_context() {
        let context = PacContext::new();
        assert!(context.get_statistics().is_none());
        assert!(context.get_ratio_cdfs().is_none());
    }

    #[test]
    fn test_shared_statistics() {
        let statistics = Arc::new(PacStatistics::new(vec![InstanceStatistics {
            instance: 0,
            initial_h: 1.0,
            optimal: 2.0,
        }]));
        let cdfs = BucketedCdf::from_buckets(vec![(
            f64::INFINITY,
            EmpiricalCdf::from_points(vec![(1.0, 1.0)]).unwrap(),
        )])
        .unwrap();
        let context = PacContext::new()
            .with_statistics(statistics.clone())
            .with_ratio_cdfs(cdfs);
        let copy = context.clone();

        assert!(Arc::ptr_eq(copy.get_statistics().unwrap(), &statistics));
        assert_eq!(Arc::strong_count(&statistics), 3);
        assert_eq!(copy.get_ratio_cdfs().unwrap().len(), 1);
    }
}
