use super::conditions::ConditionKind;
use super::context::PacContext;
use super::framework::PacSearchFramework;
use crate::domain::SearchDomain;
use crate::error::PacError;
use crate::solvers::search_algorithms::{SearchResult, SearchStatus, StopRule};
use tracing::{info, warn};

/// Outcome of a PAC search on one instance.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceSummary {
    pub instance: usize,
    pub cost: Option<f64>,
    pub max_fmin: Option<f64>,
    pub status: SearchStatus,
    pub satisfied_by: Option<StopRule>,
    pub expanded: usize,
    pub generated: usize,
    pub time: f64,
}

impl InstanceSummary {
    pub fn from_result<O, S>(instance: usize, result: &SearchResult<O, S>) -> Self {
        Self {
            instance,
            cost: result.get_best_cost(),
            max_fmin: result.get_max_fmin(),
            status: result.status,
            satisfied_by: result.get_satisfied_by(),
            expanded: result.counters.expanded,
            generated: result.counters.generated,
            time: result.time,
        }
    }
}

/// Summaries of the instances searched in a batch and the instances that failed.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub summaries: Vec<InstanceSummary>,
    pub failures: Vec<(usize, PacError)>,
}

/// Runs the framework on every instance, building each domain with `build`.
///
/// A failure to build or search an instance is logged and the batch continues.
/// With the oracle condition, the optimal cost of each instance is taken from the statistics
/// of the context when available.
pub fn run_batch<D, F>(
    framework: &PacSearchFramework,
    context: &PacContext,
    instances: impl IntoIterator<Item = usize>,
    mut build: F,
) -> BatchReport
where
    D: SearchDomain,
    D::State: Clone,
    F: FnMut(usize) -> Result<D, PacError>,
{
    let mut report = BatchReport::default();

    for instance in instances {
        let outcome = build(instance).and_then(|domain| {
            let optimal_cost = context
                .get_statistics()
                .and_then(|statistics| statistics.get_optimal_cost(instance));

            match optimal_cost {
                Some(cost) if framework.get_condition() == ConditionKind::Oracle => framework
                    .clone()
                    .with_optimal_cost(cost)
                    .search(domain, context),
                _ => framework.search(domain, context),
            }
        });

        match outcome {
            Ok(result) => {
                let summary = InstanceSummary::from_result(instance, &result);

                if summary.status == SearchStatus::ResourceExhausted {
                    warn!(instance, expanded = summary.expanded, "Instance ran out of node storage");
                }

                info!(
                    instance,
                    cost = ?summary.cost,
                    status = ?summary.status,
                    expanded = summary.expanded,
                    time = summary.time,
                    "Instance finished"
                );
                report.summaries.push(summary);
            }
            Err(error) => {
                warn!(instance, %error, "Instance failed");
                report.failures.push((instance, error));
            }
        }
    }

    report
}
