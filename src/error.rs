use thiserror::Error;

/// Invalid configuration detected before a search starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("epsilon must be a finite non-negative number, got {0}")]
    InvalidEpsilon(f64),
    #[error("delta must be in [0, 1], got {0}")]
    InvalidDelta(f64),
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("unknown {kind} `{name}`")]
    UnknownSelector { kind: &'static str, name: String },
    #[error("cannot parse `{value}` for parameter `{name}`")]
    InvalidValue { name: String, value: String },
    #[error("the {0} condition requires statistics that the context does not provide")]
    MissingStatistics(&'static str),
    #[error("the oracle condition requires the optimal cost of the instance")]
    MissingOptimalCost,
    #[error("condition has already been set up")]
    AlreadyConfigured,
}

/// Violation of a statistical precondition in the input data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatisticsError {
    #[error("no samples to build a distribution from")]
    EmptySamples,
    #[error("sample value {0} is not finite")]
    NonFiniteSample(f64),
    #[error("cumulative distribution ends at {0}, which is not within tolerance of 1")]
    IncompleteCdf(f64),
    #[error("cumulative distribution decreases at value {value}")]
    NonMonotoneCdf { value: f64 },
    #[error("distribution keys are not strictly increasing at {0}")]
    UnsortedKeys(f64),
    #[error("cumulative probability never reaches delta = {0}")]
    DeltaNotReached(f64),
}

/// Umbrella error of the crate.
#[derive(Debug, Error)]
pub enum PacError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("failed to build instance {instance}: {message}")]
    Instance { instance: usize, message: String },
}
