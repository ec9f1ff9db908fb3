use super::conditions::{validate_epsilon_delta, ConditionKind};
use super::framework::{AnytimeAlgorithm, PacSearchFramework};
use crate::error::ConfigError;
use crate::solvers::search_algorithms::SearchParameters;
use std::str::FromStr;

/// Configuration of a PAC search set by parameter names.
///
/// Recognized names are `epsilon`, `delta`, `anytime-search`, `pac-condition`, `reopen`,
/// `quiet`, `time-limit`, `expansion-limit`, `node-limit`, `initial-registry-capacity`,
/// and `optimal-cost`.
///
/// # Examples
///
/// ```
/// use pac_search::solvers::pac_search::{ConditionKind, PacConfig};
///
/// let config = PacConfig::from_pairs([
///     ("epsilon", "0.5"),
///     ("delta", "0.1"),
///     ("pac-condition", "open-based"),
///     ("reopen", "false"),
/// ])
/// .unwrap();
/// assert_eq!(config.condition, ConditionKind::OpenBased);
/// assert!(!config.parameters.reopen);
///
/// let framework = config.build_framework().unwrap();
/// assert_eq!(framework.get_epsilon(), 0.5);
///
/// assert!(PacConfig::from_pairs([("epsilon", "-1")]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PacConfig {
    pub epsilon: f64,
    pub delta: f64,
    pub algorithm: AnytimeAlgorithm,
    pub condition: ConditionKind,
    pub parameters: SearchParameters,
    pub optimal_cost: Option<f64>,
}

impl Default for PacConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            delta: 0.1,
            algorithm: AnytimeAlgorithm::default(),
            condition: ConditionKind::FMin,
            parameters: SearchParameters::default(),
            optimal_cost: None,
        }
    }
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn parse_non_negative(name: &str, value: &str) -> Result<f64, ConfigError> {
    let parsed = parse_value::<f64>(name, value)?;

    if parsed.is_finite() && parsed >= 0.0 {
        Ok(parsed)
    } else {
        Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

impl PacConfig {
    /// Sets a parameter by name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            "epsilon" => {
                let epsilon = parse_value(name, value)?;
                validate_epsilon_delta(epsilon, self.delta)?;
                self.epsilon = epsilon;
            }
            "delta" => {
                let delta = parse_value(name, value)?;
                validate_epsilon_delta(self.epsilon, delta)?;
                self.delta = delta;
            }
            "anytime-search" => self.algorithm = value.trim().parse()?,
            "pac-condition" => self.condition = value.trim().parse()?,
            "reopen" => self.parameters.reopen = parse_value(name, value)?,
            "quiet" => self.parameters.quiet = parse_value(name, value)?,
            "time-limit" => self.parameters.time_limit = Some(parse_non_negative(name, value)?),
            "expansion-limit" => self.parameters.expansion_limit = Some(parse_value(name, value)?),
            "node-limit" => self.parameters.node_limit = Some(parse_value(name, value)?),
            "initial-registry-capacity" => {
                self.parameters.initial_registry_capacity = Some(parse_value(name, value)?)
            }
            "optimal-cost" => self.optimal_cost = Some(parse_non_negative(name, value)?),
            _ => return Err(ConfigError::UnknownParameter(name.to_string())),
        }

        Ok(())
    }

    /// Creates a configuration from name-value pairs applied in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (name, value) in pairs {
            config.set(name.as_ref(), value.as_ref())?;
        }

        Ok(config)
    }

    pub fn build_framework(&self) -> Result<PacSearchFramework, ConfigError> {
        let framework =
            PacSearchFramework::new(self.epsilon, self.delta, self.algorithm, self.condition)?
                .with_parameters(self.parameters.clone());

        Ok(match self.optimal_cost {
            Some(cost) => framework.with_optimal_cost(cost),
            None => framework,
        })
    }
}
