use std::fmt::Display;

use convert_case::Case;
use convert_case::Casing;
use log::info;

#[cfg(doc)]
use crate::propagation::Propagator;
#[cfg(doc)]
use crate::State;

/// The `log` target under which every statistic is written.
pub const STATISTICS_TARGET: &str = "gourd::statistics";

/// Writes statistics as `name=value` lines at the info level under [`STATISTICS_TARGET`]; used
/// when logging the statistics of the [`State`] and of individual [`Propagator`]s.
///
/// The name of a statistic is the chain of prefixes attached to the logger joined by underscores,
/// optionally converted to a [`Case`].
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name_prefix: String,
    casing: Option<Case>,
}

impl StatisticLogger {
    pub fn new(name_prefix: impl Display) -> Self {
        Self {
            name_prefix: name_prefix.to_string(),
            casing: None,
        }
    }

    /// Convert the names of the statistics logged through this logger, and through every logger
    /// derived from it, to `casing`.
    pub fn with_casing(self, casing: Case) -> Self {
        Self {
            casing: Some(casing),
            ..self
        }
    }

    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        let name_prefix = if self.name_prefix.is_empty() {
            addition_to_prefix.to_string()
        } else {
            format!("{}_{}", self.name_prefix, addition_to_prefix)
        };
        Self {
            name_prefix,
            casing: self.casing,
        }
    }

    /// The name under which [`StatisticLogger::log_value`] writes.
    pub fn name(&self) -> String {
        match self.casing {
            Some(casing) => self.name_prefix.to_case(casing),
            None => self.name_prefix.clone(),
        }
    }

    pub fn log_value(&self, value: impl Display) {
        info!(target: STATISTICS_TARGET, "{}={value}", self.name());
    }
}
