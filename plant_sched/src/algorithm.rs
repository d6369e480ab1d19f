use std::{fmt, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::SchedulerError, optimizer::IterationOptions};

/// Every scheduling variant known to the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    Greedy,
    IterativeOptimization,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 2] = [AlgorithmKind::Greedy, AlgorithmKind::IterativeOptimization];

    /// Name used in configuration files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Greedy => "greedy",
            AlgorithmKind::IterativeOptimization => "iterative",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AlgorithmKind::Greedy => {
                "direct list-scheduling: tasks in arrival order onto the least loaded capable equipment"
            }
            AlgorithmKind::IterativeOptimization => "iterative optimization of the direct algorithm",
        }
    }

    fn known_names() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for AlgorithmKind {
    type Err = SchedulerError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| SchedulerError::UnknownAlgorithm {
                name: name.to_string(),
                known: Self::known_names(),
            })
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A variant together with its options, ready to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    Greedy,
    IterativeOptimization(IterationOptions),
}

impl Algorithm {
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Algorithm::Greedy => AlgorithmKind::Greedy,
            Algorithm::IterativeOptimization(_) => AlgorithmKind::IterativeOptimization,
        }
    }

    pub fn from_settings(settings: &AlgorithmSettings) -> Result<Self, SchedulerError> {
        let algorithm = match settings.name.parse::<AlgorithmKind>()? {
            AlgorithmKind::Greedy => {
                if settings.options.is_some() {
                    debug!("greedy takes no options, ignoring them");
                }
                Algorithm::Greedy
            }
            AlgorithmKind::IterativeOptimization => {
                Algorithm::IterativeOptimization(settings.options.unwrap_or_default())
            }
        };
        Ok(algorithm)
    }
}

/// Algorithm section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSettings {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<IterationOptions>,
}

impl Default for AlgorithmSettings {
    fn default() -> Self {
        Self {
            name: AlgorithmKind::Greedy.name().to_string(),
            options: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(kind.name().parse::<AlgorithmKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_name_lists_known_ones() {
        let error = "tabu".parse::<AlgorithmKind>().unwrap_err();

        assert_eq!(
            error.to_string(),
            "unknown algorithm 'tabu', expected one of: greedy, iterative"
        );
    }

    #[test]
    fn iterative_options_from_settings() {
        let settings: AlgorithmSettings =
            serde_json::from_str(r#"{"name": "iterative", "options": {"maxIterations": 5}}"#).unwrap();

        let algorithm = Algorithm::from_settings(&settings).unwrap();

        assert_eq!(
            algorithm,
            Algorithm::IterativeOptimization(IterationOptions {
                max_iterations: NonZeroU32::new(5).unwrap()
            })
        );
    }

    #[test]
    fn iterative_without_options_uses_defaults() {
        let settings: AlgorithmSettings = serde_json::from_str(r#"{"name": "iterative"}"#).unwrap();

        assert_eq!(
            Algorithm::from_settings(&settings).unwrap(),
            Algorithm::IterativeOptimization(IterationOptions::default())
        );
    }

    #[test]
    fn greedy_ignores_options() {
        let settings: AlgorithmSettings =
            serde_json::from_str(r#"{"name": "greedy", "options": {"maxIterations": 5}}"#).unwrap();

        assert_eq!(Algorithm::from_settings(&settings).unwrap(), Algorithm::Greedy);
        assert_eq!(Algorithm::default().kind(), AlgorithmKind::Greedy);
    }
}
