#![forbid(unsafe_code)]

// Weighted task selection and pacing delays

use crate::config::ConfigError;
use crate::session::{Task, TaskWeights};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::time::Duration;

/// Picks tasks with probability proportional to their weight.
#[derive(Debug, Clone)]
pub struct TaskSelector {
    index: WeightedIndex<u32>,
}

impl TaskSelector {
    pub fn new(weights: &TaskWeights) -> Result<Self, ConfigError> {
        let index = WeightedIndex::new(weights.as_array())
            .map_err(|e| ConfigError::InvalidWeights(e.to_string()))?;
        Ok(Self { index })
    }

    pub fn pick<R: Rng>(&self, rng: &mut R) -> Task {
        Task::ALL[self.index.sample(rng)]
    }
}

/// Uniform random wait between two bounds, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    min: Duration,
    max: Duration,
}

impl Pacing {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedPacing { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn delay<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}
