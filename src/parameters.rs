//! Model configuration, loadable from a JSON parameters file. Every field has a default, so a file
//! only needs to name what it changes:
//!
//! ```json
//! {
//!     "population": 200,
//!     "seed": 42,
//!     "interventions": [
//!         { "step": 50, "intervention": { "type": "vaccinate", "fraction": 0.5 } }
//!     ]
//! }
//! ```
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, SimError};
use crate::interventions::Intervention;
use crate::person::Canvas;
use crate::population::PopulationParameters;
use crate::stepper::StepParameters;

/// An intervention applied after the given step completes. Step `0` runs before the first step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduledIntervention {
    pub step: usize,
    pub intervention: Intervention,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    pub population: usize,
    pub seed: u64,
    pub iterations: usize,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Stands in for the externally sourced global infection rate.
    pub base_infection_rate: f64,
    pub proximity_threshold: f64,
    pub recovery_time: u32,
    pub interventions: Vec<ScheduledIntervention>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            population: 100,
            seed: 0,
            iterations: 500,
            canvas_width: 800.0,
            canvas_height: 600.0,
            base_infection_rate: 0.01,
            proximity_threshold: 10.0,
            recovery_time: 100,
            interventions: Vec::new(),
        }
    }
}

impl Parameters {
    /// Reads parameters from a JSON file. The result is not validated.
    pub fn from_json_file(file_path: &Path) -> Result<Self, SimError> {
        trace!("Loading parameters from {}", file_path.display());
        let file = File::open(file_path)?;
        let parameters = serde_json::from_reader(BufReader::new(file))?;
        Ok(parameters)
    }

    /// Checks every field and every scheduled intervention.
    pub fn validate(&self) -> Result<(), SimError> {
        self.population_parameters().validate()?;
        self.step_parameters().validate()?;
        check_non_negative("base_infection_rate", self.base_infection_rate)?;
        for scheduled in &self.interventions {
            scheduled.intervention.validate()?;
            if scheduled.step > self.iterations {
                return Err(SimError::invalid_parameter(
                    "intervention step",
                    scheduled.step,
                    &format!("at most the number of iterations ({})", self.iterations),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    #[must_use]
    pub fn population_parameters(&self) -> PopulationParameters {
        PopulationParameters {
            size: self.population,
            canvas: self.canvas(),
            base_infection_rate: self.base_infection_rate,
        }
    }

    #[must_use]
    pub fn step_parameters(&self) -> StepParameters {
        StepParameters {
            proximity_threshold: self.proximity_threshold,
            recovery_time: self.recovery_time,
            canvas: self.canvas(),
        }
    }

    /// Interventions scheduled for `step`, in file order.
    pub fn interventions_at(&self, step: usize) -> impl Iterator<Item = &Intervention> {
        self.interventions
            .iter()
            .filter(move |scheduled| scheduled.step == step)
            .map(|scheduled| &scheduled.intervention)
    }
}
