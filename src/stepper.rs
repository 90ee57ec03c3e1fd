//! Discrete time steps: move everyone, then evaluate every edge.
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, SimError};
use crate::person::Canvas;
use crate::population::Population;
use crate::random::SimRng;
use crate::transmission::evaluate_contact;

/// The model parameters a step needs.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepParameters {
    pub proximity_threshold: f64,
    pub recovery_time: u32,
    pub canvas: Canvas,
}

impl StepParameters {
    pub fn validate(&self) -> Result<(), SimError> {
        check_non_negative("proximity_threshold", self.proximity_threshold)?;
        self.canvas.validate()
    }
}

/// Aggregate events of one step.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StepSummary {
    pub contacts: usize,
    pub new_infections: usize,
    pub recoveries: usize,
}

/// Advances the population by one step. Every position is updated before any edge is evaluated,
/// so transmission always sees this step's positions.
pub fn step(
    population: &mut Population,
    parameters: &StepParameters,
    rng: &mut SimRng,
) -> Result<StepSummary, SimError> {
    parameters.validate()?;
    Ok(step_unchecked(population, parameters, rng))
}

pub(crate) fn step_unchecked(
    population: &mut Population,
    parameters: &StepParameters,
    rng: &mut SimRng,
) -> StepSummary {
    for person in population.people_mut() {
        person.advance_position(&parameters.canvas);
    }

    let mut summary = StepSummary::default();
    for edge_index in 0..population.edge_count() {
        let edge = population.edges()[edge_index];
        let outcome = evaluate_contact(
            population,
            edge,
            parameters.proximity_threshold,
            parameters.recovery_time,
            rng,
        );
        if outcome.contact {
            summary.contacts += 1;
        }
        if outcome.newly_infected.is_some() {
            summary.new_infections += 1;
        }
        summary.recoveries += usize::from(outcome.recoveries);
    }

    trace!(
        "Step: {} contacts, {} new infections, {} recoveries",
        summary.contacts,
        summary.new_infections,
        summary.recoveries
    );
    summary
}

/// Runs `iterations` steps and returns the number of infected people after each one.
pub fn track_infections_over_time(
    population: &mut Population,
    iterations: usize,
    parameters: &StepParameters,
    rng: &mut SimRng,
) -> Result<Vec<usize>, SimError> {
    parameters.validate()?;
    debug!("Tracking infections over {iterations} steps");

    let mut infected = Vec::new();
    for _ in 0..iterations {
        step_unchecked(population, parameters, rng);
        infected.push(population.infected_count());
    }
    Ok(infected)
}
