//! The controller that owns a run: the population, the random source and the parameters.
//!
//! It is the only place steps and interventions are sequenced, so an intervention always sees a
//! population between two complete steps.
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::interventions::Intervention;
use crate::parameters::Parameters;
use crate::population::Population;
use crate::random::SimRng;
use crate::stepper::step_unchecked;

/// Population state after a step, plus what happened during it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: usize,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    pub contacts: usize,
    pub new_infections: usize,
    pub recoveries: usize,
}

pub struct Simulation {
    parameters: Parameters,
    population: Population,
    rng: SimRng,
    current_step: usize,
    reports: Vec<StepReport>,
}

impl Simulation {
    /// Validates `parameters`, builds the population and applies interventions scheduled for
    /// step `0`.
    pub fn new(parameters: Parameters) -> Result<Self, SimError> {
        parameters.validate()?;
        let mut rng = SimRng::new(parameters.seed);
        let population = Population::with_patient_zero(&parameters.population_parameters(), &mut rng)?;
        info!(
            "Created population of {} people with {} contact edges",
            population.len(),
            population.edge_count()
        );

        let mut simulation = Simulation {
            reports: Vec::new(),
            parameters,
            population,
            rng,
            current_step: 0,
        };
        simulation.apply_scheduled_interventions()?;
        Ok(simulation)
    }

    fn apply_scheduled_interventions(&mut self) -> Result<(), SimError> {
        let canvas = self.parameters.canvas();
        for intervention in self.parameters.interventions_at(self.current_step) {
            debug!(
                "Applying scheduled {} after step {}",
                intervention.name(),
                self.current_step
            );
            intervention.apply(&mut self.population, &canvas, &mut self.rng)?;
        }
        Ok(())
    }

    /// Runs one step, then the interventions scheduled for it, and records a report.
    pub fn step(&mut self) -> Result<StepReport, SimError> {
        let summary = step_unchecked(
            &mut self.population,
            &self.parameters.step_parameters(),
            &mut self.rng,
        );
        self.current_step += 1;
        self.apply_scheduled_interventions()?;

        let counts = self.population.status_counts();
        let report = StepReport {
            step: self.current_step,
            susceptible: counts.susceptible,
            infected: counts.infected,
            recovered: counts.recovered,
            contacts: summary.contacts,
            new_infections: summary.new_infections,
            recoveries: summary.recoveries,
        };
        self.reports.push(report);
        Ok(report)
    }

    /// Runs the remaining steps up to the configured number of iterations.
    pub fn run(&mut self) -> Result<&[StepReport], SimError> {
        info!(
            "Running steps {} to {}",
            self.current_step + 1,
            self.parameters.iterations
        );
        while self.current_step < self.parameters.iterations {
            self.step()?;
        }
        Ok(&self.reports)
    }

    /// Applies an intervention now, between steps.
    pub fn apply_intervention(&mut self, intervention: &Intervention) -> Result<(), SimError> {
        debug!(
            "Applying {} after step {}",
            intervention.name(),
            self.current_step
        );
        intervention.apply(&mut self.population, &self.parameters.canvas(), &mut self.rng)
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    /// Infected count after each completed step.
    #[must_use]
    pub fn infection_curve(&self) -> Vec<usize> {
        self.reports.iter().map(|report| report.infected).collect()
    }

    /// The first step with the highest infected count, as `(step, infected)`.
    #[must_use]
    pub fn peak(&self) -> Option<(usize, usize)> {
        self.reports
            .iter()
            .fold(None, |peak: Option<&StepReport>, report| match peak {
                Some(best) if best.infected >= report.infected => Some(best),
                _ => Some(report),
            })
            .map(|report| (report.step, report.infected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ScheduledIntervention;

    fn small_parameters() -> Parameters {
        Parameters {
            population: 30,
            seed: 17,
            iterations: 25,
            canvas_width: 120.0,
            canvas_height: 90.0,
            base_infection_rate: 0.05,
            proximity_threshold: 15.0,
            recovery_time: 20,
            interventions: Vec::new(),
        }
    }

    #[test]
    fn rejects_invalid_parameters() {
        let parameters = Parameters {
            population: 0,
            ..small_parameters()
        };
        assert!(matches!(
            Simulation::new(parameters),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn huge_iteration_count_does_not_preallocate() {
        let mut simulation = Simulation::new(Parameters {
            population: 3,
            iterations: usize::MAX,
            ..small_parameters()
        })
        .unwrap();
        let report = simulation.step().unwrap();
        assert_eq!(report.step, 1);
        assert_eq!(simulation.reports().len(), 1);
    }

    #[test]
    fn run_produces_one_report_per_step() {
        let mut simulation = Simulation::new(small_parameters()).unwrap();
        let reports = simulation.run().unwrap().to_vec();
        assert_eq!(reports.len(), 25);
        for (index, report) in reports.iter().enumerate() {
            assert_eq!(report.step, index + 1);
            assert_eq!(
                report.susceptible + report.infected + report.recovered,
                30
            );
        }
        assert_eq!(simulation.current_step(), 25);
        // Running again is a no-op once all iterations are done.
        assert_eq!(simulation.run().unwrap().len(), 25);
    }

    #[test]
    fn same_seed_same_reports() {
        let run = || {
            let mut simulation = Simulation::new(small_parameters()).unwrap();
            simulation.run().unwrap().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn recovered_count_never_decreases() {
        let mut simulation = Simulation::new(Parameters {
            iterations: 80,
            recovery_time: 5,
            ..small_parameters()
        })
        .unwrap();
        let reports = simulation.run().unwrap();
        assert!(reports
            .windows(2)
            .all(|pair| pair[0].recovered <= pair[1].recovered));
    }

    #[test]
    fn scheduled_lockdown_freezes_population() {
        let parameters = Parameters {
            interventions: vec![ScheduledIntervention {
                step: 3,
                intervention: Intervention::Lockdown { factor: 1.0 },
            }],
            ..small_parameters()
        };
        let mut simulation = Simulation::new(parameters).unwrap();
        for _ in 0..3 {
            simulation.step().unwrap();
        }
        let frozen: Vec<_> = simulation
            .population()
            .iter()
            .map(|(_, person)| person.position)
            .collect();
        assert!(simulation
            .population()
            .iter()
            .all(|(_, person)| person.velocity.x == 0.0 && person.velocity.y == 0.0));

        simulation.step().unwrap();
        let after: Vec<_> = simulation
            .population()
            .iter()
            .map(|(_, person)| person.position)
            .collect();
        assert_eq!(frozen, after);
    }

    #[test]
    fn step_zero_interventions_run_at_construction() {
        let parameters = Parameters {
            interventions: vec![ScheduledIntervention {
                step: 0,
                intervention: Intervention::Vaccinate { fraction: 1.0 },
            }],
            ..small_parameters()
        };
        let simulation = Simulation::new(parameters).unwrap();
        for (_, person) in simulation.population().iter() {
            crate::assert_almost_eq!(person.infection_probability, 0.5 * 0.3, 1e-12);
        }
    }

    #[test]
    fn manual_intervention_between_steps() {
        let mut simulation = Simulation::new(small_parameters()).unwrap();
        simulation.step().unwrap();
        simulation
            .apply_intervention(&Intervention::MaskWearing { fraction: 0.5 })
            .unwrap();
        let masked = simulation
            .population()
            .iter()
            .filter(|(_, person)| person.infection_probability < 0.5)
            .count();
        assert_eq!(masked, 15);
        assert!(simulation
            .apply_intervention(&Intervention::Lockdown { factor: -0.5 })
            .is_err());
    }

    #[test]
    fn peak_and_curve() {
        let mut simulation = Simulation::new(small_parameters()).unwrap();
        assert_eq!(simulation.peak(), None);
        simulation.run().unwrap();
        let curve = simulation.infection_curve();
        let (peak_step, peak_infected) = simulation.peak().unwrap();
        assert_eq!(peak_infected, *curve.iter().max().unwrap());
        assert_eq!(curve[peak_step - 1], peak_infected);
        assert!(curve[..peak_step - 1].iter().all(|&count| count < peak_infected));
    }
}
