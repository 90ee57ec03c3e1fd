//! An agent-based simulation of an epidemic spreading among people who move around a 2-D canvas.
//!
//! Every person is a node of a complete contact graph. Each step, everybody moves (bouncing off
//! the canvas edges) and then every pair closer than the proximity threshold is a contact: an
//! infected person may pass the infection on to a susceptible one, and infected people advance
//! towards recovery. Recovered people are immune.
//!
//! A run is made of:
//! * A [`Population`](population::Population) of [`Person`](person::Person)s and the edges
//!   between them, seeded with one infected person.
//! * The [`stepper`], which advances the population one step at a time.
//! * [`interventions`], which change infection probabilities, velocities or positions between
//!   steps: vaccination, masks, lockdown, staggered work hours, remote work, social distancing
//!   and infection tracing.
//! * A [`Simulation`](simulation::Simulation), which owns the population, the single random
//!   source and the [`Parameters`](parameters::Parameters), and records a report per step.
//!
//! All randomness comes from one seeded [`SimRng`](random::SimRng), so a run is reproducible
//! from its parameters.
pub mod error;
pub mod interventions;
pub mod log;
mod macros;
pub mod numeric;
pub mod parameters;
pub mod person;
pub mod population;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulation;
pub mod snapshot;
pub mod stepper;
pub mod transmission;

pub use error::SimError;
pub use interventions::Intervention;
pub use parameters::{Parameters, ScheduledIntervention};
pub use person::{Canvas, InfectionStatus, Person, Point};
pub use population::{Edge, PersonId, Population, StatusCounts};
pub use random::SimRng;
pub use simulation::{Simulation, StepReport};

// Re-exports so models and tests use the same versions as the crate.
pub use rand;
pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
