//! Public-health interventions that perturb the population between steps.
//!
//! Each intervention is a standalone mutation of the population. None of them remember earlier
//! calls: vaccinating twice samples twice, and a person selected both times has the reduction
//! applied twice. Parameters are validated before anything is mutated or drawn.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_unit_interval, SimError};
use crate::person::Canvas;
use crate::population::{PersonId, Population};
use crate::random::SimRng;

/// Infection probability multiplier for vaccinated people.
pub const VACCINE_MULTIPLIER: f64 = 0.3;
/// Infection probability multiplier for mask wearers.
pub const MASK_MULTIPLIER: f64 = 0.4;
/// Velocity multiplier for people on staggered hours.
pub const STAGGERED_SPEED_MULTIPLIER: f64 = 0.5;
/// Side length of the square quarantine region at the canvas origin.
pub const QUARANTINE_SIZE: f64 = 100.0;

/// Samples `floor(fraction * N)` distinct people uniformly without replacement.
fn sample_people(population: &Population, fraction: f64, rng: &mut SimRng) -> Vec<PersonId> {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let requested = (fraction * population.len() as f64).floor() as usize;
    rng.sample_distinct_indices(population.len(), requested)
        .into_iter()
        .map(PersonId)
        .collect()
}

fn scale_infection_probability(
    population: &mut Population,
    fraction: f64,
    multiplier: f64,
    rng: &mut SimRng,
) -> usize {
    let selected = sample_people(population, fraction, rng);
    for &person_id in &selected {
        if let Some(person) = population.get_mut(person_id) {
            person.infection_probability *= multiplier;
        }
    }
    selected.len()
}

fn scale_sampled_velocities(
    population: &mut Population,
    fraction: f64,
    multiplier: f64,
    rng: &mut SimRng,
) -> usize {
    let selected = sample_people(population, fraction, rng);
    for &person_id in &selected {
        if let Some(person) = population.get_mut(person_id) {
            person.scale_velocity(multiplier);
        }
    }
    selected.len()
}

/// Multiplies the infection probability of `floor(fraction * N)` randomly chosen people by
/// [`VACCINE_MULTIPLIER`].
pub fn vaccinate(
    population: &mut Population,
    fraction: f64,
    rng: &mut SimRng,
) -> Result<(), SimError> {
    check_unit_interval("vaccination fraction", fraction)?;
    let vaccinated = scale_infection_probability(population, fraction, VACCINE_MULTIPLIER, rng);
    debug!("Vaccinated {vaccinated} people");
    Ok(())
}

/// Multiplies the infection probability of `floor(fraction * N)` randomly chosen people by
/// [`MASK_MULTIPLIER`]. Sampled independently of [`vaccinate`].
pub fn mask_wearing(
    population: &mut Population,
    fraction: f64,
    rng: &mut SimRng,
) -> Result<(), SimError> {
    check_unit_interval("mask wearing fraction", fraction)?;
    let masked = scale_infection_probability(population, fraction, MASK_MULTIPLIER, rng);
    debug!("{masked} people started wearing masks");
    Ok(())
}

/// Multiplies every velocity by `|factor - 1|`: `1.0` stops all movement, `0.0` changes nothing.
pub fn lockdown(population: &mut Population, factor: f64) -> Result<(), SimError> {
    check_unit_interval("lockdown factor", factor)?;
    let multiplier = (factor - 1.0).abs();
    for person in population.people_mut() {
        person.scale_velocity(multiplier);
    }
    debug!("Lockdown scaled all velocities by {multiplier}");
    Ok(())
}

/// Halves the velocity of `floor(fraction * N)` randomly chosen people.
pub fn staggered_work_hours(
    population: &mut Population,
    fraction: f64,
    rng: &mut SimRng,
) -> Result<(), SimError> {
    check_unit_interval("staggered work hours fraction", fraction)?;
    let staggered =
        scale_sampled_velocities(population, fraction, STAGGERED_SPEED_MULTIPLIER, rng);
    debug!("Staggered work hours for {staggered} people");
    Ok(())
}

/// Multiplies the velocity of `floor(fraction * N)` randomly chosen people by `|fraction - 1|`.
pub fn remote_work(
    population: &mut Population,
    fraction: f64,
    rng: &mut SimRng,
) -> Result<(), SimError> {
    check_unit_interval("remote work fraction", fraction)?;
    let remote = scale_sampled_velocities(population, fraction, (fraction - 1.0).abs(), rng);
    debug!("{remote} people moved to remote work");
    Ok(())
}

/// Pushes apart every pair closer than `threshold`, each person moving half of the shortfall
/// along the line between them. Each axis is updated only if both new coordinates stay within the
/// canvas (inclusive); otherwise that axis is left unchanged for both people.
pub fn social_distance(
    population: &mut Population,
    threshold: f64,
    canvas: &Canvas,
) -> Result<(), SimError> {
    check_non_negative("social distance threshold", threshold)?;
    canvas.validate()?;

    let mut adjusted = 0usize;
    for edge_index in 0..population.edge_count() {
        let edge = population.edges()[edge_index];
        let Some((first, second)) = population.pair_mut(edge) else {
            continue;
        };
        let distance = first.distance(second);
        if distance >= threshold {
            continue;
        }

        let angle = (second.position.y - first.position.y)
            .atan2(second.position.x - first.position.x);
        let shortfall = (threshold - distance) / 2.0;
        let move_x = shortfall * angle.cos();
        let move_y = shortfall * angle.sin();

        if canvas.contains_x(first.position.x - move_x)
            && canvas.contains_x(second.position.x + move_x)
        {
            first.position.x -= move_x;
            second.position.x += move_x;
        }
        if canvas.contains_y(first.position.y - move_y)
            && canvas.contains_y(second.position.y + move_y)
        {
            first.position.y -= move_y;
            second.position.y += move_y;
        }
        adjusted += 1;
    }
    debug!("Social distancing adjusted {adjusted} pairs");
    Ok(())
}

/// With probability `probability`, moves each infected person into the quarantine corner
/// `[0, QUARANTINE_SIZE)²` and advances them once against the quarantine walls.
pub fn infection_tracing(
    population: &mut Population,
    probability: f64,
    rng: &mut SimRng,
) -> Result<(), SimError> {
    check_unit_interval("infection tracing probability", probability)?;
    let quarantine = Canvas::new(QUARANTINE_SIZE, QUARANTINE_SIZE);

    let mut quarantined = 0usize;
    for person in population.people_mut() {
        if person.is_infected() && rng.sample_bool(probability) {
            person.position.x = rng.sample_range(0.0..QUARANTINE_SIZE);
            person.position.y = rng.sample_range(0.0..QUARANTINE_SIZE);
            person.advance_position(&quarantine);
            quarantined += 1;
        }
    }
    debug!("Infection tracing quarantined {quarantined} people");
    Ok(())
}

/// An intervention together with its parameter, as it appears in a parameters file:
/// `{"type": "vaccinate", "fraction": 0.5}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intervention {
    Vaccinate { fraction: f64 },
    MaskWearing { fraction: f64 },
    Lockdown { factor: f64 },
    StaggeredWorkHours { fraction: f64 },
    RemoteWork { fraction: f64 },
    SocialDistance { threshold: f64 },
    InfectionTracing { probability: f64 },
}

impl Intervention {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Intervention::Vaccinate { .. } => "vaccinate",
            Intervention::MaskWearing { .. } => "mask_wearing",
            Intervention::Lockdown { .. } => "lockdown",
            Intervention::StaggeredWorkHours { .. } => "staggered_work_hours",
            Intervention::RemoteWork { .. } => "remote_work",
            Intervention::SocialDistance { .. } => "social_distance",
            Intervention::InfectionTracing { .. } => "infection_tracing",
        }
    }

    /// Checks the parameter without touching any population.
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            Intervention::Vaccinate { fraction } => {
                check_unit_interval("vaccination fraction", fraction)
            }
            Intervention::MaskWearing { fraction } => {
                check_unit_interval("mask wearing fraction", fraction)
            }
            Intervention::Lockdown { factor } => check_unit_interval("lockdown factor", factor),
            Intervention::StaggeredWorkHours { fraction } => {
                check_unit_interval("staggered work hours fraction", fraction)
            }
            Intervention::RemoteWork { fraction } => {
                check_unit_interval("remote work fraction", fraction)
            }
            Intervention::SocialDistance { threshold } => {
                check_non_negative("social distance threshold", threshold)
            }
            Intervention::InfectionTracing { probability } => {
                check_unit_interval("infection tracing probability", probability)
            }
        }
    }

    pub fn apply(
        &self,
        population: &mut Population,
        canvas: &Canvas,
        rng: &mut SimRng,
    ) -> Result<(), SimError> {
        match *self {
            Intervention::Vaccinate { fraction } => vaccinate(population, fraction, rng),
            Intervention::MaskWearing { fraction } => mask_wearing(population, fraction, rng),
            Intervention::Lockdown { factor } => lockdown(population, factor),
            Intervention::StaggeredWorkHours { fraction } => {
                staggered_work_hours(population, fraction, rng)
            }
            Intervention::RemoteWork { fraction } => remote_work(population, fraction, rng),
            Intervention::SocialDistance { threshold } => {
                social_distance(population, threshold, canvas)
            }
            Intervention::InfectionTracing { probability } => {
                infection_tracing(population, probability, rng)
            }
        }
    }
}
