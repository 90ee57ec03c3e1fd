//! Pairwise contact, transmission and recovery.
//!
//! Recovery timers advance once per contact edge, not once per step: an infected person within
//! the proximity threshold of several others in the same step ticks once for each of them, so
//! people in dense clusters recover in fewer steps than isolated ones.
use log::trace;

use crate::population::{Edge, PersonId, Population};
use crate::random::SimRng;

/// What happened when an edge was evaluated.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ContactOutcome {
    /// The endpoints were closer than the proximity threshold.
    pub contact: bool,
    pub newly_infected: Option<PersonId>,
    /// Number of endpoints (0, 1 or 2) that recovered during this evaluation.
    pub recoveries: u8,
}

/// Evaluates one edge for contact, transmission and recovery.
///
/// Out of range (`distance >= proximity_threshold`) nothing changes and nothing is drawn. In
/// range, exactly one uniform sample `r` is drawn; if exactly one endpoint is infected and the
/// other is susceptible, the susceptible one is infected iff `r` is below the infected one's
/// `infection_probability`. Then every infected endpoint, including one infected just now, has
/// its recovery timer advanced.
///
/// An edge whose endpoints are not both in `population` is treated as no contact.
pub fn evaluate_contact(
    population: &mut Population,
    edge: Edge,
    proximity_threshold: f64,
    recovery_time: u32,
    rng: &mut SimRng,
) -> ContactOutcome {
    let (first_id, second_id) = edge.endpoints();
    let Some((first, second)) = population.pair_mut(edge) else {
        return ContactOutcome::default();
    };

    if first.distance(second) >= proximity_threshold {
        return ContactOutcome::default();
    }

    let mut outcome = ContactOutcome {
        contact: true,
        ..ContactOutcome::default()
    };

    let r = rng.sample_unit();
    if first.is_infected() && second.is_susceptible() {
        if r < first.infection_probability {
            second.infect();
            outcome.newly_infected = Some(second_id);
        }
    } else if second.is_infected() && first.is_susceptible() && r < second.infection_probability {
        first.infect();
        outcome.newly_infected = Some(first_id);
    }

    for person in [first, second] {
        if person.advance_infection(recovery_time) {
            outcome.recoveries += 1;
        }
    }

    if let Some(person_id) = outcome.newly_infected {
        trace!("Person {person_id} infected through edge ({first_id}, {second_id})");
    }
    outcome
}
