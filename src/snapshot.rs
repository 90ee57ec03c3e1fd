//! Read-only copies of the person attributes a renderer or report needs. Nothing here can mutate
//! the population, and the simulation core never depends on how snapshots are displayed.
use serde::{Deserialize, Serialize};

use crate::person::InfectionStatus;
use crate::population::{PersonId, Population};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonSnapshot {
    pub person_id: PersonId,
    pub x: f64,
    pub y: f64,
    pub infection_status: InfectionStatus,
}

impl Population {
    /// One snapshot per person, in id order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PersonSnapshot> {
        self.iter()
            .map(|(person_id, person)| PersonSnapshot {
                person_id,
                x: person.position.x,
                y: person.position.y,
                infection_status: person.infection_status(),
            })
            .collect()
    }
}
