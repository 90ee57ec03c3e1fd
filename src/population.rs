//! The population graph: every person in the run plus the set of pairs evaluated for contact.
//!
//! People are stored densely and addressed by `PersonId`, which is the person's index in the
//! backing vector. Edges refer to people by id rather than by reference, so transmission and
//! social distancing can mutate both endpoints of an edge through the graph without aliasing.
//!
//! The edge set is built once when the population is constructed and never changes afterwards;
//! only the attributes of the people it refers to do.
use std::fmt::{self, Display};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, SimError};
use crate::person::{Canvas, InfectionStatus, Person};
use crate::random::{sample_single_from_known_length, SimRng};
use crate::HashSet;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct PersonId(pub(crate) usize);

impl PersonId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unordered pair of distinct people. Stored normalized so that `first < second`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Edge {
    first: PersonId,
    second: PersonId,
}

impl Edge {
    fn new(a: PersonId, b: PersonId) -> Self {
        if a < b {
            Edge { first: a, second: b }
        } else {
            Edge { first: b, second: a }
        }
    }

    #[must_use]
    pub fn endpoints(&self) -> (PersonId, PersonId) {
        (self.first, self.second)
    }
}

/// Counts of people in each infection state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

/// Inputs for building a population with a patient zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PopulationParameters {
    pub size: usize,
    pub canvas: Canvas,
    pub base_infection_rate: f64,
}

impl PopulationParameters {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.size == 0 {
            return Err(SimError::invalid_parameter(
                "population",
                self.size,
                "at least 1",
            ));
        }
        self.canvas.validate()?;
        check_non_negative("base_infection_rate", self.base_infection_rate)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Population {
    people: Vec<Person>,
    edges: Vec<Edge>,
    edge_set: HashSet<Edge>,
}

impl Population {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the complete graph over `people`, with ids assigned in order. No one is infected
    /// unless they already were.
    #[must_use]
    pub fn complete(people: Vec<Person>) -> Self {
        let mut population = Population {
            people,
            ..Population::default()
        };
        population.connect_all();
        population
    }

    /// Creates `size` random people, infects one of them chosen uniformly at random, and
    /// connects every pair. Draws happen person by person, then one draw for patient zero.
    pub fn with_patient_zero(
        parameters: &PopulationParameters,
        rng: &mut SimRng,
    ) -> Result<Self, SimError> {
        parameters.validate()?;
        trace!("Initializing population of {}", parameters.size);

        let mut people = Vec::with_capacity(parameters.size);
        for _ in 0..parameters.size {
            people.push(Person::random_unchecked(
                &parameters.canvas,
                parameters.base_infection_rate,
                rng,
            ));
        }

        let patient_zero = rng
            .sample(|rng| sample_single_from_known_length(rng, 0..people.len()))
            .ok_or_else(|| SimError::from("cannot select patient zero from an empty population"))?;
        people[patient_zero].infect();
        debug!("Patient zero is person {patient_zero}");

        Ok(Population::complete(people))
    }

    /// Adds a person and returns their id.
    pub fn add_person(&mut self, person: Person) -> PersonId {
        let person_id = PersonId(self.people.len());
        self.people.push(person);
        person_id
    }

    /// Adds the undirected edge between `a` and `b`. Fails for self-edges, unknown people and
    /// edges that already exist.
    pub fn add_edge(&mut self, a: PersonId, b: PersonId) -> Result<(), SimError> {
        if a == b {
            return Err(SimError::CannotMakeEdgeToSelf);
        }
        for person_id in [a, b] {
            if person_id.0 >= self.people.len() {
                return Err(SimError::UnknownPerson(person_id));
            }
        }
        let edge = Edge::new(a, b);
        if !self.edge_set.insert(edge) {
            return Err(SimError::DuplicateEdge);
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Adds every missing edge between distinct people, enumerating pairs lexicographically.
    pub fn connect_all(&mut self) {
        let n = self.people.len();
        let complete_size = n * n.saturating_sub(1) / 2;
        self.edges.reserve(complete_size.saturating_sub(self.edges.len()));
        self.edge_set.reserve(complete_size.saturating_sub(self.edge_set.len()));
        for i in 0..n {
            for j in (i + 1)..n {
                let edge = Edge::new(PersonId(i), PersonId(j));
                if self.edge_set.insert(edge) {
                    self.edges.push(edge);
                }
            }
        }
        trace!("Connected {} people with {} edges", n, self.edges.len());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    #[must_use]
    pub fn get(&self, person_id: PersonId) -> Option<&Person> {
        self.people.get(person_id.0)
    }

    #[must_use]
    pub fn get_mut(&mut self, person_id: PersonId) -> Option<&mut Person> {
        self.people.get_mut(person_id.0)
    }

    /// Iterates over `(PersonId, &Person)` in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (PersonId, &Person)> {
        self.people
            .iter()
            .enumerate()
            .map(|(index, person)| (PersonId(index), person))
    }

    /// Iterates over every person mutably in id order.
    pub fn people_mut(&mut self) -> impl ExactSizeIterator<Item = &mut Person> {
        self.people.iter_mut()
    }

    pub fn person_ids(&self) -> impl ExactSizeIterator<Item = PersonId> {
        (0..self.people.len()).map(PersonId)
    }

    /// The edges in enumeration order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Mutable access to both endpoints of an edge, in `(first, second)` order. `None` if either
    /// endpoint is not in this population.
    pub(crate) fn pair_mut(&mut self, edge: Edge) -> Option<(&mut Person, &mut Person)> {
        let (first, second) = (edge.first.0, edge.second.0);
        if second >= self.people.len() {
            return None;
        }
        let (left, right) = self.people.split_at_mut(second);
        Some((&mut left[first], &mut right[0]))
    }

    #[must_use]
    pub fn infected_count(&self) -> usize {
        self.people.iter().filter(|person| person.is_infected()).count()
    }

    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for person in &self.people {
            match person.infection_status() {
                InfectionStatus::S => counts.susceptible += 1,
                InfectionStatus::I => counts.infected += 1,
                InfectionStatus::R => counts.recovered += 1,
            }
        }
        counts
    }
}
