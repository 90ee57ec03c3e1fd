//! Per-individual state: where a person is, how they move, and where they are in the course of
//! infection.
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_positive, SimError};
use crate::random::SimRng;

/// Initial velocity components are drawn uniformly from `[-VELOCITY_RANGE, VELOCITY_RANGE)`.
pub const VELOCITY_RANGE: f64 = 1.5;
/// A person's infection probability is the base infection rate scaled by this constant.
pub const INFECTION_SCALE: f64 = 10.0;

#[derive(Debug, Default, Hash, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum InfectionStatus {
    #[default]
    S,
    I,
    R,
}

/// A position or velocity on the canvas.
#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance. `hypot` takes absolute values, so this is exactly symmetric.
    #[must_use]
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// The bounded area people move in. Positions are expected, not required, to lie in
/// `[0, width] × [0, height]`.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Canvas { width, height }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        check_positive("canvas_width", self.width)?;
        check_positive("canvas_height", self.height)
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains_x(&self, x: f64) -> bool {
        (0.0..=self.width).contains(&x)
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        (0.0..=self.height).contains(&y)
    }

    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new(800.0, 600.0)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Person {
    pub position: Point,
    pub velocity: Point,
    /// Reduced multiplicatively by vaccination and masks; never reset.
    pub infection_probability: f64,
    infection_status: InfectionStatus,
    // Always zero unless `infection_status == I`.
    infection_timer: u32,
}

impl Person {
    /// A susceptible person with the given kinematics and infection probability.
    #[must_use]
    pub fn new(position: Point, velocity: Point, infection_probability: f64) -> Self {
        Person {
            position,
            velocity,
            infection_probability,
            infection_status: InfectionStatus::S,
            infection_timer: 0,
        }
    }

    /// Draws a susceptible person placed uniformly on `canvas`. Draw order is `x`, `y`, `vx`, `vy`.
    ///
    /// A standalone constructor, so it validates its inputs. Population construction validates
    /// once up front and then uses the unchecked variant.
    pub fn random(
        canvas: &Canvas,
        base_infection_rate: f64,
        rng: &mut SimRng,
    ) -> Result<Self, SimError> {
        canvas.validate()?;
        check_non_negative("base_infection_rate", base_infection_rate)?;
        Ok(Person::random_unchecked(canvas, base_infection_rate, rng))
    }

    pub(crate) fn random_unchecked(
        canvas: &Canvas,
        base_infection_rate: f64,
        rng: &mut SimRng,
    ) -> Self {
        let x = rng.sample_range(0.0..canvas.width);
        let y = rng.sample_range(0.0..canvas.height);
        let vx = rng.sample_range(-VELOCITY_RANGE..VELOCITY_RANGE);
        let vy = rng.sample_range(-VELOCITY_RANGE..VELOCITY_RANGE);
        Person::new(
            Point::new(x, y),
            Point::new(vx, vy),
            base_infection_rate * INFECTION_SCALE,
        )
    }

    #[must_use]
    pub fn infection_status(&self) -> InfectionStatus {
        self.infection_status
    }

    #[must_use]
    pub fn infection_timer(&self) -> u32 {
        self.infection_timer
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.infection_status == InfectionStatus::I
    }

    #[must_use]
    pub fn is_susceptible(&self) -> bool {
        self.infection_status == InfectionStatus::S
    }

    /// Moves a susceptible person to `I`. Returns whether the status changed.
    pub fn infect(&mut self) -> bool {
        if self.is_susceptible() {
            self.infection_status = InfectionStatus::I;
            self.infection_timer = 0;
            true
        } else {
            false
        }
    }

    /// Moves the person to `R` regardless of their current status.
    pub fn recover(&mut self) {
        self.infection_status = InfectionStatus::R;
        self.infection_timer = 0;
    }

    /// Adds the velocity to the position, then reverses any velocity component whose coordinate
    /// reached or crossed its canvas edge. The position itself is not clamped.
    pub fn advance_position(&mut self, canvas: &Canvas) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;

        if self.position.x <= 0.0 || self.position.x >= canvas.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y <= 0.0 || self.position.y >= canvas.height {
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Advances the infection timer of an infected person by one tick. When the timer reaches
    /// `recovery_time` the person becomes `R` and the timer resets in the same call. Returns
    /// `true` exactly when that transition happened.
    pub fn advance_infection(&mut self, recovery_time: u32) -> bool {
        if !self.is_infected() {
            return false;
        }
        self.infection_timer += 1;
        if self.infection_timer >= recovery_time {
            self.recover();
            return true;
        }
        false
    }

    #[must_use]
    pub fn distance(&self, other: &Person) -> f64 {
        self.position.distance(&other.position)
    }

    /// Multiplies both velocity components by `factor`.
    pub fn scale_velocity(&mut self, factor: f64) {
        self.velocity.x *= factor;
        self.velocity.y *= factor;
    }
}
