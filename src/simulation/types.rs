//! Core type definitions for the population simulation

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an individual
///
/// Partner and child links are stored as ids, never as owning references, so
/// removing an individual on death only has to clear the ids that point at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Person#{}", self.0)
    }
}

/// Biological sex of an individual
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

/// Age group used by the dependency ratio
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    /// 0-14 years
    Young,
    /// 15-64 years
    WorkingAge,
    /// 65+ years
    Old,
}

impl AgeGroup {
    pub fn from_age(age: u32) -> Self {
        if age < 15 {
            AgeGroup::Young
        } else if age <= 64 {
            AgeGroup::WorkingAge
        } else {
            AgeGroup::Old
        }
    }
}

/// Age at which individuals may pair up
pub const ADULT_AGE: u32 = 18;
