//! Statistics captured once per simulated year

use serde::{Deserialize, Serialize};

use crate::simulation::economy::GlobalFactors;
use crate::simulation::people::Person;
use crate::simulation::types::AgeGroup;

/// Snapshot of one simulated year
///
/// Head counts and the age list are taken after immigration and before
/// pairing; births and deaths are the outcomes of the same year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearStats {
    pub year: u32,
    pub population: usize,
    pub urban: usize,
    pub rural: usize,
    pub mean_education: f64,
    pub ages: Vec<u32>,
    pub dependency_ratio: f64,
    pub immigrants: usize,
    pub births: usize,
    pub deaths: usize,
    pub unemployment: f64,
    pub policy_index: f64,
}

impl YearStats {
    pub fn capture(year: u32, people: &[Person], factors: &GlobalFactors, immigrants: usize) -> Self {
        let population = people.len();
        let urban = people.iter().filter(|p| p.urban).count();
        let ages: Vec<u32> = people.iter().map(|p| p.age).collect();

        YearStats {
            year,
            population,
            urban,
            rural: population - urban,
            mean_education: mean_education(people),
            dependency_ratio: dependency_ratio(&ages),
            ages,
            immigrants,
            births: 0,
            deaths: 0,
            unemployment: factors.unemployment,
            policy_index: factors.policy_index,
        }
    }
}

/// Mean education, zero for an empty population
pub fn mean_education(people: &[Person]) -> f64 {
    if people.is_empty() {
        return 0.0;
    }
    people.iter().map(|p| p.education).sum::<f64>() / people.len() as f64
}

/// (young + old) / working-age, zero when nobody is of working age
pub fn dependency_ratio(ages: &[u32]) -> f64 {
    let mut dependents = 0usize;
    let mut working = 0usize;
    for &age in ages {
        match AgeGroup::from_age(age) {
            AgeGroup::WorkingAge => working += 1,
            AgeGroup::Young | AgeGroup::Old => dependents += 1,
        }
    }
    if working == 0 {
        0.0
    } else {
        dependents as f64 / working as f64
    }
}
