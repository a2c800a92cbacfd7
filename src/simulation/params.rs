//! Configuration parameters for the population simulation

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::simulation::economy::RegimeSchedule;
use crate::simulation::events::Event;

/// Strength of the education effect on fertility and schooling
///
/// Either one value for the whole run or one value per simulated year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EducationImpact {
    Constant(f64),
    PerYear(Vec<f64>),
}

impl EducationImpact {
    /// Value for a year index
    ///
    /// Panics if a per-year series is shorter than `year + 1`.
    /// [`SimulationParams::validate`] requires the series to cover every year.
    pub fn at(&self, year: u32) -> f64 {
        match self {
            EducationImpact::Constant(v) => *v,
            EducationImpact::PerYear(series) => series[year as usize],
        }
    }
}

impl Default for EducationImpact {
    fn default() -> Self {
        EducationImpact::Constant(0.5)
    }
}

/// Main configuration for a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Starting head count, split evenly between males and females
    pub initial_population: usize,
    /// Number of simulated years
    pub years: u32,
    /// Probability that a founder or immigrant lives in a city
    pub urban_ratio: f64,
    /// Base child-support policy level
    pub child_support: f64,
    pub education_impact: EducationImpact,
    /// Base healthcare quality in [0, 1]
    pub healthcare_quality: f64,
    /// Placement of the economic regime breakpoints
    pub regime: RegimeSchedule,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            initial_population: 1000,
            years: 100,
            urban_ratio: 0.6,
            child_support: 0.0,
            education_impact: EducationImpact::default(),
            healthcare_quality: 0.8,
            regime: RegimeSchedule::default(),
        }
    }
}

impl SimulationParams {
    /// Create params for a fast test run
    pub fn fast_test() -> Self {
        SimulationParams {
            initial_population: 200,
            years: 10,
            ..Self::default()
        }
    }

    /// Starting values of the interactive dashboard
    pub fn dashboard() -> Self {
        SimulationParams {
            initial_population: 10_000,
            years: 20,
            ..Self::default()
        }
    }

    /// Reject a configuration before any state is created
    pub fn validate(&self, events: &[Event]) -> SimResult<()> {
        if self.initial_population % 2 != 0 {
            return Err(SimError::OddPopulation(self.initial_population));
        }
        if self.years == 0 {
            return Err(SimError::NoYears);
        }

        check_range("urban_ratio", self.urban_ratio, 0.0, 1.0)?;
        check_range("healthcare_quality", self.healthcare_quality, 0.0, 1.0)?;
        check_range("child_support", self.child_support, 0.0, f64::MAX)?;

        match &self.education_impact {
            EducationImpact::Constant(v) => check_finite("education_impact", *v)?,
            EducationImpact::PerYear(series) => {
                if series.len() != self.years as usize {
                    return Err(SimError::EducationSeriesLength {
                        expected: self.years as usize,
                        actual: series.len(),
                    });
                }
                for v in series {
                    check_finite("education_impact", *v)?;
                }
            }
        }

        for event in events {
            event.validate()?;
        }

        Ok(())
    }
}

/// A run configuration together with its events, as stored in a JSON file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub params: SimulationParams,
    pub events: Vec<Event>,
}

impl Scenario {
    pub fn from_json_file(path: &str) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

pub(crate) fn check_finite(name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::NonFinite(name.to_string()))
    }
}

pub(crate) fn check_range(name: &str, value: f64, min: f64, max: f64) -> SimResult<()> {
    check_finite(name, value)?;
    if value < min || value > max {
        return Err(SimError::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}
