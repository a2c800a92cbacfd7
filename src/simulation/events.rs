//! Time-windowed policy events and the yearly parameter merge
//!
//! Each year the base parameters are copied into an [`ActiveParameters`] and
//! every event whose window contains the year overwrites the keys it carries,
//! in list order. The last active event in the list wins a conflict.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{SimError, SimResult};
use crate::simulation::params::{check_finite, check_range, SimulationParams};

/// Largest yearly immigration inflow an event may request
pub const MAX_IMMIGRATION_INFLOW: f64 = 1_000_000.0;

/// Parameter names an event may override
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKey {
    ChildSupport,
    EducationImpact,
    HealthcareQuality,
    ImmigrationInflow,
}

impl ParamKey {
    pub fn name(&self) -> &'static str {
        match self {
            ParamKey::ChildSupport => "childSupport",
            ParamKey::EducationImpact => "educationImpact",
            ParamKey::HealthcareQuality => "healthcareQuality",
            ParamKey::ImmigrationInflow => "immigrationInflow",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = SimError;

    /// Accepts camelCase and snake_case spellings
    fn from_str(s: &str) -> SimResult<Self> {
        match s.trim() {
            "childSupport" | "child_support" => Ok(ParamKey::ChildSupport),
            "educationImpact" | "education_impact" => Ok(ParamKey::EducationImpact),
            "healthcareQuality" | "healthcare_quality" => Ok(ParamKey::HealthcareQuality),
            "immigrationInflow" | "immigration_inflow" => Ok(ParamKey::ImmigrationInflow),
            other => Err(SimError::UnknownParameter(other.to_string())),
        }
    }
}

/// A named policy change active over an inclusive range of year indices
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub start_year: u32,
    pub end_year: u32,
    pub overrides: BTreeMap<ParamKey, f64>,
}

impl Event {
    pub fn new(name: impl Into<String>, start_year: u32, end_year: u32) -> Self {
        Event {
            name: name.into(),
            start_year,
            end_year,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, key: ParamKey, value: f64) -> Self {
        self.overrides.insert(key, value);
        self
    }

    /// Raised child support over a span of years
    pub fn baby_boom(start_year: u32, end_year: u32, child_support: f64) -> Self {
        Event::new("Baby Boom", start_year, end_year).with_override(ParamKey::ChildSupport, child_support)
    }

    /// Yearly inflow of immigrants over a span of years
    pub fn immigration_wave(start_year: u32, end_year: u32, inflow: f64) -> Self {
        Event::new("Immigration Wave", start_year, end_year)
            .with_override(ParamKey::ImmigrationInflow, inflow)
    }

    pub fn is_active(&self, year: u32) -> bool {
        self.start_year <= year && year <= self.end_year
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.end_year < self.start_year {
            return Err(SimError::InvalidEventWindow {
                name: self.name.clone(),
                start: self.start_year,
                end: self.end_year,
            });
        }
        for (&key, &value) in &self.overrides {
            let name = key.name();
            match key {
                ParamKey::ChildSupport => check_range(name, value, 0.0, f64::MAX)?,
                ParamKey::EducationImpact => check_finite(name, value)?,
                ParamKey::HealthcareQuality => check_range(name, value, 0.0, 1.0)?,
                ParamKey::ImmigrationInflow => check_range(name, value, 0.0, MAX_IMMIGRATION_INFLOW)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Event {
    type Err = SimError;

    /// Parse `NAME:START:END:key=value[,key=value...]`
    fn from_str(s: &str) -> SimResult<Self> {
        let invalid = || SimError::InvalidEventSpec(s.to_string());

        let parts: Vec<&str> = s.splitn(4, ':').collect();
        if parts.len() != 4 || parts[0].trim().is_empty() {
            return Err(invalid());
        }
        let start: u32 = parts[1].trim().parse().map_err(|_| invalid())?;
        let end: u32 = parts[2].trim().parse().map_err(|_| invalid())?;

        let mut event = Event::new(parts[0].trim(), start, end);
        for assignment in parts[3].split(',').filter(|a| !a.trim().is_empty()) {
            let (key, value) = assignment.split_once('=').ok_or_else(invalid)?;
            let key: ParamKey = key.parse()?;
            let value: f64 = value.trim().parse().map_err(|_| invalid())?;
            event.overrides.insert(key, value);
        }
        if event.overrides.is_empty() {
            return Err(invalid());
        }
        Ok(event)
    }
}

/// The merged parameter set for one simulated year
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveParameters {
    pub child_support: f64,
    pub education_impact: f64,
    pub healthcare_quality: f64,
    /// Zero unless an active event supplies it
    pub immigration_inflow: f64,
}

impl ActiveParameters {
    /// Base values for `year`, overlaid by every active event in order
    pub fn resolve(year: u32, params: &SimulationParams, events: &[Event]) -> Self {
        let mut active = ActiveParameters {
            child_support: params.child_support,
            education_impact: params.education_impact.at(year),
            healthcare_quality: params.healthcare_quality,
            immigration_inflow: 0.0,
        };

        for event in events.iter().filter(|e| e.is_active(year)) {
            for (key, value) in &event.overrides {
                active.set(*key, *value);
            }
        }

        active
    }

    pub fn get(&self, key: ParamKey) -> f64 {
        match key {
            ParamKey::ChildSupport => self.child_support,
            ParamKey::EducationImpact => self.education_impact,
            ParamKey::HealthcareQuality => self.healthcare_quality,
            ParamKey::ImmigrationInflow => self.immigration_inflow,
        }
    }

    fn set(&mut self, key: ParamKey, value: f64) {
        match key {
            ParamKey::ChildSupport => self.child_support = value,
            ParamKey::EducationImpact => self.education_impact = value,
            ParamKey::HealthcareQuality => self.healthcare_quality = value,
            ParamKey::ImmigrationInflow => self.immigration_inflow = value,
        }
    }

    /// Immigrants of each sex arriving this year
    pub fn immigrants_per_sex(&self) -> usize {
        if self.immigration_inflow > 0.0 {
            (self.immigration_inflow / 2.0).floor() as usize
        } else {
            0
        }
    }
}
