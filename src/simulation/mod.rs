//! Year-stepped population simulation
//!
//! Models pairing, reproduction, mortality, aging, education, income,
//! urban/rural composition and migration for a synthetic population under
//! a configurable economic regime and time-windowed policy events.
//!
//! # Module Structure
//!
//! - `types`: Core type definitions (PersonId, Sex, AgeGroup)
//! - `params`: Run configuration and validation
//! - `economy`: Global economic regime by calendar year
//! - `events`: Policy events and the yearly parameter merge
//! - `model`: Probability clamping shared by the stochastic phases
//! - `people`: Individuals, conception and the population container
//! - `stats`: Per-year statistics
//! - `simulation`: Main simulation state and yearly loop
//! - `report`: Run report and histogram helpers
//! - `export`: JSON export and text summary
//!
//! # Usage
//!
//! ```ignore
//! use population_simulator::simulation::{SimulationParams, Event, run_simulation};
//!
//! let params = SimulationParams::default();
//! let events = vec![Event::baby_boom(20, 40, 0.2)];
//! let report = run_simulation(&params, &events, &mut rng)?;
//! ```

pub mod types;
pub mod params;
pub mod economy;
pub mod events;
pub mod model;
pub mod people;
pub mod stats;
pub mod simulation;
pub mod report;
pub mod export;

// Re-export main types for convenience
pub use types::{PersonId, Sex, AgeGroup};
pub use params::{SimulationParams, EducationImpact, Scenario};
pub use economy::{GlobalFactors, RegimeSchedule};
pub use events::{Event, ParamKey, ActiveParameters, MAX_IMMIGRATION_INFLOW};
pub use people::{Person, Population};
pub use stats::{YearStats, dependency_ratio};
pub use simulation::{SimulationState, run_simulation};
pub use report::{RunReport, HistogramBin, age_histogram};
pub use export::{export_report, generate_summary, render_histogram};
