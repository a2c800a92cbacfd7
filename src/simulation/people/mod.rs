//! Individual-level demographics
//!
//! - `person`: attributes, fertility and mortality curves
//! - `conception`: couple conception probability and newborn traits
//! - `population`: the owned collection and its yearly phases

pub mod person;
pub mod conception;
pub mod population;

pub use person::{Person, MIN_INCOME, MAX_INCOME};
pub use conception::{conception_probability, newborn};
pub use population::{Population, PairingResult, MortalityResult};
