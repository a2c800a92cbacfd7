//! Main simulation state and yearly loop

use rand::Rng;
use rand_distr::Normal;
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::simulation::economy::GlobalFactors;
use crate::simulation::events::{ActiveParameters, Event};
use crate::simulation::params::SimulationParams;
use crate::simulation::people::Population;
use crate::simulation::report::RunReport;
use crate::simulation::stats::YearStats;

const FOUNDER_AGE_MEAN: f64 = 30.0;
const FOUNDER_AGE_SD: f64 = 20.0;
const IMMIGRANT_AGE_MEAN: f64 = 25.0;
const IMMIGRANT_AGE_SD: f64 = 10.0;

/// Main simulation state
///
/// Each call to [`SimulationState::step`] runs one year through its phases in
/// fixed order: regime, parameter merge, immigration, snapshot, pairing and
/// conception, mortality, rebuild, education growth.
#[derive(Clone, Debug)]
pub struct SimulationState {
    /// Index of the next year to simulate
    pub year: u32,
    pub population: Population,
    pub initial_ages: Vec<u32>,
    pub childbearing_ages: Vec<u32>,
    pub history: Vec<YearStats>,
    params: SimulationParams,
    events: Vec<Event>,
    immigrant_ages: Normal<f64>,
}

impl SimulationState {
    /// Validate the configuration and create the founding population
    pub fn new<R: Rng>(params: SimulationParams, events: Vec<Event>, rng: &mut R) -> SimResult<Self> {
        params.validate(&events)?;

        let founder_ages = age_distribution(FOUNDER_AGE_MEAN, FOUNDER_AGE_SD)?;
        let immigrant_ages = age_distribution(IMMIGRANT_AGE_MEAN, IMMIGRANT_AGE_SD)?;

        let mut population = Population::new();
        let initial_ages = population.add_founders(
            params.initial_population / 2,
            params.urban_ratio,
            &founder_ages,
            rng,
        );

        Ok(SimulationState {
            year: 0,
            population,
            initial_ages,
            childbearing_ages: Vec::new(),
            history: Vec::with_capacity(params.years as usize),
            params,
            events,
            immigrant_ages,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.year >= self.params.years
    }

    /// Advance one year; returns `None` once every requested year has run
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Option<&YearStats> {
        if self.is_finished() {
            return None;
        }
        let year = self.year;

        let factors = GlobalFactors::for_year(year, &self.params.regime);
        let active = ActiveParameters::resolve(year, &self.params, &self.events);

        let immigrants = self.population.add_immigrants(
            active.immigrants_per_sex(),
            self.params.urban_ratio,
            &self.immigrant_ages,
            rng,
        );

        let mut stats = YearStats::capture(year, self.population.people(), &factors, immigrants);

        self.population.shuffle(rng);
        let pairing = self.population.pair_and_conceive(&active, rng);
        debug_assert!(self.population.partners_are_symmetric());
        self.childbearing_ages.extend_from_slice(&pairing.parent_ages);

        let mortality = self
            .population
            .apply_mortality(active.healthcare_quality, factors.policy_index, rng);

        stats.births = pairing.newborns.len();
        stats.deaths = mortality.death_count();

        self.population.rebuild(&mortality.deceased, pairing.newborns);
        self.population.grow_education(active.education_impact);

        debug!(
            year,
            immigrants,
            births = stats.births,
            deaths = stats.deaths,
            pairs = pairing.pairs_formed,
            population = self.population.len(),
            "year complete"
        );
        if year > 0 && year % 10 == 0 {
            info!("Year {}: population {}", year, self.population.len());
        }

        self.history.push(stats);
        self.year += 1;
        self.history.last()
    }

    pub fn into_report(self) -> RunReport {
        let final_ages = self.population.ages();
        RunReport {
            population: self.population.into_people(),
            initial_ages: self.initial_ages,
            final_ages,
            childbearing_ages: self.childbearing_ages,
            years: self.history,
        }
    }
}

fn age_distribution(mean: f64, sd: f64) -> SimResult<Normal<f64>> {
    Normal::new(mean, sd).map_err(|e| SimError::Distribution(e.to_string()))
}

/// Run the full simulation
///
/// Fails before creating any individual if the configuration is invalid;
/// otherwise runs every requested year.
pub fn run_simulation<R: Rng>(
    params: &SimulationParams,
    events: &[Event],
    rng: &mut R,
) -> SimResult<RunReport> {
    let mut state = SimulationState::new(params.clone(), events.to_vec(), rng)?;

    info!(
        initial_population = params.initial_population,
        years = params.years,
        events = events.len(),
        "Simulation initialized"
    );

    while state.step(rng).is_some() {}

    let report = state.into_report();
    info!(
        final_population = report.final_size(),
        births = report.total_births(),
        deaths = report.total_deaths(),
        "Simulation complete"
    );
    Ok(report)
}
