//! Run report handed to the presentation layer

use serde::{Deserialize, Serialize};

use crate::simulation::people::Person;
use crate::simulation::stats::{dependency_ratio, mean_education, YearStats};

/// Everything a finished run produces
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Individuals alive at the end of the last year
    pub population: Vec<Person>,
    pub initial_ages: Vec<u32>,
    pub final_ages: Vec<u32>,
    /// Mother's and father's age at every birth over the whole run
    pub childbearing_ages: Vec<u32>,
    /// One entry per simulated year, in order
    pub years: Vec<YearStats>,
}

/// One bar of an age histogram, covering `[start, end)` (the last bar is closed)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl RunReport {
    pub fn pop_sizes(&self) -> Vec<usize> {
        self.years.iter().map(|y| y.population).collect()
    }

    pub fn urban_population(&self) -> Vec<usize> {
        self.years.iter().map(|y| y.urban).collect()
    }

    pub fn rural_population(&self) -> Vec<usize> {
        self.years.iter().map(|y| y.rural).collect()
    }

    pub fn avg_education(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.mean_education).collect()
    }

    pub fn age_distributions(&self) -> Vec<&[u32]> {
        self.years.iter().map(|y| y.ages.as_slice()).collect()
    }

    pub fn dependency_ratios(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.dependency_ratio).collect()
    }

    pub fn final_size(&self) -> usize {
        self.population.len()
    }

    /// Largest snapshot size, including the final population
    pub fn peak_population(&self) -> usize {
        self.years
            .iter()
            .map(|y| y.population)
            .chain(std::iter::once(self.population.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn total_births(&self) -> usize {
        self.years.iter().map(|y| y.births).sum()
    }

    pub fn total_deaths(&self) -> usize {
        self.years.iter().map(|y| y.deaths).sum()
    }

    pub fn total_immigrants(&self) -> usize {
        self.years.iter().map(|y| y.immigrants).sum()
    }

    pub fn final_dependency_ratio(&self) -> f64 {
        dependency_ratio(&self.final_ages)
    }

    pub fn final_mean_education(&self) -> f64 {
        mean_education(&self.population)
    }

    pub fn mean_childbearing_age(&self) -> Option<f64> {
        if self.childbearing_ages.is_empty() {
            return None;
        }
        let total: u64 = self.childbearing_ages.iter().map(|&a| u64::from(a)).sum();
        Some(total as f64 / self.childbearing_ages.len() as f64)
    }
}

/// Equal-width histogram between the smallest and largest age
pub fn age_histogram(ages: &[u32], bins: usize) -> Vec<HistogramBin> {
    let (min, max) = match (ages.iter().min(), ages.iter().max()) {
        (Some(&min), Some(&max)) if bins > 0 => (f64::from(min), f64::from(max)),
        _ => return Vec::new(),
    };
    // A single distinct age still gets one unit of width
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 / bins as f64 };

    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &age in ages {
        let slot = ((f64::from(age) - min) / width) as usize;
        histogram[slot.min(bins - 1)].count += 1;
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::{PersonId, Sex};

    fn year(index: u32, population: usize, births: usize, deaths: usize) -> YearStats {
        YearStats {
            year: index,
            population,
            urban: population / 2,
            rural: population - population / 2,
            mean_education: 0.5,
            ages: vec![30; population],
            dependency_ratio: 0.0,
            immigrants: 0,
            births,
            deaths,
            unemployment: 0.04,
            policy_index: 1.1,
        }
    }

    #[test]
    fn test_series_accessors() {
        let report = RunReport {
            population: vec![Person::new(PersonId(0), Sex::Male, 31, 0.5, 0.5, true)],
            initial_ages: vec![30, 30],
            final_ages: vec![31],
            childbearing_ages: vec![28, 32],
            years: vec![year(0, 2, 0, 0), year(1, 2, 0, 1)],
        };
        assert_eq!(report.pop_sizes(), vec![2, 2]);
        assert_eq!(report.urban_population(), vec![1, 1]);
        assert_eq!(report.rural_population(), vec![1, 1]);
        assert_eq!(report.age_distributions()[1], &[30, 30]);
        assert_eq!(report.total_deaths(), 1);
        assert_eq!(report.peak_population(), 2);
        assert_eq!(report.mean_childbearing_age(), Some(30.0));
        assert_eq!(report.final_size(), 1);
    }

    #[test]
    fn test_age_histogram() {
        let histogram = age_histogram(&[0, 10, 20, 30, 40], 4);
        assert_eq!(histogram.len(), 4);
        let counts: Vec<usize> = histogram.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(histogram[0].start, 0.0);
        assert_eq!(histogram[3].end, 40.0);
    }

    #[test]
    fn test_age_histogram_degenerate_inputs() {
        assert!(age_histogram(&[], 5).is_empty());
        assert!(age_histogram(&[3, 4], 0).is_empty());
        let single = age_histogram(&[7, 7, 7], 3);
        assert_eq!(single.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(single[0].count, 3);
    }
}
