//! Global economic regime
//!
//! Macro conditions are a step function of the calendar year. Nothing is
//! carried between years: the factors are recomputed from the year index
//! every iteration.

use serde::{Deserialize, Serialize};

/// Calendar placement of the regime breakpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeSchedule {
    /// Calendar year of simulation year index 0
    pub start_year: i64,
    /// First calendar year of the middle regime
    pub mid_regime_year: i64,
    /// First calendar year of the late regime
    pub late_regime_year: i64,
}

impl Default for RegimeSchedule {
    fn default() -> Self {
        RegimeSchedule {
            start_year: 0,
            mid_regime_year: 1980,
            late_regime_year: 2000,
        }
    }
}

impl RegimeSchedule {
    pub fn calendar_year(&self, year_index: u32) -> i64 {
        self.start_year + i64::from(year_index)
    }
}

/// Macro parameters for a single year
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalFactors {
    pub unemployment: f64,
    /// Scales the yearly income random walk
    pub policy_index: f64,
}

impl GlobalFactors {
    pub fn for_year(year_index: u32, schedule: &RegimeSchedule) -> Self {
        let year = schedule.calendar_year(year_index);
        if year < schedule.mid_regime_year {
            GlobalFactors {
                unemployment: 0.04,
                policy_index: 1.1,
            }
        } else if year < schedule.late_regime_year {
            GlobalFactors {
                unemployment: 0.07,
                policy_index: 1.0,
            }
        } else {
            GlobalFactors {
                unemployment: 0.09,
                policy_index: 0.9,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_uses_year_index() {
        let schedule = RegimeSchedule::default();
        assert_eq!(GlobalFactors::for_year(0, &schedule).policy_index, 1.1);
        assert_eq!(GlobalFactors::for_year(1979, &schedule).unemployment, 0.04);
        assert_eq!(GlobalFactors::for_year(1980, &schedule).policy_index, 1.0);
        assert_eq!(GlobalFactors::for_year(1999, &schedule).unemployment, 0.07);
        assert_eq!(GlobalFactors::for_year(2000, &schedule).policy_index, 0.9);
        assert_eq!(GlobalFactors::for_year(2500, &schedule).unemployment, 0.09);
    }

    #[test]
    fn test_calendar_start_shifts_breakpoints() {
        let schedule = RegimeSchedule {
            start_year: 1970,
            ..RegimeSchedule::default()
        };
        assert_eq!(GlobalFactors::for_year(9, &schedule).policy_index, 1.1);
        assert_eq!(GlobalFactors::for_year(10, &schedule).policy_index, 1.0);
        assert_eq!(GlobalFactors::for_year(30, &schedule).policy_index, 0.9);
    }
}
