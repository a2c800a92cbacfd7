//! Individual model
//!
//! An individual carries its demographic attributes plus id links to a partner
//! and to the children it produced. Fertility and mortality are pure functions
//! of those attributes and the environment passed in.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::types::{PersonId, Sex, ADULT_AGE};

/// Lower bound for income
pub const MIN_INCOME: f64 = 0.2;
/// Upper bound for income
pub const MAX_INCOME: f64 = 1.0;

// Gompertz-Makeham style hazard: infant term + constant + senescence term
const INFANT_HAZARD: f64 = 0.005;
const INFANT_DECAY: f64 = 1.0;
const BACKGROUND_HAZARD: f64 = 0.0001;
const SENESCENCE_HAZARD: f64 = 0.0001;
const SENESCENCE_GROWTH: f64 = 0.077;

/// A single member of the population
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub sex: Sex,
    /// Age in whole years
    pub age: u32,
    /// Education level, always within [0, 1]
    pub education: f64,
    /// Relative income, always within [0.2, 1.0]
    pub income: f64,
    pub urban: bool,
    /// Current partner, symmetric with the partner's own link
    pub partner: Option<PersonId>,
    /// Children in birth order
    pub children: Vec<PersonId>,
    /// Set once the couple has tried to conceive this year
    pub attempted_conception: bool,
}

impl Person {
    pub fn new(id: PersonId, sex: Sex, age: u32, education: f64, income: f64, urban: bool) -> Self {
        Person {
            id,
            sex,
            age,
            education: education.clamp(0.0, 1.0),
            income: income.clamp(MIN_INCOME, MAX_INCOME),
            urban,
            partner: None,
            children: Vec::new(),
            attempted_conception: false,
        }
    }

    /// Founding member with uniformly drawn education and income; age is set later
    pub fn random_founder<R: Rng>(id: PersonId, sex: Sex, urban: bool, rng: &mut R) -> Self {
        let education = rng.gen_range(0.0..1.0);
        let income = rng.gen_range(MIN_INCOME..MAX_INCOME);
        Person::new(id, sex, 0, education, income, urban)
    }

    pub fn is_adult(&self) -> bool {
        self.age >= ADULT_AGE
    }

    pub fn is_partnered(&self) -> bool {
        self.partner.is_some()
    }

    /// Both unpartnered adults of different sex
    pub fn can_pair_with(&self, other: &Person) -> bool {
        self.is_adult()
            && other.is_adult()
            && !self.is_partnered()
            && !other.is_partnered()
            && self.sex != other.sex
    }

    /// Age- and sex-dependent fertility factor in [0, 1]
    pub fn fertility(&self) -> f64 {
        match self.sex {
            Sex::Female => match self.age {
                0..=19 => 0.8,
                20..=30 => 1.0,
                31..=35 => 0.8,
                36..=40 => 0.5,
                41..=45 => 0.2,
                _ => 0.01,
            },
            Sex::Male => match self.age {
                0..=19 => 0.9,
                20..=35 => 1.0,
                36..=50 => 0.8,
                51..=65 => 0.3,
                _ => 0.1,
            },
        }
    }

    /// Annual probability of death before clamping
    ///
    /// U-shaped in age; better healthcare removes up to half the hazard and
    /// income plus education remove up to another half.
    pub fn mortality(&self, healthcare_quality: f64) -> f64 {
        let age = f64::from(self.age);
        let base = INFANT_HAZARD * (-INFANT_DECAY * age).exp()
            + BACKGROUND_HAZARD
            + SENESCENCE_HAZARD * (SENESCENCE_GROWTH * age).exp();
        let healthcare_modifier = 1.0 - healthcare_quality * 0.5;
        let affluence_modifier = 1.0 - (self.income + self.education) / 4.0;
        base * healthcare_modifier * affluence_modifier
    }

    /// One year of income drift for working-age adults, scaled by the policy index
    pub fn drift_income<R: Rng>(&mut self, policy_index: f64, rng: &mut R) {
        let step = rng.gen_range(-0.05..0.10) * policy_index;
        self.income = (self.income + step).clamp(MIN_INCOME, MAX_INCOME);
    }

    /// Schooling growth for ages 5-25
    pub fn grow_education(&mut self, education_impact: f64) {
        if (5..=25).contains(&self.age) {
            self.education = (self.education + 0.02 * education_impact).clamp(0.0, 1.0);
        }
    }
}
