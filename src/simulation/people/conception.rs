//! Conception model and newborn creation

use rand::Rng;

use crate::simulation::people::person::{Person, MAX_INCOME, MIN_INCOME};
use crate::simulation::types::{PersonId, Sex};

/// Monthly conception rate at full fertility, scaled to a year below
const MONTHLY_RATE: f64 = 0.25;
/// Rural education weighs half as much against fertility
const RURAL_EDUCATION_WEIGHT: f64 = 0.5;

/// Annual conception probability for a couple, before clamping
///
/// Can exceed 1 under strong child-support policy; callers clamp before
/// drawing (see [`crate::simulation::model::clamp_probability`]).
pub fn conception_probability(
    female: &Person,
    male: &Person,
    child_support: f64,
    education_impact: f64,
) -> f64 {
    let combined_fertility = female.fertility() * male.fertility();
    let birth_order = female.children.len() as f64 + 1.0;

    let base_prob = (combined_fertility * MONTHLY_RATE * 12.0).min(1.0) / birth_order;

    let education_weight = if female.urban { 1.0 } else { RURAL_EDUCATION_WEIGHT };
    let education_modifier = 1.0 - female.education * education_impact * education_weight;

    let income_modifier = 1.0 + female.income * 0.1 + child_support * birth_order;

    base_prob * education_modifier * income_modifier
}

/// Create a newborn from its parents
///
/// Education and income are the parental averages plus noise, clamped to
/// their bounds; the child lives where the mother lives.
pub fn newborn<R: Rng>(id: PersonId, mother: &Person, father: &Person, rng: &mut R) -> Person {
    let sex = Sex::random(rng);
    let education = (mother.education + father.education) / 2.0 + rng.gen_range(-0.1..0.1);
    let income = (mother.income + father.income) / 2.0 + rng.gen_range(-0.2..0.2);
    Person::new(
        id,
        sex,
        0,
        education.clamp(0.0, 1.0),
        income.clamp(MIN_INCOME, MAX_INCOME),
        mother.urban,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn couple(age: u32) -> (Person, Person) {
        let female = Person::new(PersonId(1), Sex::Female, age, 0.0, 0.2, true);
        let male = Person::new(PersonId(2), Sex::Male, age, 0.0, 0.2, true);
        (female, male)
    }

    #[test]
    fn test_peak_couple_probability() {
        let (female, male) = couple(25);
        // min(1*0.25*12, 1) / 1 * 1 * (1 + 0.02)
        let p = conception_probability(&female, &male, 0.0, 0.5);
        assert!((p - 1.02).abs() < 1e-12);
    }

    #[test]
    fn test_birth_order_dampens_probability() {
        let (mut female, male) = couple(25);
        let first = conception_probability(&female, &male, 0.0, 0.5);
        female.children.push(PersonId(10));
        let second = conception_probability(&female, &male, 0.0, 0.5);
        assert!((second - first / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_urban_education_suppresses_more() {
        let (mut female, male) = couple(25);
        female.education = 1.0;
        let urban = conception_probability(&female, &male, 0.0, 0.8);
        female.urban = false;
        let rural = conception_probability(&female, &male, 0.0, 0.8);
        assert!(urban < rural);
        assert!((urban - 1.02 * 0.2).abs() < 1e-12);
        assert!((rural - 1.02 * 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_child_support_scales_with_family_size() {
        let (mut female, male) = couple(25);
        female.children = vec![PersonId(10), PersonId(11)];
        let without = conception_probability(&female, &male, 0.0, 0.0);
        let with = conception_probability(&female, &male, 0.5, 0.0);
        // income modifier grows by 0.5 * 3
        assert!((with - without * (1.02 + 1.5) / 1.02).abs() < 1e-12);
    }

    #[test]
    fn test_newborn_inherits_bounded_traits() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut mother = Person::new(PersonId(1), Sex::Female, 28, 1.0, 1.0, false);
        let father = Person::new(PersonId(2), Sex::Male, 30, 1.0, 1.0, true);
        for i in 0..200 {
            let child = newborn(PersonId(100 + i), &mother, &father, &mut rng);
            assert_eq!(child.age, 0);
            assert!(!child.urban);
            assert!(child.partner.is_none());
            assert!(child.education >= 0.9 && child.education <= 1.0);
            assert!(child.income >= 0.8 && child.income <= MAX_INCOME);
        }

        mother.income = MIN_INCOME;
        mother.education = 0.0;
        let child = newborn(PersonId(999), &mother, &Person::new(PersonId(3), Sex::Male, 30, 0.0, MIN_INCOME, true), &mut rng);
        assert!(child.education >= 0.0);
        assert!(child.income >= MIN_INCOME);
    }
}
