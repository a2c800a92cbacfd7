//! Population container and the per-individual yearly phases
//!
//! Individuals live in a `Vec` whose order is meaningful: the pairing scan
//! walks it left to right after a shuffle. An id -> position index is rebuilt
//! whenever the order changes so partner links can be followed.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::simulation::events::ActiveParameters;
use crate::simulation::model::bernoulli;
use crate::simulation::people::conception::{conception_probability, newborn};
use crate::simulation::people::person::Person;
use crate::simulation::types::{PersonId, Sex, ADULT_AGE};

/// Outcome of one pairing and conception sweep
#[derive(Clone, Debug, Default)]
pub struct PairingResult {
    /// Couples formed during the sweep
    pub pairs_formed: usize,
    /// Conception attempts, successful or not
    pub attempts: usize,
    /// Children born this year, not yet part of the population
    pub newborns: Vec<Person>,
    /// Mother's and father's age for every birth, in that order
    pub parent_ages: Vec<u32>,
}

/// Outcome of the mortality phase
#[derive(Clone, Debug, Default)]
pub struct MortalityResult {
    pub deceased: HashSet<PersonId>,
}

impl MortalityResult {
    pub fn death_count(&self) -> usize {
        self.deceased.len()
    }
}

/// The set of living individuals, exclusively owned by the simulation
#[derive(Clone, Debug, Default)]
pub struct Population {
    people: Vec<Person>,
    index: HashMap<PersonId, usize>,
    next_id: u64,
}

impl Population {
    pub fn new() -> Self {
        Population::default()
    }

    /// Build a population from existing individuals, keeping their order
    pub fn from_people(people: Vec<Person>) -> Self {
        let next_id = people.iter().map(|p| p.id.0 + 1).max().unwrap_or(0);
        let mut population = Population {
            people,
            index: HashMap::new(),
            next_id,
        };
        population.reindex();
        population
    }

    fn next_person_id(&mut self) -> PersonId {
        let id = PersonId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, person: Person) {
        self.index.insert(person.id, self.people.len());
        self.people.push(person);
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, person) in self.people.iter().enumerate() {
            self.index.insert(person.id, i);
        }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn into_people(self) -> Vec<Person> {
        self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.index.get(&id).map(|&i| &self.people[i])
    }

    pub fn ages(&self) -> Vec<u32> {
        self.people.iter().map(|p| p.age).collect()
    }

    /// Add `per_sex` males followed by `per_sex` females with random traits
    ///
    /// Ages are drawn afterwards, one per founder in population order, as
    /// `max(trunc(x), 0)` of the age distribution. Returns the drawn ages.
    pub fn add_founders<R: Rng>(
        &mut self,
        per_sex: usize,
        urban_ratio: f64,
        age_distribution: &Normal<f64>,
        rng: &mut R,
    ) -> Vec<u32> {
        let first = self.people.len();
        for sex in [Sex::Male, Sex::Female] {
            for _ in 0..per_sex {
                let urban = bernoulli(rng, urban_ratio);
                let id = self.next_person_id();
                let person = Person::random_founder(id, sex, urban, rng);
                self.push(person);
            }
        }

        let mut ages = Vec::with_capacity(per_sex * 2);
        for person in &mut self.people[first..] {
            let age = sample_age(age_distribution, 0, rng);
            person.age = age;
            ages.push(age);
        }
        ages
    }

    /// Add `per_sex` male/female immigrant pairs; returns the number added
    pub fn add_immigrants<R: Rng>(
        &mut self,
        per_sex: usize,
        urban_ratio: f64,
        age_distribution: &Normal<f64>,
        rng: &mut R,
    ) -> usize {
        for _ in 0..per_sex {
            for sex in [Sex::Male, Sex::Female] {
                let urban = bernoulli(rng, urban_ratio);
                let age = sample_age(age_distribution, ADULT_AGE, rng);
                let education = rng.gen_range(0.2..0.8);
                let income = rng.gen_range(0.2..0.6);
                let id = self.next_person_id();
                self.push(Person::new(id, sex, age, education, income, urban));
            }
        }
        per_sex * 2
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.people.shuffle(rng);
        self.reindex();
    }

    /// Single left-to-right sweep over adjacent pairs
    ///
    /// For each `(a, b)` at positions `(i, i + 1)` only the first matching
    /// rule applies: pair two free adults of different sex, otherwise let a
    /// partnered `a` that has not tried this year attempt conception with its
    /// partner. Changes made at position `i` are visible at `i + 1`.
    pub fn pair_and_conceive<R: Rng>(&mut self, active: &ActiveParameters, rng: &mut R) -> PairingResult {
        let mut result = PairingResult::default();

        for i in 0..self.people.len().saturating_sub(1) {
            if self.people[i].can_pair_with(&self.people[i + 1]) {
                let a_id = self.people[i].id;
                let b_id = self.people[i + 1].id;
                self.people[i].partner = Some(b_id);
                self.people[i + 1].partner = Some(a_id);
                result.pairs_formed += 1;
                continue;
            }

            let a = &self.people[i];
            let partner_pos = match a.partner {
                Some(partner_id) if !a.attempted_conception => match self.index.get(&partner_id) {
                    Some(&j) => j,
                    None => continue,
                },
                _ => continue,
            };

            self.people[i].attempted_conception = true;
            self.people[partner_pos].attempted_conception = true;
            result.attempts += 1;

            let (mother_pos, father_pos) = if self.people[i].sex == Sex::Female {
                (i, partner_pos)
            } else {
                (partner_pos, i)
            };

            let probability = conception_probability(
                &self.people[mother_pos],
                &self.people[father_pos],
                active.child_support,
                active.education_impact,
            );
            if !bernoulli(rng, probability) {
                continue;
            }

            let child_id = self.next_person_id();
            let child = newborn(child_id, &self.people[mother_pos], &self.people[father_pos], rng);

            result.parent_ages.push(self.people[mother_pos].age);
            result.parent_ages.push(self.people[father_pos].age);
            self.people[mother_pos].children.push(child_id);
            self.people[father_pos].children.push(child_id);
            result.newborns.push(child);
        }

        result
    }

    /// Draw deaths, then age the survivors by one year
    ///
    /// A death clears the partner's link immediately. Survivors reset their
    /// conception flag and, when aged 18-65 after the birthday, take one step
    /// of the income random walk. The deceased stay in place until
    /// [`Population::rebuild`].
    pub fn apply_mortality<R: Rng>(
        &mut self,
        healthcare_quality: f64,
        policy_index: f64,
        rng: &mut R,
    ) -> MortalityResult {
        let mut result = MortalityResult::default();

        for i in 0..self.people.len() {
            if bernoulli(rng, self.people[i].mortality(healthcare_quality)) {
                if let Some(partner_id) = self.people[i].partner.take() {
                    if let Some(&j) = self.index.get(&partner_id) {
                        self.people[j].partner = None;
                    }
                }
                result.deceased.insert(self.people[i].id);
                continue;
            }

            let person = &mut self.people[i];
            person.age += 1;
            person.attempted_conception = false;
            if (ADULT_AGE..=65).contains(&person.age) {
                person.drift_income(policy_index, rng);
            }
        }

        result
    }

    /// Drop the deceased and append the year's newborns
    pub fn rebuild(&mut self, deceased: &HashSet<PersonId>, newborns: Vec<Person>) {
        self.people.retain(|p| !deceased.contains(&p.id));
        self.people.extend(newborns);
        self.reindex();
    }

    /// Schooling for everyone aged 5-25, one independent update per person
    pub fn grow_education(&mut self, education_impact: f64) {
        self.people
            .par_iter_mut()
            .for_each(|p| p.grow_education(education_impact));
    }

    /// Every partner link points at a living individual that links back
    pub fn partners_are_symmetric(&self) -> bool {
        self.people.iter().all(|p| match p.partner {
            None => true,
            Some(partner_id) => self
                .get(partner_id)
                .map(|partner| partner.partner == Some(p.id) && partner.id != p.id)
                .unwrap_or(false),
        })
    }
}

/// Whole-year age from a normal sample, truncated toward zero and floored
fn sample_age<R: Rng>(distribution: &Normal<f64>, floor: u32, rng: &mut R) -> u32 {
    let sample = distribution.sample(rng).trunc();
    if sample <= f64::from(floor) {
        floor
    } else {
        sample as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn active(child_support: f64) -> ActiveParameters {
        ActiveParameters {
            child_support,
            education_impact: 0.0,
            healthcare_quality: 1.0,
            immigration_inflow: 0.0,
        }
    }

    fn adult(id: u64, sex: Sex) -> Person {
        Person::new(PersonId(id), sex, 25, 0.0, 0.5, true)
    }

    #[test]
    fn test_founders_are_split_by_sex() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ages_dist = Normal::new(30.0, 20.0).unwrap();
        let mut population = Population::new();
        let ages = population.add_founders(50, 0.6, &ages_dist, &mut rng);

        assert_eq!(population.len(), 100);
        assert_eq!(ages, population.ages());
        assert!(population.people()[..50].iter().all(|p| p.sex == Sex::Male));
        assert!(population.people()[50..].iter().all(|p| p.sex == Sex::Female));
        assert!(population.people().iter().all(|p| p.partner.is_none()));
    }

    #[test]
    fn test_immigrants_are_adults_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let ages_dist = Normal::new(25.0, 10.0).unwrap();
        let mut population = Population::new();
        let added = population.add_immigrants(40, 1.0, &ages_dist, &mut rng);

        assert_eq!(added, 80);
        assert_eq!(population.people().iter().filter(|p| p.sex == Sex::Male).count(), 40);
        for p in population.people() {
            assert!(p.age >= ADULT_AGE);
            assert!(p.urban);
            assert!(p.education >= 0.2 && p.education < 0.8);
            assert!(p.income >= 0.2 && p.income < 0.6);
        }
    }

    #[test]
    fn test_sweep_pairs_adjacent_free_adults() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut population = Population::from_people(vec![
            adult(0, Sex::Male),
            adult(1, Sex::Female),
            adult(2, Sex::Male),
        ]);
        let result = population.pair_and_conceive(&active(0.0), &mut rng);

        assert_eq!(result.pairs_formed, 1);
        assert_eq!(population.get(PersonId(0)).unwrap().partner, Some(PersonId(1)));
        assert_eq!(population.get(PersonId(1)).unwrap().partner, Some(PersonId(0)));
        // Person 1 is partnered as `a` in the second comparison and tries to conceive
        assert_eq!(result.attempts, 1);
        assert!(population.get(PersonId(0)).unwrap().attempted_conception);
        assert!(population.get(PersonId(2)).unwrap().partner.is_none());
        assert!(population.partners_are_symmetric());
    }

    #[test]
    fn test_sweep_skips_minors_and_same_sex() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut minor = adult(1, Sex::Female);
        minor.age = 17;
        let mut population = Population::from_people(vec![
            adult(0, Sex::Male),
            minor,
            adult(2, Sex::Female),
            adult(3, Sex::Female),
        ]);
        let result = population.pair_and_conceive(&active(0.0), &mut rng);

        assert_eq!(result.pairs_formed, 0);
        assert!(population.people().iter().all(|p| p.partner.is_none()));
    }

    #[test]
    fn test_certain_conception_records_child_for_both_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut mother = adult(0, Sex::Female);
        let mut father = adult(1, Sex::Male);
        father.age = 31;
        mother.partner = Some(PersonId(1));
        father.partner = Some(PersonId(0));
        // Father first: he is `a`, mother is found through the partner link
        let mut population = Population::from_people(vec![father, mother]);

        let result = population.pair_and_conceive(&active(0.0), &mut rng);

        assert_eq!(result.attempts, 1);
        assert_eq!(result.newborns.len(), 1);
        assert_eq!(result.parent_ages, vec![25, 31]);
        let child_id = result.newborns[0].id;
        assert_eq!(child_id, PersonId(2));
        assert_eq!(population.get(PersonId(0)).unwrap().children, vec![child_id]);
        assert_eq!(population.get(PersonId(1)).unwrap().children, vec![child_id]);
        assert_eq!(population.len(), 2);
    }

    #[test]
    fn test_one_attempt_per_couple_per_year() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut a = adult(0, Sex::Female);
        let mut b = adult(1, Sex::Male);
        let c = adult(2, Sex::Male);
        a.partner = Some(PersonId(1));
        b.partner = Some(PersonId(0));
        // a tries with b, then b is `a` of the next comparison but already tried
        let mut population = Population::from_people(vec![a, b, c]);
        let result = population.pair_and_conceive(&active(0.0), &mut rng);
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_death_unlinks_partner() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut elder = Person::new(PersonId(0), Sex::Male, 150, 0.0, 0.2, true);
        let mut spouse = adult(1, Sex::Female);
        elder.partner = Some(PersonId(1));
        spouse.partner = Some(PersonId(0));
        let mut population = Population::from_people(vec![elder, spouse]);

        // Hazard at 150 is far above 1 and clamps to certain death
        let result = population.apply_mortality(0.0, 1.0, &mut rng);
        assert!(result.deceased.contains(&PersonId(0)));
        assert!(population.get(PersonId(1)).unwrap().partner.is_none());

        let survived = !result.deceased.contains(&PersonId(1));
        population.rebuild(&result.deceased, Vec::new());
        assert!(population.get(PersonId(0)).is_none());
        assert_eq!(population.len(), if survived { 1 } else { 0 });
        assert!(population.partners_are_symmetric());
    }

    #[test]
    fn test_survivors_age_and_reset_attempt_flag() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut people: Vec<Person> = (0..50).map(|i| adult(i, Sex::Female)).collect();
        for p in &mut people {
            p.attempted_conception = true;
        }
        let mut population = Population::from_people(people);
        let result = population.apply_mortality(1.0, 1.0, &mut rng);
        population.rebuild(&result.deceased, Vec::new());

        assert_eq!(population.len(), 50 - result.death_count());
        for p in population.people() {
            assert_eq!(p.age, 26);
            assert!(!p.attempted_conception);
        }
    }

    #[test]
    fn test_rebuild_appends_newborns_after_survivors() {
        let mut population = Population::from_people(vec![adult(0, Sex::Male), adult(1, Sex::Female)]);
        let baby = Person::new(PersonId(5), Sex::Female, 0, 0.5, 0.5, true);
        let deceased: HashSet<PersonId> = [PersonId(0)].into_iter().collect();
        population.rebuild(&deceased, vec![baby]);

        let ids: Vec<PersonId> = population.people().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PersonId(1), PersonId(5)]);
        assert!(population.get(PersonId(5)).is_some());
    }

    #[test]
    fn test_shuffle_keeps_links_resolvable() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut a = adult(0, Sex::Female);
        let mut b = adult(1, Sex::Male);
        a.partner = Some(PersonId(1));
        b.partner = Some(PersonId(0));
        let mut people = vec![a, b];
        people.extend((2..20).map(|i| adult(i, Sex::Male)));
        let mut population = Population::from_people(people);

        population.shuffle(&mut rng);
        assert_eq!(population.len(), 20);
        assert!(population.partners_are_symmetric());
        assert_eq!(population.get(PersonId(1)).unwrap().partner, Some(PersonId(0)));
    }
}
