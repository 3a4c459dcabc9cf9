use serde::{Deserialize, Serialize};

use crate::{
    nutrients::{Nutrient, Nutrients},
    value::parse_number,
};

/// A limit for every nutrient. Upper bounds for most, lower bounds for fiber and protein.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet(Nutrients);

impl Default for ConstraintSet {
    fn default() -> Self {
        Self(Nutrients::from_fn(Nutrient::default_limit))
    }
}

impl ConstraintSet {
    pub fn limit(&self, nutrient: Nutrient) -> f64 {
        self.0[nutrient]
    }

    /// Non-finite limits are stored as 0.
    pub fn set(&mut self, nutrient: Nutrient, limit: f64) {
        self.0[nutrient] = if limit.is_finite() { limit } else { 0.0 };
    }

    /// Applies raw text from a form field. Anything that does not parse becomes 0.
    pub fn set_input(&mut self, nutrient: Nutrient, input: &str) {
        self.set(nutrient, parse_number(input).unwrap_or(0.0));
    }

    pub fn limits(&self) -> &Nutrients {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let constraints = ConstraintSet::default();

        assert_eq!(constraints.limit(Nutrient::Calories), 700.0);
        assert_eq!(constraints.limit(Nutrient::SatFat), 5.0);
        assert_eq!(constraints.limit(Nutrient::Sodium), 700.0);
        assert_eq!(constraints.limit(Nutrient::Protein), 20.0);
    }

    #[test]
    fn test_set_input() {
        let mut constraints = ConstraintSet::default();

        constraints.set_input(Nutrient::Sugar, " 8.5 ");
        assert_eq!(constraints.limit(Nutrient::Sugar), 8.5);

        constraints.set_input(Nutrient::Sugar, "plenty");
        assert_eq!(constraints.limit(Nutrient::Sugar), 0.0);

        constraints.set_input(Nutrient::Fiber, "inf");
        assert_eq!(constraints.limit(Nutrient::Fiber), 0.0);

        constraints.set(Nutrient::Calories, f64::NAN);
        assert_eq!(constraints.limit(Nutrient::Calories), 0.0);
    }
}
