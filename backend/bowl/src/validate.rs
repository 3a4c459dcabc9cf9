//! # Validation
//!
//! Judging totals against a constraint set, and saying why a change was refused.
//!
//! ## Rules
//!
//! - Max nutrients fail when the total is strictly above the limit, so landing exactly on it is fine
//! - Min nutrients only fail in strict mode, when the total is strictly below the limit
//! - Outside strict mode min nutrients are informational: the status report still marks them
//!   pass/fail with `total >= limit`
//!
//! ## Rounding
//!
//! Counts and milligrams round to whole numbers, grams to one decimal. A trailing `.0` is never shown.
use serde::Serialize;

use crate::{
    constraints::ConstraintSet,
    nutrients::{Direction, Nutrient, Nutrients, Unit},
};

pub const FALLBACK_REASON: &str = "Invalid change.";

fn violates(nutrient: Nutrient, total: f64, limit: f64, strict_min: bool) -> bool {
    match nutrient.direction() {
        Direction::Max => total > limit,
        Direction::Min => strict_min && total < limit,
    }
}

pub fn would_violate(totals: &Nutrients, constraints: &ConstraintSet, strict_min: bool) -> bool {
    totals
        .iter()
        .any(|(nutrient, total)| violates(nutrient, total, constraints.limit(nutrient), strict_min))
}

/// Explains the first violation in table order.
///
/// When nothing violates, falls back to the first nutrient whose total moved, then to
/// [`FALLBACK_REASON`].
pub fn explain_violation(
    before: &Nutrients,
    after: &Nutrients,
    constraints: &ConstraintSet,
    strict_min: bool,
) -> String {
    for (nutrient, total) in after.iter() {
        let limit = constraints.limit(nutrient);
        if !violates(nutrient, total, limit, strict_min) {
            continue;
        }

        let label = nutrient.label().to_lowercase();
        return match nutrient.direction() {
            Direction::Max => format!(
                "Would exceed {label} by {}",
                format_amount(total - limit, nutrient.unit())
            ),
            Direction::Min => format!(
                "Would drop {label} below minimum by {}",
                format_amount(limit - total, nutrient.unit())
            ),
        };
    }

    match Nutrient::ALL
        .into_iter()
        .find(|nutrient| before[*nutrient] != after[*nutrient])
    {
        Some(nutrient) => format!("Invalid change for {}.", nutrient.label().to_lowercase()),
        None => FALLBACK_REASON.to_string(),
    }
}

pub fn round_for(value: f64, unit: Unit) -> f64 {
    let rounded = match unit {
        Unit::Count | Unit::Milligrams => value.round(),
        Unit::Grams => (value * 10.0).round() / 10.0,
    };

    // no "-0"
    rounded + 0.0
}

/// The bare rounded number, as shown in totals and ingredient previews.
pub fn display_value(value: f64, unit: Unit) -> String {
    round_for(value, unit).to_string()
}

/// Rounded number followed by its unit, if any.
pub fn format_amount(value: f64, unit: Unit) -> String {
    match unit.suffix() {
        "" => display_value(value, unit),
        suffix => format!("{} {suffix}", display_value(value, unit)),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NutrientStatus {
    pub nutrient: Nutrient,
    pub label: &'static str,
    pub unit: &'static str,
    pub direction: &'static str,
    pub total: f64,
    pub limit: f64,
    pub pass: bool,
    pub remaining: String,
}

/// One line per nutrient for the totals panel.
pub fn status(totals: &Nutrients, constraints: &ConstraintSet) -> Vec<NutrientStatus> {
    totals
        .iter()
        .map(|(nutrient, total)| {
            let limit = constraints.limit(nutrient);
            let unit = nutrient.unit();

            let (direction, pass, remaining) = match nutrient.direction() {
                Direction::Max => (
                    "max",
                    total <= limit,
                    format!("{} left", format_amount((limit - total).max(0.0), unit)),
                ),
                Direction::Min if total >= limit => (
                    "min",
                    true,
                    format!("{} above min", format_amount(total - limit, unit)),
                ),
                Direction::Min => (
                    "min",
                    false,
                    format!("{} needed", format_amount(limit - total, unit)),
                ),
            };

            NutrientStatus {
                nutrient,
                label: nutrient.label(),
                unit: unit.suffix(),
                direction,
                total,
                limit,
                pass,
                remaining,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn totals(f: impl FnOnce(&mut Nutrients)) -> Nutrients {
        let mut nutrients = Nutrients::default();
        f(&mut nutrients);
        nutrients
    }

    #[test]
    fn test_max_is_inclusive() {
        let constraints = ConstraintSet::default();

        let at_limit = totals(|n| n.calories = 700.0);
        assert!(!would_violate(&at_limit, &constraints, false));

        let over = totals(|n| n.calories = 700.5);
        assert!(would_violate(&over, &constraints, false));
    }

    #[test]
    fn test_min_only_in_strict_mode() {
        let constraints = ConstraintSet::default();
        let no_fiber = totals(|n| n.protein_g = 25.0);

        assert!(!would_violate(&no_fiber, &constraints, false));
        assert!(would_violate(&no_fiber, &constraints, true));

        let enough = totals(|n| {
            n.fiber_g = 10.0;
            n.protein_g = 20.0;
        });
        assert!(!would_violate(&enough, &constraints, true));
    }

    #[test]
    fn test_explain_exceed() {
        let constraints = ConstraintSet::default();
        let before = totals(|n| n.calories = 600.0);
        let after = totals(|n| n.calories = 900.0);

        assert_eq!(
            explain_violation(&before, &after, &constraints, false),
            "Would exceed calories by 200"
        );
    }

    #[test]
    fn test_explain_first_in_table_order() {
        let constraints = ConstraintSet::default();
        let after = totals(|n| {
            n.sodium_mg = 1_000.4;
            n.sat_fat_g = 6.25;
        });

        assert_eq!(
            explain_violation(&Nutrients::default(), &after, &constraints, false),
            "Would exceed saturated fat by 1.3 g"
        );
    }

    #[test]
    fn test_explain_units() {
        let constraints = ConstraintSet::default();

        let salty = totals(|n| n.sodium_mg = 750.4);
        assert_eq!(
            explain_violation(&Nutrients::default(), &salty, &constraints, false),
            "Would exceed sodium by 50 mg"
        );

        let sweet = totals(|n| n.sugar_g = 15.0);
        assert_eq!(
            explain_violation(&Nutrients::default(), &sweet, &constraints, false),
            "Would exceed sugar by 3 g"
        );
    }

    #[test]
    fn test_explain_shortfall() {
        let constraints = ConstraintSet::default();
        let before = totals(|n| {
            n.fiber_g = 12.0;
            n.protein_g = 30.0;
        });
        let after = totals(|n| {
            n.fiber_g = 7.6;
            n.protein_g = 30.0;
        });

        assert_eq!(
            explain_violation(&before, &after, &constraints, true),
            "Would drop fiber below minimum by 2.4 g"
        );
    }

    #[test]
    fn test_explain_fallbacks() {
        let constraints = ConstraintSet::default();
        let before = totals(|n| n.sugar_g = 2.0);
        let after = totals(|n| n.sugar_g = 4.0);

        assert_eq!(
            explain_violation(&before, &after, &constraints, false),
            "Invalid change for sugar."
        );
        assert_eq!(
            explain_violation(&after, &after, &constraints, false),
            "Invalid change."
        );
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(12.04, Unit::Grams), "12");
        assert_eq!(display_value(12.06, Unit::Grams), "12.1");
        assert_eq!(display_value(99.5, Unit::Milligrams), "100");
        assert_eq!(display_value(410.4, Unit::Count), "410");
        assert_eq!(display_value(-0.01, Unit::Grams), "0");
    }

    #[test]
    fn test_status() {
        let constraints = ConstraintSet::default();
        let report = status(
            &totals(|n| {
                n.calories = 520.0;
                n.fiber_g = 4.5;
                n.protein_g = 24.0;
            }),
            &constraints,
        );

        assert_eq!(report.len(), 8);
        assert_eq!(report[0].remaining, "180 left");
        assert!(report[0].pass);

        let fiber = &report[6];
        assert_eq!(fiber.nutrient, Nutrient::Fiber);
        assert!(!fiber.pass);
        assert_eq!(fiber.remaining, "5.5 g needed");

        let protein = &report[7];
        assert!(protein.pass);
        assert_eq!(protein.remaining, "4 g above min");
    }

    proptest! {
        #[test]
        fn test_would_violate_matches_bounds(
            totals in prop::collection::vec(0..2000u32, 8),
            limits in prop::collection::vec(0..2000u32, 8),
            strict_min in any::<bool>(),
        ) {
            let totals = Nutrients::from_fn(|n| f64::from(totals[n as usize]) / 2.0);
            let mut constraints = ConstraintSet::default();
            for nutrient in Nutrient::ALL {
                constraints.set(nutrient, f64::from(limits[nutrient as usize]) / 2.0);
            }

            let expected = Nutrient::ALL.into_iter().any(|nutrient| {
                let (total, limit) = (totals[nutrient], constraints.limit(nutrient));
                match nutrient {
                    Nutrient::Fiber | Nutrient::Protein => strict_min && total < limit,
                    _ => total > limit,
                }
            });

            prop_assert_eq!(would_violate(&totals, &constraints, strict_min), expected);
        }
    }
}
