//! # Bowl
//!
//! The whole addressable session: which menu, which limits, which portions, and whether minimums
//! are enforced. Everything a share link reproduces lives here.
//!
//! ## Transitions
//!
//! - Picking the portion an ingredient already has is always accepted and never validated, so a
//!   bowl is never invalidated after the fact by a limit edited elsewhere
//! - Any other portion change is validated against the totals it would produce
//! - Clearing a category is one batch: validated once, applied whole or not at all
//! - Switching menus empties the bowl
use serde::Serialize;
use tracing::debug;

use crate::{
    catalog::{Catalog, Menu},
    constraints::ConstraintSet,
    error::CatalogError,
    nutrients::{Nutrient, Nutrients},
    portions::{Portion, PortionSelection},
    totals::compute_totals,
    validate::{explain_violation, would_violate},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bowl {
    pub menu_id: String,
    pub constraints: ConstraintSet,
    pub portions: PortionSelection,
    pub strict_min: bool,
}

/// Outcome of a requested change. A rejection is a normal answer, not an error.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Applied,
    /// Nothing would change.
    Unchanged,
    /// The request named something the active menu does not have.
    Ignored,
    Rejected(String),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Applied | Verdict::Unchanged)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PortionOption {
    pub portion: Portion,
    pub current: bool,
    pub disabled: bool,
    pub reason: Option<String>,
}

impl Bowl {
    pub fn new(catalog: &Catalog) -> Result<Self, CatalogError> {
        let menu = catalog.default_menu().ok_or(CatalogError::Empty)?;

        Ok(Self {
            menu_id: menu.id.clone(),
            constraints: ConstraintSet::default(),
            portions: PortionSelection::new(),
            strict_min: false,
        })
    }

    pub fn menu<'c>(&self, catalog: &'c Catalog) -> Option<&'c Menu> {
        catalog.menu(&self.menu_id)
    }

    pub fn totals(&self, catalog: &Catalog) -> Nutrients {
        match self.menu(catalog) {
            Some(menu) => compute_totals(&self.portions, menu),
            None => Nutrients::default(),
        }
    }

    pub fn violates(&self, totals: &Nutrients) -> bool {
        would_violate(totals, &self.constraints, self.strict_min)
    }

    /// Switches menus and empties the bowl. Unknown ids leave everything as is.
    pub fn select_menu(&mut self, catalog: &Catalog, menu_id: &str) -> bool {
        if catalog.menu(menu_id).is_none() {
            return false;
        }

        self.menu_id = menu_id.to_string();
        self.reset_portions();
        true
    }

    pub fn reset_portions(&mut self) {
        self.portions.clear();
    }

    pub fn set_portion(&mut self, catalog: &Catalog, ingredient_id: &str, portion: Portion) -> Verdict {
        let Some(menu) = self.menu(catalog) else {
            return Verdict::Ignored;
        };
        if menu.ingredient(ingredient_id).is_none() {
            return Verdict::Ignored;
        }

        if self.portions.get(ingredient_id) == portion {
            return Verdict::Unchanged;
        }

        let mut candidate = self.portions.clone();
        candidate.set(ingredient_id, portion);

        let verdict = self.judge(menu, &candidate);
        if verdict.is_accepted() {
            self.portions = candidate;
        }

        debug!("{ingredient_id} -> {portion}: {verdict:?}");
        verdict
    }

    pub fn clear_category(&mut self, catalog: &Catalog, category_id: &str) -> Verdict {
        let Some(menu) = self.menu(catalog) else {
            return Verdict::Ignored;
        };
        let Some(category) = menu.category(category_id) else {
            return Verdict::Ignored;
        };

        let mut candidate = self.portions.clone();
        for ingredient in &category.ingredients {
            candidate.set(ingredient.id.as_str(), Portion::Zero);
        }

        if candidate == self.portions {
            return Verdict::Unchanged;
        }

        let verdict = self.judge(menu, &candidate);
        if verdict.is_accepted() {
            self.portions = candidate;
        }

        debug!("clear {category_id}: {verdict:?}");
        verdict
    }

    /// What every portion button would do for one ingredient, without changing anything.
    pub fn options(&self, catalog: &Catalog, ingredient_id: &str) -> Option<[PortionOption; 4]> {
        let menu = self.menu(catalog)?;
        menu.ingredient(ingredient_id)?;

        let current = self.portions.get(ingredient_id);

        Some(Portion::ALL.map(|portion| {
            let is_current = portion == current;
            let reason = if is_current {
                None
            } else {
                let mut candidate = self.portions.clone();
                candidate.set(ingredient_id, portion);
                self.judge(menu, &candidate).reason().map(str::to_string)
            };

            PortionOption {
                portion,
                current: is_current,
                disabled: reason.is_some(),
                reason,
            }
        }))
    }

    pub fn set_constraint(&mut self, nutrient: Nutrient, limit: f64) {
        self.constraints.set(nutrient, limit);
    }

    pub fn set_constraint_input(&mut self, nutrient: Nutrient, input: &str) {
        self.constraints.set_input(nutrient, input);
    }

    /// Limits back to defaults. Strict mode is left alone.
    pub fn apply_default_constraints(&mut self) {
        self.constraints = ConstraintSet::default();
    }

    /// Limits back to defaults and strict mode off.
    pub fn restore_defaults(&mut self) {
        self.apply_default_constraints();
        self.strict_min = false;
    }

    pub fn set_strict_min(&mut self, strict_min: bool) {
        self.strict_min = strict_min;
    }

    fn judge(&self, menu: &Menu, candidate: &PortionSelection) -> Verdict {
        let after = compute_totals(candidate, menu);
        if !self.violates(&after) {
            return Verdict::Applied;
        }

        let before = compute_totals(&self.portions, menu);
        Verdict::Rejected(explain_violation(
            &before,
            &after,
            &self.constraints,
            self.strict_min,
        ))
    }
}
