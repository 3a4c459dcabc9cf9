//! # Reconciliation
//!
//! Merges a decoded share token into a live bowl, field by field, trusting the catalog over the
//! token every time.
//!
//! - Menu: kept from the bowl unless the token names a menu the catalog has
//! - Limits: taken only when they read as finite numbers
//! - Strict minimums: taken as given
//! - Portions: emptied for the resolved menu, then refilled with entries naming one of its
//!   ingredients and one of the four portions
//!
//! Whatever is dropped is reported back, never raised. The merged bowl is not validated, so a
//! link can restore a bowl that would be refused if built by hand; [`Reconciliation::compliant`]
//! says whether that happened.
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    bowl::Bowl,
    catalog::Catalog,
    nutrients::Nutrient,
    portions::Portion,
    share::SharedBowl,
    value::lenient_number,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum Discarded {
    UnknownMenu { menu: String },
    InvalidConstraint { nutrient: Nutrient, value: Value },
    UnknownIngredient { ingredient: String },
    InvalidPortion { ingredient: String, value: Value },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub discarded: Vec<Discarded>,
    pub compliant: bool,
}

pub fn reconcile(bowl: &mut Bowl, catalog: &Catalog, shared: SharedBowl) -> Reconciliation {
    let mut discarded = Vec::new();

    if let Some(menu_id) = shared.menu_id {
        if catalog.menu(&menu_id).is_some() {
            bowl.menu_id = menu_id;
        } else {
            discarded.push(Discarded::UnknownMenu { menu: menu_id });
        }
    }

    for nutrient in Nutrient::ALL {
        let Some(value) = shared.constraints.get(nutrient.key()) else {
            continue;
        };

        match lenient_number(value).filter(|limit| limit.is_finite()) {
            Some(limit) => bowl.set_constraint(nutrient, limit),
            None => discarded.push(Discarded::InvalidConstraint {
                nutrient,
                value: value.clone(),
            }),
        }
    }

    bowl.set_strict_min(shared.strict_min);

    bowl.reset_portions();
    let menu = bowl.menu(catalog);

    for (ingredient, value) in shared.portions {
        if !menu.is_some_and(|menu| menu.ingredient(&ingredient).is_some()) {
            discarded.push(Discarded::UnknownIngredient { ingredient });
            continue;
        }

        match lenient_number(&value).and_then(Portion::from_factor) {
            Some(portion) => bowl.portions.set(ingredient, portion),
            None => discarded.push(Discarded::InvalidPortion { ingredient, value }),
        }
    }

    if !discarded.is_empty() {
        debug!("Dropped {} fields from share token", discarded.len());
    }

    let compliant = !bowl.violates(&bowl.totals(catalog));

    Reconciliation {
        discarded,
        compliant,
    }
}
