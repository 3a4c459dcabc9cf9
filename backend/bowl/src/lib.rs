//! # Bowl
//!
//! Nutrient constraint engine behind the bowl builder, plus the share link codec.
//!
//! ## Flow
//!
//! - A portion change is tried against the totals it would produce ([`compute_totals`])
//! - [`would_violate`] judges the result
//! - Refusals are explained by [`explain_violation`], accepted changes land in the [`Bowl`]
//! - The bowl is re-encoded into a share token ([`encode`]) after every accepted change
//! - Opening a link runs [`decode`] then [`reconcile`] against the live catalog
//!
//! Everything here is synchronous and free of globals. Callers own their [`Bowl`] and the
//! [`Catalog`] it was built against.
pub mod bowl;
pub mod catalog;
pub mod constraints;
pub mod error;
pub mod nutrients;
pub mod portions;
pub mod reconcile;
pub mod share;
pub mod totals;
pub mod validate;
pub mod value;

pub use bowl::{Bowl, PortionOption, Verdict};
pub use catalog::{Catalog, CatalogIssue, Category, Ingredient, Menu, load_catalog};
pub use constraints::ConstraintSet;
pub use error::CatalogError;
pub use nutrients::{Direction, Nutrient, Nutrients, Unit};
pub use portions::{Portion, PortionSelection};
pub use reconcile::{Discarded, Reconciliation, reconcile};
pub use share::{SharedBowl, decode, encode};
pub use totals::compute_totals;
pub use validate::{NutrientStatus, explain_violation, status, would_violate};

/// Starts a bowl from the catalog defaults, then applies a share token on top if one reads.
pub fn restore(catalog: &Catalog, token: Option<&str>) -> Result<(Bowl, Reconciliation), CatalogError> {
    let mut bowl = Bowl::new(catalog)?;

    let reconciliation = match token.and_then(decode) {
        Some(shared) => reconcile(&mut bowl, catalog, shared),
        None => Reconciliation {
            discarded: Vec::new(),
            compliant: !bowl.violates(&bowl.totals(catalog)),
        },
    };

    Ok((bowl, reconciliation))
}
