use bowl::{
    Bowl, Catalog, ConstraintSet, Discarded, NutrientStatus, Nutrients, Portion, PortionSelection,
    Reconciliation, Verdict, encode, restore, status,
};
use serde::Serialize;

use crate::error::AppError;

/// Everything the frontend needs to redraw after a request, including the token to put back in
/// the address bar.
#[derive(Serialize)]
pub struct BowlView {
    pub token: String,
    pub menu_id: String,
    pub constraints: ConstraintSet,
    pub strict_min: bool,
    pub portions: PortionSelection,
    pub totals: Nutrients,
    pub status: Vec<NutrientStatus>,
    pub compliant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discarded: Vec<Discarded>,
}

impl BowlView {
    pub fn new(bowl: &Bowl, catalog: &Catalog) -> Self {
        let totals = bowl.totals(catalog);

        Self {
            token: encode(bowl),
            menu_id: bowl.menu_id.clone(),
            constraints: bowl.constraints,
            strict_min: bowl.strict_min,
            portions: bowl.portions.clone(),
            status: status(&totals, &bowl.constraints),
            compliant: !bowl.violates(&totals),
            totals,
            outcome: None,
            message: None,
            discarded: Vec::new(),
        }
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.outcome = Some(match verdict {
            Verdict::Applied => "applied",
            Verdict::Unchanged => "unchanged",
            Verdict::Ignored => "ignored",
            Verdict::Rejected(_) => "rejected",
        });

        if let Verdict::Rejected(reason) = verdict {
            self.message = Some(reason);
        }

        self
    }

    pub fn with_reconciliation(mut self, reconciliation: Reconciliation) -> Self {
        self.discarded = reconciliation.discarded;
        self
    }
}

pub fn get_bowl(catalog: &Catalog, token: Option<&str>) -> Result<(Bowl, Reconciliation), AppError> {
    Ok(restore(catalog, token)?)
}

pub fn get_portion(factor: f64) -> Result<Portion, AppError> {
    Portion::from_factor(factor).ok_or(AppError::InvalidPortion(factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_portion() {
        assert_eq!(get_portion(0.5).unwrap(), Portion::Half);
        assert!(matches!(get_portion(3.0), Err(AppError::InvalidPortion(_))));
    }

    #[test]
    fn test_rejection_message() {
        let catalog = Catalog::from_slice(br#"{"menus": [{"id": "m", "name": "M"}]}"#).unwrap();
        let (bowl, _) = get_bowl(&catalog, None).unwrap();

        let view = BowlView::new(&bowl, &catalog)
            .with_verdict(Verdict::Rejected("Would exceed sugar by 2 g".to_string()));

        assert_eq!(view.outcome, Some("rejected"));
        assert_eq!(view.message.as_deref(), Some("Would exceed sugar by 2 g"));
        assert!(view.compliant);
    }
}
