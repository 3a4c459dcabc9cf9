//! Portion multipliers and the per-session selection built from them.
use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Portion {
    #[default]
    Zero,
    Half,
    Single,
    Double,
}

impl Portion {
    pub const ALL: [Portion; 4] = [Portion::Zero, Portion::Half, Portion::Single, Portion::Double];

    pub fn factor(self) -> f64 {
        match self {
            Portion::Zero => 0.0,
            Portion::Half => 0.5,
            Portion::Single => 1.0,
            Portion::Double => 2.0,
        }
    }

    /// Only exact multipliers map to a portion; `1.5` or `-1` do not.
    pub fn from_factor(factor: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|portion| portion.factor() == factor)
    }

    pub fn is_zero(self) -> bool {
        self == Portion::Zero
    }
}

impl std::fmt::Display for Portion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.factor())
    }
}

impl Serialize for Portion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Portion::Half => serializer.serialize_f64(0.5),
            whole => serializer.serialize_u8(whole.factor() as u8),
        }
    }
}

/// Ingredient id to portion. An absent id is the same as [`Portion::Zero`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PortionSelection(BTreeMap<String, Portion>);

impl PortionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ingredient_id: &str) -> Portion {
        self.0.get(ingredient_id).copied().unwrap_or_default()
    }

    pub fn set(&mut self, ingredient_id: impl Into<String>, portion: Portion) {
        let ingredient_id = ingredient_id.into();

        if portion.is_zero() {
            self.0.remove(&ingredient_id);
        } else {
            self.0.insert(ingredient_id, portion);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Non-zero entries, sorted by ingredient id. Zeros are never stored.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Portion)> {
        self.0.iter().map(|(id, portion)| (id.as_str(), *portion))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Portion)> for PortionSelection {
    fn from_iter<I: IntoIterator<Item = (String, Portion)>>(iter: I) -> Self {
        let mut selection = Self::new();
        for (id, portion) in iter {
            selection.set(id, portion);
        }
        selection
    }
}
