//! # Nutrients
//!
//! The fixed eight-nutrient model.
//!
//! ## Table
//!
//! Declared order matters: explanations walk it front to back and report the first hit.
//!
//! | key | label | unit | direction |
//! |---|---|---|---|
//! | calories | Calories | | max |
//! | total_fat_g | Total Fat | g | max |
//! | sat_fat_g | Saturated Fat | g | max |
//! | cholesterol_mg | Cholesterol | mg | max |
//! | sodium_mg | Sodium | mg | max |
//! | sugar_g | Sugar | g | max |
//! | fiber_g | Fiber | g | min |
//! | protein_g | Protein | g | min |
use std::{
    fmt,
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Deserializer, Serialize};

use crate::value::lenient_number;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    #[serde(rename = "total_fat_g")]
    TotalFat,
    #[serde(rename = "sat_fat_g")]
    SatFat,
    #[serde(rename = "cholesterol_mg")]
    Cholesterol,
    #[serde(rename = "sodium_mg")]
    Sodium,
    #[serde(rename = "sugar_g")]
    Sugar,
    #[serde(rename = "fiber_g")]
    Fiber,
    #[serde(rename = "protein_g")]
    Protein,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Must not exceed the limit.
    Max,
    /// Must reach the limit.
    Min,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Count,
    Grams,
    Milligrams,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Count => "",
            Unit::Grams => "g",
            Unit::Milligrams => "mg",
        }
    }
}

impl Nutrient {
    pub const ALL: [Nutrient; 8] = [
        Nutrient::Calories,
        Nutrient::TotalFat,
        Nutrient::SatFat,
        Nutrient::Cholesterol,
        Nutrient::Sodium,
        Nutrient::Sugar,
        Nutrient::Fiber,
        Nutrient::Protein,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::TotalFat => "total_fat_g",
            Nutrient::SatFat => "sat_fat_g",
            Nutrient::Cholesterol => "cholesterol_mg",
            Nutrient::Sodium => "sodium_mg",
            Nutrient::Sugar => "sugar_g",
            Nutrient::Fiber => "fiber_g",
            Nutrient::Protein => "protein_g",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|nutrient| nutrient.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Nutrient::Calories => "Calories",
            Nutrient::TotalFat => "Total Fat",
            Nutrient::SatFat => "Saturated Fat",
            Nutrient::Cholesterol => "Cholesterol",
            Nutrient::Sodium => "Sodium",
            Nutrient::Sugar => "Sugar",
            Nutrient::Fiber => "Fiber",
            Nutrient::Protein => "Protein",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Nutrient::Calories => Unit::Count,
            Nutrient::Cholesterol | Nutrient::Sodium => Unit::Milligrams,
            _ => Unit::Grams,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Nutrient::Fiber | Nutrient::Protein => Direction::Min,
            _ => Direction::Max,
        }
    }

    pub fn default_limit(self) -> f64 {
        match self {
            Nutrient::Calories => 700.0,
            Nutrient::TotalFat => 20.0,
            Nutrient::SatFat => 5.0,
            Nutrient::Cholesterol => 100.0,
            Nutrient::Sodium => 700.0,
            Nutrient::Sugar => 12.0,
            Nutrient::Fiber => 10.0,
            Nutrient::Protein => 20.0,
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One value per nutrient. Used for ingredient values, totals and limits alike.
///
/// Fields missing from a document, or holding something that is not a number, read as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    #[serde(default, deserialize_with = "lenient")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub total_fat_g: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub sat_fat_g: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub cholesterol_mg: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub sodium_mg: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub sugar_g: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub fiber_g: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub protein_g: f64,
}

impl Nutrients {
    pub fn from_fn(mut f: impl FnMut(Nutrient) -> f64) -> Self {
        let mut nutrients = Self::default();
        for nutrient in Nutrient::ALL {
            nutrients[nutrient] = f(nutrient);
        }
        nutrients
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        Nutrient::ALL.into_iter().map(|nutrient| (nutrient, self[nutrient]))
    }

    /// Adds `other` scaled by `factor` into `self`.
    pub fn add_scaled(&mut self, other: &Nutrients, factor: f64) {
        for nutrient in Nutrient::ALL {
            self[nutrient] += other[nutrient] * factor;
        }
    }
}

impl Index<Nutrient> for Nutrients {
    type Output = f64;

    fn index(&self, nutrient: Nutrient) -> &f64 {
        match nutrient {
            Nutrient::Calories => &self.calories,
            Nutrient::TotalFat => &self.total_fat_g,
            Nutrient::SatFat => &self.sat_fat_g,
            Nutrient::Cholesterol => &self.cholesterol_mg,
            Nutrient::Sodium => &self.sodium_mg,
            Nutrient::Sugar => &self.sugar_g,
            Nutrient::Fiber => &self.fiber_g,
            Nutrient::Protein => &self.protein_g,
        }
    }
}

impl IndexMut<Nutrient> for Nutrients {
    fn index_mut(&mut self, nutrient: Nutrient) -> &mut f64 {
        match nutrient {
            Nutrient::Calories => &mut self.calories,
            Nutrient::TotalFat => &mut self.total_fat_g,
            Nutrient::SatFat => &mut self.sat_fat_g,
            Nutrient::Cholesterol => &mut self.cholesterol_mg,
            Nutrient::Sodium => &mut self.sodium_mg,
            Nutrient::Sugar => &mut self.sugar_g,
            Nutrient::Fiber => &mut self.fiber_g,
            Nutrient::Protein => &mut self.protein_g,
        }
    }
}

fn lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(lenient_number(&value).filter(|n| n.is_finite()).unwrap_or(0.0))
}
