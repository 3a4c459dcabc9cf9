//! # Catalog
//!
//! Every menu a bowl can be built from. Loaded once at startup, read-only afterwards.
//!
//! ## Document
//!
//! ```json
//! { "menus": [ { "id", "name", "categories": [ { "id", "label", "ingredients": [ { "id", "name", <nutrients> } ] } ] } ] }
//! ```
//!
//! - `restaurants` is accepted in place of `menus`
//! - Nutrient fields that are missing or not numeric read as 0
//! - Ingredients pick up the id of the category holding them
//!
//! ## Category Order
//!
//! Menus list categories in whatever order the document has. Presentation uses the canonical
//! order below, with unknown categories trailing in document order.
use std::{
    collections::HashSet,
    fs,
    path::Path,
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::CatalogError, nutrients::Nutrients};

pub const CATEGORY_ORDER: [&str; 5] = ["base", "proteins", "toppings", "sauces", "extras"];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(rename = "categoryId", default)]
    pub category_id: String,
    #[serde(flatten)]
    pub nutrients: Nutrients,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(alias = "restaurants")]
    pub menus: Vec<Menu>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatalogIssue {
    DuplicateMenu(String),
    DuplicateIngredient { menu: String, ingredient: String },
    NegativeValue { menu: String, ingredient: String, nutrient: &'static str },
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogIssue::DuplicateMenu(menu) => write!(f, "duplicate menu id {menu}"),
            CatalogIssue::DuplicateIngredient { menu, ingredient } => {
                write!(f, "duplicate ingredient id {ingredient} in menu {menu}")
            }
            CatalogIssue::NegativeValue {
                menu,
                ingredient,
                nutrient,
            } => write!(f, "negative {nutrient} on {ingredient} in menu {menu}"),
        }
    }
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let data = fs::read(path.as_ref())?;
    let catalog = Catalog::from_slice(&data)?;

    info!(
        "Loaded {} menus from {}",
        catalog.menus.len(),
        path.as_ref().display()
    );

    Ok(catalog)
}

impl Catalog {
    /// Parses a catalog document. A catalog without menus is unusable and fails here.
    pub fn from_slice(data: &[u8]) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_json::from_slice(data)?;

        if catalog.menus.is_empty() {
            return Err(CatalogError::Empty);
        }

        for category in catalog
            .menus
            .iter_mut()
            .flat_map(|menu| menu.categories.iter_mut())
        {
            for ingredient in &mut category.ingredients {
                ingredient.category_id = category.id.clone();
            }
        }

        Ok(catalog)
    }

    pub fn menu(&self, id: &str) -> Option<&Menu> {
        self.menus.iter().find(|menu| menu.id == id)
    }

    pub fn default_menu(&self) -> Option<&Menu> {
        self.menus.first()
    }

    pub fn lint(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut menu_ids = HashSet::new();

        for menu in &self.menus {
            if !menu_ids.insert(menu.id.as_str()) {
                issues.push(CatalogIssue::DuplicateMenu(menu.id.clone()));
            }

            let mut ingredient_ids = HashSet::new();
            for ingredient in menu.ingredients() {
                if !ingredient_ids.insert(ingredient.id.as_str()) {
                    issues.push(CatalogIssue::DuplicateIngredient {
                        menu: menu.id.clone(),
                        ingredient: ingredient.id.clone(),
                    });
                }

                for (nutrient, value) in ingredient.nutrients.iter() {
                    if value < 0.0 {
                        issues.push(CatalogIssue::NegativeValue {
                            menu: menu.id.clone(),
                            ingredient: ingredient.id.clone(),
                            nutrient: nutrient.key(),
                        });
                    }
                }
            }
        }

        issues
    }
}

impl Menu {
    /// All ingredients across categories, in document order.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.categories
            .iter()
            .flat_map(|category| category.ingredients.iter())
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients().find(|ingredient| ingredient.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn ordered_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();
        // stable sort keeps document order among unknown categories
        categories.sort_by_key(|category| category_rank(&category.id));
        categories
    }
}

impl Category {
    pub fn search(&self, query: &str) -> Vec<&Ingredient> {
        let query = normalize(query);

        self.ingredients
            .iter()
            .filter(|ingredient| query.is_empty() || normalize(&ingredient.name).contains(&query))
            .collect()
    }
}

fn category_rank(id: &str) -> usize {
    CATEGORY_ORDER
        .iter()
        .position(|known| *known == id)
        .unwrap_or(CATEGORY_ORDER.len())
}

pub fn normalize(query: &str) -> String {
    WHITESPACE
        .replace_all(query.trim(), " ")
        .into_owned()
        .to_lowercase()
}
