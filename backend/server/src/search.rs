//! # Search
//!
//! Per-category ingredient filtering for the accordion search boxes.
//!
//! The query is trimmed, lower-cased and has its whitespace collapsed before matching. Names are
//! normalized the same way, so a match is a plain substring test. An empty query returns every
//! ingredient.
//!
//! Categories come back in canonical order (base, proteins, toppings, sauces, extras, then
//! anything else) so the frontend can hide rows without re-sorting.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as Extract},
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::State};

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
pub struct CategoryMatches<'a> {
    pub id: &'a str,
    pub ingredients: Vec<&'a str>,
}

#[derive(Serialize)]
pub struct SearchResults<'a> {
    pub menu_id: &'a str,
    pub query: &'a str,
    pub categories: Vec<CategoryMatches<'a>>,
}

pub async fn search_handler(
    Extract(state): Extract<Arc<State>>,
    Path(menu_id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let menu = state
        .catalog
        .menu(&menu_id)
        .ok_or_else(|| AppError::UnknownMenu(menu_id.clone()))?;

    let results = SearchResults {
        menu_id: &menu.id,
        query: &query.q,
        categories: menu
            .ordered_categories()
            .into_iter()
            .map(|category| CategoryMatches {
                id: &category.id,
                ingredients: category
                    .search(&query.q)
                    .into_iter()
                    .map(|ingredient| ingredient.id.as_str())
                    .collect(),
            })
            .collect(),
    };

    serde_json::to_value(&results)
        .map(Json)
        .map_err(|e| AppError::InternalError(Box::new(e)))
}
