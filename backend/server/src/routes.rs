use std::{collections::BTreeMap, sync::Arc};

use axum::{Json, extract::State as Extract, response::IntoResponse};
use bowl::{Category, Nutrient, PortionOption, value::lenient_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::AppError,
    state::State,
    utils::{BowlView, get_bowl, get_portion},
};

#[derive(Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
pub struct MenuRequest {
    #[serde(default)]
    token: Option<String>,
    menu_id: String,
}

#[derive(Deserialize)]
pub struct PortionRequest {
    #[serde(default)]
    token: Option<String>,
    ingredient_id: String,
    portion: f64,
}

#[derive(Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    token: Option<String>,
    category_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Defaults {
    /// Limits only.
    Limits,
    /// Limits and strict mode.
    All,
}

#[derive(Deserialize)]
pub struct ConstraintsRequest {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    defaults: Option<Defaults>,
    #[serde(default)]
    constraints: BTreeMap<String, Value>,
    #[serde(default)]
    strict_min: Option<bool>,
}

#[derive(Deserialize)]
pub struct OptionsRequest {
    #[serde(default)]
    token: Option<String>,
    ingredient_id: String,
}

#[derive(Serialize)]
pub struct MenuView<'a> {
    id: &'a str,
    name: &'a str,
    categories: Vec<&'a Category>,
}

#[derive(Serialize)]
pub struct OptionsView {
    ingredient_id: String,
    options: [PortionOption; 4],
}

pub async fn menus_handler(Extract(state): Extract<Arc<State>>) -> impl IntoResponse {
    let menus: Vec<MenuView> = state
        .catalog
        .menus
        .iter()
        .map(|menu| MenuView {
            id: &menu.id,
            name: &menu.name,
            categories: menu.ordered_categories(),
        })
        .collect();

    Json(serde_json::json!({ "menus": menus }))
}

pub async fn restore_handler(
    Extract(state): Extract<Arc<State>>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<BowlView>, AppError> {
    let (bowl, reconciliation) = get_bowl(&state.catalog, payload.token.as_deref())?;

    Ok(Json(
        BowlView::new(&bowl, &state.catalog).with_reconciliation(reconciliation),
    ))
}

pub async fn menu_handler(
    Extract(state): Extract<Arc<State>>,
    Json(payload): Json<MenuRequest>,
) -> Result<Json<BowlView>, AppError> {
    let (mut bowl, _) = get_bowl(&state.catalog, payload.token.as_deref())?;

    if !bowl.select_menu(&state.catalog, &payload.menu_id) {
        return Err(AppError::UnknownMenu(payload.menu_id));
    }

    Ok(Json(BowlView::new(&bowl, &state.catalog)))
}

pub async fn portion_handler(
    Extract(state): Extract<Arc<State>>,
    Json(payload): Json<PortionRequest>,
) -> Result<Json<BowlView>, AppError> {
    let portion = get_portion(payload.portion)?;
    let (mut bowl, _) = get_bowl(&state.catalog, payload.token.as_deref())?;

    let verdict = bowl.set_portion(&state.catalog, &payload.ingredient_id, portion);

    Ok(Json(
        BowlView::new(&bowl, &state.catalog).with_verdict(verdict),
    ))
}

pub async fn clear_handler(
    Extract(state): Extract<Arc<State>>,
    Json(payload): Json<ClearRequest>,
) -> Result<Json<BowlView>, AppError> {
    let (mut bowl, _) = get_bowl(&state.catalog, payload.token.as_deref())?;

    let verdict = bowl.clear_category(&state.catalog, &payload.category_id);

    Ok(Json(
        BowlView::new(&bowl, &state.catalog).with_verdict(verdict),
    ))
}

pub async fn reset_handler(
    Extract(state): Extract<Arc<State>>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<BowlView>, AppError> {
    let (mut bowl, _) = get_bowl(&state.catalog, payload.token.as_deref())?;

    bowl.reset_portions();

    Ok(Json(BowlView::new(&bowl, &state.catalog)))
}

pub async fn constraints_handler(
    Extract(state): Extract<Arc<State>>,
    Json(payload): Json<ConstraintsRequest>,
) -> Result<Json<BowlView>, AppError> {
    let (mut bowl, _) = get_bowl(&state.catalog, payload.token.as_deref())?;

    match payload.defaults {
        Some(Defaults::Limits) => bowl.apply_default_constraints(),
        Some(Defaults::All) => bowl.restore_defaults(),
        None => {}
    }

    for (key, value) in &payload.constraints {
        let Some(nutrient) = Nutrient::from_key(key) else {
            debug!("Ignoring unknown constraint {key}");
            continue;
        };

        bowl.set_constraint(nutrient, lenient_number(value).unwrap_or(0.0));
    }

    if let Some(strict_min) = payload.strict_min {
        bowl.set_strict_min(strict_min);
    }

    Ok(Json(BowlView::new(&bowl, &state.catalog)))
}

pub async fn options_handler(
    Extract(state): Extract<Arc<State>>,
    Json(payload): Json<OptionsRequest>,
) -> Result<Json<OptionsView>, AppError> {
    let (bowl, _) = get_bowl(&state.catalog, payload.token.as_deref())?;

    let options = bowl
        .options(&state.catalog, &payload.ingredient_id)
        .ok_or(AppError::MalformedPayload)?;

    Ok(Json(OptionsView {
        ingredient_id: payload.ingredient_id,
        options,
    }))
}
