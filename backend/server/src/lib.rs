//! HTTP backend for the bowl builder.
//!
//! Stateless: every request carries the bowl as a share token and gets the updated token back.
//! The only thing held in memory is the catalog.
//!
//! # Routes
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /menus` | Catalog, categories in canonical order |
//! | `GET /menus/{id}/search?q=` | Ingredient ids matching a filter, per category |
//! | `POST /bowl` | Restore a bowl from a token (or defaults) |
//! | `POST /bowl/menu` | Switch menu, emptying the bowl |
//! | `POST /bowl/portion` | Change one ingredient's portion |
//! | `POST /bowl/clear` | Clear one category |
//! | `POST /bowl/reset` | Empty the bowl |
//! | `POST /bowl/constraints` | Edit limits, strict mode, or restore defaults |
//! | `POST /bowl/options` | What each portion button would do for one ingredient |
//!
//! A refused change is still a `200`: the response carries `"outcome": "rejected"` and the
//! reason in `message`, with the bowl untouched.
//!
//! # Environment
//!
//! - `RUST_PORT`: listen port, default `1111`
//! - `CATALOG_PATH`: catalog document, default `data/restaurants.json`
//! - `CATALOG_URL`: fetch the catalog over HTTP instead
//! - `RUST_LOG`: tracing filter
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod remote;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;

use error::StartupError;
use routes::{
    clear_handler, constraints_handler, menu_handler, menus_handler, options_handler,
    portion_handler, reset_handler, restore_handler,
};
use search::search_handler;
use state::State;

pub async fn start_server() -> Result<(), StartupError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await.inspect_err(|e| {
        error!("Failed to initialize: {e}");
    })?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/menus", get(menus_handler))
        .route("/menus/{id}/search", get(search_handler))
        .route("/bowl", post(restore_handler))
        .route("/bowl/menu", post(menu_handler))
        .route("/bowl/portion", post(portion_handler))
        .route("/bowl/clear", post(clear_handler))
        .route("/bowl/reset", post(reset_handler))
        .route("/bowl/constraints", post(constraints_handler))
        .route("/bowl/options", post(options_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
