use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ecogrid_core::{SeedRequest, Session, SimConfig, SimError};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Server state: one simulation shared by every client.
struct AppState {
    session: Mutex<Session>,
}

impl AppState {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| {
            tracing::warn!("Session mutex was poisoned, recovering");
            e.into_inner()
        })
    }
}

/// Body of `POST /start-simulation`.
#[derive(Debug, Deserialize)]
struct StartRequest {
    plants: usize,
    herbivores: usize,
    carnivores: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ecogrid_server=info,ecogrid_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("ECOGRID_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = match SimConfig::load_or_default(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config {}: {:#}", config_path, e);
            std::process::exit(1);
        }
    };
    let bind = config.server.bind.clone();
    let static_dir = config.server.static_dir.clone();
    tracing::info!(fingerprint = %config.fingerprint(), "Loaded simulation rules");

    let session = match Session::new(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create session: {}", e);
            std::process::exit(1);
        }
    };
    let state = Arc::new(AppState {
        session: Mutex::new(session),
    });

    if !std::path::Path::new(&static_dir).is_dir() {
        tracing::warn!("Static directory {} not found, only the API is served", static_dir);
    }
    let app = app(state, &static_dir);

    tracing::info!("Ecogrid server listening on {}", bind);
    tracing::info!("    Start: POST http://{}/start-simulation", bind);
    tracing::info!("    Step:  GET  http://{}/next-iteration", bind);
    tracing::info!("    Stats: GET  http://{}/api/stats", bind);

    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", bind, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn app(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/start-simulation", post(start_simulation))
        .route("/next-iteration", get(next_iteration))
        .route("/api/stats", get(get_stats))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

/// REST endpoint: clear the grid and seed a new population
async fn start_simulation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            tracing::warn!("Rejected start request: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    let mut session = state.session();
    let (rows, cols) = (session.config().grid.rows, session.config().grid.cols);
    let request =
        SeedRequest::new(body.plants, body.herbivores, body.carnivores).with_size(rows, cols);

    match session.reset_and_seed(&request) {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(SimError::TooManyEntities { .. }) => {
            (StatusCode::BAD_REQUEST, "Too many entities").into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

/// REST endpoint: advance one tick and return the grid
async fn next_iteration(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.session().advance_tick();
    Json(snapshot).into_response()
}

/// REST endpoint: Get simulation stats
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session();
    let census = session.census();
    let metrics = session.metrics();
    Json(serde_json::json!({
        "tick": session.tick(),
        "census": census,
        "last_tick": session.last_report(),
        "totals": {
            "ticks": metrics.tick_count(),
            "births": metrics.births(),
            "deaths": metrics.deaths(),
            "meals": metrics.meals(),
            "moves": metrics.moves(),
            "seeds": metrics.seeds(),
            "rejected_seeds": metrics.rejected_seeds(),
        },
        "fingerprint": session.config().fingerprint(),
    }))
}
