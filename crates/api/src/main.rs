use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notdienst_core::domain::pharmacy::{GeoPoint, PharmacyRecord};
use notdienst_core::domain::select;
use notdienst_core::format;
use notdienst_core::ingest;
use notdienst_core::ingest::provider::{HttpXmlFeedSource, PharmacyFeedSource};
use notdienst_core::ingest::types::FeedDocument;
use notdienst_core::time;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = notdienst_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let feed: Option<Arc<dyn PharmacyFeedSource>> = match HttpXmlFeedSource::from_settings(
        &settings,
    ) {
        Ok(source) => Some(Arc::new(source)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "feed source unavailable; starting API in degraded mode");
            None
        }
    };

    let state = AppState { feed };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/pharmacies", get(get_pharmacies))
        .route("/api/pharmacies/nearest", get(get_nearest))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn health() -> &'static str {
    "Backend is running."
}

#[derive(Clone)]
struct AppState {
    feed: Option<Arc<dyn PharmacyFeedSource>>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn error_body(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

/// Proxy passthrough: fetch the upstream XML and emit it as the
/// `{ container: { entries: { entry: ... } } }` JSON document. Upstream
/// failures surface as an opaque 500; the detail stays in the logs.
async fn get_pharmacies(State(state): State<AppState>) -> Result<Json<FeedDocument>, ApiError> {
    let Some(feed) = &state.feed else {
        return Err(error_body(
            StatusCode::SERVICE_UNAVAILABLE,
            "Pharmacy feed is not configured",
        ));
    };

    let entries = feed.fetch_entries().await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "feed fetch failed");
        error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to retrieve pharmacy data",
        )
    })?;

    tracing::info!(count = entries.len(), "fetched pharmacy entries");

    Ok(Json(FeedDocument::from_entries(entries)))
}

#[derive(Debug, Deserialize)]
struct NearestQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Serialize)]
struct NearestResponse {
    pharmacy: PharmacyRecord,
    distance_km: Option<f64>,
    distance_display: Option<String>,
    shift_window: String,
}

/// Server-side selection: the nearest pharmacy whose shift window covers the
/// current local time. Without `lat`/`lon` the first open entry in feed order
/// is returned. No open pharmacy is absence (404), not an error.
async fn get_nearest(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<NearestResponse>, ApiError> {
    let Some(feed) = &state.feed else {
        return Err(error_body(
            StatusCode::SERVICE_UNAVAILABLE,
            "Pharmacy feed is not configured",
        ));
    };

    let user = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
        (None, None) => None,
        _ => {
            return Err(error_body(
                StatusCode::BAD_REQUEST,
                "lat and lon must be provided together",
            ));
        }
    };

    let entries = feed.fetch_entries().await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "feed fetch failed");
        error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to retrieve pharmacy data",
        )
    })?;

    let records = ingest::normalize_records(entries);
    let now = time::now_local();

    let candidate = select::select_nearest(&records, now, user).ok_or_else(|| {
        error_body(StatusCode::NOT_FOUND, "No pharmacy is currently on duty")
    })?;

    let shift_window = format::format_shift_window(candidate.record.from, candidate.record.to);
    let distance_display = candidate.distance_km.map(format::format_distance_km);

    Ok(Json(NearestResponse {
        pharmacy: candidate.record,
        distance_km: candidate.distance_km,
        distance_display,
        shift_window,
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &notdienst_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
