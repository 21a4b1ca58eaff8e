//! Health and readiness probes.
//!
//! Mounted under `/health`:
//!
//! - `/` reports the cached overall status
//! - `/ready` re-probes dependencies and reports whether traffic is safe
//! - `/live` only proves the process is responding
//! - `/details` re-probes and dumps the per-component picture
//! - `/version` reports build metadata

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

const PROBE_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Degraded,
    Down,
}

impl ComponentStatus {
    fn http_status(self) -> StatusCode {
        match self {
            ComponentStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::OK,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ComponentReport {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthSnapshot {
    pub status: ComponentStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub components: HashMap<String, ComponentReport>,
}

/// Probes dependencies and caches the latest snapshot so the root
/// endpoint can answer without touching the database on every request.
pub struct HealthMonitor {
    db: Arc<DatabaseConnection>,
    snapshot: RwLock<HealthSnapshot>,
    started: Instant,
}

impl HealthMonitor {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            snapshot: RwLock::new(HealthSnapshot {
                status: ComponentStatus::Up,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                uptime_seconds: 0,
                components: HashMap::new(),
            }),
            started: Instant::now(),
        }
    }

    fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    async fn probe_database(&self) -> ComponentReport {
        let (status, message) = match self.db.ping().await {
            Ok(()) => (ComponentStatus::Up, None),
            Err(err) => {
                warn!("database probe failed: {err}");
                (ComponentStatus::Down, Some(err.to_string()))
            }
        };
        ComponentReport {
            status,
            message,
            checked_at: Utc::now(),
        }
    }

    /// Re-probe every dependency and replace the cached snapshot.
    pub async fn refresh(&self) -> HealthSnapshot {
        let mut components = HashMap::new();
        components.insert("database".to_string(), self.probe_database().await);

        // Worst component wins.
        let overall = components
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(ComponentStatus::Up);

        let next = HealthSnapshot {
            status: overall,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            uptime_seconds: self.uptime_seconds(),
            components,
        };

        *self.snapshot.write().await = next.clone();
        next
    }

    pub async fn cached(&self) -> HealthSnapshot {
        self.snapshot.read().await.clone()
    }
}

async fn health_overview(State(monitor): State<Arc<HealthMonitor>>) -> impl IntoResponse {
    let snapshot = monitor.cached().await;
    (
        snapshot.status.http_status(),
        Json(json!({
            "status": snapshot.status,
            "version": snapshot.version,
            "timestamp": snapshot.timestamp,
        })),
    )
}

async fn readiness(State(monitor): State<Arc<HealthMonitor>>) -> impl IntoResponse {
    let snapshot = monitor.refresh().await;
    (
        snapshot.status.http_status(),
        Json(json!({
            "ready": snapshot.status == ComponentStatus::Up,
            "timestamp": snapshot.timestamp,
        })),
    )
}

async fn liveness(State(monitor): State<Arc<HealthMonitor>>) -> impl IntoResponse {
    Json(json!({
        "alive": true,
        "uptime_seconds": monitor.uptime_seconds(),
        "timestamp": Utc::now(),
    }))
}

async fn health_details(State(monitor): State<Arc<HealthMonitor>>) -> impl IntoResponse {
    let snapshot = monitor.refresh().await;
    (snapshot.status.http_status(), Json(snapshot))
}

async fn build_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
        "built": option_env!("BUILD_TIME").unwrap_or("unknown"),
    }))
}

async fn probe_loop(monitor: Arc<HealthMonitor>) {
    debug!("health probe loop started");
    let mut ticker = tokio::time::interval(PROBE_INTERVAL);
    loop {
        ticker.tick().await;
        let snapshot = monitor.refresh().await;
        if snapshot.status != ComponentStatus::Up {
            for (name, report) in &snapshot.components {
                if report.status != ComponentStatus::Up {
                    warn!(
                        "component {name} is {:?}: {}",
                        report.status,
                        report.message.as_deref().unwrap_or("no detail")
                    );
                }
            }
        }
    }
}

/// Builds the `/health` router and starts the background probe loop.
pub fn health_routes_with_state(db_pool: Arc<DatabaseConnection>) -> Router {
    let monitor = Arc::new(HealthMonitor::new(db_pool));

    tokio::spawn(probe_loop(monitor.clone()));

    Router::new()
        .route("/", get(health_overview))
        .route("/ready", get(readiness))
        .route("/live", get(liveness))
        .route("/details", get(health_details))
        .route("/version", get(build_info))
        .with_state(monitor)
}
