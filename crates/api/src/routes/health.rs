//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use serde::Serialize;

use super::RouteGroup;

/// Status reported while the process is serving.
pub const STATUS_UP: &str = "up";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn up(version: &str) -> Self {
        Self {
            status: STATUS_UP.to_string(),
            version: version.to_string(),
        }
    }
}

/// Serves `GET /api/health`.
#[derive(Debug, Clone)]
pub struct HealthRouter {
    version: Arc<str>,
}

impl HealthRouter {
    pub fn new(version: impl Into<Arc<str>>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl RouteGroup for HealthRouter {
    fn configure(&self, router: Router) -> Router {
        let routes = Router::new()
            .route("/api/health", get(check))
            .with_state(self.clone());
        router.merge(routes)
    }
}

/// GET /api/health — returns service status and version.
pub async fn check(State(health): State<HealthRouter>) -> Json<HealthResponse> {
    Json(HealthResponse::up(&health.version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_shape() {
        let json = serde_json::to_value(HealthResponse::up("1.0.0")).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "up", "version": "1.0.0" }));
    }

    #[tokio::test]
    async fn test_check_reports_configured_version() {
        let router = HealthRouter::new("2.3.4");
        let Json(body) = check(State(router)).await;
        assert_eq!(body, HealthResponse::up("2.3.4"));
    }
}
