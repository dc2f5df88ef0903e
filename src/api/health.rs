//! Health check

use axum::{extract::State, Json};
use serde::Serialize;

use crate::llm::Provider;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: ProvidersStatus,
}

/// Whether each provider has a credential. Nothing is contacted.
#[derive(Debug, Serialize)]
pub struct ProvidersStatus {
    pub deepseek: bool,
    pub claude: bool,
}

/// `GET /api/health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        providers: ProvidersStatus {
            deepseek: state.llm.client(Provider::DeepSeek).is_configured(),
            claude: state.llm.client(Provider::Claude).is_configured(),
        },
    })
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, config, get};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_health_reports_credential_presence() {
        let app = app(config("http://127.0.0.1:9", Some("ds-key"), None));
        let (status, body) = get(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({ "status": "ok", "providers": { "deepseek": true, "claude": false } })
        );
    }
}
