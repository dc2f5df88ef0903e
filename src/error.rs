//! Error types for the API

use axum::extract::rejection::JsonRejection;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::llm::Provider;

/// Failure of a single provider call.
///
/// Upstream response bodies never end up in these messages; they are only
/// logged where the failure is detected.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{provider} API ключ не настроен на сервере")]
    NotConfigured { provider: Provider },

    #[error("{provider} API ошибка: {status}")]
    UpstreamStatus { provider: Provider, status: u16 },

    #[error("Ошибка соединения с {provider} API")]
    Connection {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("Некорректный ответ от {provider} API")]
    Protocol { provider: Provider },
}

/// The caller already holds as many questions as the mode allows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Достигнут лимит вопросов ({limit}) для режима «{mode}»")]
pub struct QuotaExceeded {
    pub limit: usize,
    pub mode: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Quota(#[from] QuotaExceeded),

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Llm(LlmError::NotConfigured { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::Quota(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "detail": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let message = err.body_text();
                match extract_missing_field(&message) {
                    Some(field) => AppError::BadRequest(format!("Missing required field: {field}")),
                    None => AppError::BadRequest(format!("Invalid JSON: {message}")),
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                AppError::BadRequest(format!("JSON syntax error: {}", err.body_text()))
            }
            JsonRejection::MissingJsonContentType(_) => AppError::BadRequest(
                "Missing `Content-Type: application/json` header".to_string(),
            ),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
