//! Specification assistant handlers
//!
//! Each endpoint builds one prompt, sends it to the requested provider and
//! hands the generated text back unchanged.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::AppJson;
use crate::error::AppError;
use crate::llm::Provider;
use crate::prompts;
use crate::AppState;

// ============ Types ============

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    #[serde(alias = "taskDescription")]
    pub task_description: String,
    #[serde(default, alias = "existingQuestions")]
    pub existing_questions: Vec<String>,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub provider: Provider,
}

#[derive(Debug, Deserialize)]
pub struct RefreshQuestionRequest {
    pub question: String,
    #[serde(default)]
    pub provider: Provider,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTzRequest {
    #[serde(alias = "taskDescription")]
    pub task_description: String,
    #[serde(default)]
    pub provider: Provider,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
}

fn default_mode() -> String {
    prompts::SIMPLIFIED_MODE.to_string()
}

// ============ Handlers ============

/// Generate the next batch of clarifying questions for a task
pub async fn generate_questions(
    State(state): State<AppState>,
    AppJson(req): AppJson<GenerateQuestionsRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let prompt =
        prompts::question_prompt(&req.task_description, &req.existing_questions, &req.mode)
            .map_err(|e| {
                tracing::info!(
                    mode = %req.mode,
                    existing = req.existing_questions.len(),
                    "Question quota reached"
                );
                e
            })?;

    let content = state.llm.invoke(req.provider, &prompt).await?;
    Ok(Json(ChatResponse { content }))
}

/// Rephrase a single question in simpler words
pub async fn refresh_question(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshQuestionRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let prompt = prompts::refresh_prompt(&req.question);
    let content = state.llm.invoke(req.provider, &prompt).await?;
    Ok(Json(ChatResponse { content }))
}

/// Produce the final specification document (Markdown)
pub async fn generate_tz(
    State(state): State<AppState>,
    AppJson(req): AppJson<GenerateTzRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let prompt = prompts::spec_prompt(&req.task_description);
    let content = state.llm.invoke(req.provider, &prompt).await?;
    Ok(Json(ChatResponse { content }))
}
