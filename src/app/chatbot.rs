use crate::app::service::InferenceService;
use crate::core::advisor::{generate_best_effort, DegradedReason};
use crate::domain::ports::GenerationRequest;
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub fn chat_prompt(message: &str) -> String {
    format!(
        "You are a friendly and helpful agricultural expert chatbot for farmers. \
         Answer the user's question simply and clearly. Question: '{message}'"
    )
}

fn chat_placeholder(reason: &DegradedReason) -> String {
    match reason {
        DegradedReason::ClientUnavailable(_) => "Error: AI text service not initialized. Cannot answer.".to_string(),
        _ => "Sorry, I couldn't connect to the AI service. Please try again later.".to_string(),
    }
}

pub async fn answer(service: &InferenceService, request: ChatRequest) -> Result<ChatResponse> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "message cannot be empty".to_string(),
        });
    }

    let response = generate_best_effort(service.text(), GenerationRequest::new(chat_prompt(&request.message)), "chatbot")
        .await
        .text_or_else(chat_placeholder);

    Ok(ChatResponse { response })
}
