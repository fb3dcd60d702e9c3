// src/handlers/chat.rs
use crate::classifier;
use crate::models::chat::{ChatRequest, ChatResponse};
use crate::AppState;
use axum::{extract::Extension, routing::post, Json, Router};
use std::sync::Arc;

pub const FORM_PROMPT: &str = "Please fill the form for complete fee/course enrollment details.";

pub fn chat_routes() -> Router {
    Router::new().route("/chat", post(chat))
}

async fn chat(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let question = payload.question;
    let show_form = classifier::should_show_form(&question);

    let answer = if show_form {
        tracing::info!("Fee/course question, asking for contact details");
        FORM_PROMPT.to_string()
    } else {
        let answer = state.pipeline.answer_with_source(&question).await;
        tracing::info!(source = answer.source.as_str(), "Answered question");
        answer.text
    };

    Json(ChatResponse {
        answer,
        show_form,
        user_id: payload.user_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::NOT_SURE_MESSAGE;
    use crate::test_support::{test_state, ScriptedModel};

    fn request(question: &str) -> Json<ChatRequest> {
        Json(ChatRequest {
            user_id: Some("user-1".to_string()),
            question: question.to_string(),
        })
    }

    #[tokio::test]
    async fn fee_question_shows_form_without_calling_the_model() {
        let model = ScriptedModel::new(vec![Ok("should not be used".into())]);
        let state = test_state(Some(model.clone())).await;

        let Json(response) = chat(Extension(state), request("What is the fee for the Python course?")).await;

        assert!(response.show_form);
        assert_eq!(response.answer, FORM_PROMPT);
        assert_eq!(response.user_id.as_deref(), Some("user-1"));
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn course_question_without_fee_words_is_answered() {
        let model = ScriptedModel::new(vec![Ok("We teach Python and Java.".into())]);
        let state = test_state(Some(model.clone())).await;

        let Json(response) = chat(Extension(state), request("Which courses do you teach?")).await;

        assert!(!response.show_form);
        assert_eq!(response.answer, "We teach Python and Java.");
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn missing_model_gives_not_sure_answer() {
        let state = test_state(None).await;

        let Json(response) = chat(
            Extension(state),
            Json(ChatRequest {
                user_id: None,
                question: "Where is the campus?".to_string(),
            }),
        )
        .await;

        assert!(!response.show_form);
        assert_eq!(response.answer, NOT_SURE_MESSAGE);
        assert!(response.user_id.is_none());
    }

    #[test]
    fn question_field_is_required() {
        assert!(serde_json::from_str::<ChatRequest>(r#"{"user_id": "abc"}"#).is_err());
        let parsed: ChatRequest = serde_json::from_str(r#"{"question": ""}"#).unwrap();
        assert!(parsed.user_id.is_none());
        assert_eq!(parsed.question, "");
    }
}
