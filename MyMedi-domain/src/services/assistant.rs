use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::clients::generation::{GenerationRequest, TextGenerator};
use crate::entities::assistant::{
    AssessmentAdvice, AssistantMode, AssistantPrompt, AssistantReply, AssistantResponse,
};
use crate::error::ServiceError;

const CHAT_PREAMBLE: &str = "You are a helpful medical AI. Answer the user's question.";
const ASSESSMENT_PREAMBLE: &str = "You are a helpful medical AI. Return concise HTML paragraphs for: \
1) medications, 2) doctors, 3) labs, 4) pharmacy, 5) dietPlan, 6) exercise, 7) generalAdvice \
based ONLY on the following patient assessment JSON.";
const STUB_CHAT_REPLY: &str = "This is a stubbed AI response. Add a valid OPENAI_API_KEY for real answers.";
const EMPTY_REPLY: &str = "No response.";

/// Work out the prompt and mode from a free-form request body.
///
/// `{prompt}` is a chat question and `{message, type: "assessment"}` an
/// assessment whose message may be any JSON value. Anything else is sent
/// verbatim as a chat prompt.
pub fn extract_prompt(body: &Value) -> AssistantPrompt {
    if let Some(prompt) = body.get("prompt").and_then(Value::as_str).map(str::trim) {
        if !prompt.is_empty() {
            return AssistantPrompt { prompt: prompt.to_string(), mode: AssistantMode::Chat };
        }
    }

    let is_assessment = body.get("type").and_then(Value::as_str) == Some("assessment");
    match body.get("message") {
        Some(Value::String(message)) if is_assessment => AssistantPrompt {
            prompt: message.trim().to_string(),
            mode: AssistantMode::Assessment,
        },
        Some(message) if is_assessment && !message.is_null() => AssistantPrompt {
            prompt: message.to_string(),
            mode: AssistantMode::Assessment,
        },
        _ => AssistantPrompt { prompt: body.to_string(), mode: AssistantMode::Chat },
    }
}

/// Trait for the general health assistant
#[async_trait]
pub trait AssistantServiceTrait {
    /// Answer a chat or assessment request body
    async fn respond(&self, body: Value) -> Result<AssistantResponse, ServiceError>;

    /// Answer a health assessment form submission
    async fn assess(&self, assessment: Value) -> Result<AssistantResponse, ServiceError>;
}

pub struct AssistantService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AssistantService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl AssistantServiceTrait for AssistantService {
    async fn respond(&self, body: Value) -> Result<AssistantResponse, ServiceError> {
        let AssistantPrompt { prompt, mode } = extract_prompt(&body);
        if prompt.is_empty() {
            return Err(ServiceError::Validation("Prompt is required.".to_string()));
        }

        let Some(generator) = self.generator.as_deref() else {
            warn!("OPENAI_API_KEY is not set to a real key, returning stub data");
            let response = match mode {
                AssistantMode::Assessment => AssistantReply::Assessment(AssessmentAdvice::stub()),
                AssistantMode::Chat => AssistantReply::Text(STUB_CHAT_REPLY.to_string()),
            };
            return Ok(AssistantResponse { response });
        };

        let preamble = match mode {
            AssistantMode::Assessment => ASSESSMENT_PREAMBLE,
            AssistantMode::Chat => CHAT_PREAMBLE,
        };
        debug!(?mode, prompt_len = prompt.len(), "Sending assistant prompt");

        let reply = generator
            .generate(GenerationRequest::new(prompt).with_system(preamble))
            .await
            .map_err(|e| {
                error!("Assistant generation failed: {}", e);
                ServiceError::from(e)
            })?;

        let text = if reply.text.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply.text
        };
        Ok(AssistantResponse { response: AssistantReply::Text(text) })
    }

    async fn assess(&self, assessment: Value) -> Result<AssistantResponse, ServiceError> {
        self.respond(json!({ "message": assessment, "type": "assessment" })).await
    }
}

pub fn create_default_assistant_service(generator: Option<Arc<dyn TextGenerator>>) -> AssistantService {
    AssistantService::new(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::generation::{GeneratedText, GenerationError, MockTextGenerator};

    #[test]
    fn test_extract_prompt_modes() {
        let chat = extract_prompt(&json!({ "prompt": "  What is dengue?  " }));
        assert_eq!(chat, AssistantPrompt { prompt: "What is dengue?".to_string(), mode: AssistantMode::Chat });

        let assessment = extract_prompt(&json!({ "message": { "age": 30 }, "type": "assessment" }));
        assert_eq!(assessment.mode, AssistantMode::Assessment);
        assert_eq!(assessment.prompt, r#"{"age":30}"#);

        let fallback = extract_prompt(&json!({ "question": "hi" }));
        assert_eq!(fallback.mode, AssistantMode::Chat);
        assert_eq!(fallback.prompt, r#"{"question":"hi"}"#);
    }

    #[tokio::test]
    async fn test_empty_assessment_message_is_rejected() {
        let service = AssistantService::new(None);
        let result = service.respond(json!({ "message": "   ", "type": "assessment" })).await;
        assert!(matches!(result, Err(ServiceError::Validation(msg)) if msg == "Prompt is required."));
    }

    #[tokio::test]
    async fn test_stub_replies_without_generator() {
        let service = AssistantService::new(None);

        let chat = service.respond(json!({ "prompt": "hello" })).await.unwrap();
        assert!(matches!(chat.response, AssistantReply::Text(ref t) if t.starts_with("This is a stubbed AI response")));

        let assessment = service.assess(json!({ "symptoms": ["cough"] })).await.unwrap();
        assert_eq!(assessment.response, AssistantReply::Assessment(AssessmentAdvice::stub()));
    }

    #[tokio::test]
    async fn test_generator_reply_and_empty_fallback() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|req| req.system.as_deref() == Some(CHAT_PREAMBLE) && req.prompt == "hello")
            .times(1)
            .returning(|_| Ok(GeneratedText { text: "Hi there".to_string(), model: "gpt-4o".to_string() }));
        generator
            .expect_generate()
            .withf(|req| req.system.as_deref() == Some(ASSESSMENT_PREAMBLE))
            .times(1)
            .returning(|_| Ok(GeneratedText { text: String::new(), model: "gpt-4o".to_string() }));

        let service = AssistantService::new(Some(Arc::new(generator)));

        let chat = service.respond(json!({ "prompt": "hello" })).await.unwrap();
        assert_eq!(chat.response, AssistantReply::Text("Hi there".to_string()));

        let assessment = service.assess(json!({ "age": 40 })).await.unwrap();
        assert_eq!(assessment.response, AssistantReply::Text(EMPTY_REPLY.to_string()));
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_| {
            Err(GenerationError::ApiResponse { status: 500, body: "boom".to_string() })
        });

        let service = AssistantService::new(Some(Arc::new(generator)));
        let result = service.respond(json!({ "prompt": "hello" })).await;
        assert!(matches!(result, Err(ServiceError::Upstream(_))));
    }
}
