use hsi_core::{
    ChatMessage, CompletionRequest, Error, Result, Role, SearchClient, SearchOptions,
    SummarizationModel,
};
use std::sync::Arc;
use tracing::warn;

const CONTEXT_RESULTS: usize = 3;

const ASSISTANT_INTRO: &str = "You are an AI assistant for the Harley Street Institute, \
specializing in aesthetic medicine training and education.";

const ASSISTANT_GUIDANCE: &str = "Focus on providing accurate information about:
- Aesthetic medicine courses and certifications
- Clinical procedures and best practices
- Training requirements and qualifications
- Industry regulations and standards

Always be professional and accurate in your responses. If you're not sure about something, say so rather than making assumptions.

When discussing treatments or procedures:
- Emphasize the importance of proper training and certification
- Highlight safety considerations and best practices
- Reference current industry standards and guidelines
- Provide context about required qualifications";

fn system_prompt(context: Option<&str>) -> String {
    match context {
        Some(context) => format!(
            "{}\n\nContext from relevant sources:\n{}\n\n{}",
            ASSISTANT_INTRO, context, ASSISTANT_GUIDANCE
        ),
        None => format!("{}\n\n{}", ASSISTANT_INTRO, ASSISTANT_GUIDANCE),
    }
}

/// Site chat assistant grounded on a web search for the latest question.
pub struct ChatAssistant {
    search: Arc<dyn SearchClient>,
    model: Arc<dyn SummarizationModel>,
}

impl ChatAssistant {
    pub fn new(search: Arc<dyn SearchClient>, model: Arc<dyn SummarizationModel>) -> Self {
        Self { search, model }
    }

    /// Search context for `question`; a failed search only loses the context.
    async fn context_for(&self, question: &str) -> Option<String> {
        match self.search.search(question, &SearchOptions::new()).await {
            Ok(results) if !results.is_empty() => Some(
                results
                    .iter()
                    .take(CONTEXT_RESULTS)
                    .map(|r| format!("{}\n{}", r.title, r.snippet))
                    .collect::<Vec<_>>()
                    .join("\n\n"),
            ),
            Ok(_) => None,
            Err(e) => {
                warn!("Search for chat context failed: {}", e);
                None
            }
        }
    }

    pub async fn reply(&self, conversation: Vec<ChatMessage>) -> Result<String> {
        let question = conversation
            .last()
            .map(|m| m.content.clone())
            .ok_or_else(|| Error::Validation("messages must not be empty".to_string()))?;

        let context = self.context_for(&question).await;
        let mut messages = vec![ChatMessage::system(system_prompt(context.as_deref()))];
        messages.extend(conversation.into_iter().filter(|m| m.role != Role::System));

        let request = CompletionRequest {
            messages,
            temperature: 0.7,
            max_tokens: 2000,
        };
        self.model.complete(&request).await
    }
}
