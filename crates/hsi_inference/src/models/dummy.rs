use std::fmt;
use hsi_core::{CompletionRequest, Result, SummarizationModel};

/// Offline model: echoes the first words of the prompt's content.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SummarizationModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let prompt = request.user_prompt().unwrap_or_default();
        // Article prompts carry the text after "Content:"
        let body = prompt
            .split_once("Content:")
            .map(|(_, content)| content)
            .unwrap_or(prompt);
        let words: Vec<&str> = body
            .split_whitespace()
            .take(request.max_tokens.min(20) as usize)
            .collect();
        Ok(words.join(" "))
    }
}
