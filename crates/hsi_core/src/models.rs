use async_trait::async_trait;
use crate::types::CompletionRequest;
use crate::Result;

#[async_trait]
pub trait SummarizationModel: Send + Sync {
    /// Name of the backing model, for logs
    fn name(&self) -> &str;

    /// Run a completion and return the generated text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
