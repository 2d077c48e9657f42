use std::sync::Arc;
use hsi_core::{Error, Result, SummarizationModel};
use tracing::info;
use crate::Config;

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

pub fn create_model(config: Option<Config>) -> Result<Arc<dyn SummarizationModel>> {
    let config = config.unwrap_or_default();
    let model: Arc<dyn SummarizationModel> = match config.provider.as_str() {
        "openai" => Arc::new(OpenAiModel::new(&config)?),
        "dummy" => Arc::new(DummyModel::new()),
        other => {
            return Err(Error::Validation(format!("Unknown model provider: {}", other)));
        }
    };
    info!("🧠 Inference model initialized (using {})", model.name());
    Ok(model)
}
