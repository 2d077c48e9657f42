pub mod error;
pub mod models;
pub mod search;
pub mod storage;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Error, Result};
pub use models::SummarizationModel;
pub use search::SearchClient;
pub use storage::{keys, KeyValueStore};
pub use types::*;
