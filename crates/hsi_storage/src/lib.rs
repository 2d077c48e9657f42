use async_trait::async_trait;
use hsi_core::{Error, KeyValueStore, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;
pub mod blog;
pub mod typed;

pub use backends::*;
pub use blog::BlogRepository;

#[async_trait]
pub trait StorageBackend: KeyValueStore + Sized + 'static {
    fn get_error_message() -> &'static str;
    async fn connect(url: Option<&str>) -> Result<Self>;
}

async fn open<T: StorageBackend>(url: Option<&str>) -> Result<Arc<dyn KeyValueStore>> {
    let store = T::connect(url).await.map_err(|e| {
        Error::Storage(format!("{} ({})", T::get_error_message(), e))
    })?;
    Ok(Arc::new(store))
}

/// Opens the backend named `kind` (`memory` or `sqlite`).
pub async fn create_store(kind: &str, url: Option<&str>) -> Result<Arc<dyn KeyValueStore>> {
    let store = match kind {
        "memory" => open::<InMemoryStore>(url).await?,
        #[cfg(feature = "sqlite")]
        "sqlite" => open::<SQLiteStore>(url).await?,
        other => {
            return Err(Error::Storage(format!("Unsupported storage backend: {}", other)));
        }
    };
    info!("🏦 Storage backend initialized (using {})", kind);
    Ok(store)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::blog::BlogRepository;
    pub use super::typed::{get_json, set_json};
    pub use super::{create_store, StorageBackend};
}
