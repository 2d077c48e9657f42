pub mod bing;

pub use bing::{BingSearch, SearchConfig};

pub mod prelude {
    pub use super::bing::{BingSearch, SearchConfig};
    pub use hsi_core::{Freshness, Result, SearchClient, SearchOptions, SearchResult};
}
