pub mod job;
pub mod loaders;
pub mod query;

pub use job::{Job, NOT_AVAILABLE, NOT_SPECIFIED, SOURCE_LINKEDIN};
pub use loaders::{load_search_config, load_search_config_or_default};
pub use query::{QueryBatch, QuerySpec, RunResult, SearchConfig};
