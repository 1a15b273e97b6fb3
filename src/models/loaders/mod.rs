pub mod config_loader;

pub use config_loader::{load_search_config, load_search_config_or_default};
