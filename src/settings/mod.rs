// Settings module - the persisted record and where it lives

pub mod storage;
pub mod types;

pub use storage::default_config_path;
pub use types::{AppConfig, ConversionConfig};
