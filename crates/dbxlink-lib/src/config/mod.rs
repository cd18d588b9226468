pub mod dynamic;
pub mod manager;
pub mod simplified;

pub use dynamic::DynamicConfig;
pub use manager::DynamicConfigManager;
pub use simplified::SimplifiedConfig;
