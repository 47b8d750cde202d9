pub mod app_config;
pub mod categories;
pub mod config;
pub mod deal;
pub mod error;

pub use app_config::{AppConfig, ReplicaConfig};
pub use categories::{load_categories, CategoriesFile, CategoryConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use deal::Deal;
pub use error::ConfigError;
