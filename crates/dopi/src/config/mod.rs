pub mod loader;
pub mod schema;

pub use loader::{default_config_path, load_config, load_config_from_str, save_config, CONFIG_ENV};
pub use schema::Config;
