pub mod config;
pub mod logging;
pub mod messages;

pub mod checksum;
pub mod config_manager;
pub mod database_init;
pub mod database_url;
pub mod engine_config;
pub mod files;
pub mod ini;
