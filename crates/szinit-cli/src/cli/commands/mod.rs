//! Command handlers. Each command is in its own file.

pub(super) mod debug_database_url;
mod docker_acceptance_test;
mod initialize;
mod initialize_database;
mod list;
mod seed;
mod sleep;
pub(super) mod version;
pub(super) mod wait_for_database;

pub use debug_database_url::run_debug_database_url;
pub use docker_acceptance_test::run_docker_acceptance_test;
pub use initialize::{run_initialize, run_initialize_files};
pub use initialize_database::run_initialize_database;
pub use list::{run_list_configurations, run_list_datasources};
pub use sleep::run_sleep;
pub use version::run_version;
pub use wait_for_database::run_wait_for_database;
