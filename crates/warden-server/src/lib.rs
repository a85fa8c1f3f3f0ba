pub mod config;
pub mod observability;
pub mod server;
pub mod users;

pub use config::AppConfig;
pub use observability::{apply_logging_level, init_tracing};
pub use server::{build_app, run};
