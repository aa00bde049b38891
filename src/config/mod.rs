//! Connection configuration

mod connection;
mod errors;

pub use connection::ConnectionConfig;
pub use errors::{ConfigError, ConfigResult};
