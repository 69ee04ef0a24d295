//! Custom error types for dbport.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("required client '{name}' not found in PATH")]
    ClientNotFound { name: &'static str },

    #[error("unsupported db_type '{db_type}': only mysql portages are supported")]
    UnsupportedEngine { db_type: String },

    #[error("configuration declares no portages")]
    NoPortages,

    #[error("portage for source '{source_name}' declares no destinations")]
    NoDestinations { source_name: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}
