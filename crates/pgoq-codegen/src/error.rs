//! Generator error kinds (spec §7's "Generator errors"): unknown SQL type,
//! unknown override type name, catalog query failure — all surfaced to the
//! caller with context rather than panicking.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("catalog query failed: {0}")]
    Catalog(#[from] sqlx::Error),

    #[error("invalid type={0}")]
    UnknownPgType(String),

    #[error("unknown override type name: {0}")]
    UnknownOverrideType(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead { path: String, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse { path: String, source: toml::de::Error },

    #[error("failed to write generated file {path}: {source}")]
    OutputWrite { path: String, source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, CodegenError>;
