use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("cannot parse {path}: {source}")]
  Toml {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("configuration error: {0}")]
  Layered(#[from] ::config::ConfigError),

  #[error("invalid configuration: {0}")]
  Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
