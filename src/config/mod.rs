pub mod config;
pub mod error;
pub mod spec_file;

pub use config::{
  apply_cli_overrides, load_config, parse_config, validate_config, AppConfig, ClassificationSection, CliOverrides,
  LogSection,
};
pub use error::{ConfigError, ConfigResult};
pub use spec_file::{load_entry_groups, parse_entry_groups};
