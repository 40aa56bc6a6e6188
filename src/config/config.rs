use super::error::{ConfigError, ConfigResult};
use super::spec_file::load_entry_groups;
use crate::mapping::{canonical_spec, DiagnosticPolicy, MappingSpec, TableBuilder};
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use ::config::builder::DefaultState;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_CONFIG: &str = include_str!("default.toml");
const ENV_PREFIX: &str = "POWERMAP";

/// Options for building the classification table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassificationSection {
  #[serde(default)]
  pub diagnostics: DiagnosticPolicy,
  #[serde(default)]
  pub strict_coverage: bool,
  #[serde(default)]
  pub extension_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogSection {
  #[serde(default = "default_log_level")]
  pub level: String,
  #[serde(default)]
  pub quiet: bool,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogSection {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      quiet: false,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
  #[serde(default)]
  pub classification: ClassificationSection,
  #[serde(default)]
  pub log: LogSection,
}

/// Values given on the command line. `None` and `false` leave the
/// configuration untouched.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
  pub quiet: bool,
  pub strict: bool,
  pub diagnostics: Option<DiagnosticPolicy>,
  pub extensions: Vec<PathBuf>,
  pub log_level: Option<String>,
}

impl ClassificationSection {
  /// Canonical groups followed by the groups of every extension file.
  pub fn load_spec(&self) -> ConfigResult<MappingSpec> {
    let mut spec = canonical_spec();
    for path in &self.extension_files {
      let groups = load_entry_groups(path)?;
      log::debug!("loaded {} entry group(s) from {}", groups.len(), path.display());
      spec.extend(groups);
    }
    Ok(spec)
  }

  /// Table builder carrying this section's policy, coverage mode and entry groups.
  pub fn table_builder(&self) -> ConfigResult<TableBuilder> {
    Ok(
      TableBuilder::new(self.load_spec()?)
        .diagnostics(self.diagnostics)
        .strict_coverage(self.strict_coverage),
    )
  }
}

impl LogSection {
  /// Effective log level. `quiet` wins over `level`.
  pub fn level_filter(&self) -> ConfigResult<LevelFilter> {
    if self.quiet {
      return Ok(LevelFilter::Off);
    }
    LevelFilter::from_str(self.level.trim())
      .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.level)))
  }
}

fn defaults() -> ConfigBuilder<DefaultState> {
  Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

/// Load configuration: built-in defaults, then `custom` if given, then
/// `POWERMAP_<SECTION>__<KEY>` environment variables. Extension files given in
/// the environment are comma separated. Relative extension paths are resolved
/// against the directory of `custom`.
pub fn load_config(custom: Option<&Path>) -> ConfigResult<AppConfig> {
  let mut builder = defaults();
  if let Some(path) = custom {
    if !path.is_file() {
      return Err(ConfigError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such config file"),
      });
    }
    builder = builder.add_source(File::from(path).format(FileFormat::Toml));
  }
  builder = builder.add_source(
    Environment::with_prefix(ENV_PREFIX)
      .prefix_separator("_")
      .separator("__")
      .try_parsing(true)
      .list_separator(",")
      .with_list_parse_key("classification.extension_files"),
  );

  let mut config: AppConfig = builder.build()?.try_deserialize()?;
  if let Some(base) = custom.and_then(Path::parent) {
    resolve_paths(&mut config, base);
  }
  Ok(config)
}

/// Defaults overlaid with an inline TOML document. Ignores the environment.
pub fn parse_config(content: &str) -> ConfigResult<AppConfig> {
  let config: AppConfig = defaults()
    .add_source(File::from_str(content, FileFormat::Toml))
    .build()?
    .try_deserialize()?;
  Ok(config)
}

/// Apply command-line values on top of the loaded configuration.
pub fn apply_cli_overrides(config: &mut AppConfig, overrides: &CliOverrides) {
  if overrides.quiet {
    config.log.quiet = true;
  }
  if overrides.strict {
    config.classification.strict_coverage = true;
  }
  if let Some(policy) = overrides.diagnostics {
    config.classification.diagnostics = policy;
  }
  if let Some(level) = &overrides.log_level {
    config.log.level = level.clone();
  }
  config
    .classification
    .extension_files
    .extend(overrides.extensions.iter().cloned());
}

/// Make relative extension paths relative to `base`.
pub fn resolve_paths(config: &mut AppConfig, base: &Path) {
  for path in config.classification.extension_files.iter_mut() {
    if path.is_relative() {
      *path = base.join(&*path);
    }
  }
}

/// Check the log level and that every extension file exists.
pub fn validate_config(config: &AppConfig) -> ConfigResult<()> {
  config.log.level_filter()?;

  for path in &config.classification.extension_files {
    if !path.is_file() {
      return Err(ConfigError::Invalid(format!(
        "extension file {} does not exist",
        path.display()
      )));
    }
  }

  Ok(())
}
