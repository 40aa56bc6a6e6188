//! TOML form of extension entry groups.
//!
//! A file holds explicit groups, loose rows, or both:
//!
//! ```toml
//! [[group]]
//! generation = "ampere"
//! label = "sm86 graphics"
//! entries = [{ opcode = "IPA", category = "OTHER" }]
//! reclassify = [{ opcode = "FRND", category = "FP", reason = "runs on the float pipe" }]
//!
//! [[entry]]
//! opcode = "PIXLD"
//! category = "OTHER"
//! generation = "volta"
//! ```
//!
//! Loose rows are gathered into one group per generation, in order of first
//! appearance, after the explicit groups. Rows without a generation belong to
//! the newest one.

use super::error::{ConfigError, ConfigResult};
use crate::isa::{Generation, Opcode};
use crate::mapping::{EntryGroup, SpecEntry};
use crate::power::PowerComponent;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpecFile {
  #[serde(default, rename = "group")]
  groups: Vec<EntryGroup>,
  #[serde(default, rename = "entry")]
  rows: Vec<SpecRow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpecRow {
  opcode: Opcode,
  category: PowerComponent,
  #[serde(default)]
  generation: Option<Generation>,
}

/// Parse entry groups from TOML text. `origin` names the source in labels and
/// error messages.
pub fn parse_entry_groups(content: &str, origin: &str) -> ConfigResult<Vec<EntryGroup>> {
  let file: SpecFile = toml::from_str(content).map_err(|source| ConfigError::Toml {
    path: origin.into(),
    source,
  })?;

  let mut groups = file.groups;
  for (i, group) in groups.iter_mut().enumerate() {
    if group.label.is_empty() {
      group.label = format!("{}#{}", origin, i + 1);
    }
  }

  let mut loose: Vec<EntryGroup> = Vec::new();
  for row in file.rows {
    let generation = row.generation.unwrap_or(Generation::LATEST);
    let position = match loose.iter().position(|g| g.generation == generation) {
      Some(position) => position,
      None => {
        loose.push(EntryGroup::new(generation, format!("{}:{}", origin, generation)));
        loose.len() - 1
      }
    };
    loose[position].entries.push(SpecEntry {
      opcode: row.opcode,
      category: row.category,
    });
  }
  groups.extend(loose);

  Ok(groups)
}

/// Read and parse one extension file.
pub fn load_entry_groups(path: &Path) -> ConfigResult<Vec<EntryGroup>> {
  let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  parse_entry_groups(&content, &path.display().to_string())
}
