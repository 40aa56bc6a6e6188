use crate::isa::{Generation, Opcode};
use crate::power::PowerComponent;
use serde::{Deserialize, Serialize};

/// One `(opcode, category)` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecEntry {
  pub opcode: Opcode,
  pub category: PowerComponent,
}

/// Explicit change of the category an earlier group gave to an opcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReclassifyEntry {
  pub opcode: Opcode,
  pub category: PowerComponent,
  pub reason: String,
}

/// Entries introduced by one hardware generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryGroup {
  #[serde(default = "latest_generation")]
  pub generation: Generation,
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub entries: Vec<SpecEntry>,
  #[serde(default)]
  pub reclassify: Vec<ReclassifyEntry>,
}

fn latest_generation() -> Generation {
  Generation::LATEST
}

impl EntryGroup {
  pub fn new(generation: Generation, label: impl Into<String>) -> Self {
    Self {
      generation,
      label: label.into(),
      entries: Vec::new(),
      reclassify: Vec::new(),
    }
  }

  /// Append `(opcode, category)` rows.
  pub fn with_entries(mut self, rows: &[(Opcode, PowerComponent)]) -> Self {
    self
      .entries
      .extend(rows.iter().map(|&(opcode, category)| SpecEntry { opcode, category }));
    self
  }

  pub fn entry(mut self, opcode: Opcode, category: PowerComponent) -> Self {
    self.entries.push(SpecEntry { opcode, category });
    self
  }

  /// Change the category an earlier group gave `opcode`.
  pub fn reclassify(mut self, opcode: Opcode, category: PowerComponent, reason: impl Into<String>) -> Self {
    self.reclassify.push(ReclassifyEntry {
      opcode,
      category,
      reason: reason.into(),
    });
    self
  }

  /// Label used in diagnostics, falls back to the generation name.
  pub fn display_label(&self) -> String {
    if self.label.is_empty() {
      self.generation.to_string()
    } else {
      self.label.clone()
    }
  }
}

/// Ordered list of entry groups. Groups are merged front to back at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSpec {
  groups: Vec<EntryGroup>,
}

impl MappingSpec {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a group; groups merge in insertion order.
  pub fn with_group(mut self, group: EntryGroup) -> Self {
    self.groups.push(group);
    self
  }

  pub fn push_group(&mut self, group: EntryGroup) {
    self.groups.push(group);
  }

  pub fn extend<I: IntoIterator<Item = EntryGroup>>(&mut self, groups: I) {
    self.groups.extend(groups);
  }

  pub fn groups(&self) -> &[EntryGroup] {
    &self.groups
  }

  /// Total number of entry rows, reclassifications excluded.
  pub fn entry_count(&self) -> usize {
    self.groups.iter().map(|g| g.entries.len()).sum()
  }
}

impl FromIterator<EntryGroup> for MappingSpec {
  fn from_iter<I: IntoIterator<Item = EntryGroup>>(iter: I) -> Self {
    Self {
      groups: iter.into_iter().collect(),
    }
  }
}
