use super::error::ClassifierError;
use super::spec::MappingSpec;
use super::table::{ClassificationTable, TableBuilder};
use crate::isa::Opcode;
use crate::power::PowerComponent;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
  Unbuilt,
  Built,
}

/// Owner of the classification table for one simulation run.
///
/// Starts `Unbuilt`; the first successful `build` or `install` moves it to
/// `Built`, which is terminal. Can live in a `static` since `new` is const.
#[derive(Debug, Default)]
pub struct PowerClassifier {
  table: OnceLock<ClassificationTable>,
}

impl PowerClassifier {
  pub const fn new() -> Self {
    Self { table: OnceLock::new() }
  }

  pub fn state(&self) -> TableState {
    if self.table.get().is_some() {
      TableState::Built
    } else {
      TableState::Unbuilt
    }
  }

  pub fn is_built(&self) -> bool {
    self.state() == TableState::Built
  }

  /// Build the table with default options. A failed build leaves the slot
  /// `Unbuilt`.
  pub fn build(&self, spec: MappingSpec) -> Result<&ClassificationTable, ClassifierError> {
    self.build_with(TableBuilder::new(spec))
  }

  /// Build from a configured `TableBuilder` and install the result.
  pub fn build_with(&self, builder: TableBuilder) -> Result<&ClassificationTable, ClassifierError> {
    if self.is_built() {
      return Err(ClassifierError::AlreadyInitialized);
    }
    let table = builder.build()?;
    self.install(table)
  }

  /// Move an already built table into the slot.
  pub fn install(&self, table: ClassificationTable) -> Result<&ClassificationTable, ClassifierError> {
    self
      .table
      .set(table)
      .map_err(|_| ClassifierError::AlreadyInitialized)?;
    self.table()
  }

  /// The built table, or `NotInitialized`.
  pub fn table(&self) -> Result<&ClassificationTable, ClassifierError> {
    self.table.get().ok_or(ClassifierError::NotInitialized)
  }

  /// Category of `opcode`. Fails with `NotInitialized` before a successful build.
  pub fn classify(&self, opcode: Opcode) -> Result<PowerComponent, ClassifierError> {
    Ok(self.table()?.classify(opcode))
  }
}
