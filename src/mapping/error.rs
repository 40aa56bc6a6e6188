use crate::isa::Opcode;
use crate::power::PowerComponent;
use thiserror::Error;

/// Build-time failures. Any of these must stop the simulation from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  #[error(
    "opcode {opcode} bound to {existing} by group '{existing_group}' and to {conflicting} by group '{group}'"
  )]
  MalformedMapping {
    opcode: Opcode,
    existing: PowerComponent,
    existing_group: String,
    conflicting: PowerComponent,
    group: String,
  },

  #[error("opcode {opcode} -> {category} listed twice (groups '{first_group}' and '{group}')")]
  DuplicateEntry {
    opcode: Opcode,
    category: PowerComponent,
    first_group: String,
    group: String,
  },

  #[error("invalid reclassification of {opcode} in group '{group}': {detail}")]
  InvalidReclassification {
    opcode: Opcode,
    group: String,
    detail: &'static str,
  },

  #[error("{} opcode(s) have no power component: {}", .missing.len(), join_opcodes(.missing))]
  IncompleteMapping { missing: Vec<Opcode> },
}

pub type BuildResult<T> = Result<T, BuildError>;

/// Lookup of an opcode the table has no entry for. Recovered locally as
/// `OTHER` and reported through a diagnostic sink, never returned as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("opcode {opcode} has no power component entry, accounting it as OTHER")]
pub struct UnclassifiedOpcode {
  pub opcode: Opcode,
}

/// Misuse of the `Unbuilt -> Built` classifier slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
  #[error("classification table used before it was built")]
  NotInitialized,

  #[error("classification table is already built")]
  AlreadyInitialized,

  #[error(transparent)]
  Build(#[from] BuildError),
}

fn join_opcodes(ops: &[Opcode]) -> String {
  ops.iter().map(|op| op.mnemonic()).collect::<Vec<_>>().join(", ")
}
