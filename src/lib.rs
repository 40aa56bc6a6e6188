//! SASS opcode to power component classification for AccelWattch-style GPU
//! power estimation.
//!
//! ```
//! use powermap::{ClassificationTable, Opcode, PowerComponent};
//!
//! let table = ClassificationTable::canonical().unwrap();
//! assert_eq!(table.classify(Opcode::FFMA), PowerComponent::FpMul);
//! assert_eq!(table.classify(Opcode::IPA), PowerComponent::Other);
//! ```

pub mod config;
pub mod isa;
pub mod mapping;
pub mod power;
pub mod shell;
pub mod utils;

pub use isa::{Generation, Opcode};
pub use mapping::{
  canonical_spec, BuildError, ClassificationTable, ClassifierError, DiagnosticPolicy, DiagnosticSink, EntryGroup,
  MappingSpec, PowerClassifier, TableBuilder,
};
pub use power::PowerComponent;
pub use utils::log;
