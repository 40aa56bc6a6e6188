pub mod canonical;
pub mod classifier;
pub mod diagnostics;
pub mod error;
pub mod spec;
pub mod table;

pub use canonical::canonical_spec;
pub use classifier::{PowerClassifier, TableState};
pub use diagnostics::{CollectingSink, DiagnosticPolicy, DiagnosticSink, LogSink};
pub use error::{BuildError, BuildResult, ClassifierError, UnclassifiedOpcode};
pub use spec::{EntryGroup, MappingSpec, ReclassifyEntry, SpecEntry};
pub use table::{ClassificationTable, GroupSummary, Reclassification, TableBuilder, TableEntry};
