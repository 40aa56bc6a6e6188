use super::canonical::canonical_spec;
use super::diagnostics::{DiagnosticPolicy, DiagnosticSink, Diagnostics, LogSink};
use super::error::{BuildError, BuildResult};
use super::spec::{EntryGroup, MappingSpec};
use crate::isa::{Generation, Opcode};
use crate::power::PowerComponent;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct Binding {
  category: PowerComponent,
  generation: Generation,
  group: usize,
}

/// Row of a built table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
  pub opcode: Opcode,
  pub category: PowerComponent,
  pub generation: Generation,
}

/// Category change applied by a later group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reclassification {
  pub opcode: Opcode,
  pub from: PowerComponent,
  pub to: PowerComponent,
  pub generation: Generation,
  pub group: String,
  pub reason: String,
}

/// What one entry group contributed to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
  pub generation: Generation,
  pub label: String,
  pub entries: usize,
  pub reclassified: usize,
}

pub struct TableBuilder {
  spec: MappingSpec,
  policy: DiagnosticPolicy,
  strict_coverage: bool,
  sink: Arc<dyn DiagnosticSink>,
}

impl TableBuilder {
  pub fn new(spec: MappingSpec) -> Self {
    Self {
      spec,
      policy: DiagnosticPolicy::default(),
      strict_coverage: false,
      sink: Arc::new(LogSink),
    }
  }

  /// How often an unmapped opcode is reported.
  pub fn diagnostics(mut self, policy: DiagnosticPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Reject mappings that leave any namespace opcode unmapped.
  pub fn strict_coverage(mut self, strict: bool) -> Self {
    self.strict_coverage = strict;
    self
  }

  /// Receiver of unmapped-opcode diagnostics. Defaults to `LogSink`.
  pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
    self.sink = sink;
    self
  }

  /// Merge the groups in order. Any collision, invalid reclassification or
  /// (in strict mode) coverage gap fails the whole build.
  pub fn build(self) -> BuildResult<ClassificationTable> {
    let mut slots: Vec<Option<Binding>> = vec![None; Opcode::COUNT];
    let mut reclassifications = Vec::new();
    let mut groups = Vec::with_capacity(self.spec.groups().len());
    let labels: Vec<String> = self.spec.groups().iter().map(EntryGroup::display_label).collect();

    for (index, group) in self.spec.groups().iter().enumerate() {
      let label = &labels[index];

      for entry in &group.entries {
        let slot = &mut slots[entry.opcode.index()];
        match *slot {
          None => {
            *slot = Some(Binding {
              category: entry.category,
              generation: group.generation,
              group: index,
            });
          }
          Some(existing) if existing.category == entry.category => {
            return Err(BuildError::DuplicateEntry {
              opcode: entry.opcode,
              category: entry.category,
              first_group: labels[existing.group].clone(),
              group: label.clone(),
            });
          }
          Some(existing) => {
            return Err(BuildError::MalformedMapping {
              opcode: entry.opcode,
              existing: existing.category,
              existing_group: labels[existing.group].clone(),
              conflicting: entry.category,
              group: label.clone(),
            });
          }
        }
      }

      for row in &group.reclassify {
        let invalid = |detail| BuildError::InvalidReclassification {
          opcode: row.opcode,
          group: label.clone(),
          detail,
        };
        let binding = slots[row.opcode.index()]
          .as_mut()
          .ok_or_else(|| invalid("opcode is not defined by an earlier group"))?;
        if binding.group == index {
          return Err(invalid("opcode is already bound by this group"));
        }
        if binding.category == row.category {
          return Err(invalid("category is unchanged"));
        }
        if row.reason.trim().is_empty() {
          return Err(invalid("a reason is required"));
        }

        log::info!(
          "group '{}' reclassifies {} from {} to {}: {}",
          label,
          row.opcode,
          binding.category,
          row.category,
          row.reason
        );
        reclassifications.push(Reclassification {
          opcode: row.opcode,
          from: binding.category,
          to: row.category,
          generation: group.generation,
          group: label.clone(),
          reason: row.reason.clone(),
        });
        binding.category = row.category;
        binding.group = index;
      }

      log::debug!(
        "merged group '{}' ({}): {} entries, {} reclassifications",
        label,
        group.generation,
        group.entries.len(),
        group.reclassify.len()
      );
      groups.push(GroupSummary {
        generation: group.generation,
        label: label.clone(),
        entries: group.entries.len(),
        reclassified: group.reclassify.len(),
      });
    }

    let len = slots.iter().filter(|slot| slot.is_some()).count();
    if self.strict_coverage && len < Opcode::COUNT {
      let missing = Opcode::ALL
        .iter()
        .copied()
        .filter(|op| slots[op.index()].is_none())
        .collect();
      return Err(BuildError::IncompleteMapping { missing });
    }

    log::info!(
      "classification table built: {} opcodes from {} groups, {} unmapped",
      len,
      groups.len(),
      Opcode::COUNT - len
    );

    Ok(ClassificationTable {
      slots: slots.into_boxed_slice(),
      len,
      groups,
      reclassifications,
      diagnostics: Diagnostics::new(self.policy, self.sink),
    })
  }
}

/// Immutable opcode to power component mapping.
///
/// Only exists in the built state. Lookups take `&self` and never lock, so one
/// table can be shared by reference across every simulated core.
#[derive(Debug)]
pub struct ClassificationTable {
  slots: Box<[Option<Binding>]>,
  len: usize,
  groups: Vec<GroupSummary>,
  reclassifications: Vec<Reclassification>,
  diagnostics: Diagnostics,
}

impl ClassificationTable {
  pub fn build(spec: MappingSpec) -> BuildResult<Self> {
    TableBuilder::new(spec).build()
  }

  /// Table of the canonical groups with default options.
  pub fn canonical() -> BuildResult<Self> {
    Self::build(canonical_spec())
  }

  pub fn builder(spec: MappingSpec) -> TableBuilder {
    TableBuilder::new(spec)
  }

  /// Category of `opcode`. An opcode without an entry is reported to the
  /// diagnostic sink and accounted as `OTHER`.
  pub fn classify(&self, opcode: Opcode) -> PowerComponent {
    match self.get(opcode) {
      Some(category) => category,
      None => {
        self.diagnostics.report(opcode);
        PowerComponent::Other
      }
    }
  }

  /// Lookup without the `OTHER` fallback and without diagnostics.
  pub fn get(&self, opcode: Opcode) -> Option<PowerComponent> {
    self.slots[opcode.index()].map(|b| b.category)
  }

  /// Generation of the group that last bound `opcode`.
  pub fn generation_of(&self, opcode: Opcode) -> Option<Generation> {
    self.slots[opcode.index()].map(|b| b.generation)
  }

  pub fn contains(&self, opcode: Opcode) -> bool {
    self.slots[opcode.index()].is_some()
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Mapped opcodes in namespace order.
  pub fn entries(&self) -> impl Iterator<Item = TableEntry> + '_ {
    Opcode::ALL.iter().filter_map(move |&opcode| {
      self.slots[opcode.index()].map(|b| TableEntry {
        opcode,
        category: b.category,
        generation: b.generation,
      })
    })
  }

  /// Namespace opcodes without an entry.
  pub fn unmapped(&self) -> Vec<Opcode> {
    Opcode::ALL.iter().copied().filter(|&op| !self.contains(op)).collect()
  }

  /// Number of mapped opcodes per category.
  pub fn category_counts(&self) -> BTreeMap<PowerComponent, usize> {
    let mut counts = BTreeMap::new();
    for entry in self.entries() {
      *counts.entry(entry.category).or_insert(0) += 1;
    }
    counts
  }

  pub fn groups(&self) -> &[GroupSummary] {
    &self.groups
  }

  /// Applied reclassifications, in merge order.
  pub fn reclassifications(&self) -> &[Reclassification] {
    &self.reclassifications
  }

  /// Distinct unmapped opcodes passed to `classify` so far.
  pub fn unclassified_seen(&self) -> Vec<Opcode> {
    self.diagnostics.seen()
  }

  pub fn diagnostic_policy(&self) -> DiagnosticPolicy {
    self.diagnostics.policy()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mapping::diagnostics::CollectingSink;

  fn group(generation: Generation, label: &str, rows: &[(Opcode, PowerComponent)]) -> EntryGroup {
    EntryGroup::new(generation, label).with_entries(rows)
  }

  #[test]
  fn test_canonical_builds() {
    let table = ClassificationTable::canonical().unwrap();
    assert_eq!(table.len(), 211);
    assert_eq!(table.unmapped().len(), 7);
    assert_eq!(table.groups().len(), 5);
    assert!(table.reclassifications().is_empty());
  }

  #[test]
  fn test_conflicting_categories_rejected() {
    let spec = MappingSpec::new()
      .with_group(group(Generation::Volta, "base", &[(Opcode::FADD, PowerComponent::Fp)]))
      .with_group(group(Generation::Ampere, "ext", &[(Opcode::FADD, PowerComponent::Int)]));

    match ClassificationTable::build(spec) {
      Err(BuildError::MalformedMapping {
        opcode,
        existing,
        existing_group,
        conflicting,
        group,
      }) => {
        assert_eq!(opcode, Opcode::FADD);
        assert_eq!(existing, PowerComponent::Fp);
        assert_eq!(existing_group, "base");
        assert_eq!(conflicting, PowerComponent::Int);
        assert_eq!(group, "ext");
      }
      other => panic!("expected MalformedMapping, got {:?}", other),
    }
  }

  #[test]
  fn test_conflict_within_one_group_rejected() {
    let spec = MappingSpec::new().with_group(group(
      Generation::Volta,
      "base",
      &[(Opcode::IMAD, PowerComponent::IntMul), (Opcode::IMAD, PowerComponent::Int)],
    ));
    assert!(matches!(
      ClassificationTable::build(spec),
      Err(BuildError::MalformedMapping { opcode: Opcode::IMAD, .. })
    ));
  }

  #[test]
  fn test_identical_redefinition_rejected() {
    let spec = MappingSpec::new()
      .with_group(group(Generation::Volta, "base", &[(Opcode::LDG, PowerComponent::Other)]))
      .with_group(group(Generation::Turing, "ext", &[(Opcode::LDG, PowerComponent::Other)]));

    let err = ClassificationTable::build(spec).unwrap_err();
    assert_eq!(
      err,
      BuildError::DuplicateEntry {
        opcode: Opcode::LDG,
        category: PowerComponent::Other,
        first_group: "base".to_string(),
        group: "ext".to_string(),
      }
    );
  }

  #[test]
  fn test_identical_row_twice_in_one_group_rejected() {
    let spec = MappingSpec::new().with_group(group(
      Generation::Volta,
      "base",
      &[(Opcode::FADD, PowerComponent::Fp), (Opcode::FADD, PowerComponent::Fp)],
    ));

    let err = ClassificationTable::build(spec).unwrap_err();
    assert_eq!(
      err,
      BuildError::DuplicateEntry {
        opcode: Opcode::FADD,
        category: PowerComponent::Fp,
        first_group: "base".to_string(),
        group: "base".to_string(),
      }
    );
  }

  #[test]
  fn test_reclassification_applied() {
    let spec = MappingSpec::new()
      .with_group(group(Generation::Volta, "base", &[(Opcode::FRND, PowerComponent::Int)]))
      .with_group(EntryGroup::new(Generation::Ampere, "fix").reclassify(
        Opcode::FRND,
        PowerComponent::Fp,
        "rounding runs on the float pipe",
      ));

    let table = ClassificationTable::build(spec).unwrap();
    assert_eq!(table.classify(Opcode::FRND), PowerComponent::Fp);
    assert_eq!(table.generation_of(Opcode::FRND), Some(Generation::Ampere));
    assert_eq!(table.len(), 1);

    let applied = &table.reclassifications()[0];
    assert_eq!(applied.from, PowerComponent::Int);
    assert_eq!(applied.to, PowerComponent::Fp);
    assert_eq!(applied.group, "fix");
  }

  #[test]
  fn test_invalid_reclassifications() {
    let base = || group(Generation::Volta, "base", &[(Opcode::MOV, PowerComponent::Int)]);
    let cases = [
      (
        MappingSpec::new().with_group(EntryGroup::new(Generation::Volta, "x").reclassify(
          Opcode::MOV,
          PowerComponent::Other,
          "r",
        )),
        "opcode is not defined by an earlier group",
      ),
      (
        MappingSpec::new().with_group(base().reclassify(Opcode::MOV, PowerComponent::Other, "r")),
        "opcode is already bound by this group",
      ),
      (
        MappingSpec::new()
          .with_group(base())
          .with_group(EntryGroup::new(Generation::Turing, "x").reclassify(Opcode::MOV, PowerComponent::Int, "r")),
        "category is unchanged",
      ),
      (
        MappingSpec::new()
          .with_group(base())
          .with_group(EntryGroup::new(Generation::Turing, "x").reclassify(Opcode::MOV, PowerComponent::Other, " ")),
        "a reason is required",
      ),
    ];

    for (spec, expected) in cases {
      match ClassificationTable::build(spec) {
        Err(BuildError::InvalidReclassification { opcode, detail, .. }) => {
          assert_eq!(opcode, Opcode::MOV);
          assert_eq!(detail, expected);
        }
        other => panic!("expected InvalidReclassification, got {:?}", other),
      }
    }
  }

  #[test]
  fn test_strict_coverage() {
    let err = ClassificationTable::builder(canonical_spec())
      .strict_coverage(true)
      .build()
      .unwrap_err();
    match err {
      BuildError::IncompleteMapping { missing } => {
        assert_eq!(
          missing,
          vec![Opcode::AL2P, Opcode::ALD, Opcode::AST, Opcode::IPA, Opcode::ISBERD, Opcode::OUT, Opcode::PIXLD]
        );
      }
      other => panic!("expected IncompleteMapping, got {:?}", other),
    }

    let mut spec = canonical_spec();
    spec.push_group(group(
      Generation::Volta,
      "graphics",
      &[
        (Opcode::AL2P, PowerComponent::Other),
        (Opcode::ALD, PowerComponent::Other),
        (Opcode::AST, PowerComponent::Other),
        (Opcode::IPA, PowerComponent::Other),
        (Opcode::ISBERD, PowerComponent::Other),
        (Opcode::OUT, PowerComponent::Other),
        (Opcode::PIXLD, PowerComponent::Other),
      ],
    ));
    let table = ClassificationTable::builder(spec).strict_coverage(true).build().unwrap();
    assert_eq!(table.len(), Opcode::COUNT);
    assert!(table.unmapped().is_empty());
  }

  #[test]
  fn test_missing_opcode_falls_back_to_other() {
    let sink = Arc::new(CollectingSink::new());
    let table = ClassificationTable::builder(canonical_spec())
      .sink(sink.clone())
      .build()
      .unwrap();

    assert_eq!(table.get(Opcode::PIXLD), None);
    assert!(sink.is_empty());
    assert_eq!(table.classify(Opcode::PIXLD), PowerComponent::Other);
    assert_eq!(table.classify(Opcode::PIXLD), PowerComponent::Other);
    assert_eq!(sink.received(), vec![Opcode::PIXLD]);
    assert_eq!(table.unclassified_seen(), vec![Opcode::PIXLD]);
  }

  #[test]
  fn test_entries_in_namespace_order() {
    let table = ClassificationTable::canonical().unwrap();
    let entries: Vec<TableEntry> = table.entries().collect();
    assert_eq!(entries.len(), table.len());
    assert!(entries.windows(2).all(|w| w[0].opcode < w[1].opcode));
    assert_eq!(
      entries[0],
      TableEntry {
        opcode: Opcode::FADD,
        category: PowerComponent::Fp,
        generation: Generation::Volta,
      }
    );
  }

  #[test]
  fn test_category_counts() {
    let counts = ClassificationTable::canonical().unwrap().category_counts();
    assert_eq!(counts.values().sum::<usize>(), 211);
    assert_eq!(counts[&PowerComponent::FpSin], 1);
    assert_eq!(counts[&PowerComponent::Tensor], 4);
    assert_eq!(counts[&PowerComponent::Tex], 9);
  }
}
