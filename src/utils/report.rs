use crate::isa::{Generation, Opcode};
use crate::mapping::ClassificationTable;
use crate::power::PowerComponent;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
pub struct TableReport {
  pub opcodes: usize,
  pub compute: usize,
  pub groups: Vec<GroupReport>,
  pub categories: BTreeMap<PowerComponent, usize>,
  pub entries: Vec<EntryReport>,
  pub reclassifications: Vec<ReclassificationReport>,
  pub unmapped: Vec<Opcode>,
}

#[derive(Debug, Serialize)]
pub struct GroupReport {
  pub label: String,
  pub generation: Generation,
  pub entries: usize,
  pub reclassified: usize,
}

#[derive(Debug, Serialize)]
pub struct EntryReport {
  pub opcode: Opcode,
  pub category: PowerComponent,
  pub generation: Generation,
}

#[derive(Debug, Serialize)]
pub struct ReclassificationReport {
  pub opcode: Opcode,
  pub from: PowerComponent,
  pub to: PowerComponent,
  pub group: String,
  pub reason: String,
}

/// Serializable snapshot of a built table.
pub fn table_report(table: &ClassificationTable) -> TableReport {
  TableReport {
    opcodes: table.len(),
    compute: table.entries().filter(|e| e.category.is_compute()).count(),
    groups: table
      .groups()
      .iter()
      .map(|g| GroupReport {
        label: g.label.clone(),
        generation: g.generation,
        entries: g.entries,
        reclassified: g.reclassified,
      })
      .collect(),
    categories: table.category_counts(),
    entries: table
      .entries()
      .map(|e| EntryReport {
        opcode: e.opcode,
        category: e.category,
        generation: e.generation,
      })
      .collect(),
    reclassifications: table
      .reclassifications()
      .iter()
      .map(|r| ReclassificationReport {
        opcode: r.opcode,
        from: r.from,
        to: r.to,
        group: r.group.clone(),
        reason: r.reason.clone(),
      })
      .collect(),
    unmapped: table.unmapped(),
  }
}

/// Pretty JSON form of `table_report`.
pub fn table_to_json(table: &ClassificationTable) -> serde_json::Result<String> {
  serde_json::to_string_pretty(&table_report(table))
}

/// Pretty JSON report followed by a newline.
pub fn write_json<W: Write>(table: &ClassificationTable, out: &mut W) -> io::Result<()> {
  serde_json::to_writer_pretty(&mut *out, &table_report(table))?;
  writeln!(out)
}

/// Human-readable summary: groups, category counts, reclassifications and
/// unmapped opcodes.
pub fn write_summary<W: Write>(table: &ClassificationTable, out: &mut W) -> io::Result<()> {
  writeln!(out, "--- Classification Table ---")?;
  writeln!(out, "{} opcodes mapped, {} unmapped", table.len(), table.unmapped().len())?;

  writeln!(out, "\n[groups]")?;
  for group in table.groups() {
    writeln!(
      out,
      "  {:<12} {:<8} {:>4} entries {:>3} reclassified",
      group.label, group.generation, group.entries, group.reclassified
    )?;
  }

  writeln!(out, "\n[categories]")?;
  let mut compute = 0;
  for (category, count) in table.category_counts() {
    if category.is_compute() {
      compute += count;
    }
    writeln!(out, "  {:<8} {:>4}", category, count)?;
  }
  writeln!(out, "  {} opcodes on compute datapaths", compute)?;

  if !table.reclassifications().is_empty() {
    writeln!(out, "\n[reclassifications]")?;
    for r in table.reclassifications() {
      writeln!(out, "  {} {} -> {} ({}): {}", r.opcode, r.from, r.to, r.group, r.reason)?;
    }
  }

  let unmapped = table.unmapped();
  if !unmapped.is_empty() {
    let names: Vec<&str> = unmapped.iter().map(|op| op.mnemonic()).collect();
    writeln!(out, "\n[unmapped]\n  {}", names.join(" "))?;
  }

  writeln!(out, "--- End Table ---")
}

/// `write_summary` to stdout.
pub fn print_table_summary(table: &ClassificationTable) -> io::Result<()> {
  let stdout = io::stdout();
  let mut out = stdout.lock();
  write_summary(table, &mut out)?;
  out.flush()
}
