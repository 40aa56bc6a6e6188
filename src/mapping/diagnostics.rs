use super::error::UnclassifiedOpcode;
use crate::isa::Opcode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// How often an unclassified opcode is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiagnosticPolicy {
  /// First lookup of each distinct missing opcode only.
  #[default]
  #[serde(rename = "once")]
  OncePerOpcode,
  /// Every lookup of a missing opcode.
  #[serde(rename = "every")]
  EveryCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagnostic policy '{0}', expected 'once' or 'every'")]
pub struct UnknownPolicy(pub String);

impl FromStr for DiagnosticPolicy {
  type Err = UnknownPolicy;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "once" => Ok(DiagnosticPolicy::OncePerOpcode),
      "every" => Ok(DiagnosticPolicy::EveryCall),
      _ => Err(UnknownPolicy(s.to_string())),
    }
  }
}

impl fmt::Display for DiagnosticPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DiagnosticPolicy::OncePerOpcode => f.pad("once"),
      DiagnosticPolicy::EveryCall => f.pad("every"),
    }
  }
}

/// Receiver of configuration-incompleteness warnings raised by lookups.
pub trait DiagnosticSink: Send + Sync {
  fn unclassified(&self, diagnostic: &UnclassifiedOpcode);
}

/// Default sink, forwards to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
  fn unclassified(&self, diagnostic: &UnclassifiedOpcode) {
    log::warn!("{}", diagnostic);
  }
}

/// Keeps every diagnostic it receives, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
  received: Mutex<Vec<Opcode>>,
}

impl CollectingSink {
  pub fn new() -> Self {
    Self::default()
  }

  /// Opcodes reported so far, in arrival order.
  pub fn received(&self) -> Vec<Opcode> {
    match self.received.lock() {
      Ok(received) => received.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }

  pub fn len(&self) -> usize {
    self.received().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl DiagnosticSink for CollectingSink {
  fn unclassified(&self, diagnostic: &UnclassifiedOpcode) {
    let mut received = match self.received.lock() {
      Ok(received) => received,
      Err(poisoned) => poisoned.into_inner(),
    };
    received.push(diagnostic.opcode);
  }
}

/// Per-table reporting state. The only interior mutability a built table has,
/// one flag per opcode, so lookups stay lock-free.
pub(crate) struct Diagnostics {
  policy: DiagnosticPolicy,
  sink: Arc<dyn DiagnosticSink>,
  seen: Box<[AtomicBool]>,
}

impl Diagnostics {
  pub(crate) fn new(policy: DiagnosticPolicy, sink: Arc<dyn DiagnosticSink>) -> Self {
    Self {
      policy,
      sink,
      seen: (0..Opcode::COUNT).map(|_| AtomicBool::new(false)).collect(),
    }
  }

  pub(crate) fn policy(&self) -> DiagnosticPolicy {
    self.policy
  }

  pub(crate) fn report(&self, opcode: Opcode) {
    let first = !self.seen[opcode.index()].swap(true, Ordering::Relaxed);
    if first || self.policy == DiagnosticPolicy::EveryCall {
      self.sink.unclassified(&UnclassifiedOpcode { opcode });
    }
  }

  pub(crate) fn seen(&self) -> Vec<Opcode> {
    Opcode::ALL
      .iter()
      .copied()
      .filter(|op| self.seen[op.index()].load(Ordering::Relaxed))
      .collect()
  }
}

impl fmt::Debug for Diagnostics {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Diagnostics")
      .field("policy", &self.policy)
      .field("seen", &self.seen())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_once_per_opcode() {
    let sink = Arc::new(CollectingSink::new());
    let diagnostics = Diagnostics::new(DiagnosticPolicy::OncePerOpcode, sink.clone());
    diagnostics.report(Opcode::IPA);
    diagnostics.report(Opcode::IPA);
    diagnostics.report(Opcode::OUT);
    diagnostics.report(Opcode::IPA);

    assert_eq!(sink.received(), vec![Opcode::IPA, Opcode::OUT]);
    assert_eq!(diagnostics.seen(), vec![Opcode::IPA, Opcode::OUT]);
  }

  #[test]
  fn test_every_call() {
    let sink = Arc::new(CollectingSink::new());
    let diagnostics = Diagnostics::new(DiagnosticPolicy::EveryCall, sink.clone());
    diagnostics.report(Opcode::ALD);
    diagnostics.report(Opcode::ALD);

    assert_eq!(sink.len(), 2);
    assert_eq!(diagnostics.seen(), vec![Opcode::ALD]);
  }

  #[test]
  fn test_policy_parse() {
    assert_eq!("once".parse::<DiagnosticPolicy>(), Ok(DiagnosticPolicy::OncePerOpcode));
    assert_eq!("EVERY".parse::<DiagnosticPolicy>(), Ok(DiagnosticPolicy::EveryCall));
    assert!("never".parse::<DiagnosticPolicy>().is_err());
    assert_eq!(DiagnosticPolicy::default().to_string(), "once");
  }
}
