use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown power component '{0}'")]
pub struct UnknownComponent(pub String);

/// Power-accounting category of an instruction.
///
/// Each category is backed by its own energy model downstream, so the set is
/// closed: adding a variant means adding a datapath to the power model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum PowerComponent {
  /// Single and half precision float ALU, float conversions.
  Fp,
  /// Single and half precision multiply and fused multiply-add.
  FpMul,
  /// Special function unit (MUFU transcendentals).
  FpSin,
  /// Double precision ALU.
  Dp,
  /// Double precision multiply and fused multiply-add.
  DpMul,
  /// Integer ALU, logic, moves, predicates and the uniform datapath.
  Int,
  /// Integer multiply, multiply-add, scaled add and dot product.
  IntMul,
  /// Matrix multiply-accumulate units.
  Tensor,
  /// Texture unit.
  Tex,
  /// Control flow, memory, synchronization and everything without a compute datapath.
  Other,
}

impl PowerComponent {
  pub const ALL: [PowerComponent; 10] = [
    PowerComponent::Fp,
    PowerComponent::FpMul,
    PowerComponent::FpSin,
    PowerComponent::Dp,
    PowerComponent::DpMul,
    PowerComponent::Int,
    PowerComponent::IntMul,
    PowerComponent::Tensor,
    PowerComponent::Tex,
    PowerComponent::Other,
  ];

  /// Upper-case name as written in mapping files, e.g. `"FP_MUL"`.
  pub fn name(self) -> &'static str {
    match self {
      PowerComponent::Fp => "FP",
      PowerComponent::FpMul => "FP_MUL",
      PowerComponent::FpSin => "FP_SIN",
      PowerComponent::Dp => "DP",
      PowerComponent::DpMul => "DP_MUL",
      PowerComponent::Int => "INT",
      PowerComponent::IntMul => "INT_MUL",
      PowerComponent::Tensor => "TENSOR",
      PowerComponent::Tex => "TEX",
      PowerComponent::Other => "OTHER",
    }
  }

  /// Whether the category is a datapath rather than the `OTHER` bucket.
  pub fn is_compute(self) -> bool {
    self != PowerComponent::Other
  }
}

impl fmt::Display for PowerComponent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.name())
  }
}

impl FromStr for PowerComponent {
  type Err = UnknownComponent;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let upper = s.trim().to_ascii_uppercase();
    let name = upper.strip_suffix("_OP").unwrap_or(&upper).trim_end_matches('_');
    PowerComponent::ALL
      .into_iter()
      .find(|c| c.name() == name)
      .ok_or_else(|| UnknownComponent(s.to_string()))
  }
}

impl From<PowerComponent> for &'static str {
  fn from(component: PowerComponent) -> Self {
    component.name()
  }
}

impl TryFrom<String> for PowerComponent {
  type Error = UnknownComponent;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}
