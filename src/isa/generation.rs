use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown hardware generation '{0}'")]
pub struct UnknownGeneration(pub String);

/// GPU architecture generation, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Generation {
  Kepler,
  Pascal,
  Volta,
  Turing,
  Ampere,
}

impl Generation {
  pub const ALL: [Generation; 5] = [
    Generation::Kepler,
    Generation::Pascal,
    Generation::Volta,
    Generation::Turing,
    Generation::Ampere,
  ];

  pub const LATEST: Generation = Generation::Ampere;

  /// Lowercase name used in configuration files and reports.
  pub fn name(self) -> &'static str {
    match self {
      Generation::Kepler => "kepler",
      Generation::Pascal => "pascal",
      Generation::Volta => "volta",
      Generation::Turing => "turing",
      Generation::Ampere => "ampere",
    }
  }

  /// Generation of an SM version written as `major * 10 + minor`, e.g. 75.
  /// Versions 7.0 to 7.4 are Volta, 7.5 and up are Turing.
  pub fn from_sm(version: u32) -> Option<Generation> {
    match (version / 10, version % 10) {
      (3, _) => Some(Generation::Kepler),
      (6, _) => Some(Generation::Pascal),
      (7, minor) if minor < 5 => Some(Generation::Volta),
      (7, _) => Some(Generation::Turing),
      (8, _) => Some(Generation::Ampere),
      _ => None,
    }
  }
}

impl fmt::Display for Generation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.name())
  }
}

impl FromStr for Generation {
  type Err = UnknownGeneration;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lower = s.trim().to_ascii_lowercase();
    match lower.as_str() {
      "kepler" => Ok(Generation::Kepler),
      "pascal" => Ok(Generation::Pascal),
      "volta" => Ok(Generation::Volta),
      "turing" => Ok(Generation::Turing),
      "ampere" => Ok(Generation::Ampere),
      _ => lower
        .strip_prefix("sm_")
        .filter(|digits| digits.len() == 2)
        .and_then(|digits| digits.parse::<u32>().ok())
        .and_then(Generation::from_sm)
        .ok_or_else(|| UnknownGeneration(s.to_string())),
    }
  }
}

impl From<Generation> for &'static str {
  fn from(generation: Generation) -> Self {
    generation.name()
  }
}

impl TryFrom<String> for Generation {
  type Error = UnknownGeneration;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_chronological_order() {
    let mut sorted = Generation::ALL;
    sorted.sort();
    assert_eq!(sorted, Generation::ALL);
    assert!(Generation::Kepler < Generation::Volta);
    assert_eq!(Generation::ALL.iter().max(), Some(&Generation::LATEST));
  }

  #[test]
  fn test_parse() {
    assert_eq!("Volta".parse::<Generation>(), Ok(Generation::Volta));
    assert_eq!("sm_86".parse::<Generation>(), Ok(Generation::Ampere));
    assert!("hopper".parse::<Generation>().is_err());
    for generation in Generation::ALL {
      assert_eq!(generation.name().parse::<Generation>(), Ok(generation));
    }
  }

  #[test]
  fn test_parse_sm_versions() {
    assert_eq!("sm_30".parse::<Generation>(), Ok(Generation::Kepler));
    assert_eq!("sm_37".parse::<Generation>(), Ok(Generation::Kepler));
    assert_eq!("sm_62".parse::<Generation>(), Ok(Generation::Pascal));
    assert_eq!("sm_72".parse::<Generation>(), Ok(Generation::Volta));
    assert_eq!("SM_75".parse::<Generation>(), Ok(Generation::Turing));
    assert_eq!("sm_87".parse::<Generation>(), Ok(Generation::Ampere));
    assert!("sm_52".parse::<Generation>().is_err());
    assert!("sm_90".parse::<Generation>().is_err());
    assert!("sm_7".parse::<Generation>().is_err());
    assert!("sm_".parse::<Generation>().is_err());
  }

  #[test]
  fn test_from_sm() {
    assert_eq!(Generation::from_sm(35), Some(Generation::Kepler));
    assert_eq!(Generation::from_sm(70), Some(Generation::Volta));
    assert_eq!(Generation::from_sm(75), Some(Generation::Turing));
    assert_eq!(Generation::from_sm(50), None);
  }
}
