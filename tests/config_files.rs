use powermap::config::{load_config, load_entry_groups, validate_config, ConfigError};
use powermap::{BuildError, DiagnosticPolicy, Generation, Opcode, PowerComponent};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("powermap-{}-{}", name, std::process::id()));
  fs::create_dir_all(&dir).unwrap();
  dir
}

#[test]
fn test_config_file_with_extension() {
  let dir = scratch_dir("ext");
  fs::write(
    dir.join("graphics.toml"),
    r#"
[[group]]
generation = "volta"
label = "graphics"
entries = [
  { opcode = "IPA", category = "FP" },
  { opcode = "ALD", category = "OTHER" },
]
reclassify = [{ opcode = "FRND", category = "FP", reason = "rounding runs on the float pipe" }]

[[entry]]
opcode = "PIXLD"
category = "OTHER"
"#,
  )
  .unwrap();
  fs::write(
    dir.join("powermap.toml"),
    r#"
[classification]
diagnostics = "every"
extension_files = ["graphics.toml"]
"#,
  )
  .unwrap();

  let config = load_config(Some(dir.join("powermap.toml").as_path())).unwrap();
  assert_eq!(config.classification.diagnostics, DiagnosticPolicy::EveryCall);
  assert_eq!(config.classification.extension_files, vec![dir.join("graphics.toml")]);
  validate_config(&config).unwrap();

  let table = config.classification.table_builder().unwrap().build().unwrap();
  assert_eq!(table.len(), 214);
  assert_eq!(table.classify(Opcode::IPA), PowerComponent::Fp);
  assert_eq!(table.classify(Opcode::FRND), PowerComponent::Fp);
  assert_eq!(table.generation_of(Opcode::PIXLD), Some(Generation::LATEST));
  assert_eq!(table.reclassifications().len(), 1);
  assert_eq!(table.reclassifications()[0].from, PowerComponent::Int);
  assert_eq!(table.diagnostic_policy(), DiagnosticPolicy::EveryCall);

  fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_conflicting_extension_blocks_build() {
  let dir = scratch_dir("conflict");
  let path = dir.join("bad.toml");
  fs::write(&path, "[[entry]]\nopcode = \"HMMA\"\ncategory = \"FP_MUL\"\n").unwrap();

  let mut spec = powermap::canonical_spec();
  spec.extend(load_entry_groups(&path).unwrap());
  let err = powermap::ClassificationTable::build(spec).unwrap_err();
  assert!(matches!(
    err,
    BuildError::MalformedMapping {
      opcode: Opcode::HMMA,
      existing: PowerComponent::Tensor,
      conflicting: PowerComponent::FpMul,
      ..
    }
  ));

  fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_malformed_extension_file() {
  let dir = scratch_dir("malformed");
  let path = dir.join("broken.toml");
  fs::write(&path, "[[entry]]\nopcode = \"HMMA\"\n").unwrap();

  match load_entry_groups(&path) {
    Err(ConfigError::Toml { path: reported, .. }) => assert_eq!(reported, path),
    other => panic!("expected a TOML error, got {:?}", other),
  }

  fs::remove_dir_all(&dir).unwrap();
}
