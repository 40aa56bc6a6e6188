// Environment variables are process wide, so this binary holds a single test.
use powermap::config::{load_config, validate_config};
use powermap::{DiagnosticPolicy, Opcode, PowerComponent};
use std::env;
use std::fs;

#[test]
fn test_environment_layer() {
  let dir = env::temp_dir().join(format!("powermap-env-{}", std::process::id()));
  fs::create_dir_all(&dir).unwrap();
  let graphics = dir.join("graphics.toml");
  let pixel = dir.join("pixel.toml");
  fs::write(&graphics, "[[entry]]\nopcode = \"IPA\"\ncategory = \"FP\"\n").unwrap();
  fs::write(&pixel, "[[entry]]\nopcode = \"PIXLD\"\ncategory = \"OTHER\"\n").unwrap();

  env::set_var(
    "POWERMAP_CLASSIFICATION__EXTENSION_FILES",
    format!("{},{}", graphics.display(), pixel.display()),
  );
  env::set_var("POWERMAP_CLASSIFICATION__STRICT_COVERAGE", "true");
  env::set_var("POWERMAP_CLASSIFICATION__DIAGNOSTICS", "every");
  env::set_var("POWERMAP_LOG__LEVEL", "debug");

  let config = load_config(None).unwrap();
  assert_eq!(config.classification.extension_files, vec![graphics.clone(), pixel.clone()]);
  assert!(config.classification.strict_coverage);
  assert_eq!(config.classification.diagnostics, DiagnosticPolicy::EveryCall);
  assert_eq!(config.log.level, "debug");
  validate_config(&config).unwrap();

  let table = config
    .classification
    .table_builder()
    .unwrap()
    .strict_coverage(false)
    .build()
    .unwrap();
  assert_eq!(table.len(), 213);
  assert_eq!(table.classify(Opcode::IPA), PowerComponent::Fp);

  // A single path needs no separator.
  env::set_var("POWERMAP_CLASSIFICATION__EXTENSION_FILES", graphics.display().to_string());
  let config = load_config(None).unwrap();
  assert_eq!(config.classification.extension_files, vec![graphics]);

  for key in [
    "POWERMAP_CLASSIFICATION__EXTENSION_FILES",
    "POWERMAP_CLASSIFICATION__STRICT_COVERAGE",
    "POWERMAP_CLASSIFICATION__DIAGNOSTICS",
    "POWERMAP_LOG__LEVEL",
  ] {
    env::remove_var(key);
  }
  fs::remove_dir_all(&dir).unwrap();
}
