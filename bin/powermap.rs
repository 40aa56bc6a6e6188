use clap::{Parser, Subcommand};
use powermap::config::{apply_cli_overrides, load_config, validate_config, CliOverrides};
use powermap::log::init_log_with_level;
use powermap::log_info;
use powermap::shell::run_shell;
use powermap::utils::report::{print_table_summary, write_json};
use powermap::{DiagnosticPolicy, Opcode, PowerClassifier};
use std::io::{Error, ErrorKind, Result};
use std::path::PathBuf;

/// Powermap - SASS opcode to power component classification
#[derive(Parser, Debug)]
#[command(name = "powermap")]
#[command(version = "0.1.0")]
#[command(about = "Classify GPU instructions into AccelWattch power components", long_about = None)]
struct Args {
  /// Configuration file (TOML)
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Extra entry groups merged after the canonical mapping (repeatable)
  #[arg(short = 'x', long = "extension", value_name = "FILE")]
  extensions: Vec<PathBuf>,

  /// Fail when any opcode of the namespace has no power component
  #[arg(long)]
  strict: bool,

  /// Unmapped opcode warnings: once per opcode or on every lookup
  #[arg(long, value_name = "once|every")]
  diagnostics: Option<DiagnosticPolicy>,

  /// Log level: error, warn, info, debug or trace
  #[arg(long, value_name = "LEVEL")]
  log_level: Option<String>,

  /// Quiet mode (suppress log messages)
  #[arg(short, long)]
  quiet: bool,

  #[command(subcommand)]
  command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
  /// Print the power component of each opcode
  Classify {
    #[arg(required = true, value_name = "OPCODE")]
    opcodes: Vec<String>,
  },
  /// Print the whole table
  Dump {
    /// Emit JSON instead of the text summary
    #[arg(long)]
    json: bool,
  },
  /// Build the table and report coverage
  Check,
  /// Interactive lookup shell
  Shell,
}

fn invalid(e: impl std::fmt::Display) -> Error {
  Error::new(ErrorKind::InvalidData, e.to_string())
}

fn main() -> Result<()> {
  let args = Args::parse();

  let mut config = load_config(args.config.as_deref()).map_err(invalid)?;
  apply_cli_overrides(
    &mut config,
    &CliOverrides {
      quiet: args.quiet,
      strict: args.strict,
      diagnostics: args.diagnostics,
      extensions: args.extensions.clone(),
      log_level: args.log_level.clone(),
    },
  );
  validate_config(&config).map_err(invalid)?;
  init_log_with_level(config.log.level_filter().map_err(invalid)?);

  let classifier = PowerClassifier::new();
  let builder = config.classification.table_builder().map_err(invalid)?;
  let table = match classifier.build_with(builder) {
    Ok(table) => table,
    Err(e) => {
      log::error!("cannot build classification table: {}", e);
      return Err(invalid(e));
    }
  };

  match args.command {
    Cmd::Classify { opcodes } => {
      for word in &opcodes {
        let op: Opcode = word.parse().map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
        println!("{}\t{}", op, table.classify(op));
      }
    }
    Cmd::Dump { json } => {
      if json {
        write_json(table, &mut std::io::stdout().lock())?;
      } else {
        for entry in table.entries() {
          println!("{:<12}{:<10}{}", entry.opcode, entry.category, entry.generation);
        }
      }
    }
    Cmd::Check => {
      print_table_summary(table)?;
      let unmapped = table.unmapped();
      if unmapped.is_empty() {
        log_info!("every opcode has a power component");
      } else {
        log_info!("{} opcode(s) fall back to OTHER", unmapped.len());
      }
    }
    Cmd::Shell => run_shell(table)?,
  }

  Ok(())
}
