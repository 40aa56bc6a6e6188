use crate::isa::Opcode;
use crate::mapping::ClassificationTable;
use crate::utils::report::write_summary;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Result, Write};

const HELP: &str = "\
<OPCODE>...   classify one or more mnemonics, e.g. 'FFMA IMAD LDG'
:gen <OPCODE> generation whose group bound the opcode
:unmapped     opcodes of the namespace without a power component
:seen         unmapped opcodes classified during this session
:stats        table summary
help          this text
q             quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Classify(Vec<String>),
  Generation(String),
  Unmapped,
  Seen,
  Stats,
  Help,
  Quit,
  Empty,
}

/// Parse one shell line. Mnemonics are validated later, per word.
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
  let trimmed = line.trim();
  if trimmed.is_empty() {
    return Ok(Command::Empty);
  }

  let mut words = trimmed.split_whitespace();
  let head = words.next().unwrap_or_default();
  match head {
    "q" | "quit" | "exit" => Ok(Command::Quit),
    "help" | "?" => Ok(Command::Help),
    ":unmapped" => Ok(Command::Unmapped),
    ":seen" => Ok(Command::Seen),
    ":stats" => Ok(Command::Stats),
    ":gen" => match (words.next(), words.next()) {
      (Some(op), None) => Ok(Command::Generation(op.to_string())),
      _ => Err("':gen' takes exactly one opcode, e.g. ':gen UIMAD'".to_string()),
    }
    _ if head.starts_with(':') => Err(format!("Unknown command: '{}'. Type 'help' for commands", head)),
    _ => Ok(Command::Classify(trimmed.split_whitespace().map(str::to_string).collect())),
  }
}

/// Run one command against `table`. Returns `false` once the shell should exit.
pub fn execute<W: Write>(table: &ClassificationTable, command: &Command, out: &mut W) -> Result<bool> {
  match command {
    Command::Quit => return Ok(false),
    Command::Empty => {},
    Command::Help => writeln!(out, "{}", HELP)?,
    Command::Stats => write_summary(table, out)?,
    Command::Unmapped => writeln!(out, "{}", join(&table.unmapped()))?,
    Command::Seen => {
      let seen = table.unclassified_seen();
      if seen.is_empty() {
        writeln!(out, "no unmapped opcode classified yet")?;
      } else {
        writeln!(out, "{}", join(&seen))?;
      }
    }
    Command::Generation(word) => match word.parse::<Opcode>() {
      Ok(op) => match table.generation_of(op) {
        Some(generation) => writeln!(out, "{:<10} {}", op, generation)?,
        None => writeln!(out, "{:<10} unmapped", op)?,
      }
      Err(e) => writeln!(out, "Error: {}", e)?,
    }
    Command::Classify(words) => {
      for word in words {
        match word.parse::<Opcode>() {
          Ok(op) => writeln!(out, "{:<10} {}", op, table.classify(op))?,
          Err(e) => writeln!(out, "Error: {}", e)?,
        }
      }
    }
  }
  Ok(true)
}

fn join(ops: &[Opcode]) -> String {
  ops.iter().map(|op| op.mnemonic()).collect::<Vec<_>>().join(" ")
}

/// Interactive lookup loop on stdin/stdout.
pub fn run_shell(table: &ClassificationTable) -> Result<()> {
  let mut editor = DefaultEditor::new().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
  let stdout = io::stdout();
  println!("Type opcode mnemonics to classify them, 'help' for commands, 'q' to quit");

  loop {
    match editor.readline("(powermap) ") {
      Ok(line) => {
        if !line.trim().is_empty() {
          let _ = editor.add_history_entry(line.trim());
        }
        match parse_command(&line) {
          Ok(command) => {
            if !execute(table, &command, &mut stdout.lock())? {
              return Ok(());
            }
          }
          Err(message) => eprintln!("Error: {}", message),
        }
      }
      // Ctrl-C / Ctrl-D: quit
      Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
      Err(err) => return Err(io::Error::new(io::ErrorKind::Other, err)),
    }
  }
}
