use env_logger::{Builder, Env};
use log::LevelFilter;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global switch for user-facing `log_info!` output
static ENABLE_LOG: AtomicBool = AtomicBool::new(true);

/// Enable or disable `log_info!` output.
pub fn set_log(enabled: bool) {
  ENABLE_LOG.store(enabled, Ordering::Relaxed);
}

/// Check if logging is enabled, default is true
pub fn is_log_enabled() -> bool {
  ENABLE_LOG.load(Ordering::Relaxed)
}

/// Install `env_logger` at `info`, `RUST_LOG` still wins.
pub fn init_log() {
  init_log_with_level(LevelFilter::Info);
}

/// Install `env_logger` with `level` as the default filter. Safe to call more
/// than once; later calls only update the `log_info!` switch.
pub fn init_log_with_level(level: LevelFilter) {
  set_log(level != LevelFilter::Off);
  let env = Env::default().default_filter_or(level.to_string().to_ascii_lowercase());
  let _ = Builder::from_env(env).format_timestamp(None).format_target(false).try_init();
}

/// Print a message with a blue [Log] prefix unless logging is switched off
#[macro_export]
macro_rules! log_info {
  ($($arg:tt)*) => {
    if $crate::utils::log::is_log_enabled() {
      println!("\x1b[34m[Log]\x1b[0m {}", format!($($arg)*));
    }
  };
}
