//! # Kernel Configuration
//!
//! Compile-time knobs. Changing any of these requires a rebuild.

use log::LevelFilter;

/// Kernel version as printed by the boot banner.
pub const KERNEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Terminal width assumed when the loader does not report one.
pub const FALLBACK_COLUMNS: u16 = 80;

/// Most verbose level forwarded to the debug console.
#[cfg(debug_assertions)]
pub const LOG_LEVEL: LevelFilter = LevelFilter::Trace;

/// Most verbose level forwarded to the debug console.
#[cfg(not(debug_assertions))]
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

const _: () = assert!(FALLBACK_COLUMNS > 0);
