//! # Module Sequencer
//!
//! Runs bring-up steps strictly in the order given and reports each on the
//! console as one status line:
//!
//! ```text
//! [kernel] Initializing GDT...                                              [ OK ]
//! ```
//!
//! `OK` is printed in green and aligned to the console's right edge.

use crate::{Console, Fatal};
use log::{debug, error, info};

/// One step of kernel bring-up.
pub trait BootModule {
    /// Short ASCII name shown in the status line.
    fn name(&self) -> &'static str;

    /// Brings the subsystem up.
    ///
    /// # Errors
    /// A [`Fatal`] (usually [`Fatal::ModuleInit`]) ends the boot.
    fn init(&mut self) -> Result<(), Fatal>;
}

pub const PREFIX: &str = "[kernel] Initializing ";
pub const ELLIPSIS: &str = "...";
pub const STATUS_OPEN: &str = "[ ";
pub const STATUS_CLOSE: &str = "]";
pub const OK: &str = "OK ";
pub const GREEN: &str = "\x1b[32m";
pub const RESET: &str = "\x1b[0m";

/// Visible width of a status line without its padding and module name.
pub const FIXED_WIDTH: usize =
    PREFIX.len() + ELLIPSIS.len() + STATUS_OPEN.len() + STATUS_CLOSE.len() + OK.len();

/// Spaces between `"<name>..."` and the status marker, clamped at zero.
#[must_use]
pub fn status_padding(columns: u16, name_len: usize) -> usize {
    usize::from(columns).saturating_sub(FIXED_WIDTH + name_len)
}

pub struct ModuleSequencer;

impl ModuleSequencer {
    /// Initializes `modules` in order and returns how many came up.
    ///
    /// # Errors
    /// The first module error, unchanged. The pending status line is closed
    /// with a newline and no later module runs.
    pub fn run(console: &mut Console<'_>, modules: &mut [&mut dyn BootModule]) -> Result<usize, Fatal> {
        let columns = console.columns();
        let total = modules.len();

        for (index, module) in modules.iter_mut().enumerate() {
            let name = module.name();
            info!("Initializing {name} ({}/{total})", index + 1);

            console.print(PREFIX);
            console.print(name);
            console.print(ELLIPSIS);
            console.pad(status_padding(columns, name.len()));

            if let Err(fatal) = module.init() {
                console.print("\n");
                error!("{name} failed: {fatal}");
                return Err(fatal);
            }

            console.print(STATUS_OPEN);
            console.print(GREEN);
            console.print(OK);
            console.print(RESET);
            console.print(STATUS_CLOSE);
            console.print("\n");
            debug!("{name} is up");
        }

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_counts_visible_characters() {
        assert_eq!(PREFIX.len(), 22);
        assert_eq!(FIXED_WIDTH, 22 + 3 + 2 + 1 + 3);
    }

    #[test]
    fn padding_aligns_to_eighty_columns() {
        assert_eq!(status_padding(80, 3), 46);
        for len in 0..=46 {
            assert_eq!(status_padding(80, len), 80 - (FIXED_WIDTH + len));
        }
    }

    #[test]
    fn padding_saturates_at_zero() {
        assert_eq!(status_padding(80, 48), 1);
        assert_eq!(status_padding(80, 49), 0);
        assert_eq!(status_padding(80, 50), 0);
        assert_eq!(status_padding(20, 3), 0);
        assert_eq!(status_padding(0, 0), 0);
    }
}
