//! # QEMU Debug Console
//!
//! Host-visible output for the kernel while it runs under QEMU. Everything
//! goes to the `debugcon` device at I/O port `0x402`:
//!
//! ```bash
//! qemu-system-x86_64 -cdrom faru.iso -debugcon stdio
//! ```
//!
//! Two entry points exist:
//!
//! * [`QemuLogger`], the `log` backend installed once at kernel entry via [`init`].
//! * [`qemu_trace!`], raw `format!`-style output that bypasses the logger.
//!   It works before [`init`] and from panic context.
//!
//! With the `enabled` feature (default) switched off, both compile to no-ops
//! and no port I/O is emitted. On hardware without the device the writes
//! are silently dropped.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;

pub use logger::{LoggerInitError, QemuLogger, init};

#[cfg(feature = "enabled")]
#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt::{self, Write};

    /// I/O port of QEMU's `debugcon` device.
    pub const QEMU_DEBUG_PORT: u16 = 0x402;

    #[allow(clippy::inline_always)]
    #[inline(always)]
    pub fn dbg_putc(c: u8) {
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") QEMU_DEBUG_PORT,
                in("al") c,
                options(nomem, nostack, preserves_flags)
            );
        }
    }

    /// Writes raw bytes to the debug port, unmodified.
    pub fn dbg_write(bytes: &[u8]) {
        bytes.iter().copied().for_each(dbg_putc);
    }

    pub struct QemuSink;

    impl Write for QemuSink {
        #[inline]
        fn write_str(&mut self, s: &str) -> fmt::Result {
            dbg_write(s.as_bytes());
            Ok(())
        }
    }

    #[doc(hidden)]
    #[inline]
    pub fn qemu_write(args: fmt::Arguments) {
        // Best effort; there is nowhere to report a failure to.
        let _ = fmt::write(&mut QemuSink, args);
    }
}

#[cfg(not(feature = "enabled"))]
#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt;

    pub fn dbg_write(_: &[u8]) {}

    #[doc(hidden)]
    #[inline]
    pub fn qemu_write(_: fmt::Arguments) {}
}

pub use qemu_fmt::dbg_write;

/// `format!`-style output straight to the debug console.
#[macro_export]
macro_rules! qemu_trace {
    ($($arg:tt)*) => {{
        $crate::qemu_fmt::qemu_write(core::format_args!($($arg)*));
    }};
}
