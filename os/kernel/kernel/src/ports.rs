//! # x86 I/O Port Access
//!
//! Thin wrappers around `in`/`out` for the legacy devices touched during
//! bring-up:
//!
//! ```text
//! 0x0020-0x0021   PIC #1 (master)
//! 0x0080          POST diagnostics (used as an I/O delay)
//! 0x00A0-0x00A1   PIC #2 (slave)
//! 0x0402          QEMU debugcon (see `kernel-qemu`)
//! ```
//!
//! # Safety
//! All functions require CPL0 (or a matching I/O permission bitmap) and must
//! target a register of the intended device in a state that accepts the access.

/// Port written to by [`io_wait`]; unused after POST.
const POST_DIAGNOSTICS_PORT: u16 = 0x80;

/// Write one byte to an I/O port (`out dx, al`).
///
/// # Safety
/// See the module documentation. `out` is not a memory fence.
#[inline]
pub unsafe fn outb(port: u16, val: u8) {
    unsafe {
        core::arch::asm!("out dx, al", in("dx") port, in("al") val, options(nomem, nostack, preserves_flags));
    }
}

/// Read one byte from an I/O port (`in al, dx`).
///
/// # Safety
/// See the module documentation.
#[inline]
pub unsafe fn inb(port: u16) -> u8 {
    let mut v: u8;
    unsafe {
        core::arch::asm!("in al, dx", in("dx") port, out("al") v, options(nomem, nostack, preserves_flags));
    }
    v
}

/// Gives slow legacy devices roughly a microsecond between accesses.
#[inline]
pub fn io_wait() {
    unsafe { outb(POST_DIAGNOSTICS_PORT, 0) }
}
