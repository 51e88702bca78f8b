//! Interrupt flag control and the terminal wait loops.
//!
//! # Platform
//! `x86_64`, ring 0. `cli`, `sti` and `hlt` fault in user mode.

/// Disables maskable hardware interrupts (`cli`).
#[inline]
pub fn cli_stop_interrupts() {
    unsafe { core::arch::asm!("cli", options(nomem, nostack, preserves_flags)) }
}

/// Returns the current `RFLAGS` value (via `pushfq/pop`).
#[inline]
#[must_use]
pub fn rflags() -> u64 {
    let r: u64;
    unsafe { core::arch::asm!("pushfq; pop {}", out(reg) r, options(nostack, preserves_flags)) }
    r
}

/// Whether `RFLAGS.IF` (bit 9) is set.
#[inline]
#[must_use]
pub fn interrupts_enabled() -> bool {
    rflags() & (1 << 9) != 0
}

/// Parks the core for good: interrupts off, then `hlt` in a loop.
///
/// NMIs and SMIs can still wake the core, hence the loop.
#[inline]
pub fn halt_forever() -> ! {
    cli_stop_interrupts();
    loop {
        unsafe { core::arch::asm!("hlt", options(nomem, nostack, preserves_flags)) }
    }
}

/// The steady state after bring-up: interrupts on, sleep until the next one.
#[inline]
pub fn idle_forever() -> ! {
    loop {
        // `sti` delays interrupt delivery by one instruction, so no interrupt
        // can slip in between it and `hlt`.
        unsafe { core::arch::asm!("sti; hlt", options(nomem, nostack)) }
    }
}
