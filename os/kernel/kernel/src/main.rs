//! # FaruOS kernel
//!
//! A stivale2 kernel image. The loader reads the header in
//! `.stivale2hdr` ([`entry`]), then calls `_start`, which hands control to the
//! boot state machine of `kernel-boot` with this crate's bring-up steps:
//!
//! 1. [`gdt`]: the kernel's own descriptor table,
//! 2. [`interrupts`]: exception and spurious-IRQ gates in the IDT,
//! 3. [`pic`]: the 8259 pair remapped above the exception vectors and masked.

#![no_std]
#![no_main]
#![allow(unsafe_code)]

mod console;
mod entry;
mod gdt;
mod idt;
mod interrupts;
mod panic;
mod pic;
mod ports;
