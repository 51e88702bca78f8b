//! # Kernel Boot Interface
//!
//! This crate defines the data structures and constants that make up the
//! contract between the boot loader and the kernel. The kernel is loaded by a
//! [stivale2](https://github.com/stivale/stivale/blob/master/STIVALE2.md)
//! compliant loader (e.g. Limine 2.x), which negotiates everything through two
//! linked lists of **tags**:
//!
//! ```text
//!  Kernel image (.stivale2hdr)              Boot loader memory
//! ┌───────────────────────────┐            ┌─────────────────────────────┐
//! │ KernelHeader              │            │ BootInfo                    │
//! │  entry_point / stack      │            │  bootloader_brand[64]       │
//! │  flags                    │            │  bootloader_version[64]     │
//! │  tags ──► framebuffer req │  handoff   │  tags ──► terminal tag      │
//! │           └► smp req      │ ─────────► │           └► framebuffer tag│
//! │              └► 5lvl req  │  (RDI)     │              └► smp tag     │
//! │                 └► term.  │            │                 └► ...  ► 0 │
//! └───────────────────────────┘            └─────────────────────────────┘
//! ```
//!
//! * The **header** ([`boot::KernelHeader`]) is link-time constant. The loader
//!   reads it before control is transferred: stack top, feature flags and the
//!   root of the *request list* ([`boot::HeaderTag`]).
//! * The **boot information** ([`boot::BootInfo`]) is built by the loader and
//!   passed to the entry point. Its tags ([`boot::Tag`]) are opaque to the
//!   kernel except for the identifier and the `next` link; the [`tags`] module
//!   walks them.
//!
//! ## Modules
//! * [`boot`]: `#[repr(C)]` ABI types for both lists and their identifiers.
//! * [`tags`]: the bounded, read-only tag locator.
//! * [`memory`]: link-time layout constants consumed by the kernel's `build.rs`.
//! * [`config`]: compile-time kernel configuration.
//!
//! ## ABI Compatibility
//! All structures crossing the loader boundary are `#[repr(C)]` and use
//! fixed-size integers. Pointer-typed fields only appear on the kernel-owned
//! header side, where the kernel itself produces the values.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod boot;
pub mod config;
pub mod memory;
pub mod tags;
