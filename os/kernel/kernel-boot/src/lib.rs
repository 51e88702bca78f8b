//! # Boot Bring-Up
//!
//! Everything between the loader's jump into the kernel and the idle loop,
//! written against the [`kernel_info`] ABI types so that it runs unchanged
//! in host tests:
//!
//! ```text
//! AwaitingHandoff ─► TagsResolved ─► ConsoleBound ─► ModulesRunning ─► Idle
//!        │                │                │                 │
//!        └────────────────┴────────────────┴─────────────────┴──► Halted
//! ```
//!
//! * [`handoff`] turns the raw `BootInfo` pointer into a borrowed view.
//! * [`console`] binds the early output surface from the tag list.
//! * [`banner`] and [`platform`] report what was booted.
//! * [`sequencer`] drives [`BootModule`](sequencer::BootModule)s in order and prints their status.
//! * [`machine`] ties the steps together and reports the outcome as a value;
//!   halting the CPU is left to the caller.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod banner;
pub mod console;
pub mod context;
mod error;
pub mod handoff;
pub mod machine;
pub mod platform;
pub mod sequencer;

pub use console::{Console, ConsoleBinding, FramebufferRenderer};
pub use context::BootContext;
pub use error::Fatal;
pub use machine::{BootMachine, BootOutcome, BootState};
pub use sequencer::{BootModule, ModuleSequencer};
