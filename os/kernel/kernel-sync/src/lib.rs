//! # Kernel synchronization primitives
//!
//! Boot runs on a single core with interrupts masked, so the only shared
//! state is published once and read afterwards. [`SyncOnceCell`] covers that;
//! [`irq`] holds the interrupt-flag and halt primitives.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod irq;
mod sync_once_cell;

pub use sync_once_cell::SyncOnceCell;
