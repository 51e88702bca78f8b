//! # Global Descriptor Table (GDT)
//!
//! Replaces the loader's GDT with one owned by the kernel image. The layout
//! mirrors the one stivale2 loaders install, so the loader's terminal
//! callback keeps working after the switch:
//!
//! Index | Selector | Meaning
//! ------|----------|--------
//! 0     | 0x00     | Null
//! 1     | 0x08     | 16-bit code
//! 2     | 0x10     | 16-bit data
//! 3     | 0x18     | 32-bit code
//! 4     | 0x20     | 32-bit data
//! 5     | 0x28     | Kernel code (64-bit, DPL=0; [`KERNEL_CS`])
//! 6     | 0x30     | Kernel data (DPL=0; [`KERNEL_DS`])
//!
//! ## Preconditions
//! Interrupts are masked during the switch so nothing observes a
//! half-loaded segment state.

pub mod descriptors;

use crate::gdt::descriptors::SegmentDescriptor;
use kernel_boot::{BootModule, Fatal};
use log::debug;

/// Encoded kernel code selector (`index << 3 | TI=0 | RPL=0`).
pub const KERNEL_CS: u16 = selector(5);

/// Encoded kernel data selector.
pub const KERNEL_DS: u16 = selector(6);

const fn selector(index: u16) -> u16 {
    index << 3
}

const _: () = {
    assert!(KERNEL_CS == 0x28);
    assert!(KERNEL_DS == 0x30);
};

/// Pointer format required by `lgdt`.
#[repr(C, packed)]
struct DescTablePtr {
    /// Size of the table **minus one** in bytes.
    limit: u16,
    /// Linear address of the table.
    base: u64,
}

#[repr(C, align(16))]
pub struct Gdt {
    entries: [SegmentDescriptor; 7],
}

impl Gdt {
    pub const fn new() -> Self {
        Self {
            entries: [
                SegmentDescriptor::NULL,
                SegmentDescriptor::code16(),
                SegmentDescriptor::data16(),
                SegmentDescriptor::code32(),
                SegmentDescriptor::data32(),
                SegmentDescriptor::code64(0),
                SegmentDescriptor::data64(0),
            ],
        }
    }
}

/// The kernel's GDT. Read-only: every descriptor has its accessed bit preset.
static GDT: Gdt = Gdt::new();

/// Load `gdt` with `lgdt` and reload every segment register.
///
/// # Safety
/// - `gdt` stays mapped for the lifetime of the CPU.
/// - Interrupts are disabled.
#[allow(clippy::cast_possible_truncation)]
unsafe fn load(gdt: &'static Gdt) {
    let ptr = DescTablePtr {
        limit: (size_of::<Gdt>() - 1) as u16,
        base: core::ptr::from_ref(gdt) as u64,
    };

    unsafe {
        core::arch::asm!(
            "lgdt [{}]",
            in(reg) &raw const ptr,
            options(readonly, nostack, preserves_flags)
        );

        core::arch::asm!(
            "mov ds, {0:x}",
            "mov es, {0:x}",
            "mov fs, {0:x}",
            "mov gs, {0:x}",
            "mov ss, {0:x}",
            in(reg) KERNEL_DS,
            options(nostack, preserves_flags)
        );

        // Far return to reload CS.
        core::arch::asm!(
            "push {cs}",
            "lea {tmp}, [rip + 2f]",
            "push {tmp}",
            "retfq",
            "2:",
            cs = in(reg) u64::from(KERNEL_CS),
            tmp = lateout(reg) _,
        );
    }
}

/// Bring-up step installing [`GDT`].
pub struct GdtModule;

impl BootModule for GdtModule {
    fn name(&self) -> &'static str {
        "GDT"
    }

    fn init(&mut self) -> Result<(), Fatal> {
        unsafe { load(&GDT) };
        debug!(
            "GDT loaded at {:#018x}, CS={KERNEL_CS:#04x} DS={KERNEL_DS:#04x}",
            core::ptr::from_ref(&GDT) as u64
        );
        Ok(())
    }
}
