//! # x86-64 Interrupt Descriptor Table (IDT)
//!
//! A 256-entry table of 16-byte gate descriptors with a fluent builder:
//!
//! ```ignore
//! idt[BP_VECTOR]
//!     .set_handler(breakpoint_handler)
//!     .selector(KERNEL_CS)
//!     .present(true)
//!     .gate_type(GateType::TrapGate);
//! ```
//!
//! The installed table lives in a write-once cell; once `lidt` points at it,
//! it is never moved or modified.

use bitfield_struct::bitfield;
use core::arch::asm;
use core::ops::{Index, IndexMut};
use kernel_sync::SyncOnceCell;

const _: () = assert!(size_of::<IdtEntry>() == 16);
const _: () = assert!(align_of::<Idt>() == 16);

/// Handler entry point. The stubs are naked functions; the signature only
/// fixes the address type.
pub type HandlerFn = extern "C" fn();

/// The middle two bytes of a gate: IST index and type/attributes.
#[bitfield(u16)]
pub struct IdtGateAttr {
    /// Interrupt Stack Table index (0 = no stack switch).
    #[bits(3)]
    pub ist: u8,

    #[bits(5)]
    __zero0: u8,

    /// 0xE = interrupt gate, 0xF = trap gate.
    #[bits(4)]
    pub typ: u8,

    /// Must be 0 for interrupt/trap gates.
    #[bits(1)]
    pub s: bool,

    #[bits(2)]
    pub dpl: u8,

    #[bits(1)]
    pub present: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GateType {
    /// Clears `IF` on entry.
    InterruptGate,
    /// Leaves `IF` unchanged.
    TrapGate,
}

impl GateType {
    const fn bits(self) -> u8 {
        match self {
            Self::InterruptGate => 0xE,
            Self::TrapGate => 0xF,
        }
    }
}

#[repr(C, align(16))]
pub struct Idt {
    entries: [IdtEntry; 256],
}

impl Default for Idt {
    fn default() -> Self {
        Self::new()
    }
}

impl Idt {
    /// A table with every gate not present.
    pub const fn new() -> Self {
        Self {
            entries: [IdtEntry::MISSING; 256],
        }
    }

    /// Number of present gates.
    pub fn present_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| IdtGateAttr::from_bits(e.ist_type).present())
            .count()
    }

    /// Load this table into IDTR.
    ///
    /// # Safety
    /// Every present gate must point at a valid handler in [`crate::gdt::KERNEL_CS`].
    #[allow(clippy::cast_possible_truncation)]
    unsafe fn load(&'static self) {
        let idtr = Idtr {
            limit: (size_of::<Self>() - 1) as u16,
            base: core::ptr::from_ref(self) as u64,
        };
        unsafe {
            asm!("lidt [{}]", in(reg) &raw const idtr, options(nostack, preserves_flags, readonly));
        }
    }
}

impl Index<usize> for Idt {
    type Output = IdtEntry;
    fn index(&self, i: usize) -> &Self::Output {
        &self.entries[i]
    }
}

impl IndexMut<usize> for Idt {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.entries[i]
    }
}

/// Operand of `lidt`.
#[repr(C, packed)]
struct Idtr {
    limit: u16,
    base: u64,
}

/// One 16-byte gate descriptor (Intel SDM Vol. 3A, 6.14.1).
#[repr(C)]
#[derive(Copy, Clone)]
pub struct IdtEntry {
    offset_lo: u16,
    selector: u16,
    ist_type: u16,
    offset_mid: u16,
    offset_hi: u32,
    zero: u32,
}

impl IdtEntry {
    pub const MISSING: Self = Self {
        offset_lo: 0,
        selector: 0,
        ist_type: IdtGateAttr::new().into_bits(),
        offset_mid: 0,
        offset_hi: 0,
        zero: 0,
    };

    /// Points the gate at `handler` and returns a builder for the rest.
    ///
    /// Defaults: not present, DPL 0, interrupt gate, no stack switch, selector 0.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_handler(&mut self, handler: HandlerFn) -> IdtEntryBuilder<'_> {
        let addr = handler as usize as u64;
        self.offset_lo = addr as u16;
        self.offset_mid = (addr >> 16) as u16;
        self.offset_hi = (addr >> 32) as u32;
        self.ist_type = IdtGateAttr::new()
            .with_typ(GateType::InterruptGate.bits())
            .into_bits();
        IdtEntryBuilder { entry: self }
    }
}

pub struct IdtEntryBuilder<'a> {
    entry: &'a mut IdtEntry,
}

impl IdtEntryBuilder<'_> {
    const fn attr(&self) -> IdtGateAttr {
        IdtGateAttr::from_bits(self.entry.ist_type)
    }

    #[inline]
    pub const fn present(self, p: bool) -> Self {
        self.entry.ist_type = self.attr().with_present(p).into_bits();
        self
    }

    #[inline]
    pub const fn gate_type(self, gate_type: GateType) -> Self {
        self.entry.ist_type = self.attr().with_typ(gate_type.bits()).with_s(false).into_bits();
        self
    }

    #[inline]
    pub const fn selector(self, sel: u16) -> Self {
        self.entry.selector = sel;
        self
    }
}

static IDT: SyncOnceCell<Idt> = SyncOnceCell::new();

/// Builds the table in its permanent storage and loads it.
///
/// Returns `None` without touching IDTR if a table was installed before.
///
/// # Safety
/// See [`Idt::load`]; interrupts must be disabled.
pub unsafe fn install(build: impl FnOnce() -> Idt) -> Option<&'static Idt> {
    if IDT.is_initialized() {
        return None;
    }
    let idt = IDT.get_or_init(build);
    unsafe { idt.load() };
    Some(idt)
}
