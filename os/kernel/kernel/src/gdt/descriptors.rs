//! # GDT code/data descriptor encodings
//!
//! In long mode, base and limit of code/data descriptors are ignored; what
//! matters is the type, `S`, `DPL`, `P` and, for code, `L`/`DB`. The legacy
//! 16- and 32-bit descriptors are flat segments with real limits.
//!
//! All types are built with the **accessed** bit already set, so loading a
//! selector never makes the CPU write back into a read-only table.

use bitfield_struct::bitfield;

/// Execute/read, accessed.
const TYPE_CODE: u8 = 0b1011;
/// Read/write, accessed.
const TYPE_DATA: u8 = 0b0011;

/// Bit layout of an 8-byte code or data segment descriptor.
#[bitfield(u64)]
pub struct SegmentDescriptor {
    pub limit_lo: u16, // [15:0]
    pub base_lo: u16,  // [31:16]
    pub base_mid: u8,  // [39:32]
    #[bits(4)]
    pub typ: u8, // [43:40]
    pub s: bool,       // [44]     = 1 (code/data)
    #[bits(2)]
    pub dpl: u8, // [46:45]
    pub p: bool,       // [47]
    #[bits(4)]
    pub limit_hi: u8, // [51:48]
    pub avl: bool,     // [52]
    pub l: bool,       // [53]     64-bit code
    pub db: bool,      // [54]     32-bit default operand size
    pub g: bool,       // [55]     4 KiB limit granularity
    pub base_hi: u8,   // [63:56]
}

impl SegmentDescriptor {
    /// The mandatory entry at index 0.
    pub const NULL: Self = Self::new();

    const fn present(typ: u8, dpl: u8) -> Self {
        Self::new()
            .with_typ(typ)
            .with_s(true)
            .with_dpl(dpl & 0b11)
            .with_p(true)
    }

    /// 64-bit code (`L=1`, `DB=0`).
    pub const fn code64(dpl: u8) -> Self {
        Self::present(TYPE_CODE, dpl).with_l(true)
    }

    /// Data/stack segment for long mode; base and limit are ignored.
    pub const fn data64(dpl: u8) -> Self {
        Self::present(TYPE_DATA, dpl)
    }

    /// Flat 4 GiB 32-bit segment (`G=1`, `DB=1`).
    const fn flat32(typ: u8) -> Self {
        Self::present(typ, 0)
            .with_limit_lo(0xFFFF)
            .with_limit_hi(0xF)
            .with_db(true)
            .with_g(true)
    }

    pub const fn code32() -> Self {
        Self::flat32(TYPE_CODE)
    }

    pub const fn data32() -> Self {
        Self::flat32(TYPE_DATA)
    }

    /// 64 KiB 16-bit segment.
    pub const fn code16() -> Self {
        Self::present(TYPE_CODE, 0).with_limit_lo(0xFFFF)
    }

    pub const fn data16() -> Self {
        Self::present(TYPE_DATA, 0).with_limit_lo(0xFFFF)
    }
}

// Encodings as documented in the Intel SDM / used by stivale2 loaders.
const _: () = {
    assert!(size_of::<SegmentDescriptor>() == 8);
    assert!(SegmentDescriptor::NULL.into_bits() == 0);
    assert!(SegmentDescriptor::code16().into_bits() == 0x0000_9B00_0000_FFFF);
    assert!(SegmentDescriptor::data16().into_bits() == 0x0000_9300_0000_FFFF);
    assert!(SegmentDescriptor::code32().into_bits() == 0x00CF_9B00_0000_FFFF);
    assert!(SegmentDescriptor::data32().into_bits() == 0x00CF_9300_0000_FFFF);
    assert!(SegmentDescriptor::code64(0).into_bits() == 0x0020_9B00_0000_0000);
    assert!(SegmentDescriptor::data64(0).into_bits() == 0x0000_9300_0000_0000);
};
