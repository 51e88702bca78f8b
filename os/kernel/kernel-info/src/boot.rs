//! # Boot Protocol ABI (stivale2)
//!
//! Two tag families exist:
//!
//! * **Header tags** ([`HeaderTag`]) live in the kernel image and are read by the
//!   loader *before* the kernel runs. They form the request list rooted in
//!   [`KernelHeader::tags`].
//! * **Struct tags** ([`Tag`]) are produced by the loader and handed to the
//!   kernel through [`BootInfo::tags`]. Their payload follows the common
//!   16-byte head; the concrete layout depends on the identifier.
//!
//! Identifiers are the 64-bit constants from the stivale2 protocol; see
//! [`header_ids`] and [`struct_ids`].

use bitfield_struct::bitfield;

/// The loader's terminal write callback (`term_write`): string pointer and length.
pub type TermWriteFn = extern "C" fn(*const u8, u64);

/// Length of the NUL-padded loader identity strings in [`BootInfo`].
pub const LOADER_STRING_LEN: usize = 64;

/// Identifiers of the tags the kernel places in its request list.
pub mod header_ids {
    /// Request a linear framebuffer instead of CGA text mode.
    pub const FRAMEBUFFER: u64 = 0x3ecc_1bc4_3d0f_7971;
    /// Request the loader's runtime terminal service. Requires [`FRAMEBUFFER`].
    pub const TERMINAL: u64 = 0xa85d_499b_1823_be72;
    /// Request that application processors are parked and described.
    pub const SMP: u64 = 0x1ab0_1508_5f32_73df;
    /// Request 5-level paging when the CPU supports it.
    pub const FIVE_LEVEL_PAGING: u64 = 0x932f_4770_3200_7e8f;
}

/// Identifiers of the struct tags the kernel knows how to interpret.
pub mod struct_ids {
    pub const TERMINAL: u64 = 0xc2b3_f4c3_233b_0974;
    pub const FRAMEBUFFER: u64 = 0x5064_61d2_9504_08fa;
    pub const SMP: u64 = 0x34d1_d963_3964_7025;
    pub const KERNEL_BASE_ADDRESS: u64 = 0x060d_7887_4a2a_8af0;
    /// Present when the loader actually enabled 5-level paging.
    pub const FIVE_LEVEL_PAGING: u64 = 0x932f_4770_3200_7e8f;
}

/// Information the loader hands to the kernel entry point (`stivale2_struct`).
#[repr(C)]
pub struct BootInfo {
    /// NUL-terminated loader name, e.g. `Limine`.
    pub bootloader_brand: [u8; LOADER_STRING_LEN],

    /// NUL-terminated loader version string.
    pub bootloader_version: [u8; LOADER_STRING_LEN],

    /// Address of the first [`Tag`], or 0 if the loader provided none.
    pub tags: u64,
}

impl BootInfo {
    /// Builds a boot information block the way a loader would, truncating
    /// the identity strings to fit their NUL-terminated fields.
    #[must_use]
    pub fn new(brand: &str, version: &str, tags: u64) -> Self {
        Self {
            bootloader_brand: fixed_c_string(brand),
            bootloader_version: fixed_c_string(version),
            tags,
        }
    }

    /// The loader brand; `"?"` if the field is not valid UTF-8.
    #[must_use]
    pub fn brand(&self) -> &str {
        c_string(&self.bootloader_brand)
    }

    /// The loader version; `"?"` if the field is not valid UTF-8.
    #[must_use]
    pub fn version(&self) -> &str {
        c_string(&self.bootloader_version)
    }
}

fn c_string(bytes: &[u8]) -> &str {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    core::str::from_utf8(&bytes[..len]).unwrap_or("?")
}

fn fixed_c_string(s: &str) -> [u8; LOADER_STRING_LEN] {
    let mut out = [0u8; LOADER_STRING_LEN];
    // Keep the last byte as terminator.
    let len = s.len().min(LOADER_STRING_LEN - 1);
    out[..len].copy_from_slice(&s.as_bytes()[..len]);
    out
}

/// Common head of every loader-provided struct tag.
///
/// The payload of the concrete tag immediately follows this head in memory.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub struct Tag {
    /// One of the [`struct_ids`] (or an identifier unknown to this kernel).
    pub identifier: u64,

    /// Address of the next tag; 0 terminates the list.
    pub next: u64,
}

impl Tag {
    #[must_use]
    pub const fn new(identifier: u64, next: u64) -> Self {
        Self { identifier, next }
    }
}

/// A struct tag layout that can be looked up by identifier.
///
/// # Safety
/// Implementors must be `#[repr(C)]`, begin with a [`Tag`], and describe the
/// payload the loader publishes under [`StructTag::IDENTIFIER`] (or a prefix of it).
#[allow(unsafe_code)]
pub unsafe trait StructTag {
    const IDENTIFIER: u64;
}

macro_rules! struct_tag {
    ($ty:ty, $id:expr) => {
        #[allow(unsafe_code)]
        // SAFETY: `#[repr(C)]` with a leading `Tag`, layout per the stivale2 protocol.
        unsafe impl StructTag for $ty {
            const IDENTIFIER: u64 = $id;
        }
    };
}

/// Terminal flag bits reported in [`TerminalTag::flags`].
#[bitfield(u32)]
pub struct TerminalFlags {
    /// `cols` and `rows` carry the terminal dimensions.
    pub dimensions_valid: bool,
    /// `max_length` carries the longest string `term_write` accepts at once.
    pub max_length_valid: bool,
    #[bits(30)]
    __reserved: u32,
}

/// The loader's runtime terminal.
#[repr(C)]
#[derive(Debug)]
pub struct TerminalTag {
    pub tag: Tag,
    pub flags: u32,
    pub cols: u16,
    pub rows: u16,
    /// Address of a [`TermWriteFn`]; 0 if the loader did not provide one.
    pub term_write: u64,
    pub max_length: u64,
}

impl TerminalTag {
    #[must_use]
    pub const fn flags(&self) -> TerminalFlags {
        TerminalFlags::from_bits(self.flags)
    }
}

struct_tag!(TerminalTag, struct_ids::TERMINAL);

/// The linear framebuffer the loader set up.
#[repr(C)]
#[derive(Debug)]
pub struct FramebufferTag {
    pub tag: Tag,
    pub framebuffer_addr: u64,
    /// Visible width in **pixels**.
    pub framebuffer_width: u16,
    /// Visible height in **pixels**.
    pub framebuffer_height: u16,
    /// Bytes per scanline.
    pub framebuffer_pitch: u16,
    pub framebuffer_bpp: u16,
    /// 1 = RGB; everything else is undefined by the protocol.
    pub memory_model: u8,
    pub red_mask_size: u8,
    pub red_mask_shift: u8,
    pub green_mask_size: u8,
    pub green_mask_shift: u8,
    pub blue_mask_size: u8,
    pub blue_mask_shift: u8,
    pub unused: u8,
}

struct_tag!(FramebufferTag, struct_ids::FRAMEBUFFER);

/// Symmetric multiprocessing information; `cpu_count` [`SmpInfo`] records follow.
#[repr(C)]
#[derive(Debug)]
pub struct SmpTag {
    pub tag: Tag,
    /// Bit 0: x2APIC was enabled.
    pub flags: u64,
    pub bsp_lapic_id: u32,
    pub unused: u32,
    pub cpu_count: u64,
}

impl SmpTag {
    /// The per-CPU records trailing this tag.
    ///
    /// # Safety
    /// `self` must be the loader's tag in place (not a copy), followed in memory
    /// by `cpu_count` initialized [`SmpInfo`] records.
    #[allow(unsafe_code)]
    #[must_use]
    pub unsafe fn cpus(&self) -> &[SmpInfo] {
        let first = core::ptr::from_ref(self).wrapping_add(1).cast::<SmpInfo>();
        let len = usize::try_from(self.cpu_count).unwrap_or_default();
        unsafe { core::slice::from_raw_parts(first, len) }
    }
}

struct_tag!(SmpTag, struct_ids::SMP);

/// One processor as described by the loader.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SmpInfo {
    pub processor_id: u32,
    pub lapic_id: u32,
    pub target_stack: u64,
    pub goto_address: u64,
    pub extra_argument: u64,
}

/// Where the kernel image was loaded.
#[repr(C)]
#[derive(Debug)]
pub struct KernelBaseAddressTag {
    pub tag: Tag,
    pub physical_base_address: u64,
    pub virtual_base_address: u64,
}

struct_tag!(KernelBaseAddressTag, struct_ids::KERNEL_BASE_ADDRESS);

/// Presence alone signals that 5-level paging is active.
#[repr(C)]
#[derive(Debug)]
pub struct FiveLevelPagingTag {
    pub tag: Tag,
}

struct_tag!(FiveLevelPagingTag, struct_ids::FIVE_LEVEL_PAGING);

/// Common head of every kernel-provided header tag.
///
/// `next` is a `'static` reference: a request can only link to a request that
/// already exists, so the list is terminated by construction.
#[repr(C)]
#[derive(Debug)]
pub struct HeaderTag {
    pub identifier: u64,
    pub next: Option<&'static HeaderTag>,
}

impl HeaderTag {
    #[must_use]
    pub const fn new(identifier: u64, next: Option<&'static HeaderTag>) -> Self {
        Self { identifier, next }
    }
}

/// Framebuffer request. Zero width/height/bpp let the loader pick the best mode.
#[repr(C)]
#[derive(Debug)]
pub struct FramebufferHeaderTag {
    pub tag: HeaderTag,
    pub framebuffer_width: u16,
    pub framebuffer_height: u16,
    pub framebuffer_bpp: u16,
    pub unused: u16,
}

impl FramebufferHeaderTag {
    #[must_use]
    pub const fn best_mode(next: Option<&'static HeaderTag>) -> Self {
        Self {
            tag: HeaderTag::new(header_ids::FRAMEBUFFER, next),
            framebuffer_width: 0,
            framebuffer_height: 0,
            framebuffer_bpp: 0,
            unused: 0,
        }
    }
}

/// Terminal request. `flags` is unused by the protocol and must be zero.
#[repr(C)]
#[derive(Debug)]
pub struct TerminalHeaderTag {
    pub tag: HeaderTag,
    pub flags: u64,
}

impl TerminalHeaderTag {
    #[must_use]
    pub const fn new(next: Option<&'static HeaderTag>) -> Self {
        Self {
            tag: HeaderTag::new(header_ids::TERMINAL, next),
            flags: 0,
        }
    }
}

/// SMP request. Bit 0 of `flags` asks for x2APIC.
#[repr(C)]
#[derive(Debug)]
pub struct SmpHeaderTag {
    pub tag: HeaderTag,
    pub flags: u64,
}

impl SmpHeaderTag {
    #[must_use]
    pub const fn new(next: Option<&'static HeaderTag>) -> Self {
        Self {
            tag: HeaderTag::new(header_ids::SMP, next),
            flags: 0,
        }
    }
}

/// 5-level paging request; carries no payload.
#[repr(C)]
#[derive(Debug)]
pub struct FiveLevelPagingHeaderTag {
    pub tag: HeaderTag,
}

impl FiveLevelPagingHeaderTag {
    #[must_use]
    pub const fn new(next: Option<&'static HeaderTag>) -> Self {
        Self {
            tag: HeaderTag::new(header_ids::FIVE_LEVEL_PAGING, next),
        }
    }
}

/// Behaviour bits requested in [`KernelHeader::flags`].
#[bitfield(u64)]
pub struct HeaderFlags {
    __reserved0: bool,
    /// Bit 1: return pointers into the higher half.
    pub higher_half_pointers: bool,
    /// Bit 2: map the kernel's ELF segments with their declared permissions.
    pub protected_memory_ranges: bool,
    #[bits(61)]
    __reserved: u64,
}

/// The header the loader discovers in the `.stivale2hdr` ELF section.
#[repr(C)]
#[derive(Debug)]
pub struct KernelHeader {
    /// Alternative entry point; 0 uses the ELF entry.
    pub entry_point: u64,

    /// Initial stack pointer. The stack grows down, so this is the **top**.
    pub stack: *const u8,

    /// Encoded [`HeaderFlags`].
    pub flags: u64,

    /// Root of the request list.
    pub tags: Option<&'static HeaderTag>,
}

// SAFETY: The header is immutable; the stack pointer is only ever read by
// the loader and never dereferenced by kernel code.
#[allow(unsafe_code)]
unsafe impl Sync for KernelHeader {}

impl KernelHeader {
    #[must_use]
    pub const fn new(stack: *const u8, flags: HeaderFlags, tags: &'static HeaderTag) -> Self {
        Self {
            entry_point: 0,
            stack,
            flags: flags.into_bits(),
            tags: Some(tags),
        }
    }

    #[must_use]
    pub const fn flags(&self) -> HeaderFlags {
        HeaderFlags::from_bits(self.flags)
    }

    /// Walks the request list from its root.
    #[must_use]
    pub const fn requests(&self) -> Requests {
        Requests {
            next: self.tags,
            remaining: crate::tags::MAX_TAGS,
        }
    }

    /// Whether the request list contains `identifier`.
    #[must_use]
    pub fn requests_tag(&self, identifier: u64) -> bool {
        self.requests().any(|tag| tag.identifier == identifier)
    }
}

/// Iterator over the request list of a [`KernelHeader`].
pub struct Requests {
    next: Option<&'static HeaderTag>,
    remaining: usize,
}

impl Iterator for Requests {
    type Item = &'static HeaderTag;

    fn next(&mut self) -> Option<Self::Item> {
        // Statics can reference each other in a ring, so stay bounded.
        self.remaining = self.remaining.checked_sub(1)?;
        let current = self.next?;
        self.next = current.next;
        Some(current)
    }
}

const _: () = {
    assert!(size_of::<Tag>() == 16);
    assert!(size_of::<HeaderTag>() == 16);
    assert!(size_of::<TerminalTag>() == 40);
    assert!(size_of::<FramebufferTag>() == 40);
    assert!(size_of::<SmpTag>() == 40);
    assert!(size_of::<SmpInfo>() == 32);
    assert!(size_of::<KernelBaseAddressTag>() == 32);
    assert!(size_of::<BootInfo>() == 2 * LOADER_STRING_LEN + 8);
    assert!(size_of::<KernelHeader>() == 32);
};
