//! # Kernel Entry Point
//!
//! The outbound half of the boot contract lives here as link-time data: the
//! `.stivale2hdr` header, the request list it roots and the boot stack it
//! names. The loader switches to that stack and calls [`_start`].

use crate::console::{self, DebugconMirror};
use crate::gdt::GdtModule;
use crate::interrupts::IdtModule;
use crate::pic::PicModule;
use core::cell::UnsafeCell;
use kernel_boot::{BootMachine, BootOutcome};
use kernel_info::boot::{
    BootInfo, FiveLevelPagingHeaderTag, FramebufferHeaderTag, HeaderFlags, KernelHeader,
    SmpHeaderTag, TerminalHeaderTag,
};
use kernel_info::config;
use kernel_info::memory::{BOOT_STACK_ALIGN, BOOT_STACK_SIZE};
use kernel_qemu::qemu_trace;
use kernel_sync::irq;
use log::info;

/// The stack the loader switches to before calling [`_start`].
#[repr(C, align(16))]
struct BootStack(UnsafeCell<[u8; BOOT_STACK_SIZE]>);

// SAFETY: Only the CPU touches the stack, through RSP.
unsafe impl Sync for BootStack {}

impl BootStack {
    /// One past the highest byte; the stack grows down from here.
    const fn top(&'static self) -> *const u8 {
        self.0.get().cast::<u8>().cast_const().wrapping_add(BOOT_STACK_SIZE)
    }
}

const _: () = assert!(align_of::<BootStack>() == BOOT_STACK_ALIGN);

static BOOT_STACK: BootStack = BootStack(UnsafeCell::new([0; BOOT_STACK_SIZE]));

// Request list: framebuffer -> SMP -> 5-level paging -> terminal.
static TERMINAL_REQUEST: TerminalHeaderTag = TerminalHeaderTag::new(None);
static FIVE_LEVEL_PAGING_REQUEST: FiveLevelPagingHeaderTag =
    FiveLevelPagingHeaderTag::new(Some(&TERMINAL_REQUEST.tag));
static SMP_REQUEST: SmpHeaderTag = SmpHeaderTag::new(Some(&FIVE_LEVEL_PAGING_REQUEST.tag));
static FRAMEBUFFER_REQUEST: FramebufferHeaderTag =
    FramebufferHeaderTag::best_mode(Some(&SMP_REQUEST.tag));

#[used]
#[unsafe(link_section = ".stivale2hdr")]
static STIVALE2_HEADER: KernelHeader = KernelHeader::new(
    BOOT_STACK.top(),
    HeaderFlags::new()
        .with_higher_half_pointers(true)
        .with_protected_memory_ranges(true),
    &FRAMEBUFFER_REQUEST.tag,
);

/// Kernel entry, called by the loader on [`BOOT_STACK`] with interrupts off.
///
/// # ABI
/// System V: the [`BootInfo`] pointer arrives in `RDI`.
#[unsafe(no_mangle)]
extern "C" fn _start(boot_info: *const BootInfo) -> ! {
    irq::cli_stop_interrupts();

    if let Err(e) = kernel_qemu::init(config::LOG_LEVEL) {
        qemu_trace!("Logger unavailable: {e}\n");
    }
    info!("Kernel {} entered, boot info at {boot_info:p}", config::KERNEL_VERSION);

    let mut mirror = DebugconMirror;
    let mut machine = BootMachine::new().with_renderer(&mut mirror);
    let (mut gdt, mut idt, mut pic) = (GdtModule, IdtModule, PicModule);

    // SAFETY: stivale2 hands over a valid boot information structure (or null)
    // that stays mapped in loader-reclaimable memory, which we never reclaim.
    let outcome = unsafe {
        machine.run(
            boot_info,
            &mut [&mut gdt, &mut idt, &mut pic],
            console::publish,
        )
    };

    match outcome {
        BootOutcome::Idle { modules } => {
            info!("{modules} boot modules up; idling");
            irq::idle_forever()
        }
        BootOutcome::Halted(fatal) => panic!("{fatal}"),
    }
}
