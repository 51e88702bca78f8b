//! # Memory Layout

/// Where the kernel executes (VMA), matches the linker script.
///
/// stivale2 loaders map higher-half kernels at the top 2 GiB of the
/// address space, so the image is linked with `-mcmodel=kernel` here.
///
/// # Kernel Build
/// This information is sourced in the kernel's `build.rs` to configure
/// the linker.
pub const KERNEL_BASE: u64 = 0xffff_ffff_8000_0000;

/// The size of the stack the loader switches to before calling the entry point.
pub const BOOT_STACK_SIZE: usize = 16 * 1024;

/// Alignment of the boot stack top required by the System V ABI.
pub const BOOT_STACK_ALIGN: usize = 16;

const _: () = {
    assert!(BOOT_STACK_SIZE.is_multiple_of(BOOT_STACK_ALIGN));
    assert!(KERNEL_BASE.is_multiple_of(0x20_0000));
};
