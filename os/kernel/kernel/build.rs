use kernel_info::memory;
use std::{env, path::PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let ld = manifest_dir.join("kernel.ld");

    // stivale2 loads higher-half kernels into the top 2 GiB, on a 2 MiB boundary.
    let kernel_base = memory::KERNEL_BASE;
    assert_eq!(
        kernel_base & ((1u64 << 21) - 1),
        0,
        "KERNEL_BASE must be 2 MiB aligned (got {kernel_base:#x})"
    );
    assert!(
        kernel_base >= 0xffff_ffff_8000_0000,
        "KERNEL_BASE must lie in the top 2 GiB (got {kernel_base:#x})"
    );

    println!("cargo:rerun-if-changed={}", ld.display());
    println!("cargo:rustc-link-arg-bins=-T{}", ld.display());
    println!("cargo:rustc-link-arg-bins=--defsym=KERNEL_BASE={kernel_base:#x}");
    println!("cargo:rustc-link-arg-bins=-zmax-page-size=0x1000");
}
