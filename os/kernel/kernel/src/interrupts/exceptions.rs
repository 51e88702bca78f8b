//! Fatal CPU exceptions.
//!
//! Each vector gets a tiny stub that normalizes the stack to
//! `[vector, error code, RIP, ...]` (pushing a zero error code where the CPU
//! does not) and jumps to one common path, which reports through the panic
//! handler and never returns.

use crate::gdt::KERNEL_CS;
use crate::idt::{GateType, HandlerFn, Idt};
use core::arch::naked_asm;

macro_rules! fault_stub {
    ($name:ident, $vector:literal) => {
        #[unsafe(naked)]
        extern "C" fn $name() {
            naked_asm!(
                "push 0",
                "push {vector}",
                "jmp {common}",
                vector = const $vector,
                common = sym fault_common,
            );
        }
    };
    ($name:ident, $vector:literal, error_code) => {
        #[unsafe(naked)]
        extern "C" fn $name() {
            naked_asm!(
                "push {vector}",
                "jmp {common}",
                vector = const $vector,
                common = sym fault_common,
            );
        }
    };
}

fault_stub!(divide_error, 0);
fault_stub!(debug, 1);
fault_stub!(nmi, 2);
fault_stub!(overflow, 4);
fault_stub!(bound_range, 5);
fault_stub!(invalid_opcode, 6);
fault_stub!(device_not_available, 7);
fault_stub!(double_fault, 8, error_code);
fault_stub!(invalid_tss, 10, error_code);
fault_stub!(segment_not_present, 11, error_code);
fault_stub!(stack_segment, 12, error_code);
fault_stub!(general_protection, 13, error_code);
fault_stub!(page_fault, 14, error_code);
fault_stub!(x87_floating_point, 16);
fault_stub!(alignment_check, 17, error_code);
fault_stub!(machine_check, 18);
fault_stub!(simd_floating_point, 19);
fault_stub!(virtualization, 20);
fault_stub!(control_protection, 21, error_code);

const GATES: [(usize, HandlerFn); 19] = [
    (0, divide_error),
    (1, debug),
    (2, nmi),
    (4, overflow),
    (5, bound_range),
    (6, invalid_opcode),
    (7, device_not_available),
    (8, double_fault),
    (10, invalid_tss),
    (11, segment_not_present),
    (12, stack_segment),
    (13, general_protection),
    (14, page_fault),
    (16, x87_floating_point),
    (17, alignment_check),
    (18, machine_check),
    (19, simd_floating_point),
    (20, virtualization),
    (21, control_protection),
];

pub trait ExceptionGates {
    fn init_exception_gates(&mut self) -> &mut Self;
}

impl ExceptionGates for Idt {
    fn init_exception_gates(&mut self) -> &mut Self {
        for (vector, handler) in GATES {
            self[vector]
                .set_handler(handler)
                .selector(KERNEL_CS)
                .present(true)
                .gate_type(GateType::InterruptGate);
        }
        self
    }
}

#[unsafe(naked)]
extern "C" fn fault_common() {
    naked_asm!(
        "mov rdi, [rsp]",
        "mov rsi, [rsp + 8]",
        "mov rdx, [rsp + 16]",
        "and rsp, -16",
        "cld",
        "call {rust}",
        "2:",
        "cli",
        "hlt",
        "jmp 2b",
        rust = sym fault_rust
    );
}

const fn mnemonic(vector: u64) -> &'static str {
    match vector {
        0 => "#DE divide error",
        1 => "#DB debug",
        2 => "NMI",
        4 => "#OF overflow",
        5 => "#BR bound range exceeded",
        6 => "#UD invalid opcode",
        7 => "#NM device not available",
        8 => "#DF double fault",
        10 => "#TS invalid TSS",
        11 => "#NP segment not present",
        12 => "#SS stack-segment fault",
        13 => "#GP general protection",
        14 => "#PF page fault",
        16 => "#MF x87 floating-point",
        17 => "#AC alignment check",
        18 => "#MC machine check",
        19 => "#XM SIMD floating-point",
        20 => "#VE virtualization",
        21 => "#CP control protection",
        _ => "unknown exception",
    }
}

extern "C" fn fault_rust(vector: u64, error_code: u64, rip: u64) {
    if vector == 14 {
        let cr2: u64;
        unsafe { core::arch::asm!("mov {}, cr2", out(reg) cr2, options(nomem, nostack, preserves_flags)) };
        panic!(
            "{} at {rip:#018x}, address {cr2:#018x}, error {error_code:#x}",
            mnemonic(vector)
        );
    }
    panic!("{} at {rip:#018x}, error {error_code:#x}", mnemonic(vector));
}
