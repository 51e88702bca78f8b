use crate::gdt::KERNEL_CS;
use crate::idt::{GateType, Idt};
use core::arch::naked_asm;
use log::info;

pub const BP_VECTOR: usize = 0x03;

pub trait BreakpointInterrupt {
    fn init_breakpoint_gate(&mut self) -> &mut Self;
}

impl BreakpointInterrupt for Idt {
    fn init_breakpoint_gate(&mut self) -> &mut Self {
        self[BP_VECTOR]
            .set_handler(bp_handler)
            .selector(KERNEL_CS)
            .present(true)
            .gate_type(GateType::TrapGate);
        self
    }
}

/// Saves the caller-saved registers around the Rust handler and resumes.
#[unsafe(naked)]
extern "C" fn bp_handler() {
    naked_asm!(
        "push rax",
        "push rcx",
        "push rdx",
        "push rsi",
        "push rdi",
        "push r8",
        "push r9",
        "push r10",
        "push r11",
        // RIP of the interrupt frame, right behind the nine saved registers.
        // 5 frame words + 9 pushes keep RSP 16-byte aligned for the call.
        "mov rdi, [rsp + 72]",
        "cld",
        "call {rust}",
        "pop r11",
        "pop r10",
        "pop r9",
        "pop r8",
        "pop rdi",
        "pop rsi",
        "pop rdx",
        "pop rcx",
        "pop rax",
        "iretq",
        rust = sym bp_rust
    );
}

extern "C" fn bp_rust(rip: u64) {
    info!("#BP breakpoint, resuming at {rip:#018x}");
}
