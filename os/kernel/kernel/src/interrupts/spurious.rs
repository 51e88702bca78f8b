//! Spurious IRQs of the 8259 pair.
//!
//! With every line masked, IRQ 7 and IRQ 15 can still fire spuriously. The
//! master's must not be acknowledged; the slave's needs an EOI at the master
//! only, since the cascade line really was raised.

use crate::gdt::KERNEL_CS;
use crate::idt::{GateType, Idt};
use crate::pic::{EOI, PIC1_CMD, PIC1_OFFSET, PIC2_OFFSET};
use core::arch::naked_asm;

pub const MASTER_SPURIOUS_VECTOR: usize = PIC1_OFFSET as usize + 7;
pub const SLAVE_SPURIOUS_VECTOR: usize = PIC2_OFFSET as usize + 7;

const _: () = assert!(MASTER_SPURIOUS_VECTOR >= 0x20 && SLAVE_SPURIOUS_VECTOR < 0x100);

pub trait SpuriousInterrupt {
    fn init_spurious_pic_gates(&mut self) -> &mut Self;
}

impl SpuriousInterrupt for Idt {
    fn init_spurious_pic_gates(&mut self) -> &mut Self {
        self[MASTER_SPURIOUS_VECTOR]
            .set_handler(master_spurious_handler)
            .selector(KERNEL_CS)
            .present(true)
            .gate_type(GateType::InterruptGate);
        self[SLAVE_SPURIOUS_VECTOR]
            .set_handler(slave_spurious_handler)
            .selector(KERNEL_CS)
            .present(true)
            .gate_type(GateType::InterruptGate);
        self
    }
}

#[unsafe(naked)]
extern "C" fn master_spurious_handler() {
    naked_asm!("iretq");
}

#[unsafe(naked)]
extern "C" fn slave_spurious_handler() {
    naked_asm!(
        "push rax",
        "mov al, {eoi}",
        "out {port}, al",
        "pop rax",
        "iretq",
        eoi = const EOI,
        port = const PIC1_CMD,
    );
}
