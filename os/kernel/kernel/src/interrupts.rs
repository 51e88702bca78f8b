//! # Interrupt vectoring
//!
//! Builds the kernel's IDT:
//!
//! * CPU exceptions report and halt ([`exceptions`]), except `#BP`, which
//!   logs and resumes ([`bp`]).
//! * The two spurious vectors of the remapped 8259 pair are acknowledged
//!   correctly ([`spurious`]). All other IRQ lines stay masked.
//!
//! Every gate runs in [`KERNEL_CS`](crate::gdt::KERNEL_CS), so the GDT must be
//! loaded first.

mod bp;
mod exceptions;
mod spurious;

use crate::idt::{self, Idt};
use bp::BreakpointInterrupt;
use exceptions::ExceptionGates;
use kernel_boot::{BootModule, Fatal};
use log::debug;
use spurious::SpuriousInterrupt;

pub struct IdtModule;

impl BootModule for IdtModule {
    fn name(&self) -> &'static str {
        "IDT"
    }

    fn init(&mut self) -> Result<(), Fatal> {
        let idt = unsafe {
            idt::install(|| {
                let mut idt = Idt::new();
                idt.init_exception_gates()
                    .init_breakpoint_gate()
                    .init_spurious_pic_gates();
                idt
            })
        }
        .ok_or(Fatal::ModuleInit {
            module: "IDT",
            reason: "an interrupt table is already installed",
        })?;

        debug!("IDT loaded with {} present gates", idt.present_count());
        Ok(())
    }
}
