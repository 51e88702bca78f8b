//! # 8259 PIC pair
//!
//! At reset the master PIC delivers IRQ 0-7 on vectors 0x08-0x0F, right on
//! top of the CPU exceptions. Bring-up moves both controllers above the
//! exception range and masks every line; drivers unmask what they own.
//!
//! ```text
//!  master (0x20/0x21)  IRQ 0-7   -> vectors 0x20-0x27
//!  slave  (0xA0/0xA1)  IRQ 8-15  -> vectors 0x28-0x2F   (cascaded on IRQ 2)
//! ```

use crate::ports::{inb, io_wait, outb};
use kernel_boot::{BootModule, Fatal};
use kernel_sync::irq;
use log::debug;

pub const PIC1_CMD: u16 = 0x20;
pub const PIC1_DATA: u16 = 0x21;
pub const PIC2_CMD: u16 = 0xA0;
pub const PIC2_DATA: u16 = 0xA1;

pub const PIC1_OFFSET: u8 = 0x20;
pub const PIC2_OFFSET: u8 = 0x28;

/// Non-specific end of interrupt (OCW2).
pub const EOI: u8 = 0x20;

/// ICW1: initialize, ICW4 follows.
const ICW1_INIT: u8 = 0x10;
const ICW1_ICW4: u8 = 0x01;
/// ICW3 (master): slave attached to IRQ 2.
const ICW3_MASTER_SLAVE_ON_IRQ2: u8 = 1 << 2;
/// ICW3 (slave): cascade identity 2.
const ICW3_SLAVE_IDENTITY: u8 = 2;
/// ICW4: 8086/88 mode.
const ICW4_8086: u8 = 0x01;

const MASK_ALL: u8 = 0xFF;

const _: () = {
    assert!(PIC1_OFFSET >= 0x20, "vectors 0x00-0x1F belong to the CPU");
    assert!(PIC1_OFFSET.is_multiple_of(8) && PIC2_OFFSET.is_multiple_of(8));
    assert!(PIC2_OFFSET == PIC1_OFFSET + 8);
};

/// Sends the ICW1-ICW4 sequence to both controllers and masks every line.
///
/// # Safety
/// Interrupts must be disabled.
unsafe fn remap_and_mask() {
    unsafe {
        outb(PIC1_CMD, ICW1_INIT | ICW1_ICW4);
        io_wait();
        outb(PIC2_CMD, ICW1_INIT | ICW1_ICW4);
        io_wait();

        outb(PIC1_DATA, PIC1_OFFSET);
        io_wait();
        outb(PIC2_DATA, PIC2_OFFSET);
        io_wait();

        outb(PIC1_DATA, ICW3_MASTER_SLAVE_ON_IRQ2);
        io_wait();
        outb(PIC2_DATA, ICW3_SLAVE_IDENTITY);
        io_wait();

        outb(PIC1_DATA, ICW4_8086);
        io_wait();
        outb(PIC2_DATA, ICW4_8086);
        io_wait();

        outb(PIC1_DATA, MASK_ALL);
        outb(PIC2_DATA, MASK_ALL);
    }
}

/// Bring-up step remapping the PIC pair.
pub struct PicModule;

impl BootModule for PicModule {
    fn name(&self) -> &'static str {
        "PIC"
    }

    fn init(&mut self) -> Result<(), Fatal> {
        if irq::interrupts_enabled() {
            return Err(Fatal::ModuleInit {
                module: "PIC",
                reason: "interrupts must be disabled while remapping",
            });
        }

        unsafe { remap_and_mask() };

        let masks = unsafe { (inb(PIC1_DATA), inb(PIC2_DATA)) };
        if masks != (MASK_ALL, MASK_ALL) {
            return Err(Fatal::ModuleInit {
                module: "PIC",
                reason: "interrupt mask did not stick",
            });
        }

        debug!("PIC remapped to {PIC1_OFFSET:#04x}/{PIC2_OFFSET:#04x}, all lines masked");
        Ok(())
    }
}
