//! Facts about the machine the loader described, collected for the boot log.

#![allow(unsafe_code)]

use crate::console::FramebufferBinding;
use kernel_info::boot::{FiveLevelPagingTag, FramebufferTag, KernelBaseAddressTag, SmpTag};
use kernel_info::tags::TagList;
use log::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformSummary {
    pub cpu_count: Option<u64>,
    pub bsp_lapic_id: Option<u32>,
    pub kernel_physical_base: Option<u64>,
    pub kernel_virtual_base: Option<u64>,
    pub five_level_paging: bool,
    pub framebuffer: Option<FramebufferBinding>,
}

impl PlatformSummary {
    #[must_use]
    pub fn collect(tags: &TagList<'_>) -> Self {
        let smp = tags.get::<SmpTag>();
        let base = tags.get::<KernelBaseAddressTag>();

        if let Some(smp) = smp {
            // SAFETY: the tag is the loader's own, in place in the tag list.
            for cpu in unsafe { smp.cpus() } {
                debug!(
                    "CPU {}: LAPIC ID {}{}",
                    cpu.processor_id,
                    cpu.lapic_id,
                    if cpu.lapic_id == smp.bsp_lapic_id { " (BSP)" } else { "" }
                );
            }
        }

        Self {
            cpu_count: smp.map(|s| s.cpu_count),
            bsp_lapic_id: smp.map(|s| s.bsp_lapic_id),
            kernel_physical_base: base.map(|b| b.physical_base_address),
            kernel_virtual_base: base.map(|b| b.virtual_base_address),
            five_level_paging: tags.get::<FiveLevelPagingTag>().is_some(),
            framebuffer: tags.get::<FramebufferTag>().and_then(FramebufferBinding::from_tag),
        }
    }

    pub fn log(&self) {
        match (self.cpu_count, self.bsp_lapic_id) {
            (Some(count), Some(bsp)) => info!("SMP: {count} CPU(s), BSP LAPIC ID {bsp}"),
            _ => info!("SMP: no information from the loader"),
        }
        if let (Some(phys), Some(virt)) = (self.kernel_physical_base, self.kernel_virtual_base) {
            info!("Kernel base: phys={phys:#018x} virt={virt:#018x}");
        }
        info!(
            "Paging: {}-level",
            if self.five_level_paging { 5 } else { 4 }
        );
        if let Some(fb) = self.framebuffer {
            info!(
                "Framebuffer: {}x{} {}bpp pitch={} at {:#018x}",
                fb.width, fb.height, fb.bpp, fb.pitch, fb.address
            );
        }
    }
}
