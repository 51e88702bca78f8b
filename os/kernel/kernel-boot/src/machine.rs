//! # Boot State Machine
//!
//! Drives the boot from the raw loader pointer to either the idle state or a
//! halt. Fatal conditions are returned as [`BootOutcome::Halted`] so that the
//! caller decides how to stop the CPU.

#![allow(unsafe_code)]

use crate::banner::{self, BUILD, BuildInfo};
use crate::handoff::BootHandoff;
use crate::{
    BootContext, BootModule, Console, ConsoleBinding, Fatal, FramebufferRenderer, ModuleSequencer,
};
use kernel_info::boot::BootInfo;
use log::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    AwaitingHandoff,
    TagsResolved,
    ConsoleBound,
    ModulesRunning,
    /// Bring-up finished; wait for interrupts forever.
    Idle,
    /// A fatal condition occurred; stop forever.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// All modules came up.
    Idle { modules: usize },
    Halted(Fatal),
}

pub struct BootMachine<'r> {
    state: BootState,
    build: BuildInfo,
    renderer: Option<&'r mut dyn FramebufferRenderer>,
}

impl Default for BootMachine<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> BootMachine<'r> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: BootState::AwaitingHandoff,
            build: BUILD,
            renderer: None,
        }
    }

    /// Renderer used if the loader only provides a framebuffer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: &'r mut dyn FramebufferRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Overrides the build identity printed in the banner.
    #[must_use]
    pub const fn with_build(mut self, build: BuildInfo) -> Self {
        self.build = build;
        self
    }

    #[must_use]
    pub const fn state(&self) -> BootState {
        self.state
    }

    /// Boots from the loader's `info` pointer, running `modules` in order.
    ///
    /// `on_bound` sees the console binding as soon as it is resolved, before
    /// anything is printed on it.
    ///
    /// # Safety
    /// Same contract as [`BootHandoff::from_raw`].
    pub unsafe fn run(
        &mut self,
        info: *const BootInfo,
        modules: &mut [&mut dyn BootModule],
        on_bound: impl FnOnce(&ConsoleBinding),
    ) -> BootOutcome {
        match unsafe { self.drive(info, modules, on_bound) } {
            Ok(modules) => {
                self.enter(BootState::Idle);
                BootOutcome::Idle { modules }
            }
            Err(fatal) => {
                error!("Boot halted in {:?}: {fatal}", self.state);
                self.enter(BootState::Halted);
                BootOutcome::Halted(fatal)
            }
        }
    }

    unsafe fn drive(
        &mut self,
        info: *const BootInfo,
        modules: &mut [&mut dyn BootModule],
        on_bound: impl FnOnce(&ConsoleBinding),
    ) -> Result<usize, Fatal> {
        let handoff = unsafe { BootHandoff::from_raw(info) }?;
        let tag_count = handoff.tags().validate()?;
        info!(
            "Booted by {} {} with {tag_count} tag(s)",
            handoff.bootloader_brand(),
            handoff.bootloader_version()
        );
        self.enter(BootState::TagsResolved);

        let binding = ConsoleBinding::resolve(&handoff.tags())?;
        on_bound(&binding);
        let mut context = BootContext::new(handoff, Console::new(binding, self.renderer.take()));
        self.enter(BootState::ConsoleBound);

        banner::print_banner(
            context.console(),
            &self.build,
            handoff.bootloader_brand(),
            handoff.bootloader_version(),
        );
        context.platform().log();

        self.enter(BootState::ModulesRunning);
        let count = ModuleSequencer::run(context.console(), modules)?;
        banner::print_welcome(context.console());
        Ok(count)
    }

    fn enter(&mut self, next: BootState) {
        debug!("Boot state {:?} -> {next:?}", self.state);
        self.state = next;
    }
}
