use crate::Console;
use crate::handoff::BootHandoff;
use crate::platform::PlatformSummary;
use kernel_info::tags::TagList;

/// State that lives from console binding until the kernel goes idle.
///
/// Created once per boot and handed down by reference instead of being kept
/// in globals.
pub struct BootContext<'a, 'r> {
    handoff: BootHandoff<'a>,
    console: Console<'r>,
    platform: PlatformSummary,
}

impl<'a, 'r> BootContext<'a, 'r> {
    #[must_use]
    pub fn new(handoff: BootHandoff<'a>, console: Console<'r>) -> Self {
        let platform = PlatformSummary::collect(&handoff.tags());
        Self {
            handoff,
            console,
            platform,
        }
    }

    #[must_use]
    pub const fn handoff(&self) -> &BootHandoff<'a> {
        &self.handoff
    }

    #[must_use]
    pub const fn tags(&self) -> TagList<'a> {
        self.handoff.tags()
    }

    #[must_use]
    pub const fn platform(&self) -> &PlatformSummary {
        &self.platform
    }

    pub const fn console(&mut self) -> &mut Console<'r> {
        &mut self.console
    }
}
