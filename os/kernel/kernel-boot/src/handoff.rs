//! Inbound half of the entry contract.

#![allow(unsafe_code)]

use crate::Fatal;
use kernel_info::boot::BootInfo;
use kernel_info::tags::TagList;

/// The loader's boot information, borrowed for the duration of boot.
#[derive(Clone, Copy)]
pub struct BootHandoff<'a> {
    info: &'a BootInfo,
    tags: TagList<'a>,
}

impl<'a> BootHandoff<'a> {
    /// Accepts the pointer the loader passed to the entry point.
    ///
    /// # Errors
    /// [`Fatal::MissingHandoff`] if `info` is null.
    ///
    /// # Safety
    /// A non-null `info` must point to a valid [`BootInfo`] whose tag list
    /// satisfies [`TagList::from_raw`], all of it valid and unmodified for `'a`.
    pub unsafe fn from_raw(info: *const BootInfo) -> Result<Self, Fatal> {
        let info = unsafe { info.as_ref() }.ok_or(Fatal::MissingHandoff)?;
        Ok(Self {
            info,
            tags: unsafe { TagList::from_raw(info.tags) },
        })
    }

    #[must_use]
    pub const fn info(&self) -> &'a BootInfo {
        self.info
    }

    #[must_use]
    pub const fn tags(&self) -> TagList<'a> {
        self.tags
    }

    #[must_use]
    pub fn bootloader_brand(&self) -> &'a str {
        self.info.brand()
    }

    #[must_use]
    pub fn bootloader_version(&self) -> &'a str {
        self.info.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_pointer_is_a_missing_handoff() {
        let result = unsafe { BootHandoff::from_raw(core::ptr::null()) };
        assert!(matches!(result, Err(Fatal::MissingHandoff)));
    }

    #[test]
    fn empty_tag_list_is_accepted() {
        let info = BootInfo::new("Limine", "2.0", 0);
        let handoff = unsafe { BootHandoff::from_raw(&raw const info) }.unwrap();
        assert!(handoff.tags().is_empty());
        assert_eq!(handoff.bootloader_brand(), "Limine");
        assert_eq!(handoff.bootloader_version(), "2.0");
    }
}
