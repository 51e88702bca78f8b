//! # Tag Locator
//!
//! Read-only traversal of the loader's struct tag list. The list lives in
//! loader memory and is only borrowed; nothing here writes to it.
//!
//! Every walk is capped at [`MAX_TAGS`] hops, so a list whose `next` links
//! never reach 0 still terminates. [`TagList::validate`] tells such a list
//! apart from a well-formed one.

#![allow(unsafe_code)]

use crate::boot::{StructTag, Tag};

/// Upper bound on the number of tags visited by any traversal.
pub const MAX_TAGS: usize = 256;

/// Reasons a tag list is rejected by [`TagList::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TagListError {
    #[error("tag list loops back onto the tag at {address:#018x}")]
    Cycle { address: u64 },
    #[error("tag list is longer than {limit} tags")]
    TooLong { limit: usize },
}

/// A borrowed view of the loader's tag list.
#[derive(Debug, Clone, Copy)]
pub struct TagList<'a> {
    head: Option<&'a Tag>,
}

impl<'a> TagList<'a> {
    /// A list without any tags.
    #[must_use]
    pub const fn empty() -> Self {
        Self { head: None }
    }

    /// Wraps the list starting at address `head`; 0 is the empty list.
    ///
    /// # Safety
    /// `head` and every `next` link reachable from it must be 0 or the address
    /// of a readable, aligned [`Tag`] followed by the payload its identifier
    /// implies. The memory must stay valid and unmodified for `'a`.
    #[must_use]
    pub unsafe fn from_raw(head: u64) -> Self {
        Self {
            head: unsafe { tag_at(head) },
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterates the tags in list order, stopping after [`MAX_TAGS`].
    #[must_use]
    pub const fn iter(&self) -> Tags<'a> {
        Tags {
            next: self.head,
            remaining: MAX_TAGS,
        }
    }

    /// Returns the first tag carrying `identifier`.
    ///
    /// Absence is not an error; callers decide whether a missing tag is fatal.
    #[must_use]
    pub fn find(&self, identifier: u64) -> Option<&'a Tag> {
        self.iter().find(|tag| tag.identifier == identifier)
    }

    /// Returns the first tag of type `T`.
    #[must_use]
    pub fn get<T: StructTag>(&self) -> Option<&'a T> {
        self.find(T::IDENTIFIER).map(|tag| {
            // SAFETY: `from_raw` guarantees the payload matching the identifier,
            // and `StructTag` guarantees `T` describes that payload.
            unsafe { &*core::ptr::from_ref(tag).cast::<T>() }
        })
    }

    /// Walks the whole list and returns the number of tags.
    ///
    /// # Errors
    /// * [`TagListError::Cycle`] if a `next` link leads back into the list.
    /// * [`TagListError::TooLong`] if the list has more than [`MAX_TAGS`] tags.
    pub fn validate(&self) -> Result<usize, TagListError> {
        let mut count = 0;
        let mut slow = self.head;
        let mut fast = self.head;

        // The fast cursor visits every tag; the slow one follows at half speed.
        while let Some(tag) = fast {
            count += 1;
            if count > MAX_TAGS {
                return Err(TagListError::TooLong { limit: MAX_TAGS });
            }

            fast = unsafe { tag_at(tag.next) };
            if count % 2 == 0 {
                slow = slow.and_then(|s| unsafe { tag_at(s.next) });
                if let (Some(s), Some(f)) = (slow, fast)
                    && core::ptr::eq(s, f)
                {
                    return Err(TagListError::Cycle {
                        address: address_of(f),
                    });
                }
            }
        }

        Ok(count)
    }
}

impl<'a> IntoIterator for &TagList<'a> {
    type Item = &'a Tag;
    type IntoIter = Tags<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`TagList::iter`].
pub struct Tags<'a> {
    next: Option<&'a Tag>,
    remaining: usize,
}

impl<'a> Iterator for Tags<'a> {
    type Item = &'a Tag;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining = self.remaining.checked_sub(1)?;
        let current = self.next?;
        // SAFETY: covered by the contract of `TagList::from_raw`.
        self.next = unsafe { tag_at(current.next) };
        Some(current)
    }
}

/// # Safety
/// `address` must be 0 or point to a valid [`Tag`] living for `'a`.
unsafe fn tag_at<'a>(address: u64) -> Option<&'a Tag> {
    let address = usize::try_from(address).ok()?;
    unsafe { core::ptr::with_exposed_provenance::<Tag>(address).as_ref() }
}

fn address_of(tag: &Tag) -> u64 {
    core::ptr::from_ref(tag).expose_provenance() as u64
}
