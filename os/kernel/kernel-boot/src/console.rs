//! # Console Bridge
//!
//! Binds the early output surface from the loader's tags and exposes it as a
//! byte sink. Two surfaces exist:
//!
//! * the loader's **terminal**, a `term_write(ptr, len)` callback that also
//!   reports the terminal geometry;
//! * a raw **framebuffer**, which needs an external [`FramebufferRenderer`]
//!   to turn text into pixels.
//!
//! The terminal wins when both are present.

#![allow(unsafe_code)]

use crate::Fatal;
use core::fmt;
use kernel_info::boot::{FramebufferTag, TermWriteFn, TerminalTag};
use kernel_info::config::FALLBACK_COLUMNS;
use kernel_info::tags::TagList;

/// The loader's terminal callback and what it reported about itself.
#[derive(Debug, Clone, Copy)]
pub struct TerminalBinding {
    pub write: TermWriteFn,
    pub columns: Option<u16>,
    pub rows: Option<u16>,
    /// Longest string `write` accepts in one call.
    pub max_length: Option<u64>,
}

impl TerminalBinding {
    /// Binds to `tag`, or `None` if the loader left `term_write` empty.
    #[must_use]
    pub fn from_tag(tag: &TerminalTag) -> Option<Self> {
        let write = term_write_fn(tag.term_write)?;
        let flags = tag.flags();
        Some(Self {
            write,
            columns: flags.dimensions_valid().then_some(tag.cols),
            rows: flags.dimensions_valid().then_some(tag.rows),
            max_length: flags
                .max_length_valid()
                .then_some(tag.max_length)
                .filter(|&len| len > 0),
        })
    }
}

fn term_write_fn(address: u64) -> Option<TermWriteFn> {
    let address = usize::try_from(address).ok().filter(|&a| a != 0)?;
    let ptr = core::ptr::with_exposed_provenance::<()>(address);
    // SAFETY: the loader publishes a `TermWriteFn` at this address.
    Some(unsafe { core::mem::transmute::<*const (), TermWriteFn>(ptr) })
}

/// Geometry of a linear framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferBinding {
    pub address: u64,
    /// Bytes per scanline.
    pub pitch: u16,
    pub width: u16,
    pub height: u16,
    pub bpp: u16,
}

impl FramebufferBinding {
    /// Binds to `tag`, or `None` if the loader reported no buffer address.
    #[must_use]
    pub const fn from_tag(tag: &FramebufferTag) -> Option<Self> {
        if tag.framebuffer_addr == 0 {
            return None;
        }
        Some(Self {
            address: tag.framebuffer_addr,
            pitch: tag.framebuffer_pitch,
            width: tag.framebuffer_width,
            height: tag.framebuffer_height,
            bpp: tag.framebuffer_bpp,
        })
    }
}

/// The output surface chosen for this boot.
#[derive(Debug, Clone, Copy)]
pub enum ConsoleBinding {
    Terminal(TerminalBinding),
    Framebuffer(FramebufferBinding),
}

impl ConsoleBinding {
    /// Picks the output surface from the tag list.
    ///
    /// # Errors
    /// [`Fatal::MissingMandatoryTag`] if neither a usable terminal nor a
    /// framebuffer tag is present.
    pub fn resolve(tags: &TagList<'_>) -> Result<Self, Fatal> {
        if let Some(terminal) = tags.get::<TerminalTag>().and_then(TerminalBinding::from_tag) {
            return Ok(Self::Terminal(terminal));
        }

        if let Some(framebuffer) = tags
            .get::<FramebufferTag>()
            .and_then(FramebufferBinding::from_tag)
        {
            return Ok(Self::Framebuffer(framebuffer));
        }

        Err(Fatal::MissingMandatoryTag {
            tag: "terminal or framebuffer",
        })
    }

    /// Columns reported by the loader; framebuffers have none.
    #[must_use]
    pub const fn columns(&self) -> Option<u16> {
        match self {
            Self::Terminal(terminal) => terminal.columns,
            Self::Framebuffer(_) => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

/// Draws text into a framebuffer. Glyph rendering lives outside this crate.
pub trait FramebufferRenderer {
    fn write(&mut self, framebuffer: &FramebufferBinding, bytes: &[u8]);

    /// Text columns the renderer fits into the framebuffer, if it knows.
    fn columns(&self, _framebuffer: &FramebufferBinding) -> Option<u16> {
        None
    }
}

/// Byte sink over the bound surface.
pub struct Console<'r> {
    binding: ConsoleBinding,
    renderer: Option<&'r mut dyn FramebufferRenderer>,
    written: usize,
}

impl<'r> Console<'r> {
    #[must_use]
    pub fn new(binding: ConsoleBinding, renderer: Option<&'r mut dyn FramebufferRenderer>) -> Self {
        Self {
            binding,
            renderer,
            written: 0,
        }
    }

    #[must_use]
    pub const fn binding(&self) -> &ConsoleBinding {
        &self.binding
    }

    /// Width used to align status markers.
    #[must_use]
    pub fn columns(&self) -> u16 {
        let reported = match (&self.binding, self.renderer.as_deref()) {
            (ConsoleBinding::Terminal(terminal), _) => terminal.columns,
            (ConsoleBinding::Framebuffer(fb), Some(renderer)) => renderer.columns(fb),
            (ConsoleBinding::Framebuffer(_), None) => None,
        };
        reported.filter(|&c| c > 0).unwrap_or(FALLBACK_COLUMNS)
    }

    /// Number of bytes handed to the surface so far.
    #[must_use]
    pub const fn bytes_written(&self) -> usize {
        self.written
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        match &self.binding {
            ConsoleBinding::Terminal(terminal) => {
                let chunk = terminal
                    .max_length
                    .and_then(|len| usize::try_from(len).ok())
                    .unwrap_or(bytes.len())
                    .max(1);
                for part in bytes.chunks(chunk) {
                    (terminal.write)(part.as_ptr(), part.len() as u64);
                }
            }
            ConsoleBinding::Framebuffer(fb) => {
                let Some(renderer) = self.renderer.as_deref_mut() else {
                    return;
                };
                renderer.write(fb, bytes);
            }
        }
        self.written += bytes.len();
    }

    pub fn print(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Writes `count` spaces.
    pub fn pad(&mut self, mut count: usize) {
        const SPACES: [u8; 32] = [b' '; 32];
        while count > 0 {
            let n = count.min(SPACES.len());
            self.write_bytes(&SPACES[..n]);
            count -= n;
        }
    }
}

impl fmt::Write for Console<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}
