#![allow(dead_code)]

use kernel_boot::console::FramebufferBinding;
use kernel_boot::{BootModule, Fatal, FramebufferRenderer};
use kernel_info::boot::{FramebufferTag, Tag, TerminalFlags, TerminalTag, struct_ids};
use std::cell::{Cell, RefCell};

thread_local! {
    static OUTPUT: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
    static CALLS: Cell<usize> = const { Cell::new(0) };
}

/// Stands in for the loader's `term_write`; records into thread-local storage.
pub extern "C" fn record(ptr: *const u8, len: u64) {
    let bytes = unsafe { std::slice::from_raw_parts(ptr, usize::try_from(len).unwrap()) };
    OUTPUT.with_borrow_mut(|out| out.extend_from_slice(bytes));
    CALLS.set(CALLS.get() + 1);
}

pub fn output() -> String {
    OUTPUT.with_borrow(|out| String::from_utf8(out.clone()).unwrap())
}

pub fn write_calls() -> usize {
    CALLS.get()
}

pub fn addr<T>(value: &T) -> u64 {
    core::ptr::from_ref(value).expose_provenance() as u64
}

pub fn terminal_tag(cols: u16, rows: u16, max_length: Option<u64>) -> Box<TerminalTag> {
    Box::new(TerminalTag {
        tag: Tag::new(struct_ids::TERMINAL, 0),
        flags: TerminalFlags::new()
            .with_dimensions_valid(true)
            .with_max_length_valid(max_length.is_some())
            .into_bits(),
        cols,
        rows,
        term_write: record as usize as u64,
        max_length: max_length.unwrap_or(0),
    })
}

pub fn framebuffer_tag() -> Box<FramebufferTag> {
    Box::new(FramebufferTag {
        tag: Tag::new(struct_ids::FRAMEBUFFER, 0),
        framebuffer_addr: 0xfd00_0000,
        framebuffer_width: 1024,
        framebuffer_height: 768,
        framebuffer_pitch: 4096,
        framebuffer_bpp: 32,
        memory_model: 1,
        red_mask_size: 8,
        red_mask_shift: 16,
        green_mask_size: 8,
        green_mask_shift: 8,
        blue_mask_size: 8,
        blue_mask_shift: 0,
        unused: 0,
    })
}

/// Links the tags in the given order and returns the head address.
pub fn link(tags: &mut [&mut Tag]) -> u64 {
    for i in 1..tags.len() {
        let next = addr(&*tags[i]);
        tags[i - 1].next = next;
    }
    if let Some(last) = tags.last_mut() {
        last.next = 0;
    }
    tags.first().map_or(0, |tag| addr(&**tag))
}

pub struct Step {
    pub name: &'static str,
    pub failure: Option<&'static str>,
    pub ran: bool,
}

impl Step {
    pub const fn ok(name: &'static str) -> Self {
        Self {
            name,
            failure: None,
            ran: false,
        }
    }

    pub const fn failing(name: &'static str, reason: &'static str) -> Self {
        Self {
            name,
            failure: Some(reason),
            ran: false,
        }
    }
}

impl BootModule for Step {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self) -> Result<(), Fatal> {
        self.ran = true;
        match self.failure {
            None => Ok(()),
            Some(reason) => Err(Fatal::ModuleInit {
                module: self.name,
                reason,
            }),
        }
    }
}

/// Renderer that keeps the text instead of drawing it.
#[derive(Default)]
pub struct TextRenderer {
    pub text: Vec<u8>,
    pub columns: Option<u16>,
    pub target: Option<FramebufferBinding>,
}

impl FramebufferRenderer for TextRenderer {
    fn write(&mut self, framebuffer: &FramebufferBinding, bytes: &[u8]) {
        self.target = Some(*framebuffer);
        self.text.extend_from_slice(bytes);
    }

    fn columns(&self, _framebuffer: &FramebufferBinding) -> Option<u16> {
        self.columns
    }
}

pub fn status_line(name: &str, padding: usize) -> String {
    format!(
        "[kernel] Initializing {name}...{}[ \x1b[32mOK \x1b[0m]\n",
        " ".repeat(padding)
    )
}
