//! Kernel side of the console: the binding published for the panic path and
//! the stand-in for a framebuffer glyph renderer.

use kernel_boot::console::FramebufferBinding;
use kernel_boot::{ConsoleBinding, FramebufferRenderer};
use kernel_sync::SyncOnceCell;
use log::warn;

/// The console bound during boot, for the panic handler.
pub static PANIC_CONSOLE: SyncOnceCell<ConsoleBinding> = SyncOnceCell::new();

/// Publishes `binding` for [`PANIC_CONSOLE`]; the first binding stays.
pub fn publish(binding: &ConsoleBinding) {
    if PANIC_CONSOLE.set(*binding).is_err() {
        warn!("A console binding was already published; keeping the first");
    }
}

/// Mirrors framebuffer console text to the QEMU debug console.
///
/// There is no font renderer in the kernel, so on framebuffer-only boots the
/// text is at least visible on the host.
pub struct DebugconMirror;

impl FramebufferRenderer for DebugconMirror {
    fn write(&mut self, _framebuffer: &FramebufferBinding, bytes: &[u8]) {
        kernel_qemu::dbg_write(bytes);
    }
}
