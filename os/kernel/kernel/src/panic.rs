use crate::console::{DebugconMirror, PANIC_CONSOLE};
use core::fmt::Write;
use core::panic::PanicInfo;
use kernel_boot::Console;
use kernel_sync::irq;
use log::error;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    irq::cli_stop_interrupts();

    // Without a bound console there is nowhere to print to but the log.
    if let Some(binding) = PANIC_CONSOLE.get() {
        let mut mirror = DebugconMirror;
        let mut console = Console::new(*binding, Some(&mut mirror));
        let _ = write!(console, "\n[kernel] PANIC: {}\n", info.message());
    }

    error!("PANIC: {info}");
    irq::halt_forever()
}
