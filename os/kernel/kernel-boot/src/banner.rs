//! Boot banner: logo, kernel build identity and loader identity.

use crate::Console;
use core::fmt::Write;
use kernel_info::config::KERNEL_VERSION;

/// The logo, white on blue.
pub const LOGO: &str = concat!(
    "\x1b[44m   __                  \x1b[0m          \n",
    "\x1b[44m  / _| __ _ _ __ _   _ \x1b[0m ___  ___ \n",
    "\x1b[44m | |_ / _` | '__| | | |\x1b[0m/ _ \\/ __|\n",
    "\x1b[44m |  _| (_| | |  | |_| |\x1b[0m (_) \\__ \\\n",
    "\x1b[44m |_|  \\__,_|_|   \\__,_|\x1b[0m\\___/|___/\n",
    "\x1b[44m                       \x1b[0m                    \n",
);

pub const COPYRIGHT: &str = "Copyright (C) 2021 Leap of Azzam\n";

pub const WELCOME: &str = "\nWelcome to FaruOS!\n";

/// Identity of the running kernel image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    /// UTC, `YYYY-MM-DD`.
    pub date: &'static str,
    /// UTC, `HH:MM:SS`.
    pub time: &'static str,
    pub compiler: &'static str,
}

/// This build, stamped by `build.rs`.
pub const BUILD: BuildInfo = BuildInfo {
    version: KERNEL_VERSION,
    date: env!("KERNEL_BUILD_DATE"),
    time: env!("KERNEL_BUILD_TIME"),
    compiler: env!("KERNEL_RUSTC"),
};

pub fn print_banner(console: &mut Console<'_>, build: &BuildInfo, brand: &str, version: &str) {
    console.print(LOGO);
    // Console writes cannot fail.
    let _ = writeln!(console, "version {}", build.version);
    let _ = writeln!(console, "built {} {} UTC with {}", build.date, build.time, build.compiler);
    console.print(COPYRIGHT);
    console.print("\n");
    let _ = writeln!(console, "info: Bootloader: {brand} {version}");
}

pub fn print_welcome(console: &mut Console<'_>) {
    console.print(WELCOME);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_ends_with_a_blue_blank_row() {
        let last = LOGO.lines().last().unwrap_or_default();
        assert_eq!(last, format!("\x1b[44m{}\x1b[0m{}", " ".repeat(23), " ".repeat(20)));
        assert_eq!(LOGO.lines().count(), 6);
        assert!(LOGO.lines().all(|line| line.starts_with("\x1b[44m")));
    }

    #[test]
    fn copyright_follows_the_build_line() {
        assert_eq!(COPYRIGHT, "Copyright (C) 2021 Leap of Azzam\n");
    }
}
