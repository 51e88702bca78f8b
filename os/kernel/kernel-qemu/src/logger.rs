use crate::qemu_trace;
use kernel_sync::SyncOnceCell;
use log::{LevelFilter, Log, Metadata, Record};

/// `log` backend writing `"[LEVEL] target: message\n"` lines to the debug console.
pub struct QemuLogger {
    max_level: LevelFilter,
}

/// Why [`init`] could not install the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoggerInitError {
    #[error("the QEMU logger was already installed")]
    AlreadyInitialized,
    #[error("another logger is registered with the log facade")]
    SetLogger,
}

static LOGGER: SyncOnceCell<QemuLogger> = SyncOnceCell::new();

/// Installs the [`QemuLogger`] as the global `log` backend.
///
/// # Errors
/// * [`LoggerInitError::AlreadyInitialized`] on a second call.
/// * [`LoggerInitError::SetLogger`] if a different logger got there first.
pub fn init(max_level: LevelFilter) -> Result<(), LoggerInitError> {
    LOGGER
        .set(QemuLogger::new(max_level))
        .map_err(|_| LoggerInitError::AlreadyInitialized)?;
    let logger = LOGGER.get().ok_or(LoggerInitError::AlreadyInitialized)?;

    log::set_logger(logger).map_err(|_| LoggerInitError::SetLogger)?;
    log::set_max_level(max_level);
    Ok(())
}

impl QemuLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }
}

impl Log for QemuLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        qemu_trace!(
            "[{}] {}: {}\n",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn metadata(level: Level) -> Metadata<'static> {
        Metadata::builder().level(level).target("kernel").build()
    }

    #[test]
    fn level_filter_is_inclusive() {
        let logger = QemuLogger::new(LevelFilter::Info);
        assert!(logger.enabled(&metadata(Level::Error)));
        assert!(logger.enabled(&metadata(Level::Info)));
        assert!(!logger.enabled(&metadata(Level::Debug)));
    }

    #[test]
    fn off_disables_everything() {
        let logger = QemuLogger::new(LevelFilter::Off);
        assert!(!logger.enabled(&metadata(Level::Error)));
    }
}
