//! Route `log` records from the library through the output helpers.

use log::{Level, LevelFilter, Log, Metadata, Record};

use super::output;

struct CliLogger;

static LOGGER: CliLogger = CliLogger;

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().starts_with("mault")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = record.args().to_string();
        match record.level() {
            Level::Error => output::error(&msg),
            Level::Warn => output::warning(&msg),
            _ => output::debug(&msg),
        }
    }

    fn flush(&self) {}
}

/// Level used for a given `--verbose` setting.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the logger. Calling it twice keeps the first logger and only
/// updates the level.
pub fn init(verbose: bool) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_for(verbose));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Warn);
    }

    #[test]
    fn foreign_targets_are_filtered() {
        log::set_max_level(LevelFilter::Debug);
        let ours = Metadata::builder().level(Level::Debug).target("mault::vault").build();
        let theirs = Metadata::builder().level(Level::Debug).target("rusqlite").build();
        assert!(LOGGER.enabled(&ours));
        assert!(!LOGGER.enabled(&theirs));
    }
}
