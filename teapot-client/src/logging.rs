//! Logger set-up.
//!
//! All crates log through the `log` facade; this installs a `fern` dispatcher that writes
//! timestamped lines to stderr.

use log::LevelFilter;

/// Installs the global logger. Debug builds log at `Debug`, release builds at `Info`.
pub fn init() -> Result<(), log::SetLoggerError> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
