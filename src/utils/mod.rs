use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Map the integer verbosity switch of [`GfConfig`](crate::GfConfig) onto
/// a log level and install a plain-message logger. Calling this more than
/// once is harmless; only the first installation wins.
pub fn init_logging(verbose: i8) {
    let log_level: LevelFilter = match verbose {
        2 => LevelFilter::Trace,
        1 => LevelFilter::Debug,
        0 => LevelFilter::Info,
        -1 => LevelFilter::Warn,
        -2 => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    let _ = Builder::new()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .filter(None, log_level)
        .try_init();
}
