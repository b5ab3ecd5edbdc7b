pub mod oracle;
pub mod report;
pub mod experiment;

use std::io::Write;

use env_logger::Builder;

/// Shared binary logging setup: -v maps to info, -vv to debug.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            // no prefix, just the message
            writeln!(buf, "{}", record.args())
        })
        .init();
}
