//! Logging setup for hosts and test harnesses

/// Initialize the logger with default settings for terminal applications.
/// Uses INFO level by default, with a format that works correctly in raw terminal mode.
/// The RUST_LOG environment variable can override the default level.
///
/// Calling this more than once is harmless; later calls leave the first logger in place.
pub fn init_logger() {
    let result = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "\r[{} {:5} {}] {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice() {
        init_logger();
        init_logger();
        log::info!("logger ready");
    }
}
