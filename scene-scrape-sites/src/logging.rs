use std::io::Write;

/// Install the stderr diagnostic logger.
///
/// Lines come out as `[Tag] message`, which is the format the host surfaces
/// to users. Filtering defaults to `info` and follows `RUST_LOG`.
pub fn init_logging(tag: &'static str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(move |buf, record| writeln!(buf, "[{}] {}", tag, record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}
