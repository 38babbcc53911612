use env_logger::{Builder, Env, Target};

/// Initialize logging. Controlled by `RUST_LOG`, defaults to `info`.
///
/// Logs go to stderr; stdout is reserved for reports.
pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .format_timestamp_millis()
        .init();
}
