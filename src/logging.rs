use tracing::Level;

/// Installs a stderr `fmt` subscriber at `INFO`, keeping stdout free for data.
///
/// Calling it twice is harmless: the second subscriber is simply not installed.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .try_init();
}
