use tracing_subscriber::filter::LevelFilter;

/// Log level selected on the command line.
///
/// `quiet` wins over any number of `-v`; the two flags are mutually
/// exclusive on the command line anyway.
pub fn level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }

    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Installs the stderr subscriber. Stdout is reserved for command output.
pub fn init(level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
