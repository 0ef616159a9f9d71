//! Log subscriber setup for the `heapbench` binary.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level. `RUST_LOG` overrides it.
pub fn default_directive(verbose: u8, quiet: bool) -> String {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    format!("heapbench_core={0},heapbench_cli={0}", level)
}

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// the report.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0, false), "heapbench_core=info,heapbench_cli=info");
        assert_eq!(default_directive(1, false), "heapbench_core=debug,heapbench_cli=debug");
        assert_eq!(default_directive(3, false), "heapbench_core=trace,heapbench_cli=trace");
        assert_eq!(default_directive(2, true), "heapbench_core=warn,heapbench_cli=warn");
    }
}
