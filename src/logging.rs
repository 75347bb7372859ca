//! Logger setup for the simulator binary

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Crates whose records are shown at the chosen level
const ENGINE_TARGETS: [&str; 3] = ["gravity_match", "gravity_match_core", "gravity_match_engine"];

/// Warnings from everything, `level` from the engine crates
fn default_filter(level: LevelFilter) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut filter = String::from("warn");
    for target in ENGINE_TARGETS {
        filter.push_str(&format!(",{}={}", target, level));
    }
    filter
}

/// Install env_logger. `RUST_LOG` overrides the default filter.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter(level)));
    builder.format_timestamp(None).format_target(verbose);

    // Already installed when a test or embedder got there first.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_scopes_engine_crates() {
        assert_eq!(
            default_filter(LevelFilter::Debug),
            "warn,gravity_match=debug,gravity_match_core=debug,gravity_match_engine=debug"
        );
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
