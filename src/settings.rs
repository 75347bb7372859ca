//! Engine configuration loading for the simulator
//!
//! Precedence, lowest first: built-in defaults, JSON file, `GRAVITY_MATCH_SEED`,
//! explicit `--seed`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::EngineConfig;

/// Environment variable overriding the session seed
pub const SEED_ENV: &str = "GRAVITY_MATCH_SEED";

/// Parse a JSON config; missing sections and fields keep their defaults
pub fn parse(json: &str) -> Result<EngineConfig> {
    let config: EngineConfig = serde_json::from_str(json).context("malformed engine config")?;
    config.validate()?;
    Ok(config)
}

/// Load a config file, or the defaults when no path is given
pub fn load(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse(&text).with_context(|| format!("loading config file {}", path.display()))
}

/// Seed from the environment, ignoring unset or unparsable values
pub fn seed_from_env() -> Option<u32> {
    std::env::var(SEED_ENV)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Resolve the final configuration
pub fn resolve(path: Option<&Path>, seed: Option<u32>) -> Result<EngineConfig> {
    let mut config = load(path)?;
    if let Some(seed) = seed.or_else(seed_from_env) {
        config.seed = seed;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = parse(r#"{ "seed": 9, "cascade": { "max_depth": 3 } }"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.cascade.max_depth, 3);
        assert_eq!(config.queue, EngineConfig::default().queue);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse(r#"{ "queue": { "visible": 0 } }"#).is_err());
        assert!(parse("not json").is_err());
    }

    #[test]
    fn test_explicit_seed_wins() {
        let config = resolve(None, Some(77)).unwrap();
        assert_eq!(config.seed, 77);
    }
}
