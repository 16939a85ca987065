//! Match configuration loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hand_cricket_core::MatchConfig;
use tracing::info;

/// Read the JSON config at `path` (defaults when absent) and apply CLI
/// overrides.
pub fn load(path: Option<&Path>, no_pacing: bool) -> Result<MatchConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config = MatchConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?;
            info!(path = %path.display(), "loaded config");
            config
        }
        None => MatchConfig::default(),
    };
    if no_pacing {
        config.pacing.enabled = false;
    }
    Ok(config)
}
