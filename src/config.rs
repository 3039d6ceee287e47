//! Per-invocation adapter configuration.
//!
//! Both knobs come from process environment variables and are re-read on
//! every invocation rather than cached, so a configuration change never
//! leaks across invocations through process-level state.

use std::env;

const STRIP_STAGE_PATH_VAR: &str = "STRIP_STAGE_PATH";
const BASE_PATH_VAR: &str = "API_GATEWAY_BASE_PATH";

/// Environment-driven configuration for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Suppresses the stage-derived mount prefix.
    pub strip_stage_path: bool,
    /// Overrides the mount prefix outright; stripped from the request path
    /// when it matches.
    pub base_path: Option<String>,
}

impl AdapterConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            strip_stage_path: env::var(STRIP_STAGE_PATH_VAR).is_ok_and(|v| flag_enabled(&v)),
            base_path: env::var(BASE_PATH_VAR).ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Boolean-like flag parsing: trimmed, lowercased, member of the accepted
/// truthy spellings.
#[must_use]
pub fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "t" | "1"
    )
}
