//! Configuration constants and utilities for phishline
//!
//! Names the profile file location and the environment variable that
//! overrides it. Everything else is configured per profile.

/// Profile file location used when the environment does not override it.
pub const DEFAULT_PROFILE_PATH: &str = "~/.phishline/profile";

/// Environment variable naming an alternate profile file.
pub const PROFILE_PATH_ENV_VAR: &str = "PHISHLINE_PROFILE_PATH";

/// Resolve the profile file path from the environment or the default.
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}
