//! # Endpoint Profiles
//!
//! Profiles live in an INI file, one section per profile, each naming the
//! classifier base URL. A missing file or section is not an error; the
//! built-in default endpoint covers the zero-configuration case.

use anyhow::{Context, Result};
use ini::Ini;
use std::path::Path;

/// Base URL used when no profile configures one.
pub const DEFAULT_ENDPOINT: &str = "https://phishing-detection-ui-2.onrender.com";

/// INI key naming the classifier base URL inside a profile section.
const ENDPOINT_KEY: &str = "endpoint";

/// Connection settings for the classifier service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointProfile {
    name: String,
    path: String,
    endpoint: String,
}

impl EndpointProfile {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Profile carrying the built-in default endpoint.
    pub fn fallback(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, path, DEFAULT_ENDPOINT)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the file the profile was read from (or would be read from).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Store reading endpoint profiles from an INI file.
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    /// Store over the INI file at `path`; a leading tilde is expanded on
    /// access.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Load the named profile.
    ///
    /// Returns `Ok(None)` when the file does not exist, the section is
    /// missing, or the section carries no endpoint key.
    pub fn load_profile(&self, name: &str) -> Result<Option<EndpointProfile>> {
        let expanded = shellexpand::tilde(&self.path).into_owned();
        if !Path::new(&expanded).exists() {
            return Ok(None);
        }

        let file = Ini::load_from_file(&expanded)
            .with_context(|| format!("failed to read profile file {expanded}"))?;

        let Some(section) = file.section(Some(name)) else {
            return Ok(None);
        };
        let Some(endpoint) = section.get(ENDPOINT_KEY) else {
            tracing::warn!("profile '{name}' has no '{ENDPOINT_KEY}' key");
            return Ok(None);
        };

        Ok(Some(EndpointProfile::new(name, self.path.as_str(), endpoint)))
    }
}
