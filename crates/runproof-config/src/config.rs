// crates/runproof-config/src/config.rs
// ============================================================================
// Module: RunProof Configuration
// Description: Configuration loading and validation for RunProof.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: runproof-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Unknown
//! fields, malformed key paths, and malformed tolerances fail closed at load
//! time so a bad config can never weaken the evidence contract silently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use runproof_core::DEFAULT_INDEX_FILE_NAME;
use runproof_core::DEFAULT_MANIFEST_FILE_NAME;
use runproof_core::DEFAULT_REPORT_FILE_NAME;
use runproof_core::DEFAULT_SAFELIST_EXTENSIONS;
use runproof_core::DeterminismContract;
use runproof_core::IndexAggregator;
use runproof_core::ManifestBuilder;
use runproof_core::PackGenerator;
use runproof_core::sidecar_file_name;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "runproof.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "RUNPROOF_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum number of volatile key paths in a contract.
const MAX_VOLATILE_PATHS: usize = 256;
/// Maximum number of safelist extensions.
const MAX_SAFELIST_EXTENSIONS: usize = 64;
/// Maximum number of excluded file names.
const MAX_EXCLUDE_NAMES: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("config io error: {0}")]
    Io(String),
    /// Parsing the config file failed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The configuration is semantically invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Canonical RunProof configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunproofConfig {
    /// Manifest builder settings.
    #[serde(default)]
    pub manifest: ManifestSection,
    /// Evidence pack settings.
    #[serde(default)]
    pub pack: PackSection,
    /// Determinism contract settings.
    #[serde(default)]
    pub contract: ContractSection,
}

/// Manifest builder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSection {
    /// Extensions indexed when building report manifests.
    #[serde(default = "default_safelist_extensions")]
    pub safelist_extensions: Vec<String>,
    /// Exact file names skipped anywhere in a scanned tree.
    #[serde(default = "default_exclude_names")]
    pub exclude_names: Vec<String>,
}

impl Default for ManifestSection {
    fn default() -> Self {
        Self {
            safelist_extensions: default_safelist_extensions(),
            exclude_names: default_exclude_names(),
        }
    }
}

/// Evidence pack settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackSection {
    /// Manifest file name written at each pack root.
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
}

impl Default for PackSection {
    fn default() -> Self {
        Self {
            manifest_name: default_manifest_name(),
        }
    }
}

/// Determinism contract settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractSection {
    /// Volatile key paths stripped before hashing or comparison.
    #[serde(default)]
    pub volatile_paths: Vec<String>,
    /// Optional decimal tolerance applied when comparing numbers.
    #[serde(default)]
    pub numeric_tolerance: Option<String>,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default report-like safelist extensions.
fn default_safelist_extensions() -> Vec<String> {
    DEFAULT_SAFELIST_EXTENSIONS.iter().map(ToString::to_string).collect()
}

/// Default excluded output file names.
fn default_exclude_names() -> Vec<String> {
    vec![
        DEFAULT_MANIFEST_FILE_NAME.to_string(),
        sidecar_file_name(DEFAULT_MANIFEST_FILE_NAME),
        DEFAULT_REPORT_FILE_NAME.to_string(),
        DEFAULT_INDEX_FILE_NAME.to_string(),
    ]
}

/// Default pack manifest file name.
fn default_manifest_name() -> String {
    DEFAULT_MANIFEST_FILE_NAME.to_string()
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl RunproofConfig {
    /// Loads configuration from an explicit path, the `RUNPROOF_CONFIG`
    /// environment variable, or `runproof.toml` in the working directory.
    ///
    /// When no config file exists at the resolved default location, the
    /// built-in defaults are returned; an explicitly named file that is
    /// missing or invalid is always an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_config_path(path);
        if !explicit && !resolved.is_file() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section fail-closed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.manifest.validate()?;
        self.pack.validate()?;
        self.contract.validate()?;
        Ok(())
    }

    /// Builds the determinism contract declared by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a path or tolerance is malformed.
    pub fn contract(&self) -> Result<DeterminismContract, ConfigError> {
        DeterminismContract::from_parts(
            &self.contract.volatile_paths,
            self.contract.numeric_tolerance.clone(),
        )
        .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Builds a manifest builder configured by this configuration.
    #[must_use]
    pub fn manifest_builder(&self) -> ManifestBuilder {
        ManifestBuilder {
            safelist_extensions: Some(
                self.manifest.safelist_extensions.iter().cloned().collect(),
            ),
            exclude_names: self.manifest.exclude_names.iter().cloned().collect(),
            ..ManifestBuilder::default()
        }
    }

    /// Builds a pack generator configured by this configuration.
    #[must_use]
    pub fn pack_generator(&self) -> PackGenerator {
        let mut generator = PackGenerator {
            manifest_name: self.pack.manifest_name.clone(),
            ..PackGenerator::default()
        };
        generator.builder.exclude_names.insert(self.pack.manifest_name.clone());
        generator.builder.exclude_names.insert(sidecar_file_name(&self.pack.manifest_name));
        generator
    }

    /// Builds an index aggregator configured by this configuration.
    #[must_use]
    pub fn index_aggregator(&self) -> IndexAggregator {
        IndexAggregator {
            manifest_name: self.pack.manifest_name.clone(),
        }
    }
}

impl ManifestSection {
    /// Validates safelist extensions and excluded names.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.safelist_extensions.len() > MAX_SAFELIST_EXTENSIONS {
            return Err(ConfigError::Invalid(
                "manifest.safelist_extensions exceeds entry limit".to_string(),
            ));
        }
        for extension in &self.safelist_extensions {
            if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::Invalid(format!(
                    "manifest.safelist_extensions entry '{extension}' must be ASCII alphanumeric"
                )));
            }
        }
        if self.exclude_names.len() > MAX_EXCLUDE_NAMES {
            return Err(ConfigError::Invalid(
                "manifest.exclude_names exceeds entry limit".to_string(),
            ));
        }
        for name in &self.exclude_names {
            validate_file_name(name, "manifest.exclude_names")?;
        }
        Ok(())
    }
}

impl PackSection {
    /// Validates the pack manifest name.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_file_name(&self.manifest_name, "pack.manifest_name")
    }
}

impl ContractSection {
    /// Validates volatile paths and the numeric tolerance.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.volatile_paths.len() > MAX_VOLATILE_PATHS {
            return Err(ConfigError::Invalid(
                "contract.volatile_paths exceeds entry limit".to_string(),
            ));
        }
        DeterminismContract::from_parts(&self.volatile_paths, self.numeric_tolerance.clone())
            .map(|_| ())
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether it was explicitly requested.
fn resolve_config_path(path: Option<&Path>) -> (PathBuf, bool) {
    if let Some(path) = path {
        return (path.to_path_buf(), true);
    }
    if let Ok(value) = env::var(CONFIG_ENV_VAR)
        && !value.is_empty()
    {
        return (PathBuf::from(value), true);
    }
    (PathBuf::from(DEFAULT_CONFIG_NAME), false)
}

/// Validates a bare file name config value.
fn validate_file_name(name: &str, field: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must not be empty")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ConfigError::Invalid(format!(
            "{field} entry '{name}' must be a bare file name"
        )));
    }
    if name == "." || name == ".." {
        return Err(ConfigError::Invalid(format!("{field} entry '{name}' is not a file name")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Example Generation
// ============================================================================

/// Returns the canonical example `runproof.toml` document.
#[must_use]
pub fn config_toml_example() -> String {
    concat!(
        "# RunProof configuration\n",
        "\n",
        "[manifest]\n",
        "safelist_extensions = [\"csv\", \"json\", \"md\", \"txt\"]\n",
        "exclude_names = [\"manifest.json\", \"manifest.json.sha256\", ",
        "\"validation_report.json\", \"evidence_index.json\"]\n",
        "\n",
        "[pack]\n",
        "manifest_name = \"manifest.json\"\n",
        "\n",
        "[contract]\n",
        "volatile_paths = [\"meta.generated_at\", \"meta.run_id\"]\n",
        "numeric_tolerance = \"0.000001\"\n",
    )
    .to_string()
}
