//! Configuration module for `MindMap Explorer`

use crate::core::ai::query::DEFAULT_COOLDOWN;
use crate::core::ai::AiConfig;
use crate::core::layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const HOME_VARIABLE: &str = "$MINDMAP_HOME";

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Generative AI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    /// API key; empty means unset
    #[serde(default)]
    pub api_key: String,
    /// Model name
    #[serde(default)]
    pub model: String,
    /// API base URL
    #[serde(default)]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: u64,
    /// Minimum spacing between generation requests, in milliseconds
    #[serde(default)]
    pub cooldown_ms: u64,
}

/// Layout tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Canvas height reserved per node
    #[serde(default)]
    pub row_unit: f64,
    /// Canvas width reserved per depth level
    #[serde(default)]
    pub level_unit: f64,
    /// Separation between siblings
    #[serde(default)]
    pub sibling_separation: f64,
    /// Separation between cousins
    #[serde(default)]
    pub cousin_separation: f64,
    /// Viewports narrower than this use the mobile presets
    #[serde(default)]
    pub mobile_breakpoint: f64,
}

/// Paths configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for rendered output files
    #[serde(default)]
    pub output_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// AI settings
    #[serde(default)]
    pub ai: AiSettings,
    /// Layout settings
    #[serde(default)]
    pub layout: LayoutSettings,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override the API key
    pub api_key: Option<String>,
    /// Override the model
    pub model: Option<String>,
    /// Override the output directory
    pub output_dir: Option<String>,
}

/// Fill `target` from `default` when it is unset; report whether it changed
fn merge_string(target: &mut String, default: &str) -> bool {
    if target.is_empty() && !default.is_empty() {
        default.clone_into(target);
        true
    } else {
        false
    }
}

fn merge_u64(target: &mut u64, default: u64) -> bool {
    if *target == 0 && default != 0 {
        *target = default;
        true
    } else {
        false
    }
}

fn merge_f64(target: &mut f64, default: f64) -> bool {
    if *target <= 0.0 && default > 0.0 {
        *target = default;
        true
    } else {
        false
    }
}

fn parse_positive(key: &str, value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("Invalid positive number for '{key}': '{value}'")),
    }
}

fn parse_count(key: &str, value: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("Invalid whole number for '{key}': '{value}'"))
}

impl Config {
    /// Get the `$MINDMAP_HOME` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/mindmap-explorer`
    /// - macOS: `~/Library/Application Support/mindmap-explorer`
    /// - Windows: `%APPDATA%\mindmap-explorer`
    #[must_use]
    pub fn get_mindmap_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindmap-explorer")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading so that fields added in newer versions get their
    /// default values. Only empty (or zero) fields are filled in.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let merged = [
            merge_string(&mut self.logging.level, &defaults.logging.level),
            merge_string(&mut self.logging.file, &defaults.logging.file),
            merge_string(&mut self.ai.model, &defaults.ai.model),
            merge_string(&mut self.ai.endpoint, &defaults.ai.endpoint),
            merge_u64(&mut self.ai.timeout_secs, defaults.ai.timeout_secs),
            merge_u64(&mut self.ai.cooldown_ms, defaults.ai.cooldown_ms),
            merge_f64(&mut self.layout.row_unit, defaults.layout.row_unit),
            merge_f64(&mut self.layout.level_unit, defaults.layout.level_unit),
            merge_f64(
                &mut self.layout.sibling_separation,
                defaults.layout.sibling_separation,
            ),
            merge_f64(
                &mut self.layout.cousin_separation,
                defaults.layout.cousin_separation,
            ),
            merge_f64(
                &mut self.layout.mobile_breakpoint,
                defaults.layout.mobile_breakpoint,
            ),
            merge_string(&mut self.paths.output_dir, &defaults.paths.output_dir),
        ];
        merged.contains(&true)
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Command-line arguments override configuration file values for this run
    /// only. Only non-`None` values replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(api_key) = &overrides.api_key {
            self.ai.api_key.clone_from(api_key);
        }
        if let Some(model) = &overrides.model {
            self.ai.model.clone_from(model);
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.paths.output_dir.clone_from(output_dir);
        }
    }

    /// Get the user config file path
    ///
    /// - `config.toml` for release builds
    /// - `dconfig.toml` for debug builds (allows separate debug config)
    ///
    /// The file is located in the directory returned by [`get_mindmap_dir`].
    ///
    /// [`get_mindmap_dir`]: Self::get_mindmap_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_mindmap_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$MINDMAP_HOME` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(HOME_VARIABLE) {
            let home = Self::get_mindmap_dir();
            value.replace(HOME_VARIABLE, home.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Expands `$MINDMAP_HOME` in path values. Missing fields use their serde
    /// defaults (empty strings, zero, false).
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    ///
    /// # Examples
    ///
    /// ```
    /// use mindmap_explorer::config::Config;
    ///
    /// let config = Config::from_toml(r#"
    /// [logging]
    /// level = "info"
    ///
    /// [ai]
    /// model = "gemini-3-flash-preview"
    /// "#).unwrap();
    /// assert_eq!(config.ai.model, "gemini-3-flash-preview");
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.output_dir = Self::expand_variables(&config.paths.output_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// The defaults differ between debug and release builds:
    /// - Debug: Uses `DefaultCLIConfigDebug.toml`
    /// - Release: Uses `DefaultCLIConfigRelease.toml`
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from the user config file, creating it from
    /// defaults on first run
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// Load configuration from a specific file
    ///
    /// - If the file exists: loads it, merges missing fields from defaults and
    ///   writes the merged result back
    /// - If it doesn't (first run): creates it from defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let defaults = Self::from_defaults();

        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save_to(path);
                    }
                    return config;
                }
            }
        } else {
            let _ = defaults.save_to(path);
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration to a specific file, creating parent directories
    ///
    /// # Errors
    /// Returns an error if serialization, directory creation or writing fails
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Keys may be bare (`model`) or qualified by section (`ai.model`).
    ///
    /// Supported keys: `level`, `file`, `verbose`, `api_key`, `model`,
    /// `endpoint`, `timeout_secs`, `cooldown_ms`, `row_unit`, `level_unit`,
    /// `sibling_separation`, `cousin_separation`, `mobile_breakpoint`,
    /// `output_dir`. Dashes may be used in place of underscores.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match Self::field(key).as_str() {
            "level" => self.logging.level.clone(),
            "file" => self.logging.file.clone(),
            "verbose" => self.logging.verbose.to_string(),
            "api_key" => self.ai.api_key.clone(),
            "model" => self.ai.model.clone(),
            "endpoint" => self.ai.endpoint.clone(),
            "timeout_secs" => self.ai.timeout_secs.to_string(),
            "cooldown_ms" => self.ai.cooldown_ms.to_string(),
            "row_unit" => self.layout.row_unit.to_string(),
            "level_unit" => self.layout.level_unit.to_string(),
            "sibling_separation" => self.layout.sibling_separation.to_string(),
            "cousin_separation" => self.layout.cousin_separation.to_string(),
            "mobile_breakpoint" => self.layout.mobile_breakpoint.to_string(),
            "output_dir" => self.paths.output_dir.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a configuration value by key
    ///
    /// Numeric layout values must be positive; `timeout_secs` and
    /// `cooldown_ms` take whole numbers.
    ///
    /// Note: This method updates the in-memory config. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be parsed
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match Self::field(key).as_str() {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "api_key" => self.ai.api_key = value.to_string(),
            "model" => self.ai.model = value.to_string(),
            "endpoint" => self.ai.endpoint = value.to_string(),
            "timeout_secs" => self.ai.timeout_secs = parse_count(key, value)?,
            "cooldown_ms" => self.ai.cooldown_ms = parse_count(key, value)?,
            "row_unit" => self.layout.row_unit = parse_positive(key, value)?,
            "level_unit" => self.layout.level_unit = parse_positive(key, value)?,
            "sibling_separation" => self.layout.sibling_separation = parse_positive(key, value)?,
            "cousin_separation" => self.layout.cousin_separation = parse_positive(key, value)?,
            "mobile_breakpoint" => self.layout.mobile_breakpoint = parse_positive(key, value)?,
            "output_dir" => self.paths.output_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Note: This method updates the in-memory config. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match Self::field(key).as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "api_key" => self.ai.api_key.clone_from(&defaults.ai.api_key),
            "model" => self.ai.model.clone_from(&defaults.ai.model),
            "endpoint" => self.ai.endpoint.clone_from(&defaults.ai.endpoint),
            "timeout_secs" => self.ai.timeout_secs = defaults.ai.timeout_secs,
            "cooldown_ms" => self.ai.cooldown_ms = defaults.ai.cooldown_ms,
            "row_unit" => self.layout.row_unit = defaults.layout.row_unit,
            "level_unit" => self.layout.level_unit = defaults.layout.level_unit,
            "sibling_separation" => {
                self.layout.sibling_separation = defaults.layout.sibling_separation;
            }
            "cousin_separation" => {
                self.layout.cousin_separation = defaults.layout.cousin_separation;
            }
            "mobile_breakpoint" => {
                self.layout.mobile_breakpoint = defaults.layout.mobile_breakpoint;
            }
            "output_dir" => self.paths.output_dir.clone_from(&defaults.paths.output_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file, causing the next [`load()`](Config::load) call to
    /// recreate it from defaults. Succeeds if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Layout parameters: configured values over built-in defaults
    #[must_use]
    pub fn layout_config(&self) -> LayoutConfig {
        let mut layout = LayoutConfig::default();
        let settings = &self.layout;
        for (target, value) in [
            (&mut layout.row_unit, settings.row_unit),
            (&mut layout.level_unit, settings.level_unit),
            (&mut layout.sibling_separation, settings.sibling_separation),
            (&mut layout.cousin_separation, settings.cousin_separation),
            (&mut layout.mobile_breakpoint, settings.mobile_breakpoint),
        ] {
            if value.is_finite() && value > 0.0 {
                *target = value;
            }
        }
        layout
    }

    /// AI client configuration; an empty key becomes `None`
    #[must_use]
    pub fn ai_config(&self) -> AiConfig {
        let defaults = AiConfig::default();
        let non_empty = |value: &str, fallback: String| {
            if value.trim().is_empty() {
                fallback
            } else {
                value.trim().to_string()
            }
        };
        AiConfig {
            api_key: Some(self.ai.api_key.trim().to_string()).filter(|key| !key.is_empty()),
            model: non_empty(&self.ai.model, defaults.model),
            endpoint: non_empty(&self.ai.endpoint, defaults.endpoint),
            timeout_secs: if self.ai.timeout_secs == 0 {
                defaults.timeout_secs
            } else {
                self.ai.timeout_secs
            },
        }
    }

    /// Spacing between generation requests
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        if self.ai.cooldown_ms == 0 {
            DEFAULT_COOLDOWN
        } else {
            Duration::from_millis(self.ai.cooldown_ms)
        }
    }

    /// Normalize a key: drop a `section.` prefix, dashes to underscores
    fn field(key: &str) -> String {
        key.rsplit('.').next().unwrap_or(key).replace('-', "_")
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[ai]")?;
        let key = if self.ai.api_key.is_empty() {
            ""
        } else {
            "********"
        };
        writeln!(f, "  api_key = \"{key}\"")?;
        writeln!(f, "  model = \"{}\"", self.ai.model)?;
        writeln!(f, "  endpoint = \"{}\"", self.ai.endpoint)?;
        writeln!(f, "  timeout_secs = {}", self.ai.timeout_secs)?;
        writeln!(f, "  cooldown_ms = {}", self.ai.cooldown_ms)?;

        writeln!(f, "\n[layout]")?;
        writeln!(f, "  row_unit = {}", self.layout.row_unit)?;
        writeln!(f, "  level_unit = {}", self.layout.level_unit)?;
        writeln!(f, "  sibling_separation = {}", self.layout.sibling_separation)?;
        writeln!(f, "  cousin_separation = {}", self.layout.cousin_separation)?;
        writeln!(f, "  mobile_breakpoint = {}", self.layout.mobile_breakpoint)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  output_dir = \"{}\"", self.paths.output_dir)?;

        Ok(())
    }
}
