//! Constants and configuration values for fanctl
//!
//! Centralizes document keys, defaults, file names, and path resolution.
//! Add new magic values here rather than inline.

/// Top-level keys of the configuration document
pub mod keys {
    pub const SCHEMA: &str = "$schema";
    pub const DEFAULT_STRATEGY: &str = "defaultStrategy";
    pub const STRATEGY_ON_DISCHARGING: &str = "strategyOnDischarging";
    pub const STRATEGIES: &str = "strategies";

    /// Location of the per-strategy parameter definitions inside the schema
    pub const SCHEMA_DEFS: &str = "$defs";
    pub const SCHEMA_STRATEGY_DEF: &str = "strategy";
    pub const SCHEMA_PROPERTIES: &str = "properties";
}

/// Strategy parameter names and their fallbacks
pub mod strategy {
    pub const FAN_SPEED_UPDATE_FREQUENCY: &str = "fanSpeedUpdateFrequency";
    pub const MOVING_AVERAGE_INTERVAL: &str = "movingAverageInterval";
    pub const TEMPERATURE_POLLING_INTERVAL: &str = "temperaturePollingInterval";
    pub const SPEED_CURVE: &str = "speedCurve";

    /// Seconds between fan speed updates when unset
    pub const DEFAULT_FAN_SPEED_UPDATE_FREQUENCY: u64 = 5;

    /// Samples in the moving average when unset
    pub const DEFAULT_MOVING_AVERAGE_INTERVAL: u64 = 20;

    /// Seconds between temperature reads when unset or zero
    pub const DEFAULT_TEMPERATURE_POLLING_INTERVAL: u64 = 1;
}

/// Text accepted for boolean parameters (compared case-insensitively)
pub mod boolean {
    pub const TRUE_LITERALS: &[&str] = &["true", "1", "yes", "on"];
    pub const FALSE_LITERALS: &[&str] = &["false", "0", "no", "off"];
}

/// File names and path resolution
pub mod paths {
    use std::path::PathBuf;

    /// Schema file name inside a resource directory
    pub const SCHEMA_FILE: &str = "config.schema.json";

    /// Template configuration file name inside a resource directory
    pub const TEMPLATE_FILE: &str = "config.json";

    /// Configuration file name inside the user config directory
    pub const CONFIG_FILE: &str = "config.json";

    /// Application directory name under the config base
    pub const APP_DIR: &str = "fanctl";

    /// Environment variable overriding the configuration path
    pub const CONFIG_ENV: &str = "FANCTL_CONFIG";

    /// Environment variable overriding the resource directory
    pub const RESOURCES_ENV: &str = "FANCTL_RESOURCES";

    /// Suffix for the temporary file used by atomic writes
    pub const TEMP_EXTENSION: &str = "json.tmp";

    /// Indentation used when writing the configuration document
    pub const JSON_INDENT: &[u8] = b"    ";

    /// User configuration directory
    ///
    /// Resolution order: XDG_CONFIG_HOME, then HOME/.config, then the
    /// platform default from the dirs crate.
    pub fn user_config_dir() -> Option<PathBuf> {
        let config_base = if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg))
        } else if let Some(home) = std::env::var_os("HOME") {
            Some(PathBuf::from(home).join(".config"))
        } else {
            dirs::config_dir()
        };

        config_base.map(|p| p.join(APP_DIR))
    }

    /// Default configuration file path
    ///
    /// `FANCTL_CONFIG` wins over the user config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        user_config_dir().map(|dir| dir.join(CONFIG_FILE))
    }
}
