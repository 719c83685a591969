//! TOML configuration.

use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use spotwatt_derive::{AlignMode, DEFAULT_OVERHEAD_CENTS_PER_KWH, MissingPolicy};
use spotwatt_fetch::{
    ClientConfig, DEFAULT_PRODUCT_CODE, DEFAULT_TARIFF_CODE, EntsoeConfig, OctopusConfig,
    url::{ENTSOE_BASE_URL, OCTOPUS_BASE_URL},
};
use spotwatt_types::SpotwattError;
use spotwatt_zones::{DEFAULT_ZONE, ZoneRegistry};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::DisplayZone;

/// Environment variable holding the ENTSO-E security token.
pub const API_KEY_ENV: &str = "ENTSOE_API_KEY";

/// Environment variable overriding the bidding zone.
pub const ZONE_ENV: &str = "SPOTWATT_ZONE";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the file.
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// Failed to render the configuration.
    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    /// A value is out of range or unknown.
    #[error("Invalid config value for '{key}': {reason}")]
    Invalid {
        /// Dotted key of the offending value.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<ConfigError> for SpotwattError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

/// Root configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log level used when neither `RUST_LOG` nor `-v` is given.
    pub log_level: String,
    /// Day-ahead source.
    pub entsoe: EntsoeSection,
    /// Retail source.
    pub octopus: OctopusSection,
    /// HTTP client.
    pub client: ClientSection,
    /// Derived series.
    pub derive: DeriveSection,
    /// Presentation.
    pub display: DisplaySection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            entsoe: EntsoeSection::default(),
            octopus: OctopusSection::default(),
            client: ClientSection::default(),
            derive: DeriveSection::default(),
            display: DisplaySection::default(),
        }
    }
}

/// `[entsoe]` section.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntsoeSection {
    /// Security token for the transparency platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Bidding zone code or EIC.
    pub zone: String,
}

impl Default for EntsoeSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: ENTSOE_BASE_URL.to_string(),
            zone: DEFAULT_ZONE.to_string(),
        }
    }
}

impl std::fmt::Debug for EntsoeSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntsoeSection")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("base_url", &self.base_url)
            .field("zone", &self.zone)
            .finish()
    }
}

/// `[octopus]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OctopusSection {
    /// API base URL.
    pub base_url: String,
    /// Product code.
    pub product_code: String,
    /// Tariff code.
    pub tariff_code: String,
    /// IANA time zone of the tariff's market.
    pub local_timezone: String,
    /// Drop rates outside the requested local day.
    pub filter_to_day: bool,
}

impl Default for OctopusSection {
    fn default() -> Self {
        Self {
            base_url: OCTOPUS_BASE_URL.to_string(),
            product_code: DEFAULT_PRODUCT_CODE.to_string(),
            tariff_code: DEFAULT_TARIFF_CODE.to_string(),
            local_timezone: "Europe/London".to_string(),
            filter_to_day: true,
        }
    }
}

/// `[client]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSection {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// `[derive]` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeriveSection {
    /// Flat overhead added to the day-ahead price to simulate a retail price.
    pub overhead_cents_per_kwh: f64,
    /// How series are paired for deltas.
    pub align: AlignMode,
    /// What a delta does with unpaired points.
    pub missing: MissingPolicy,
}

impl Default for DeriveSection {
    fn default() -> Self {
        Self {
            overhead_cents_per_kwh: DEFAULT_OVERHEAD_CENTS_PER_KWH,
            align: AlignMode::default(),
            missing: MissingPolicy::default(),
        }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    /// IANA time zone for chart times. The machine's zone when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Masks all but the last four characters of a secret.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

fn parse_tz(key: &'static str, name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("unknown time zone '{name}'"),
    })
}

impl Config {
    /// Returns the default config file location.
    ///
    /// - Linux: `~/.config/spotwatt/config.toml`
    /// - macOS: `~/Library/Application Support/spotwatt/config.toml`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\spotwatt\config\config.toml`
    ///
    /// Falls back to `~/.spotwatt/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "spotwatt")
            .map_or_else(dirs_fallback, |dirs| dirs.config_dir().to_path_buf())
            .join("config.toml")
    }

    /// Loads configuration from `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if a value is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Applies `ENTSOE_API_KEY` and `SPOTWATT_ZONE` from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = get(API_KEY_ENV) {
            self.entsoe.api_key = Some(key);
        }
        if let Some(zone) = get(ZONE_ENV) {
            self.entsoe.zone = zone;
        }
        self
    }

    /// Checks value ranges, the log level and time zone names.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::Invalid {
                key: "log_level",
                reason: format!(
                    "unknown level '{}', expected off, error, warn, info, debug or trace",
                    self.log_level
                ),
            });
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "client.timeout_secs",
                reason: "must be positive".to_string(),
            });
        }
        if self.client.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "client.connect_timeout_secs",
                reason: "must be positive".to_string(),
            });
        }
        if !self.derive.overhead_cents_per_kwh.is_finite() {
            return Err(ConfigError::Invalid {
                key: "derive.overhead_cents_per_kwh",
                reason: "must be a finite number".to_string(),
            });
        }
        parse_tz("octopus.local_timezone", &self.octopus.local_timezone)?;
        self.display_zone()?;
        Ok(())
    }

    /// Returns a copy safe to print, with the API key masked.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        masked.entsoe.api_key = self.entsoe.api_key.as_deref().map(mask_secret);
        masked
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// HTTP client settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.client.timeout_secs),
            connect_timeout: Duration::from_secs(self.client.connect_timeout_secs),
            ..ClientConfig::default()
        }
    }

    /// Day-ahead source settings, resolving the zone against `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`SpotwattError::UnknownZone`] if the zone is not registered.
    pub fn entsoe_config(&self, registry: &ZoneRegistry) -> Result<EntsoeConfig, SpotwattError> {
        let zone = registry
            .get(&self.entsoe.zone)
            .ok_or_else(|| SpotwattError::UnknownZone(self.entsoe.zone.clone()))?;
        Ok(EntsoeConfig {
            api_key: self.entsoe.api_key.clone(),
            base_url: self.entsoe.base_url.clone(),
            zone: zone.clone(),
        })
    }

    /// Retail source settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the local time zone is unknown.
    pub fn octopus_config(&self) -> Result<OctopusConfig, ConfigError> {
        Ok(OctopusConfig {
            base_url: self.octopus.base_url.clone(),
            product_code: self.octopus.product_code.clone(),
            tariff_code: self.octopus.tariff_code.clone(),
            local_timezone: parse_tz("octopus.local_timezone", &self.octopus.local_timezone)?,
            filter_to_day: self.octopus.filter_to_day,
        })
    }

    /// Time zone chart rows are rendered in.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured time zone is unknown.
    pub fn display_zone(&self) -> Result<DisplayZone, ConfigError> {
        self.display
            .timezone
            .as_deref()
            .map_or(Ok(DisplayZone::Local), |name| {
                parse_tz("display.timezone", name).map(DisplayZone::Named)
            })
    }
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".spotwatt")
}
