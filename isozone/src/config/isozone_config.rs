use std::path::Path;

use isozone_core::model::CostValues;
use serde::{Deserialize, Serialize};

use super::ModeConfig;
use crate::error::IsochroneError;
use crate::http::{HttpConfig, RateLimitConfig};
use crate::provider::ign::IgnConfig;
use crate::provider::ProviderConfig;

/// environment variables with this prefix override file values, with `__` separating
/// nested keys, e.g. `ISOZONE__PROVIDER__API_KEY`.
pub const ENV_PREFIX: &str = "ISOZONE";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct InputConfig {
    /// GeoJSON file of point features
    #[serde(default)]
    pub points_file: Option<String>,
    /// point property copied onto every output feature as `group_key`
    #[serde(default)]
    pub group_key_field: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub cost_values: CostValues,
    #[serde(default)]
    pub mode: ModeConfig,
    #[serde(default)]
    pub output_file: Option<String>,
}

/// a complete run configuration. built once and passed down immutably.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct IsozoneConfig {
    #[serde(default)]
    pub input: InputConfig,
    pub run: RunConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl IsozoneConfig {
    /// reads a .toml or .json run file and applies environment overrides.
    pub fn from_file(path: &str) -> Result<IsozoneConfig, IsochroneError> {
        if !(path.ends_with(".toml") || path.ends_with(".json")) {
            return Err(IsochroneError::Configuration(format!(
                "unsupported file type: {path}"
            )));
        }
        let config = config::Config::builder()
            .add_source(config::File::from(Path::new(path)))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| IsochroneError::Configuration(format!("failure reading {path}: {e}")))?;
        let conf: IsozoneConfig = config
            .try_deserialize()
            .map_err(|e| IsochroneError::Configuration(format!("failure decoding {path}: {e}")))?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn from_toml_str(s: &str) -> Result<IsozoneConfig, IsochroneError> {
        let conf: IsozoneConfig = toml::from_str(s)
            .map_err(|e| IsochroneError::Configuration(format!("failure decoding TOML: {e}")))?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<(), IsochroneError> {
        self.provider.validate()?;
        self.http
            .retry
            .validate()
            .map_err(IsochroneError::Configuration)?;
        self.rate_limit
            .validate()
            .map_err(IsochroneError::Configuration)?;
        if self.http.timeout_seconds == 0 {
            return Err(IsochroneError::Configuration(String::from(
                "http timeout_seconds must be positive",
            )));
        }
        Ok(())
    }

    /// a starting configuration for the IGN provider, written by `isozone template`.
    pub fn template() -> Result<IsozoneConfig, IsochroneError> {
        Ok(IsozoneConfig {
            input: InputConfig {
                points_file: Some(String::from("points.geojson")),
                group_key_field: None,
            },
            run: RunConfig {
                cost_values: CostValues::try_new(vec![5, 10, 15])?,
                mode: ModeConfig::Dissolved,
                output_file: Some(String::from("isochrones.geojson")),
            },
            provider: ProviderConfig::Ign(IgnConfig::default()),
            http: HttpConfig::default(),
            rate_limit: RateLimitConfig::default(),
        })
    }

    pub fn to_toml_string(&self) -> Result<String, IsochroneError> {
        toml::to_string_pretty(self)
            .map_err(|e| IsochroneError::Configuration(format!("failure encoding TOML: {e}")))
    }
}

impl TryFrom<&String> for IsozoneConfig {
    type Error = IsochroneError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        IsozoneConfig::from_file(f)
    }
}
