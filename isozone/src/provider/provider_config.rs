use serde::{Deserialize, Serialize};

use super::ign::{IgnConfig, IgnProvider};
use super::ors::{OrsConfig, OrsProvider};
use super::IsochroneProvider;
use crate::error::IsochroneError;
use crate::http::RetryingHttpClient;

/// the routing service used for a run.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ProviderConfig {
    Ign(IgnConfig),
    Ors(OrsConfig),
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), IsochroneError> {
        match self {
            ProviderConfig::Ign(_) => Ok(()),
            ProviderConfig::Ors(c) => c.validate(),
        }
    }

    pub fn build(
        &self,
        client: RetryingHttpClient,
    ) -> Result<Box<dyn IsochroneProvider>, IsochroneError> {
        self.validate()?;
        match self {
            ProviderConfig::Ign(c) => Ok(Box::new(IgnProvider::new(c.clone(), client))),
            ProviderConfig::Ors(c) => Ok(Box::new(OrsProvider::new(c.clone(), client))),
        }
    }
}
