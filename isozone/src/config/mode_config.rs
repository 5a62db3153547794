use isozone_core::model::Origin;
use serde::{Deserialize, Serialize};

use super::ClipConfig;
use crate::error::IsochroneError;
use crate::pipeline::ProcessingMode;

/// processing mode as written in a run configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ModeConfig {
    #[default]
    Dissolved,
    Raw,
    VoronoiPartitioned {
        #[serde(default)]
        clip: Option<ClipConfig>,
    },
}

impl ModeConfig {
    /// resolves any clip boundary, reading files and deriving geometries from the points.
    pub fn build(&self, origins: &[Origin]) -> Result<ProcessingMode, IsochroneError> {
        match self {
            ModeConfig::Dissolved => Ok(ProcessingMode::Dissolved),
            ModeConfig::Raw => Ok(ProcessingMode::Raw),
            ModeConfig::VoronoiPartitioned { clip } => {
                let clip = clip.as_ref().map(|c| c.build(origins)).transpose()?;
                Ok(ProcessingMode::VoronoiPartitioned { clip })
            }
        }
    }
}
