mod clip_config;
mod isozone_config;
mod mode_config;

pub use clip_config::{ClipConfig, ClipSource};
pub use isozone_config::{InputConfig, IsozoneConfig, RunConfig};
pub use mode_config::ModeConfig;
