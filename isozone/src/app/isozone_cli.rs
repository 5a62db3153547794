use clap::{Parser, Subcommand};
use isozone_core::algorithm::voronoi::ClipMode;

use super::run_ops;
use crate::error::IsochroneError;

/// collects isochrones from a routing service and turns them into rings
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct IsozoneCliArguments {
    /// select the isozone operation to run
    #[command(subcommand)]
    pub op: IsozoneOperation,
}

#[derive(Debug, Clone, Subcommand)]
pub enum IsozoneOperation {
    /// requests isochrones for every point and cost value, then writes the
    /// post-processed rings as GeoJSON.
    Run {
        /// TOML or JSON run configuration
        #[arg(short, long)]
        config_file: String,
        /// points file, overrides input.points_file
        #[arg(short, long)]
        points_file: Option<String>,
        /// output GeoJSON file, overrides run.output_file
        #[arg(short, long)]
        output_file: Option<String>,
    },
    /// post-processes the raw output of a previous run using the mode and cost
    /// values of a run configuration. no provider is called.
    Postprocess {
        #[arg(short, long)]
        config_file: String,
        /// GeoJSON written by a run in raw mode
        #[arg(short, long)]
        raw_file: String,
        #[arg(short, long)]
        output_file: String,
    },
    /// writes the voronoi cells of a points file as GeoJSON.
    Voronoi {
        #[arg(short, long)]
        points_file: String,
        #[arg(short, long)]
        output_file: String,
        /// GeoJSON or WKT polygon applied to every cell
        #[arg(long)]
        clip_file: Option<String>,
        /// polygon, bounding_box or convex_hull. without a clip file, the boundary
        /// is derived from the points.
        #[arg(long)]
        clip_mode: Option<ClipMode>,
        /// point property copied onto each cell
        #[arg(long)]
        group_key_field: Option<String>,
    },
    /// prints a starting run configuration in TOML.
    Template,
}

impl IsozoneOperation {
    pub fn run(&self) -> Result<(), IsochroneError> {
        match self {
            IsozoneOperation::Run {
                config_file,
                points_file,
                output_file,
            } => run_ops::run_isochrones(
                config_file,
                points_file.as_deref(),
                output_file.as_deref(),
            ),
            IsozoneOperation::Postprocess {
                config_file,
                raw_file,
                output_file,
            } => run_ops::run_postprocess(config_file, raw_file, output_file),
            IsozoneOperation::Voronoi {
                points_file,
                output_file,
                clip_file,
                clip_mode,
                group_key_field,
            } => run_ops::run_voronoi(
                points_file,
                output_file,
                clip_file.as_deref(),
                *clip_mode,
                group_key_field.as_deref(),
            ),
            IsozoneOperation::Template => {
                let template = crate::config::IsozoneConfig::template()?;
                println!("{}", template.to_toml_string()?);
                Ok(())
            }
        }
    }
}
