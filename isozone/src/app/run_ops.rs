use std::collections::BTreeMap;
use std::sync::Arc;

use isozone_core::algorithm::voronoi::{ClipBoundary, ClipMode, VoronoiDiagram};
use isozone_core::model::{IsochroneRecord, Origin, RingFeatureCollection};
use itertools::Itertools;

use crate::collector::IsochroneCollector;
use crate::config::IsozoneConfig;
use crate::error::IsochroneError;
use crate::http::{RateLimiter, RetryingHttpClient, ThreadSleeper};
use crate::input::{clip_reader, points_reader};
use crate::pipeline;

/// runs a full collection against the configured provider.
///
/// # Arguments
///
/// * `config_file` - run configuration
/// * `points_file` - replaces `input.points_file` when provided
/// * `output_file` - replaces `run.output_file` when provided
pub fn run_isochrones(
    config_file: &str,
    points_file: Option<&str>,
    output_file: Option<&str>,
) -> Result<(), IsochroneError> {
    log::info!("reading isozone configuration from {config_file}");
    let conf = IsozoneConfig::from_file(config_file)?;
    let points_file = points_file
        .map(String::from)
        .or_else(|| conf.input.points_file.clone())
        .ok_or_else(|| {
            IsochroneError::Configuration(String::from(
                "no points file given on the command line or in input.points_file",
            ))
        })?;
    let output_file = output_file
        .map(String::from)
        .or_else(|| conf.run.output_file.clone())
        .ok_or_else(|| {
            IsochroneError::Configuration(String::from(
                "no output file given on the command line or in run.output_file",
            ))
        })?;

    let origins = points_reader::read_points(&points_file, conf.input.group_key_field.as_deref())?;
    let mode = conf.run.mode.build(&origins)?;
    let client = RetryingHttpClient::from_config(&conf.http).map_err(|e| {
        IsochroneError::Configuration(format!("failure building http client: {e}"))
    })?;
    let provider = conf.provider.build(client)?;
    let rate_limiter = RateLimiter::new(conf.rate_limit.clone(), Arc::new(ThreadSleeper));
    let mut collector = IsochroneCollector::new(provider.as_ref(), rate_limiter);

    let result = pipeline::run(&origins, &conf.run.cost_values, &mode, &mut collector)?;
    write_output(&result, &output_file)
}

/// re-processes the raw output of a previous run. points come from the configuration
/// when it names a points file, otherwise they are rebuilt from the raw features.
pub fn run_postprocess(
    config_file: &str,
    raw_file: &str,
    output_file: &str,
) -> Result<(), IsochroneError> {
    log::info!("reading isozone configuration from {config_file}");
    let conf = IsozoneConfig::from_file(config_file)?;
    log::info!("reading raw isochrones from {raw_file}");
    let text = std::fs::read_to_string(raw_file).map_err(|e| IsochroneError::io(raw_file, e))?;
    let records = RingFeatureCollection::from_geojson_str(&text)?.to_records()?;

    let origins = match &conf.input.points_file {
        Some(points_file) => {
            points_reader::read_points(points_file, conf.input.group_key_field.as_deref())?
        }
        None => origins_from_records(&records),
    };
    if origins.is_empty() {
        return Err(IsochroneError::InvalidInput(format!(
            "{raw_file} contains no isochrones"
        )));
    }
    let mode = conf.run.mode.build(&origins)?;
    let result = pipeline::process(&records, &origins, &conf.run.cost_values, &mode)?;
    write_output(&result, output_file)
}

/// writes the voronoi tessellation of a points file.
pub fn run_voronoi(
    points_file: &str,
    output_file: &str,
    clip_file: Option<&str>,
    clip_mode: Option<ClipMode>,
    group_key_field: Option<&str>,
) -> Result<(), IsochroneError> {
    let origins = points_reader::read_points(points_file, group_key_field)?;
    let clip = match (clip_file, clip_mode) {
        (Some(f), mode) => Some(ClipBoundary::new(
            clip_reader::read_clip_geometry(f)?,
            mode.unwrap_or_default(),
        )),
        (None, Some(mode)) => {
            let points = origins.iter().map(|o| o.point).collect_vec();
            Some(ClipBoundary::from_points(&points, mode)?)
        }
        (None, None) => None,
    };
    let clip_geometry = clip.as_ref().map(|c| c.resolve()).transpose()?;
    let diagram = VoronoiDiagram::build(&origins, clip_geometry.as_ref(), &[])?;
    log::info!(
        "built {} voronoi cells from {} points",
        diagram.len(),
        origins.len()
    );
    write_string(&diagram.to_geojson_string(), output_file)
}

/// one origin per point id found in the records, ordered by point id.
pub fn origins_from_records(records: &[IsochroneRecord]) -> Vec<Origin> {
    records
        .iter()
        .map(|r| (r.point_id, r.to_origin()))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect_vec()
}

fn write_output(result: &RingFeatureCollection, output_file: &str) -> Result<(), IsochroneError> {
    log::info!("writing {} features to {output_file}", result.len());
    write_string(&result.to_geojson_string(), output_file)
}

fn write_string(contents: &str, output_file: &str) -> Result<(), IsochroneError> {
    std::fs::write(output_file, contents).map_err(|e| IsochroneError::io(output_file, e))?;
    eprintln!("finished.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};
    use isozone_core::model::{CostValue, RingFeature};
    use serde_json::{json, Map, Value};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("isozone-{}-{name}", std::process::id()))
    }

    fn square(cx: f64, cy: f64, half: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: cx - half, y: cy - half),
            (x: cx + half, y: cy - half),
            (x: cx + half, y: cy + half),
            (x: cx - half, y: cy + half),
        ]])
    }

    fn raw_records() -> Vec<IsochroneRecord> {
        let origins = vec![
            Origin::new(1, 4.0, 0.0, Some(json!("b"))),
            Origin::new(0, 0.0, 0.0, Some(json!("a"))),
        ];
        origins
            .iter()
            .flat_map(|o| {
                vec![
                    IsochroneRecord::new(o, CostValue(5), square(o.x(), o.y(), 1.0), Map::new()),
                    IsochroneRecord::new(o, CostValue(10), square(o.x(), o.y(), 1.5), Map::new()),
                ]
            })
            .collect_vec()
    }

    #[test]
    fn test_origins_from_records_deduplicated_and_sorted() {
        let origins = origins_from_records(&raw_records());
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0].point_id, 0);
        assert_eq!(origins[0].group_key, Some(json!("a")));
        assert_eq!(origins[1].point_id, 1);
        assert_eq!(origins[1].x(), 4.0);
    }

    #[test]
    fn test_postprocess_raw_file_into_voronoi_rings() {
        let raw = RingFeatureCollection::new(raw_records().iter().map(RingFeature::from).collect());
        let raw_file = temp_path("raw.geojson");
        let config_file = temp_path("postprocess.toml");
        let output_file = temp_path("rings.geojson");
        std::fs::write(&raw_file, raw.to_geojson_string()).expect("write raw");
        std::fs::write(
            &config_file,
            r#"
[run]
cost_values = [5, 10]

[run.mode]
type = "voronoi_partitioned"

[provider]
type = "ign"
"#,
        )
        .expect("write config");

        let result = run_postprocess(
            &config_file.to_string_lossy(),
            &raw_file.to_string_lossy(),
            &output_file.to_string_lossy(),
        );
        let written = std::fs::read_to_string(&output_file);
        for f in [&raw_file, &config_file, &output_file] {
            let _ = std::fs::remove_file(f);
        }
        result.expect("postprocess");
        let rings = RingFeatureCollection::from_geojson_str(&written.expect("output written"))
            .expect("valid output");
        assert_eq!(rings.len(), 4);
        assert!(rings.features.iter().all(|r| r.cell_id.is_some()));
    }

    #[test]
    fn test_voronoi_command_writes_cells() {
        let points_file = temp_path("points.geojson");
        let output_file = temp_path("cells.geojson");
        let points = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"zone": "x"}, "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}},
                {"type": "Feature", "properties": {"zone": "y"}, "geometry": {"type": "Point", "coordinates": [4.0, 0.0]}},
                {"type": "Feature", "properties": {"zone": "z"}, "geometry": {"type": "Point", "coordinates": [2.0, 3.0]}}
            ]
        });
        std::fs::write(&points_file, points.to_string()).expect("write points");
        let result = run_voronoi(
            &points_file.to_string_lossy(),
            &output_file.to_string_lossy(),
            None,
            Some(ClipMode::ConvexHull),
            Some("zone"),
        );
        let written = std::fs::read_to_string(&output_file);
        let _ = std::fs::remove_file(&points_file);
        let _ = std::fs::remove_file(&output_file);
        result.expect("voronoi");
        let fc: Value = serde_json::from_str(&written.expect("output written")).expect("json");
        let features = fc["features"].as_array().expect("features");
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["properties"]["cell_id"], json!(0));
        assert_eq!(features[0]["properties"]["group_key"], json!("x"));
    }

    #[test]
    fn test_run_without_points_file_is_a_configuration_error() {
        let config_file = temp_path("nopoints.toml");
        std::fs::write(
            &config_file,
            "[run]\ncost_values = [5]\noutput_file = \"out.geojson\"\n\n[provider]\ntype = \"ign\"\n",
        )
        .expect("write config");
        let result = run_isochrones(&config_file.to_string_lossy(), None, None);
        let _ = std::fs::remove_file(&config_file);
        assert!(matches!(result, Err(IsochroneError::Configuration(_))));
    }
}
