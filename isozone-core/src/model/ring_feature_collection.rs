use geojson::{FeatureCollection, GeoJson};
use itertools::Itertools;

use super::{GeometryError, IsochroneRecord, RingFeature};

/// the serialized result of a run, a GeoJSON feature collection in WGS84.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RingFeatureCollection {
    pub features: Vec<RingFeature>,
}

impl RingFeatureCollection {
    pub fn new(features: Vec<RingFeature>) -> RingFeatureCollection {
        RingFeatureCollection { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.features.iter().map(RingFeature::to_feature).collect_vec(),
            foreign_members: None,
        }
    }

    pub fn to_geojson_string(&self) -> String {
        GeoJson::from(self.to_geojson()).to_string()
    }

    pub fn from_geojson_str(s: &str) -> Result<RingFeatureCollection, GeometryError> {
        let geojson = s.parse::<GeoJson>().map_err(|e| {
            GeometryError::FeatureDecoding(format!("failure parsing GeoJSON: {e}"))
        })?;
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                let features = fc
                    .features
                    .iter()
                    .map(RingFeature::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RingFeatureCollection { features })
            }
            other => Err(GeometryError::FeatureDecoding(format!(
                "expected a FeatureCollection, found {}",
                geojson_type_name(&other)
            ))),
        }
    }

    /// reads raw isochrone features back into records.
    pub fn to_records(&self) -> Result<Vec<IsochroneRecord>, GeometryError> {
        self.features
            .iter()
            .map(IsochroneRecord::try_from)
            .collect::<Result<Vec<_>, _>>()
    }
}

fn geojson_type_name(geojson: &GeoJson) -> &'static str {
    match geojson {
        GeoJson::Geometry(_) => "Geometry",
        GeoJson::Feature(_) => "Feature",
        GeoJson::FeatureCollection(_) => "FeatureCollection",
    }
}
