use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// an input location that isochrones are computed for.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Origin {
    /// position of this point in the run's input collection
    pub point_id: usize,
    /// WGS84 longitude/latitude
    pub point: Point<f64>,
    /// optional attribute copied onto every feature derived from this point
    pub group_key: Option<Value>,
}

impl Origin {
    pub fn new(point_id: usize, x: f64, y: f64, group_key: Option<Value>) -> Origin {
        Origin {
            point_id,
            point: Point::new(x, y),
            group_key,
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }
}
