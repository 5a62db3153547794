use std::collections::BTreeMap;

use geo::{BoundingRect, Coord, LineString, MultiPolygon, Point, Polygon, Rect};
use geojson::{FeatureCollection, GeoJson};
use itertools::Itertools;
use rayon::prelude::*;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};
use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation};

use super::half_plane::HalfPlane;
use super::{diagram_envelope, VoronoiCell};
use crate::algorithm::ring::ring_ops;
use crate::model::{GeometryError, Origin};
use crate::util::geo_utils;

pub type CellEnvelope = GeomWithData<Rectangle<(f64, f64)>, usize>;

/// voronoi tessellation of a set of origins, bounded by a finite envelope and optionally
/// clipped by a boundary. cells are indexed by an rtree over their bounding boxes.
pub struct VoronoiDiagram {
    pub cells: Vec<VoronoiCell>,
    pub envelope: Rect<f64>,
    rtree: RTree<CellEnvelope>,
}

/// a distinct generator coordinate and the origins that share it
struct Site<'a> {
    coord: Coord<f64>,
    origins: Vec<&'a Origin>,
}

/// triangulation vertex pointing back at its site
struct SiteVertex {
    position: Point2<f64>,
    site: usize,
}

impl HasPosition for SiteVertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// what the triangulation says about one site's voronoi face
struct FaceOutline {
    /// circumcenters around the face, none when the face is unbounded
    vertices: Option<Vec<Coord<f64>>>,
    /// delaunay neighbors, the only sites whose bisectors bound the face
    neighbors: Vec<usize>,
}

impl VoronoiDiagram {
    /// builds the diagram.
    ///
    /// # Arguments
    ///
    /// * `origins` - the generating points. duplicates share one cell.
    /// * `clip` - resolved clip polygon, if any
    /// * `extents` - additional rectangles the envelope must cover, such as the bounds
    ///   of the records that will be partitioned
    ///
    /// # Returns
    ///
    /// * the diagram with one cell per distinct coordinate, ordered by cell id
    pub fn build(
        origins: &[Origin],
        clip: Option<&MultiPolygon<f64>>,
        extents: &[Rect<f64>],
    ) -> Result<VoronoiDiagram, GeometryError> {
        if origins.is_empty() {
            return Err(GeometryError::VoronoiConstruction(String::from(
                "at least one point is required",
            )));
        }
        if let Some(o) = origins
            .iter()
            .find(|o| !o.x().is_finite() || !o.y().is_finite())
        {
            return Err(GeometryError::VoronoiConstruction(format!(
                "point {} has non-finite coordinates",
                o.point_id
            )));
        }

        let sites = group_sites(origins);
        let points = sites.iter().map(|s| Point(s.coord)).collect_vec();
        let mut all_extents = extents.to_vec();
        if let Some(clip_rect) = clip.and_then(|c| c.bounding_rect()) {
            all_extents.push(clip_rect);
        }
        let envelope = diagram_envelope(&points, &all_extents).ok_or_else(|| {
            GeometryError::VoronoiConstruction(String::from("unable to compute diagram extent"))
        })?;

        log::debug!(
            "building voronoi diagram with {} cells for {} points",
            sites.len(),
            origins.len()
        );
        let outlines = face_outlines(&sites)?;
        let cells = sites
            .par_iter()
            .zip(outlines.par_iter())
            .map(|(site, outline)| build_cell(site, outline, &sites, &envelope, clip))
            .collect::<Result<Vec<_>, _>>()?;

        let rtree_data = cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| {
                geo_utils::get_bbox_as_envelope(&cell.geometry).map(|env| {
                    GeomWithData::new(Rectangle::from_aabb(env), idx)
                })
            })
            .collect_vec();
        let rtree = RTree::bulk_load(rtree_data);
        Ok(VoronoiDiagram {
            cells,
            envelope,
            rtree,
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// cells whose bounding boxes intersect the envelope.
    pub fn candidates<'a>(
        &'a self,
        envelope: &AABB<(f64, f64)>,
    ) -> impl Iterator<Item = &'a VoronoiCell> + 'a {
        self.rtree
            .locate_in_envelope_intersecting(envelope)
            .map(|obj| obj.data)
            .sorted()
            .filter_map(|idx| self.cells.get(idx))
    }

    pub fn to_geojson_string(&self) -> String {
        let fc = FeatureCollection {
            bbox: None,
            features: self.cells.iter().map(VoronoiCell::to_feature).collect_vec(),
            foreign_members: None,
        };
        GeoJson::from(fc).to_string()
    }
}

/// groups origins by exact coordinate, ordered by the smallest point id of each group.
fn group_sites(origins: &[Origin]) -> Vec<Site<'_>> {
    let mut by_coord: BTreeMap<(u64, u64), Vec<&Origin>> = BTreeMap::new();
    for origin in origins.iter() {
        // normalizes -0.0 so it shares a cell with 0.0
        let key = ((origin.x() + 0.0).to_bits(), (origin.y() + 0.0).to_bits());
        by_coord.entry(key).or_default().push(origin);
    }
    by_coord
        .into_values()
        .map(|mut group| {
            group.sort_by_key(|o| o.point_id);
            Site {
                coord: group[0].point.0,
                origins: group,
            }
        })
        .sorted_by_key(|s| s.origins[0].point_id)
        .collect_vec()
}

/// triangulates the sites and reads each voronoi face off the triangulation. outlines
/// are returned in site order.
fn face_outlines(sites: &[Site]) -> Result<Vec<FaceOutline>, GeometryError> {
    let vertices = sites
        .iter()
        .enumerate()
        .map(|(site, s)| SiteVertex {
            position: Point2::new(s.coord.x, s.coord.y),
            site,
        })
        .collect_vec();
    let triangulation = DelaunayTriangulation::<SiteVertex>::bulk_load(vertices).map_err(|e| {
        GeometryError::VoronoiConstruction(format!("failure triangulating points: {e:?}"))
    })?;

    let mut outlines = sites
        .iter()
        .map(|_| FaceOutline {
            vertices: None,
            neighbors: vec![],
        })
        .collect_vec();
    for face in triangulation.voronoi_faces() {
        let vertex = face.as_delaunay_vertex();
        let site = vertex.data().site;
        let vertices = face
            .adjacent_edges()
            .map(|edge| {
                edge.from()
                    .position()
                    .map(|p| Coord { x: p.x, y: p.y })
            })
            .collect::<Option<Vec<_>>>()
            .filter(|ring| ring.len() >= 3);
        let neighbors = vertex.out_edges().map(|e| e.to().data().site).collect_vec();
        if let Some(outline) = outlines.get_mut(site) {
            *outline = FaceOutline {
                vertices,
                neighbors,
            };
        }
    }
    Ok(outlines)
}

fn build_cell(
    site: &Site,
    outline: &FaceOutline,
    sites: &[Site],
    envelope: &Rect<f64>,
    clip: Option<&MultiPolygon<f64>>,
) -> Result<VoronoiCell, GeometryError> {
    let cell_id = site.origins[0].point_id;
    let (min, max) = (envelope.min(), envelope.max());
    let corners = vec![
        Coord { x: min.x, y: min.y },
        Coord { x: max.x, y: min.y },
        Coord { x: max.x, y: max.y },
        Coord { x: min.x, y: max.y },
    ];
    let cell = match &outline.vertices {
        Some(face) => {
            // bounded face, circumcenters may still fall outside the envelope
            let face = MultiPolygon::new(vec![Polygon::new(LineString::from(face.clone()), vec![])]);
            let bounds = MultiPolygon::new(vec![Polygon::new(LineString::from(corners), vec![])]);
            geo_utils::intersection(&face, &bounds, &format!("voronoi cell {cell_id} envelope"))?
        }
        None => {
            let mut ring = corners;
            for neighbor in outline.neighbors.iter().filter_map(|idx| sites.get(*idx)) {
                ring = HalfPlane::closer_to(site.coord, neighbor.coord).clip_convex(&ring);
                if ring.len() < 3 {
                    return Err(GeometryError::VoronoiConstruction(format!(
                        "cell {cell_id} collapsed while clipping against point {}",
                        neighbor.origins[0].point_id
                    )));
                }
            }
            MultiPolygon::new(vec![Polygon::new(LineString::from(ring), vec![])])
        }
    };
    let geometry = match clip {
        Some(boundary) => {
            geo_utils::intersection(&cell, boundary, &format!("voronoi cell {cell_id} clip"))?
        }
        None => cell,
    };
    Ok(VoronoiCell {
        cell_id,
        generator: Point(site.coord),
        point_ids: site.origins.iter().map(|o| o.point_id).collect_vec(),
        group_key: ring_ops::shared_group_key(site.origins.iter().map(|o| &o.group_key)),
        geometry,
    })
}
