use geo::Coord;

/// a closed half-plane `a*x + b*y <= c`.
#[derive(Clone, Copy, Debug)]
pub struct HalfPlane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl HalfPlane {
    /// the side of the perpendicular bisector of `site` and `other` that is closer to `site`.
    pub fn closer_to(site: Coord<f64>, other: Coord<f64>) -> HalfPlane {
        HalfPlane {
            a: 2.0 * (other.x - site.x),
            b: 2.0 * (other.y - site.y),
            c: (other.x * other.x + other.y * other.y) - (site.x * site.x + site.y * site.y),
        }
    }

    /// signed distance-like value, negative inside
    fn eval(&self, p: &Coord<f64>) -> f64 {
        self.a * p.x + self.b * p.y - self.c
    }

    /// clips a convex ring (open, without a repeated closing coordinate) to this half-plane.
    pub fn clip_convex(&self, ring: &[Coord<f64>]) -> Vec<Coord<f64>> {
        let mut out = Vec::with_capacity(ring.len() + 1);
        if ring.is_empty() {
            return out;
        }
        for (idx, current) in ring.iter().enumerate() {
            let next = &ring[(idx + 1) % ring.len()];
            let fc = self.eval(current);
            let fn_ = self.eval(next);
            if fc <= 0.0 {
                out.push(*current);
            }
            if (fc < 0.0 && fn_ > 0.0) || (fc > 0.0 && fn_ < 0.0) {
                let t = fc / (fc - fn_);
                out.push(Coord {
                    x: current.x + t * (next.x - current.x),
                    y: current.y + t * (next.y - current.y),
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::HalfPlane;
    use geo::{Coord, LineString, Polygon, Area};

    fn unit_square() -> Vec<Coord<f64>> {
        vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 1.0 },
        ]
    }

    #[test]
    fn test_bisector_halves_square() {
        let plane = HalfPlane::closer_to(Coord { x: 0.0, y: 0.5 }, Coord { x: 1.0, y: 0.5 });
        let clipped = plane.clip_convex(&unit_square());
        let polygon = Polygon::new(LineString::from(clipped), vec![]);
        assert!((polygon.unsigned_area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_plane_outside_ring_removes_everything() {
        let plane = HalfPlane::closer_to(Coord { x: 10.0, y: 0.0 }, Coord { x: 2.0, y: 0.0 });
        assert!(plane.clip_convex(&unit_square()).is_empty());
    }

    #[test]
    fn test_plane_containing_ring_keeps_everything() {
        let plane = HalfPlane::closer_to(Coord { x: 0.5, y: 0.5 }, Coord { x: 10.0, y: 0.5 });
        assert_eq!(plane.clip_convex(&unit_square()), unit_square());
    }
}
