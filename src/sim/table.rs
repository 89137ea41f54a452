//! Table geometry: rail boundaries and pockets
//!
//! Rails are infinite planes with a normal pointing into the playing area,
//! built once from the endpoints of each cushion segment. Pockets are
//! capture points on the table plane.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{flatten, planar};

/// A rail lifted into a plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Unit normal, pointing toward the playing area
    pub normal: Vec3,
    /// Any point on the plane
    pub point: Vec3,
}

impl Boundary {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            point,
        }
    }

    /// Plane through a cushion segment a->b
    ///
    /// The normal is the table-plane perpendicular obtained by turning the
    /// segment direction a quarter turn, so segments must be wound with the
    /// playing area on the side the normal points to.
    pub fn from_segment(a: Vec3, b: Vec3) -> Self {
        let dir = flatten(b - a).normalize_or_zero();
        Self {
            normal: Vec3::new(-dir.z, 0.0, dir.x),
            point: (a + b) * 0.5,
        }
    }

    /// Signed distance of a point from the plane (positive on the play side)
    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }
}

/// Named cushion segment as handed over by the table asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailSegment {
    pub name: String,
    pub a: Vec3,
    pub b: Vec3,
}

impl RailSegment {
    fn new(name: &str, a: [f32; 3], b: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            a: Vec3::from_array(a),
            b: Vec3::from_array(b),
        }
    }
}

/// Pocket capture point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    /// Centre on the table plane (x, z)
    pub center: Vec2,
}

impl Pocket {
    pub fn new(x: f32, z: f32) -> Self {
        Self {
            center: Vec2::new(x, z),
        }
    }

    /// World position of the pocket centre at the given height
    pub fn world(&self, y: f32) -> Vec3 {
        Vec3::new(self.center.x, y, self.center.y)
    }

    /// Squared horizontal distance from a world position
    #[inline]
    pub fn distance_squared(&self, p: Vec3) -> f32 {
        planar(p).distance_squared(self.center)
    }
}

/// Rail boundaries plus pockets; the empty table is valid and inert
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub boundaries: Vec<Boundary>,
    pub pockets: Vec<Pocket>,
}

/// Table geometry in the form an asset loader provides it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableGeometry {
    pub rails: Vec<RailSegment>,
    pub pockets: Vec<Pocket>,
}

impl TableGeometry {
    /// Cushion endpoints and pocket centres of the standard table
    pub fn standard() -> Self {
        Self {
            rails: vec![
                RailSegment::new("NW", [-78.843, 50.616, -39.666], [-3.414, 50.611, -39.64]),
                RailSegment::new("SW", [-3.4422, 50.611, 39.638], [-78.87, 50.616, 39.611]),
                RailSegment::new("E", [83.027, 50.616, -35.435], [83.051, 50.616, 35.377]),
                RailSegment::new("W", [-83.041, 50.616, 35.435], [-83.066, 50.616, -35.377]),
                RailSegment::new("NE", [3.4145, 50.611, -39.64], [78.843, 50.616, -39.666]),
                RailSegment::new("SE", [78.87, 50.616, 39.611], [3.4422, 50.611, 39.638]),
            ],
            pockets: vec![
                Pocket::new(-83.5, -40.0),
                Pocket::new(0.0, -41.0),
                Pocket::new(83.5, -40.0),
                Pocket::new(-83.5, 40.0),
                Pocket::new(0.0, 41.0),
                Pocket::new(83.5, 40.0),
            ],
        }
    }

    /// Lift every rail into a plane
    pub fn build(&self) -> Table {
        let table = Table {
            boundaries: self
                .rails
                .iter()
                .map(|r| Boundary::from_segment(r.a, r.b))
                .collect(),
            pockets: self.pockets.clone(),
        };
        log::info!(
            "Table built: {} boundaries, {} pockets",
            table.boundaries.len(),
            table.pockets.len()
        );
        table
    }
}

impl Table {
    /// The standard six-rail, six-pocket table
    pub fn standard() -> Self {
        TableGeometry::standard().build()
    }

    /// Build from loader-provided geometry in JSON form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let geometry: TableGeometry = serde_json::from_str(json)?;
        Ok(geometry.build())
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty() && self.pockets.is_empty()
    }

    /// First pocket whose capture radius contains the position
    pub fn pocket_at(&self, p: Vec3, capture_radius: f32) -> Option<&Pocket> {
        let radius_sq = capture_radius * capture_radius;
        self.pockets.iter().find(|pocket| pocket.distance_squared(p) < radius_sq)
    }
}
