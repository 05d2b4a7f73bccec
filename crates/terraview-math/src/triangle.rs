//! Terrain vertices and triangles.
//!
//! A [`TerrainTriangle`] owns its three vertices by value. The face normal and
//! centroid are derived once at construction and never recomputed, so vertex
//! positions must not change after a triangle is built.

use glam::DVec3;

use crate::color::Rgb;

/// Triangles whose area falls below this value (world units squared) are
/// considered degenerate and are never inserted into a render list.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

/// A single mesh vertex with the geographic coordinate it was sampled from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainVertex {
    /// Position in the local east-north-up frame.
    pub position: DVec3,
    /// Lighting normal (unit length).
    pub normal: DVec3,
    pub color: Rgb,
    /// Source latitude in degrees.
    pub lat: f64,
    /// Source longitude in degrees.
    pub lon: f64,
}

impl TerrainVertex {
    pub fn new(position: DVec3, normal: DVec3, color: Rgb, lat: f64, lon: f64) -> Self {
        Self {
            position,
            normal,
            color,
            lat,
            lon,
        }
    }
}

/// A triangle with a derived face normal and centroid.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainTriangle {
    pub vertices: [TerrainVertex; 3],
    /// Unit face normal, or zero for a degenerate triangle.
    pub normal: DVec3,
    pub centroid: DVec3,
}

impl TerrainTriangle {
    pub fn new(vertices: [TerrainVertex; 3]) -> Self {
        let [a, b, c] = vertices.map(|v| v.position);
        let cross = (b - a).cross(c - a);
        let normal = cross.normalize_or_zero();
        let centroid = (a + b + c) / 3.0;
        Self {
            vertices,
            normal,
            centroid,
        }
    }

    /// Surface area in world units squared.
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.positions();
        (b - a).cross(c - a).length() * 0.5
    }

    pub fn is_degenerate(&self) -> bool {
        self.area() < DEGENERATE_AREA_EPSILON || self.normal == DVec3::ZERO
    }

    pub fn positions(&self) -> [DVec3; 3] {
        self.vertices.map(|v| v.position)
    }

    /// Replace all three vertex colors with one flat color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        for v in &mut self.vertices {
            v.color = color;
        }
        self
    }

    pub fn mean_color(&self) -> Rgb {
        let [a, b, c] = self.vertices.map(|v| v.color);
        Rgb::mean3(a, b, c)
    }

    /// Normalized mean of the vertex normals, or the face normal when the
    /// vertex normals cancel out.
    pub fn lighting_normal(&self) -> DVec3 {
        let sum: DVec3 = self.vertices.iter().map(|v| v.normal).sum();
        let n = sum.normalize_or_zero();
        if n == DVec3::ZERO { self.normal } else { n }
    }

    /// Mean of the source coordinates, with longitudes unwrapped around the
    /// first vertex so a triangle straddling the antimeridian averages correctly.
    pub fn centroid_lat_lon(&self) -> (f64, f64) {
        let lon0 = self.vertices[0].lon;
        let mut lat = 0.0;
        let mut lon = 0.0;
        for v in &self.vertices {
            lat += v.lat;
            let mut d = v.lon - lon0;
            if d > 180.0 {
                d -= 360.0;
            } else if d < -180.0 {
                d += 360.0;
            }
            lon += lon0 + d;
        }
        (lat / 3.0, lon / 3.0)
    }

    /// Translate every vertex by `offset`, keeping the normal.
    pub fn translated(&self, offset: DVec3) -> Self {
        let mut out = self.clone();
        for v in &mut out.vertices {
            v.position += offset;
        }
        out.centroid += offset;
        out
    }
}

/// An owned list of non-degenerate triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleList {
    triangles: Vec<TerrainTriangle>,
}

impl TriangleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    /// Insert a triangle unless it is degenerate. Returns whether it was kept.
    pub fn push_if_valid(&mut self, triangle: TerrainTriangle) -> bool {
        if triangle.is_degenerate() {
            return false;
        }
        self.triangles.push(triangle);
        true
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TerrainTriangle> {
        self.triangles.iter()
    }

    pub fn as_slice(&self) -> &[TerrainTriangle] {
        &self.triangles
    }
}

impl<'a> IntoIterator for &'a TriangleList {
    type Item = &'a TerrainTriangle;
    type IntoIter = std::slice::Iter<'a, TerrainTriangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
