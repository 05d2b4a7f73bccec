//! Equal-area grid construction and triangulation for every LOD tier.
//!
//! Each tier walks a square grid of kilometer offsets around the mesh anchor,
//! so every cell covers the same surface area regardless of latitude. Offsets
//! are converted back to lat/lon for sampling. Vertices live in a local
//! east-north-up frame in kilometers centered on the anchor, with the planet's
//! curvature dropping distant points below the tangent plane.

use glam::DVec3;
use terraview_coords::{EARTH_RADIUS_KM, GeoCoord, KM_PER_DEGREE, offset_to_geo};
use terraview_math::{TerrainTriangle, TerrainVertex, TriangleList};
use terraview_terrain::{ColorSource, ElevationSource};

use crate::classify::{CellClassifier, SurfaceKind};
use crate::tier::{LodConfig, LodTier, TierConfig};

/// One sampled grid point.
#[derive(Clone, Copy, Debug)]
pub struct GridPoint {
    pub geo: GeoCoord,
    pub east_km: f64,
    pub north_km: f64,
    /// Raw sampled elevation in meters.
    pub elevation_m: f64,
}

/// A `(resolution + 1)²` arena of grid points in row-major order.
///
/// Row `i` runs south to north, column `j` west to east.
#[derive(Clone, Debug)]
pub struct GridSamples {
    pub resolution: usize,
    /// Cell edge length in kilometers.
    pub cell_km: f64,
    pub points: Vec<GridPoint>,
}

impl GridSamples {
    pub fn side(&self) -> usize {
        self.resolution + 1
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.side() + j
    }

    pub fn at(&self, i: usize, j: usize) -> &GridPoint {
        &self.points[self.index(i, j)]
    }
}

/// Land and sea triangles for one tier.
#[derive(Clone, Debug, PartialEq)]
pub struct TierMesh {
    pub tier: LodTier,
    pub land: TriangleList,
    pub sea: TriangleList,
}

impl TierMesh {
    pub fn empty(tier: LodTier) -> Self {
        Self {
            tier,
            land: TriangleList::new(),
            sea: TriangleList::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.land.len() + self.sea.len()
    }
}

/// All five tiers built for one anchor position.
#[derive(Clone, Debug, PartialEq)]
pub struct TierSet {
    /// The position the local frame is centered on.
    pub anchor: GeoCoord,
    /// Altitude the tier radii were scaled for, in meters.
    pub altitude_m: f64,
    /// Tier radius multiplier applied at build time.
    pub radius_scale: f64,
    /// [`LodConfig::fingerprint`] of the configuration that built this set.
    pub fingerprint: u64,
    /// Indexed by [`LodTier::index`].
    pub tiers: Vec<TierMesh>,
}

impl TierSet {
    pub fn tier(&self, tier: LodTier) -> &TierMesh {
        &self.tiers[tier.index()]
    }

    pub fn total_triangles(&self) -> usize {
        self.tiers.iter().map(TierMesh::total).sum()
    }
}

/// Builds tier meshes from an elevation and a color source.
pub struct MeshBuilder<E, C> {
    elevation: E,
    color: C,
    config: LodConfig,
    fingerprint: u64,
}

impl<E: ElevationSource, C: ColorSource> MeshBuilder<E, C> {
    pub fn new(elevation: E, color: C, config: LodConfig) -> Self {
        let fingerprint = config.fingerprint();
        Self {
            elevation,
            color,
            config,
            fingerprint,
        }
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn elevation(&self) -> &E {
        &self.elevation
    }

    /// Build every tier around `anchor` for an observer at `altitude_m`.
    pub fn build(&self, anchor: GeoCoord, altitude_m: f64) -> TierSet {
        let anchor = anchor.normalized();
        let radius_scale = self.config.radius_scale(altitude_m);
        let tiers = self
            .config
            .tiers
            .iter()
            .map(|tier| self.build_tier(tier, anchor, radius_scale))
            .collect();

        TierSet {
            anchor,
            altitude_m,
            radius_scale,
            fingerprint: self.fingerprint,
            tiers,
        }
    }

    /// Sample the grid for one tier without triangulating it.
    pub fn sample_grid(&self, tier: &TierConfig, anchor: GeoCoord, radius_scale: f64) -> GridSamples {
        let resolution = tier.resolution.max(1) as usize;
        let radius_km = tier.angular_radius_deg * radius_scale * KM_PER_DEGREE;
        let cell_km = 2.0 * radius_km / resolution as f64;
        let footprint_deg = cell_km / KM_PER_DEGREE;
        let half = resolution as f64 / 2.0;
        let side = resolution + 1;

        let mut points = Vec::with_capacity(side * side);
        for i in 0..side {
            let north_km = (i as f64 - half) * cell_km;
            for j in 0..side {
                let east_km = (j as f64 - half) * cell_km;
                let geo = offset_to_geo(
                    anchor,
                    east_km,
                    north_km,
                    self.config.latitude_crossover_deg,
                );
                let elevation_m = if tier.filtered {
                    self.elevation
                        .height_at_filtered(geo.lat, geo.lon, footprint_deg)
                } else {
                    self.elevation.height_at(geo.lat, geo.lon)
                };
                points.push(GridPoint {
                    geo,
                    east_km,
                    north_km,
                    elevation_m,
                });
            }
        }

        GridSamples {
            resolution,
            cell_km,
            points,
        }
    }

    /// Build the land and sea triangle lists for one tier.
    pub fn build_tier(&self, tier: &TierConfig, anchor: GeoCoord, radius_scale: f64) -> TierMesh {
        let grid = self.sample_grid(tier, anchor, radius_scale);
        let classifier = CellClassifier::new(self.config.sea_level_m, tier.min_land_corners);
        let positions: Vec<DVec3> = grid
            .points
            .iter()
            .map(|p| self.world_position(p, &classifier))
            .collect();
        let normals = vertex_normals(&grid, &positions);

        let n = grid.resolution;
        let mut mesh = TierMesh {
            tier: tier.tier,
            land: TriangleList::with_capacity(n * n * 2),
            sea: TriangleList::with_capacity(n * n * 2),
        };

        let vertex = |idx: usize| {
            let p = &grid.points[idx];
            TerrainVertex::new(
                positions[idx],
                normals[idx],
                Default::default(),
                p.geo.lat,
                p.geo.lon,
            )
        };

        for i in 0..n {
            for j in 0..n {
                let sw = grid.index(i, j);
                let se = grid.index(i, j + 1);
                let ne = grid.index(i + 1, j + 1);
                let nw = grid.index(i + 1, j);

                let kind = classifier.classify([
                    grid.points[sw].elevation_m,
                    grid.points[se].elevation_m,
                    grid.points[ne].elevation_m,
                    grid.points[nw].elevation_m,
                ]);
                let list = match kind {
                    SurfaceKind::Land => &mut mesh.land,
                    SurfaceKind::Sea => &mut mesh.sea,
                };

                for corners in [[sw, se, ne], [sw, ne, nw]] {
                    let tri = TerrainTriangle::new(corners.map(vertex));
                    let (lat, lon) = tri.centroid_lat_lon();
                    let color = self.color.color_at(lat, lon);
                    list.push_if_valid(tri.with_color(color));
                }
            }
        }

        mesh
    }

    /// Local ENU position of a grid point. Sea points sit on the sea plane.
    fn world_position(&self, p: &GridPoint, classifier: &CellClassifier) -> DVec3 {
        let surface_m = if classifier.is_land_point(p.elevation_m) {
            p.elevation_m
        } else {
            self.config.sea_level_m
        };
        let d2 = p.east_km * p.east_km + p.north_km * p.north_km;
        let curvature_drop_km = d2 / (2.0 * EARTH_RADIUS_KM);
        DVec3::new(
            p.east_km * self.config.horizontal_scale,
            p.north_km * self.config.horizontal_scale,
            surface_m / 1000.0 * self.config.vertical_scale - curvature_drop_km,
        )
    }
}

/// Per-vertex lighting normals from a finite-difference gradient against the
/// east and north neighbors (backward difference on the last row/column).
fn vertex_normals(grid: &GridSamples, positions: &[DVec3]) -> Vec<DVec3> {
    let side = grid.side();
    let mut normals = Vec::with_capacity(positions.len());
    for i in 0..side {
        for j in 0..side {
            let here = positions[grid.index(i, j)];
            let (east, east_sign) = if j + 1 < side {
                (positions[grid.index(i, j + 1)], 1.0)
            } else {
                (positions[grid.index(i, j - 1)], -1.0)
            };
            let (north, north_sign) = if i + 1 < side {
                (positions[grid.index(i + 1, j)], 1.0)
            } else {
                (positions[grid.index(i - 1, j)], -1.0)
            };

            let dx = (east.x - here.x) * east_sign;
            let dy = (north.y - here.y) * north_sign;
            let dzdx = if dx.abs() > f64::EPSILON {
                (east.z - here.z) * east_sign / dx
            } else {
                0.0
            };
            let dzdy = if dy.abs() > f64::EPSILON {
                (north.z - here.z) * north_sign / dy
            } else {
                0.0
            };
            let n = DVec3::new(-dzdx, -dzdy, 1.0).normalize_or_zero();
            normals.push(if n == DVec3::ZERO { DVec3::Z } else { n });
        }
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use terraview_math::Rgb;
    use terraview_terrain::{FnColor, FnElevation, ProceduralPlanet, ProceduralPlanetParams};

    fn flat_land() -> MeshBuilder<FnElevation<impl Fn(f64, f64) -> f64>, FnColor<impl Fn(f64, f64) -> Rgb>>
    {
        MeshBuilder::new(
            FnElevation(|_: f64, _: f64| 100.0),
            FnColor(|_: f64, _: f64| Rgb::new(0, 200, 0)),
            LodConfig::default(),
        )
    }

    /// Surface area of the grid cell at `(i, j)` from its corner coordinates.
    fn cell_area_km2(grid: &GridSamples, i: usize, j: usize) -> f64 {
        let sw = grid.at(i, j).geo;
        let se = grid.at(i, j + 1).geo;
        let nw = grid.at(i + 1, j).geo;
        sw.surface_distance_km(&se) * sw.surface_distance_km(&nw)
    }

    #[test]
    fn test_equal_area_across_latitudes() {
        let builder = flat_land();
        let tier = builder.config().tier(LodTier::Inner).clone();
        let mid = tier.resolution as usize / 2;

        let areas: Vec<f64> = [0.0, 30.0, 60.0, 80.0]
            .iter()
            .map(|&lat| {
                let grid = builder.sample_grid(&tier, GeoCoord::new(lat, 10.0), 1.0);
                cell_area_km2(&grid, mid, mid)
            })
            .collect();

        let reference = areas[0];
        for (area, lat) in areas.iter().zip([0.0, 30.0, 60.0, 80.0]) {
            let rel = (area - reference).abs() / reference;
            assert!(
                rel < 0.05,
                "cell area at {lat}° is {area} km², equator {reference} km² ({:.2}% off)",
                rel * 100.0
            );
        }
    }

    #[test]
    fn test_grid_is_centered_on_anchor() {
        let builder = flat_land();
        let tier = builder.config().tier(LodTier::Ultra).clone();
        let grid = builder.sample_grid(&tier, GeoCoord::new(45.0, 7.0), 1.0);
        let mid = tier.resolution as usize / 2;
        let center = grid.at(mid, mid);
        assert!(center.east_km.abs() < 1e-12 && center.north_km.abs() < 1e-12);
        assert!((center.geo.lat - 45.0).abs() < 1e-9);
        assert_eq!(grid.points.len(), grid.side() * grid.side());
    }

    #[test]
    fn test_land_sea_majority_rule() {
        // Corners SW, SE, NE, NW = +10, +10, -5, +10 m.
        let builder = MeshBuilder::new(
            FnElevation(|lat: f64, lon: f64| if lat > 0.0 && lon > 0.0 { -5.0 } else { 10.0 }),
            FnColor(|_: f64, _: f64| Rgb::new(90, 140, 60)),
            LodConfig::default(),
        );
        let tier = TierConfig::new(LodTier::Ultra, 0.01, 1);
        let mesh = builder.build_tier(&tier, GeoCoord::new(0.0, 0.0), 1.0);

        assert_eq!(mesh.land.len(), 2, "both triangles should be land");
        assert!(mesh.sea.is_empty());
    }

    #[test]
    fn test_mostly_negative_cell_is_sea_and_flattened() {
        let builder = MeshBuilder::new(
            FnElevation(|lat: f64, lon: f64| if lat < 0.0 && lon < 0.0 { 10.0 } else { -800.0 }),
            FnColor(|_: f64, _: f64| Rgb::new(20, 60, 180)),
            LodConfig::default(),
        );
        let tier = TierConfig::new(LodTier::Ultra, 0.01, 1);
        let mesh = builder.build_tier(&tier, GeoCoord::new(0.0, 0.0), 1.0);

        assert!(mesh.land.is_empty());
        assert_eq!(mesh.sea.len(), 2);
        for tri in &mesh.sea {
            for v in &tri.vertices {
                let drop = (v.position.x.powi(2) + v.position.y.powi(2)) / (2.0 * EARTH_RADIUS_KM);
                let height = v.position.z + drop;
                assert!(
                    height >= -1e-9,
                    "sea vertex should sit on the sea plane or above, got {height}"
                );
            }
        }
    }

    #[test]
    fn test_triangle_color_comes_from_centroid() {
        // Color depends on latitude sign; a triangle straddling the equator gets
        // the color at its centroid on all three vertices.
        let builder = MeshBuilder::new(
            FnElevation(|_: f64, _: f64| 50.0),
            FnColor(|lat: f64, _: f64| if lat >= 0.0 { Rgb::new(255, 0, 0) } else { Rgb::new(0, 0, 255) }),
            LodConfig::default(),
        );
        let tier = TierConfig::new(LodTier::Ultra, 0.01, 1);
        let mesh = builder.build_tier(&tier, GeoCoord::new(0.0, 0.0), 1.0);

        for tri in &mesh.land {
            let first = tri.vertices[0].color;
            assert!(tri.vertices.iter().all(|v| v.color == first));
            let (lat, _) = tri.centroid_lat_lon();
            let expected = if lat >= 0.0 { Rgb::new(255, 0, 0) } else { Rgb::new(0, 0, 255) };
            assert_eq!(first, expected);
        }
    }

    #[test]
    fn test_flat_terrain_normals_point_up() {
        let builder = flat_land();
        let tier = TierConfig::new(LodTier::Ultra, 0.02, 4);
        let mesh = builder.build_tier(&tier, GeoCoord::new(20.0, 20.0), 1.0);
        for tri in &mesh.land {
            assert!(tri.normal.z > 0.999, "face normal {:?}", tri.normal);
            for v in &tri.vertices {
                assert!(v.normal.z > 0.999, "vertex normal {:?}", v.normal);
            }
        }
    }

    #[test]
    fn test_slope_tilts_normals() {
        // Terrain rising to the east.
        let builder = MeshBuilder::new(
            FnElevation(|_: f64, lon: f64| 1000.0 + lon * 10_000.0),
            FnColor(|_: f64, _: f64| Rgb::new(100, 100, 100)),
            LodConfig::default(),
        );
        let tier = TierConfig::new(LodTier::Ultra, 0.02, 4);
        let mesh = builder.build_tier(&tier, GeoCoord::new(0.0, 0.0), 1.0);
        for tri in &mesh.land {
            for v in &tri.vertices {
                assert!(v.normal.x < 0.0, "normal should lean west, got {:?}", v.normal);
            }
        }
    }

    #[test]
    fn test_build_produces_all_tiers() {
        let planet = ProceduralPlanet::new(ProceduralPlanetParams {
            seed: 3,
            ..Default::default()
        });
        let builder = MeshBuilder::new(&planet, &planet, LodConfig::default());
        let set = builder.build(GeoCoord::new(35.0, 139.0), 2000.0);

        assert_eq!(set.tiers.len(), 5);
        for tier in LodTier::ALL {
            let mesh = set.tier(tier);
            let res = builder.config().tier(tier).resolution as usize;
            assert_eq!(mesh.tier, tier);
            assert_eq!(
                mesh.total(),
                res * res * 2,
                "{} should triangulate every cell",
                tier.name()
            );
        }
        assert!(set.radius_scale > 1.0);
        assert_eq!(set.fingerprint, builder.fingerprint());
    }

    #[test]
    fn test_build_is_deterministic() {
        let planet = ProceduralPlanet::new(ProceduralPlanetParams::default());
        let builder = MeshBuilder::new(&planet, &planet, LodConfig::default());
        let a = builder.build(GeoCoord::new(-10.0, 20.0), 500.0);
        let b = builder.build(GeoCoord::new(-10.0, 20.0), 500.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_polar_anchor_stays_in_range() {
        let builder = flat_land();
        let set = builder.build(GeoCoord::new(90.0, 0.0), 0.0);
        assert!((set.anchor.lat - 89.99).abs() < 1e-12);
        for mesh in &set.tiers {
            for tri in mesh.land.iter().chain(mesh.sea.iter()) {
                for v in &tri.vertices {
                    assert!(v.lat.abs() <= 89.99 && v.lon.abs() <= 180.0);
                }
            }
        }
    }
}
