//! Painter's algorithm renderer for the layered terrain mesh.
//!
//! Triangles from the sun and the five tiers are tagged with a layer, sorted
//! by layer then by distance (far first), distance culled per tier, clipped at
//! the near plane, projected and shaded into a flat list of draw commands.
//! Finer tiers always draw over coarser ones where they overlap, so the
//! overlapping tier grids never z-fight.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use terraview_lod::{LodConfig, LodTier, TierSet};
use terraview_math::{Rgb, TerrainTriangle, TriangleList};
use tracing::trace;

use crate::camera::Camera;
use crate::framebuffer::{Framebuffer, Viewport};
use crate::raster::{draw_dot, draw_thick_line, fill_triangle};

/// Layer rank of the sun, behind every terrain tier.
pub const SUN_LAYER: u8 = 0;

/// Lambert lighting constants for one surface kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShadeParams {
    pub ambient: f64,
    pub diffuse: f64,
    pub min_intensity: f64,
    pub max_intensity: f64,
}

impl ShadeParams {
    /// Brightness multiplier for a surface with `normal` lit from `light_dir`.
    pub fn intensity(&self, normal: DVec3, light_dir: DVec3, day_factor: f64) -> f64 {
        let lambert = normal.dot(light_dir).max(0.0);
        (self.ambient + self.diffuse * lambert * day_factor)
            .clamp(self.min_intensity, self.max_intensity)
    }
}

/// Renderer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    /// See [`Camera::frustum_margin`].
    pub frustum_margin: f64,
    /// Primitives with any screen coordinate further than this from the
    /// viewport origin, in pixels, are skipped.
    pub sanity_bound_px: f64,
    /// Width of lines drawn for triangles with two visible vertices.
    pub line_thickness: u32,
    pub land: ShadeParams,
    pub sea: ShadeParams,
    /// Atmospheric tint applied to the horizon tier.
    pub haze_color: Rgb,
    /// Blend weight toward `haze_color` in `[0, 1]`.
    pub haze_strength: f64,
    pub sky_day: Rgb,
    pub sky_night: Rgb,
    pub sky_horizon_day: Rgb,
    pub sky_horizon_night: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            near: 0.01,
            far: 5000.0,
            frustum_margin: 2.0,
            sanity_bound_px: 20_000.0,
            line_thickness: 2,
            land: ShadeParams {
                ambient: 0.25,
                diffuse: 0.85,
                min_intensity: 0.12,
                max_intensity: 1.1,
            },
            sea: ShadeParams {
                ambient: 0.35,
                diffuse: 0.5,
                min_intensity: 0.15,
                max_intensity: 1.0,
            },
            haze_color: Rgb::new(170, 190, 215),
            haze_strength: 0.35,
            sky_day: Rgb::new(70, 130, 210),
            sky_night: Rgb::new(4, 6, 18),
            sky_horizon_day: Rgb::new(175, 200, 230),
            sky_horizon_night: Rgb::new(14, 18, 38),
        }
    }
}

/// What a draw command came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    Land,
    Sea,
    Sun,
}

/// A projected primitive in viewport-relative pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Polygon([(f64, f64); 3]),
    Line([(f64, f64); 2]),
    Dot((f64, f64)),
}

impl Primitive {
    fn points(&self) -> &[(f64, f64)] {
        match self {
            Primitive::Polygon(p) => p.as_slice(),
            Primitive::Line(p) => p.as_slice(),
            Primitive::Dot(p) => std::slice::from_ref(p),
        }
    }
}

/// One shaded primitive, in draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub layer: u8,
    /// `None` for the sun.
    pub tier: Option<LodTier>,
    pub surface: Surface,
    /// Camera to triangle centroid distance.
    pub distance: f64,
    pub color: Rgb,
    pub primitive: Primitive,
}

/// Everything a frame needs besides the framebuffer.
#[derive(Clone, Copy)]
pub struct RenderInputs<'a> {
    pub tiers: &'a TierSet,
    /// Sun triangles already in world space.
    pub sun: &'a TriangleList,
    pub camera: &'a Camera,
    /// Supplies per-tier cull distances and the horizontal scale.
    pub lod: &'a LodConfig,
    /// Unit vector toward the sun.
    pub light_dir: DVec3,
    /// Day/night term in `[0, 1]`.
    pub day_factor: f64,
}

/// Per-frame triangle accounting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    pub collected: usize,
    pub culled: usize,
    pub near_clipped: usize,
    pub offscreen: usize,
    pub out_of_bounds: usize,
    pub polygons: usize,
    pub lines: usize,
    pub dots: usize,
}

impl RenderStats {
    pub fn drawn(&self) -> usize {
        self.polygons + self.lines + self.dots
    }
}

struct Tagged<'a> {
    triangle: &'a TerrainTriangle,
    layer: u8,
    tier: Option<LodTier>,
    surface: Surface,
    distance: f64,
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Copy the configured clip planes and frustum margin onto `camera`.
    pub fn configure_camera(&self, camera: &mut Camera) {
        camera.near = self.config.near.max(f64::EPSILON);
        camera.far = self.config.far.max(camera.near * 2.0);
        camera.frustum_margin = self.config.frustum_margin.max(1.0);
    }

    /// Turn the frame inputs into ordered draw commands for a viewport of
    /// `width` x `height` pixels.
    pub fn prepare(
        &self,
        inputs: &RenderInputs<'_>,
        width: u32,
        height: u32,
    ) -> (Vec<DrawCommand>, RenderStats) {
        let mut stats = RenderStats::default();
        let eye = inputs.camera.position();

        let mut tagged = Vec::with_capacity(inputs.tiers.total_triangles() + inputs.sun.len());
        for tri in inputs.sun {
            tagged.push(Tagged {
                triangle: tri,
                layer: SUN_LAYER,
                tier: None,
                surface: Surface::Sun,
                distance: (tri.centroid - eye).length(),
            });
        }
        for mesh in &inputs.tiers.tiers {
            let cull_km = inputs
                .lod
                .tier(mesh.tier)
                .max_distance_km
                .filter(|_| mesh.tier != LodTier::Ultra)
                .map(|km| km * inputs.tiers.radius_scale * inputs.lod.horizontal_scale);

            for (surface, list) in [(Surface::Land, &mesh.land), (Surface::Sea, &mesh.sea)] {
                for tri in list {
                    stats.collected += 1;
                    let distance = (tri.centroid - eye).length();
                    if cull_km.is_some_and(|limit| distance > limit) {
                        stats.culled += 1;
                        continue;
                    }
                    tagged.push(Tagged {
                        triangle: tri,
                        layer: mesh.tier.layer_priority(),
                        tier: Some(mesh.tier),
                        surface,
                        distance,
                    });
                }
            }
        }
        stats.collected += inputs.sun.len();

        tagged.sort_by(|a, b| {
            a.layer
                .cmp(&b.layer)
                .then_with(|| b.distance.total_cmp(&a.distance))
        });

        let (w, h) = (width as f64, height as f64);
        let mut commands = Vec::with_capacity(tagged.len());
        for item in tagged {
            let Some(vertices) = inputs.camera.clip_triangle_near_plane(item.triangle.positions())
            else {
                stats.near_clipped += 1;
                continue;
            };

            let projected: Vec<(f64, f64)> = vertices
                .iter()
                .filter_map(|&v| inputs.camera.project_to_screen(v, w, h, self.config.fov_deg))
                .map(|p| (p.x, p.y))
                .collect();
            let primitive = match projected.as_slice() {
                [a, b, c] => Primitive::Polygon([*a, *b, *c]),
                [a, b] => Primitive::Line([*a, *b]),
                [a] => Primitive::Dot(*a),
                _ => {
                    stats.offscreen += 1;
                    continue;
                }
            };

            let bound = self.config.sanity_bound_px;
            if primitive
                .points()
                .iter()
                .any(|&(x, y)| !x.is_finite() || !y.is_finite() || x.abs() > bound || y.abs() > bound)
            {
                stats.out_of_bounds += 1;
                continue;
            }

            match primitive {
                Primitive::Polygon(_) => stats.polygons += 1,
                Primitive::Line(_) => stats.lines += 1,
                Primitive::Dot(_) => stats.dots += 1,
            }

            commands.push(DrawCommand {
                layer: item.layer,
                tier: item.tier,
                surface: item.surface,
                distance: item.distance,
                color: self.shade(&item, inputs.light_dir, inputs.day_factor),
                primitive,
            });
        }

        trace!(?stats, "prepared frame");
        (commands, stats)
    }

    fn shade(&self, item: &Tagged<'_>, light_dir: DVec3, day_factor: f64) -> Rgb {
        let base = item.triangle.mean_color();
        let lit = match item.surface {
            Surface::Sun => return base,
            Surface::Land => base.scale(self.config.land.intensity(
                item.triangle.lighting_normal(),
                light_dir,
                day_factor,
            )),
            Surface::Sea => base.scale(self.config.sea.intensity(
                item.triangle.normal,
                light_dir,
                day_factor,
            )),
        };
        if item.tier == Some(LodTier::Horizon) {
            let haze = self.config.haze_color.scale(0.15 + 0.85 * day_factor);
            lit.lerp(haze, self.config.haze_strength)
        } else {
            lit
        }
    }

    /// Rasterize `commands` in order into `viewport`.
    pub fn rasterize(&self, commands: &[DrawCommand], fb: &mut Framebuffer, viewport: Viewport) {
        let (ox, oy) = (viewport.x as f64, viewport.y as f64);
        let shift = |(x, y): (f64, f64)| (x + ox, y + oy);
        for cmd in commands {
            match cmd.primitive {
                Primitive::Polygon(p) => fill_triangle(fb, viewport, p.map(shift), cmd.color),
                Primitive::Line(p) => draw_thick_line(
                    fb,
                    viewport,
                    p.map(shift),
                    self.config.line_thickness,
                    cmd.color,
                ),
                Primitive::Dot(p) => draw_dot(fb, viewport, shift(p), cmd.color),
            }
        }
    }

    /// Fill `viewport` with the sky for the given day factor.
    pub fn clear_sky(&self, fb: &mut Framebuffer, viewport: Viewport, day_factor: f64) {
        let top = self.config.sky_night.lerp(self.config.sky_day, day_factor);
        let bottom = self
            .config
            .sky_horizon_night
            .lerp(self.config.sky_horizon_day, day_factor);
        fb.fill_vertical_gradient(viewport, top, bottom);
    }

    /// Clear, prepare and rasterize one frame into `viewport`.
    pub fn render_frame(
        &self,
        inputs: &RenderInputs<'_>,
        fb: &mut Framebuffer,
        viewport: Viewport,
    ) -> RenderStats {
        let viewport = viewport.clipped_to(fb.width, fb.height);
        self.clear_sky(fb, viewport, inputs.day_factor);
        if viewport.is_empty() {
            return RenderStats::default();
        }
        let (commands, stats) = self.prepare(inputs, viewport.width, viewport.height);
        self.rasterize(&commands, fb, viewport);
        stats
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terraview_coords::GeoCoord;
    use terraview_lod::TierMesh;
    use terraview_math::TerrainVertex;

    const ULTRA_COLOR: Rgb = Rgb::new(200, 40, 40);
    const HORIZON_COLOR: Rgb = Rgb::new(40, 40, 200);

    fn empty_set() -> TierSet {
        TierSet {
            anchor: GeoCoord::new(0.0, 0.0),
            altitude_m: 0.0,
            radius_scale: 1.0,
            fingerprint: 0,
            tiers: LodTier::ALL.iter().map(|&t| TierMesh::empty(t)).collect(),
        }
    }

    fn tri(points: [DVec3; 3], color: Rgb) -> TerrainTriangle {
        TerrainTriangle::new(points.map(|p| TerrainVertex::new(p, DVec3::Z, color, 0.0, 0.0)))
    }

    /// An upright triangle facing the default camera, `depth` units north.
    fn facing(depth: f64, half: f64, color: Rgb) -> TerrainTriangle {
        tri(
            [
                DVec3::new(-half, depth, -half),
                DVec3::new(half, depth, -half),
                DVec3::new(0.0, depth, half),
            ],
            color,
        )
    }

    fn push(set: &mut TierSet, tier: LodTier, triangle: TerrainTriangle) {
        set.tiers[tier.index()].land.push_if_valid(triangle);
    }

    fn inputs<'a>(set: &'a TierSet, sun: &'a TriangleList, camera: &'a Camera, lod: &'a LodConfig) -> RenderInputs<'a> {
        RenderInputs {
            tiers: set,
            sun,
            camera,
            lod,
            light_dir: DVec3::Z,
            day_factor: 1.0,
        }
    }

    #[test]
    fn test_finer_tier_draws_over_closer_coarse_tier() {
        let mut set = empty_set();
        push(&mut set, LodTier::Ultra, facing(50.0, 40.0, ULTRA_COLOR));
        push(&mut set, LodTier::Horizon, facing(10.0, 8.0, HORIZON_COLOR));
        let sun = TriangleList::new();
        let camera = Camera::default();
        let lod = LodConfig::default();
        let renderer = Renderer::default();

        let mut fb = Framebuffer::new(100, 100);
        let viewport = fb.full_viewport();
        let stats = renderer.render_frame(&inputs(&set, &sun, &camera, &lod), &mut fb, viewport);
        assert_eq!(stats.polygons, 2);

        let (commands, _) = renderer.prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        assert_eq!(commands[0].tier, Some(LodTier::Horizon));
        assert_eq!(commands[1].tier, Some(LodTier::Ultra));
        assert!(commands[1].distance > commands[0].distance);
        assert_eq!(fb.pixel(50, 50), Some(commands[1].color));
        assert_ne!(commands[0].color, commands[1].color);
    }

    #[test]
    fn test_within_layer_far_draws_first() {
        let mut set = empty_set();
        push(&mut set, LodTier::Mid, facing(10.0, 4.0, ULTRA_COLOR));
        push(&mut set, LodTier::Mid, facing(30.0, 12.0, HORIZON_COLOR));
        let sun = TriangleList::new();
        let camera = Camera::default();
        let lod = LodConfig::default();
        let (commands, _) = Renderer::default().prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        assert_eq!(commands.len(), 2);
        assert!(commands[0].distance > commands[1].distance);
    }

    #[test]
    fn test_sun_draws_first_and_unlit() {
        let mut set = empty_set();
        push(&mut set, LodTier::Horizon, facing(10.0, 4.0, HORIZON_COLOR));
        let mut sun = TriangleList::new();
        sun.push_if_valid(facing(900.0, 20.0, Rgb::new(255, 250, 240)));
        let camera = Camera::default();
        let lod = LodConfig::default();
        let (commands, _) = Renderer::default().prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        assert_eq!(commands[0].surface, Surface::Sun);
        assert_eq!(commands[0].layer, SUN_LAYER);
        assert_eq!(commands[0].color, Rgb::new(255, 250, 240));
    }

    #[test]
    fn test_triangle_behind_camera_is_excluded() {
        let mut set = empty_set();
        push(
            &mut set,
            LodTier::Ultra,
            tri(
                [
                    DVec3::new(-10.0, 50.0, 0.0),
                    DVec3::new(10.0, 50.0, 0.0),
                    DVec3::new(0.0, -5.0, 0.0),
                ],
                ULTRA_COLOR,
            ),
        );
        let sun = TriangleList::new();
        let camera = Camera::default();
        let lod = LodConfig::default();
        let (commands, stats) = Renderer::default().prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        assert!(commands.is_empty());
        assert_eq!(stats.near_clipped, 1);
    }

    #[test]
    fn test_partially_projected_triangles_degrade() {
        let mut set = empty_set();
        // One vertex past the far plane: drawn as a line.
        push(
            &mut set,
            LodTier::Ultra,
            tri(
                [
                    DVec3::new(-5.0, 50.0, 0.0),
                    DVec3::new(5.0, 50.0, 0.0),
                    DVec3::new(0.0, 6000.0, 1.0),
                ],
                ULTRA_COLOR,
            ),
        );
        // Two vertices past the far plane: drawn as a dot.
        push(
            &mut set,
            LodTier::Ultra,
            tri(
                [
                    DVec3::new(0.0, 50.0, 0.0),
                    DVec3::new(-5.0, 6000.0, 0.0),
                    DVec3::new(5.0, 6000.0, 1.0),
                ],
                ULTRA_COLOR,
            ),
        );
        let sun = TriangleList::new();
        let camera = Camera::default();
        let lod = LodConfig::default();
        let (_, stats) = Renderer::default().prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.dots, 1);
        assert_eq!(stats.polygons, 0);
    }

    #[test]
    fn test_distance_cull_scales_with_radius() {
        let mut set = empty_set();
        // Inner culls beyond 20 km at scale 1.
        push(&mut set, LodTier::Inner, facing(30.0, 5.0, ULTRA_COLOR));
        // Ultra is never culled.
        push(&mut set, LodTier::Ultra, facing(4000.0, 500.0, ULTRA_COLOR));
        let sun = TriangleList::new();
        let camera = Camera::default();
        let lod = LodConfig::default();
        let renderer = Renderer::default();

        let (commands, stats) = renderer.prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        assert_eq!(stats.culled, 1);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].tier, Some(LodTier::Ultra));

        set.radius_scale = 2.0;
        let (_, stats) = renderer.prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        assert_eq!(stats.culled, 0);
    }

    #[test]
    fn test_out_of_bounds_primitives_are_skipped() {
        let mut set = empty_set();
        push(
            &mut set,
            LodTier::Ultra,
            tri(
                [
                    DVec3::new(10.0, 0.02, 0.0),
                    DVec3::new(-1.0, 50.0, 0.0),
                    DVec3::new(1.0, 50.0, 1.0),
                ],
                ULTRA_COLOR,
            ),
        );
        let sun = TriangleList::new();
        let mut camera = Camera::default();
        camera.frustum_margin = 1e9;
        let lod = LodConfig::default();
        let mut renderer = Renderer::default();
        renderer.config_mut().sanity_bound_px = 1000.0;

        let (commands, stats) = renderer.prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        assert!(commands.is_empty());
        assert_eq!(stats.out_of_bounds, 1);
    }

    #[test]
    fn test_horizon_tier_is_hazed() {
        let mut set = empty_set();
        push(&mut set, LodTier::Horizon, facing(10.0, 4.0, Rgb::new(20, 120, 20)));
        push(&mut set, LodTier::Outer, facing(10.0, 4.0, Rgb::new(20, 120, 20)));
        let sun = TriangleList::new();
        let camera = Camera::default();
        let lod = LodConfig::default();
        let (commands, _) = Renderer::default().prepare(&inputs(&set, &sun, &camera, &lod), 100, 100);
        let horizon = commands.iter().find(|c| c.tier == Some(LodTier::Horizon)).unwrap();
        let outer = commands.iter().find(|c| c.tier == Some(LodTier::Outer)).unwrap();
        assert!(horizon.color.b > outer.color.b, "haze adds blue");
    }

    #[test]
    fn test_configure_camera_copies_clip_planes() {
        let mut renderer = Renderer::default();
        renderer.config_mut().far = 100.0;
        let mut camera = Camera::default();
        renderer.configure_camera(&mut camera);
        assert_eq!(camera.far, 100.0);
        assert!(camera.project_to_screen(DVec3::new(0.0, 150.0, 0.0), 10.0, 10.0, 60.0).is_none());
    }

    #[test]
    fn test_night_is_darker_than_day() {
        let params = RenderConfig::default().land;
        let day = params.intensity(DVec3::Z, DVec3::Z, 1.0);
        let night = params.intensity(DVec3::Z, DVec3::Z, 0.0);
        assert!(day > night);
        assert!(night >= params.min_intensity);
    }

    #[test]
    fn test_viewport_offset_applies() {
        let mut set = empty_set();
        push(&mut set, LodTier::Ultra, facing(50.0, 40.0, ULTRA_COLOR));
        let sun = TriangleList::new();
        let camera = Camera::default();
        let lod = LodConfig::default();
        let renderer = Renderer::default();
        let mut fb = Framebuffer::new(200, 100);
        let right_half = Viewport::new(100, 0, 100, 100);
        renderer.render_frame(&inputs(&set, &sun, &camera, &lod), &mut fb, right_half);

        let sky_left = fb.pixel(50, 50);
        assert_eq!(sky_left, Some(Rgb::BLACK), "left half untouched");
        assert_ne!(fb.pixel(150, 50), Some(Rgb::BLACK));
    }
}
