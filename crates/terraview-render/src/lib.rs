//! Software rendering of the layered terrain mesh: a look-at camera with
//! perspective projection, a bounds-checked RGBA framebuffer, and a painter's
//! algorithm renderer that sorts by layer priority then distance.

mod camera;
mod framebuffer;
mod raster;
mod renderer;
mod view;

pub use camera::{Camera, ScreenPoint};
pub use framebuffer::{Framebuffer, Viewport};
pub use raster::{draw_dot, draw_thick_line, fill_triangle};
pub use renderer::{
    DrawCommand, Primitive, RenderConfig, RenderInputs, RenderStats, Renderer, ShadeParams,
    Surface, SUN_LAYER,
};
pub use view::{ObserverPose, ViewControl, camera_for_pose, eye_position};
