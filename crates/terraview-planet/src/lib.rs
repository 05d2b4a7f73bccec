//! Astronomy for the terrain view: simulation clock, subsolar point, observer
//! horizon coordinates, day/night shading term, and the sun polygon mesh.

mod clock;
mod solar;
mod sun;

pub use clock::SimClock;
pub use solar::{
    AXIAL_TILT_DEG, SUMMER_SOLSTICE_DAY, day_factor, horizon_coordinates, sun_color,
    sun_direction_enu, subsolar_point,
};
pub use sun::{SUN_SEGMENTS, SunConfig, SunModel, SunState, sun_polygon};
