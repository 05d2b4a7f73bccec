//! The terrain viewer: per-frame orchestration of mesh cache, sun and
//! renderer, plus the batch output used by the `terraview` binary.

pub mod error;
pub mod flight;
pub mod output;
pub mod platform;
pub mod view;

pub use error::AppError;
pub use flight::ScriptedFlight;
pub use output::{encode_png, frame_file_name, write_png};
pub use platform::AppDirs;
pub use view::{FrameReport, FrameTime, TerrainView};
