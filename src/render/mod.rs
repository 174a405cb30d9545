pub mod commands;
pub mod engine;
pub mod labels;
pub mod limits;
pub mod mode;
pub mod raster;
pub mod writer;

use thiserror::Error;

pub use commands::{CommandStream, DrawCommand};
pub use engine::{MapRenderer, OrbitingBody, PlottedStar};
pub use limits::RenderLimits;
pub use mode::{MapSettings, RenderMode};
pub use writer::StreamFormat;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("conflicting map settings: {0}")]
    ConfigurationConflict(String),
    #[error("nothing to draw: the catalog is empty")]
    EmptyCatalog,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
