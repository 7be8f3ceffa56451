//! Real-time signed-distance-field ray marcher.
//!
//! Scenes are built from implicit primitives and boolean combinations of
//! them. A [`marcher::Camera`] owns one ray per pixel and sphere-traces each
//! against a [`marcher::Scene`] every frame. [`engine`] drives that at a fixed
//! logic rate on its own thread and publishes finished frames.

use thiserror::Error;

pub mod color;
pub mod engine;
pub mod input;
pub mod logger;
pub mod marcher;
pub mod math;

pub use color::Color;
pub use marcher::scene::ShapeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("cannot march against a scene with no shapes")]
    EmptyScene,
    #[error("render called before create_rays")]
    RaysNotCreated,
    #[error("pixel buffer holds {actual} colors, camera has {expected} rays")]
    PixelBufferSize { expected: usize, actual: usize },
    #[error("shape {0:?} is not stored in this scene")]
    UnknownShape(ShapeId),
    #[error("viewport {width}x{height} has no pixels")]
    InvalidViewport { width: usize, height: usize },
    #[error("render thread is no longer running")]
    EngineStopped,
}

pub type Result<T> = std::result::Result<T, Error>;
