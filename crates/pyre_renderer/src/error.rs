//! Error types for scene construction and rendering.

use thiserror::Error;

/// Errors raised while building a scene or camera.
///
/// The tracing arithmetic itself never fails; these only guard the
/// parameters handed in at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Sphere center must be finite")]
    InvalidCenter,

    #[error("Refractive index must be positive and finite, got {0}")]
    InvalidRefractiveIndex(f32),

    #[error("Metal fuzz must be a finite non-negative value, got {0}")]
    InvalidFuzz(f32),

    #[error("Material albedo must be finite and non-negative")]
    InvalidAlbedo,

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while rendering or writing an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
