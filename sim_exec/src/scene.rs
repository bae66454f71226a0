//! # Scene sources
//!
//! The scene is the top-down view of the world the camera projection samples from. Generating
//! and rendering tracks happens elsewhere; the simulator only needs a raster each tick.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use image::RgbImage;
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Supplies the top-down scene image for each tick.
pub trait SceneSource {
    fn scene(&mut self, tick: u64) -> Result<&RgbImage, SceneError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A static scene held in memory, typically loaded from an image file.
pub struct ImageScene {
    image: RgbImage,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("The software root environment variable is not set")]
    SwRootNotSet,

    #[error("Cannot load the scene image {0:?}: {1}")]
    LoadError(PathBuf, image::ImageError),

    #[error("The scene image is empty")]
    EmptyScene,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ImageScene {
    /// Load the scene from an image file, relative to the software root.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let root = util::host::get_sw_root().map_err(|_| SceneError::SwRootNotSet)?;

        Self::load_from_path(root.join(path))
    }

    /// Load the scene from an image file at an explicit path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();

        let image = image::open(path)
            .map_err(|e| SceneError::LoadError(path.to_path_buf(), e))?
            .to_rgb8();

        info!(
            "Scene loaded from {:?} ({}x{})",
            path,
            image.width(),
            image.height()
        );

        Self::from_image(image)
    }

    pub fn from_image(image: RgbImage) -> Result<Self, SceneError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SceneError::EmptyScene);
        }

        Ok(Self { image })
    }
}

impl SceneSource for ImageScene {
    fn scene(&mut self, _tick: u64) -> Result<&RgbImage, SceneError> {
        Ok(&self.image)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
