//! Grayscale image loading into normalized `f64` buffers.

use std::fs;
use std::path::{Path, PathBuf};

use ::image::{GrayImage, ImageError, ImageReader, Luma};
use matview_core::{image_to_matrix, ImageF64};
use nalgebra::DMatrix;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Full-scale 8-bit intensity.
pub const MAX_INTENSITY: f64 = 255.0;

/// Errors produced while reading or writing images.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Decode `path` as 8-bit grayscale and scale every sample into `[0, 1]`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))
)]
pub fn load_grayscale_normalized(path: impl AsRef<Path>) -> Result<ImageF64, LoadError> {
    let path = path.as_ref();
    let reader = ImageReader::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = reader
        .with_guessed_format()
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let gray = reader
        .decode()
        .map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();
    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        gray.width(),
        gray.height()
    );
    Ok(gray_to_image(&gray))
}

/// Load `path` and flatten it column by column into a `(w*h) x 1` matrix.
pub fn load_as_flat_matrix(path: impl AsRef<Path>) -> Result<DMatrix<f64>, LoadError> {
    let img = load_grayscale_normalized(path)?;
    Ok(image_to_matrix(&img))
}

/// Normalize an in-memory 8-bit grayscale image.
pub fn gray_to_image(gray: &GrayImage) -> ImageF64 {
    ImageF64 {
        width: gray.width() as usize,
        height: gray.height() as usize,
        data: gray
            .as_raw()
            .iter()
            .map(|&v| v as f64 / MAX_INTENSITY)
            .collect(),
    }
}

/// Quantize a `[0, 1]` buffer back to 8-bit, clamping out-of-range values.
pub fn image_to_gray(image: &ImageF64) -> GrayImage {
    let mut out = GrayImage::new(image.width as u32, image.height as u32);
    for y in 0..image.height {
        for (x, &px) in image.row(y).iter().enumerate() {
            let v = (px * MAX_INTENSITY).round().clamp(0.0, MAX_INTENSITY);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out
}

/// Save a `[0, 1]` buffer as an 8-bit grayscale image, creating parent dirs.
pub fn save_grayscale(image: &ImageF64, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    image_to_gray(image)
        .save(path)
        .map_err(|source| LoadError::Save {
            path: path.to_path_buf(),
            source,
        })
}

fn ensure_parent_dir(path: &Path) -> Result<(), LoadError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| LoadError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_in_memory_gray() {
        let gray = GrayImage::from_raw(2, 1, vec![0, 255]).expect("raw");
        let img = gray_to_image(&gray);
        assert_eq!(img.data, vec![0.0, 1.0]);
    }

    #[test]
    fn quantization_clamps_and_rounds() {
        let img = ImageF64::from_raw(4, 1, vec![-0.5, 0.5, 1.0, 3.0]).expect("raw");
        let gray = image_to_gray(&img);
        assert_eq!(gray.as_raw(), &vec![0, 128, 255, 255]);
    }
}
