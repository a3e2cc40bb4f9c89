//! Conversions between flat `nalgebra` matrices and row-major image buffers.
//!
//! Two pairs of conversions exist:
//! - [`matrix_to_image`] / [`image_to_matrix`]: column-major traversal, so a
//!   flat matrix lists the image column by column.
//! - [`image_to_flat_vector`] / [`vector_to_image`]: one contiguous copy in
//!   the buffer's native row-major order.

use nalgebra::{DMatrix, DVector};

/// Errors raised by the layout conversions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("buffer length mismatch (expected {expected} = {rows}x{cols}, got {got})")]
    SizeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },
    #[error("matrix too short for {width}x{height} image (need {needed} elements, got {got})")]
    TooShort {
        width: usize,
        height: usize,
        needed: usize,
        got: usize,
    },
    #[error("image dimensions {width}x{height} overflow the addressable pixel count")]
    DimensionOverflow { width: usize, height: usize },
}

/// `width * height`, or an error when the product does not fit in `usize`.
pub fn pixel_count(width: usize, height: usize) -> Result<usize, LayoutError> {
    width
        .checked_mul(height)
        .ok_or(LayoutError::DimensionOverflow { width, height })
}

/// Owned single-channel `f64` image in row-major layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF64 {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>, // row-major, len = w*h
}

impl ImageF64 {
    /// Zero-initialized `width x height` buffer.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`; use
    /// [`ImageF64::from_raw`] for caller-supplied dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_raw(width: usize, height: usize, data: Vec<f64>) -> Result<Self, LayoutError> {
        let expected = pixel_count(width, height)?;
        if data.len() != expected {
            return Err(LayoutError::SizeMismatch {
                rows: height,
                cols: width,
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f64) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f64] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reshape the first `width * height` elements of `matrix` into an image.
///
/// Elements are read in the matrix's column-major storage order and written
/// column by column: pixel `(x, y)` receives element `x * height + y`.
/// Trailing elements beyond `width * height` are ignored.
pub fn matrix_to_image(
    matrix: &DMatrix<f64>,
    width: usize,
    height: usize,
) -> Result<ImageF64, LayoutError> {
    let needed = pixel_count(width, height)?;
    let src = matrix.as_slice();
    if src.len() < needed {
        return Err(LayoutError::TooShort {
            width,
            height,
            needed,
            got: src.len(),
        });
    }

    let mut out = ImageF64::new(width, height);
    let mut counter = 0;
    for x in 0..width {
        for y in 0..height {
            out.set(x, y, src[counter]);
            counter += 1;
        }
    }
    Ok(out)
}

/// Flatten an image into a `(width * height) x 1` matrix, column by column.
///
/// Inverse of [`matrix_to_image`] for matrices holding exactly
/// `width * height` elements.
pub fn image_to_matrix(image: &ImageF64) -> DMatrix<f64> {
    let mut flat = Vec::with_capacity(image.data.len());
    for x in 0..image.width {
        for y in 0..image.height {
            flat.push(image.get(x, y));
        }
    }
    DMatrix::from_vec(flat.len(), 1, flat)
}

/// Copy the image buffer into a flat vector in row-major order.
///
/// The element order differs from [`image_to_matrix`] for any image wider
/// than one pixel; pair it with [`vector_to_image`], not [`matrix_to_image`].
pub fn image_to_flat_vector(image: &ImageF64) -> DVector<f64> {
    DVector::from_column_slice(image.as_slice())
}

/// Build a `rows x cols` image from a row-major flat vector.
///
/// Fails without producing any output when `vector.len() != rows * cols`.
pub fn vector_to_image(
    vector: &DVector<f64>,
    rows: usize,
    cols: usize,
) -> Result<ImageF64, LayoutError> {
    let expected = pixel_count(cols, rows)?;
    if vector.len() != expected {
        return Err(LayoutError::SizeMismatch {
            rows,
            cols,
            expected,
            got: vector.len(),
        });
    }
    Ok(ImageF64 {
        width: cols,
        height: rows,
        data: vector.as_slice().to_vec(),
    })
}
