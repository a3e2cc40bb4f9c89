//! Window tiling of matrix previews.
//!
//! A [`Monitor`] queues flat matrices and, on [`Monitor::display`], reshapes
//! each one into an image and hands it to a [`PreviewBackend`] together with
//! a computed screen position. Windows fill a `horizontal x vertical` grid
//! anchored to the right edge of the configured screen, column by column.
//!
//! The monitor is single-owner and not meant to be shared across threads.

use std::fs;
use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::layout::{matrix_to_image, ImageF64, LayoutError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Name used by [`loop_window`].
pub const PREVIEW_WINDOW_NAME: &str = "tester";

/// Reference screen geometry and window chrome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenLayout {
    pub width: i32,
    pub height: i32,
    /// Horizontal gap added per window (border chrome).
    pub x_padding: i32,
    /// Vertical gap added per window (title bar chrome).
    pub y_padding: i32,
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            x_padding: 7,
            y_padding: 32,
        }
    }
}

/// Configuration for a [`Monitor`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Number of window columns.
    pub horizontal: usize,
    /// Number of window rows.
    pub vertical: usize,
    /// On-screen window width in pixels.
    pub window_width: usize,
    /// On-screen window height in pixels.
    pub window_height: usize,
    /// Width each queued matrix is reshaped to.
    pub image_width: usize,
    /// Height each queued matrix is reshaped to.
    pub image_height: usize,
    pub screen: ScreenLayout,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            horizontal: 2,
            vertical: 2,
            window_width: 256,
            window_height: 256,
            image_width: 64,
            image_height: 64,
            screen: ScreenLayout::default(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid monitor config: {0}")]
pub struct InvalidMonitorConfig(pub String);

#[derive(thiserror::Error, Debug)]
pub enum MonitorConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MonitorConfig {
    /// Load a JSON config from disk. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MonitorConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), MonitorConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), InvalidMonitorConfig> {
        if self.horizontal == 0 || self.vertical == 0 {
            return Err(InvalidMonitorConfig(format!(
                "grid must have at least one slot (horizontal={}, vertical={})",
                self.horizontal, self.vertical
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(InvalidMonitorConfig(format!(
                "window size must be positive ({}x{})",
                self.window_width, self.window_height
            )));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(InvalidMonitorConfig(format!(
                "image size must be positive ({}x{})",
                self.image_width, self.image_height
            )));
        }
        // the first and last slots bound every coordinate in between
        let last = (self.horizontal - 1, self.vertical - 1);
        if self.grid_width().is_none()
            || self.slot_position(0, 0).is_none()
            || self.slot_position(last.0, last.1).is_none()
        {
            return Err(InvalidMonitorConfig(format!(
                "{}x{} grid of {}x{} windows does not fit i32 screen coordinates",
                self.horizontal, self.vertical, self.window_width, self.window_height
            )));
        }
        Ok(())
    }

    /// Number of grid slots.
    pub fn capacity(&self) -> usize {
        self.horizontal.saturating_mul(self.vertical)
    }

    /// Total horizontal extent of the grid including padding.
    ///
    /// `None` when the extent does not fit in `i32`.
    pub fn grid_width(&self) -> Option<i32> {
        let step_x = i64::try_from(self.window_width).ok()? + i64::from(self.screen.x_padding);
        let cols = i64::try_from(self.horizontal).ok()?;
        i32::try_from(cols.checked_mul(step_x)?).ok()
    }

    /// Screen position of the window at grid column `col`, row `row`.
    ///
    /// `None` when a coordinate does not fit in `i32`.
    pub fn slot_position(&self, col: usize, row: usize) -> Option<(i32, i32)> {
        let step_x = i64::try_from(self.window_width).ok()? + i64::from(self.screen.x_padding);
        let step_y = i64::try_from(self.window_height).ok()? + i64::from(self.screen.y_padding);
        let x = (i64::from(self.screen.width) - i64::from(self.grid_width()?))
            .checked_add(i64::try_from(col).ok()?.checked_mul(step_x)?)?;
        let y = i64::try_from(row).ok()?.checked_mul(step_y)?;
        Some((i32::try_from(x).ok()?, i32::try_from(y).ok()?))
    }

    /// Placements for the first `count` slots in fill order.
    ///
    /// Slots fill column-major: all rows of column 0, then column 1, ...
    /// `count` is clamped to [`MonitorConfig::capacity`]. Placement stops at
    /// the first slot whose coordinates do not fit in `i32`, which
    /// [`MonitorConfig::validate`] rules out.
    pub fn placements(&self, count: usize) -> Vec<WindowSpec> {
        let count = count.min(self.capacity());
        let mut out = Vec::with_capacity(count);
        'fill: for col in 0..self.horizontal {
            for row in 0..self.vertical {
                if out.len() == count {
                    break 'fill;
                }
                let Some((x, y)) = self.slot_position(col, row) else {
                    break 'fill;
                };
                out.push(WindowSpec {
                    name: out.len().to_string(),
                    col,
                    row,
                    x,
                    y,
                    width: self.window_width,
                    height: self.window_height,
                });
            }
        }
        out
    }
}

/// Where and how large one preview window should be.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Stable window name; re-used across display passes.
    pub name: String,
    pub col: usize,
    pub row: usize,
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

/// On-screen surface provider.
///
/// `present` must create the named window on first use and update it in
/// place on later calls with the same name.
pub trait PreviewBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Show `image` in the window described by `spec`.
    fn present(&mut self, spec: &WindowSpec, image: &ImageF64) -> Result<(), Self::Error>;

    /// Process pending window events once. Driven by the caller per frame.
    fn pump(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum MonitorError<E: std::error::Error + 'static> {
    #[error("queued matrix {index} cannot be reshaped: {source}")]
    Layout {
        index: usize,
        #[source]
        source: LayoutError,
    },
    #[error("preview backend failed: {0}")]
    Backend(#[source] E),
}

/// Queue of matrices displayed as a grid of preview windows.
#[derive(Clone, Debug)]
pub struct Monitor {
    config: MonitorConfig,
    queue: Vec<DMatrix<f64>>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Result<Self, InvalidMonitorConfig> {
        config.validate()?;
        Ok(Self {
            config,
            queue: Vec::new(),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Queue a matrix for the next display pass.
    pub fn add_win(&mut self, matrix: DMatrix<f64>) {
        self.queue.push(matrix);
    }

    /// Drop all queued matrices.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reshape every queued matrix, present it, and empty the queue.
    ///
    /// Returns the placements used, in queue order. With an empty queue this
    /// does nothing. If a matrix cannot be reshaped, nothing is presented
    /// and the queue is left untouched. A backend failure stops the pass at
    /// the failing window; windows presented before it stay on screen and
    /// the queue is kept for a retry.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, backend), fields(queued = self.queue.len()))
    )]
    pub fn display<B: PreviewBackend>(
        &mut self,
        backend: &mut B,
    ) -> Result<Vec<WindowSpec>, MonitorError<B::Error>> {
        if self.queue.is_empty() {
            return Ok(Vec::new());
        }

        let capacity = self.config.capacity();
        if self.queue.len() > capacity {
            log::warn!(
                "monitor: {} matrices queued for {} slots, dropping the rest",
                self.queue.len(),
                capacity
            );
        }

        let placements = self.config.placements(self.queue.len());
        let images = self
            .queue
            .iter()
            .take(placements.len())
            .enumerate()
            .map(|(index, m)| {
                matrix_to_image(m, self.config.image_width, self.config.image_height)
                    .map_err(|source| MonitorError::Layout { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (spec, image) in placements.iter().zip(&images) {
            log::debug!(
                "monitor: window {} at ({}, {}) slot ({}, {})",
                spec.name,
                spec.x,
                spec.y,
                spec.col,
                spec.row
            );
            backend
                .present(spec, image)
                .map_err(MonitorError::Backend)?;
        }
        backend.pump().map_err(MonitorError::Backend)?;

        self.queue.clear();
        Ok(placements)
    }
}

/// Show one image in the `"tester"` preview window and pump events once.
pub fn loop_window<B: PreviewBackend>(
    backend: &mut B,
    width: usize,
    height: usize,
    image: &ImageF64,
) -> Result<(), B::Error> {
    let spec = WindowSpec {
        name: PREVIEW_WINDOW_NAME.to_string(),
        col: 0,
        row: 0,
        x: 0,
        y: 0,
        width,
        height,
    };
    backend.present(&spec, image)?;
    backend.pump()
}

/// In-memory backend for tests and headless runs.
///
/// Windows are keyed by name, so repeated presents update in place.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    windows: Vec<(WindowSpec, ImageF64)>,
    /// Number of `present` calls.
    pub presents: usize,
    /// Number of `pump` calls.
    pub pumps: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently open windows in creation order.
    pub fn windows(&self) -> &[(WindowSpec, ImageF64)] {
        &self.windows
    }

    pub fn window(&self, name: &str) -> Option<&(WindowSpec, ImageF64)> {
        self.windows.iter().find(|(spec, _)| spec.name == name)
    }
}

impl PreviewBackend for RecordingBackend {
    type Error = std::convert::Infallible;

    fn present(&mut self, spec: &WindowSpec, image: &ImageF64) -> Result<(), Self::Error> {
        self.presents += 1;
        match self.windows.iter_mut().find(|(s, _)| s.name == spec.name) {
            Some(slot) => *slot = (spec.clone(), image.clone()),
            None => self.windows.push((spec.clone(), image.clone())),
        }
        Ok(())
    }

    fn pump(&mut self) -> Result<(), Self::Error> {
        self.pumps += 1;
        Ok(())
    }
}
