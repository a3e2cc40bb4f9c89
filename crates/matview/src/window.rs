//! `minifb` preview backend.
//!
//! Windows are kept in a name-keyed map, so presenting under an existing
//! name updates that window in place. A window is recreated only when the
//! requested size changes or the user closed it.

use std::collections::HashMap;

use matview_core::{ImageF64, PreviewBackend, WindowSpec};
use minifb::{Key, ScaleMode, Window, WindowOptions};

#[derive(thiserror::Error, Debug)]
pub enum WindowError {
    #[error("window {name:?}: {source}")]
    Minifb {
        name: String,
        #[source]
        source: minifb::Error,
    },
}

/// Gray `[0, 1]` pixel to `0x00RRGGBB`.
#[inline]
fn gray_to_rgb(v: f64) -> u32 {
    let g = (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (g << 16) | (g << 8) | g
}

/// Convert a normalized image into a `minifb` frame buffer.
pub fn frame_buffer(image: &ImageF64) -> Vec<u32> {
    image.data.iter().map(|&v| gray_to_rgb(v)).collect()
}

struct OpenWindow {
    window: Window,
    width: usize,
    height: usize,
}

/// Preview backend drawing into native windows through `minifb`.
///
/// `minifb` windows must stay on the thread that created them.
#[derive(Default)]
pub struct MinifbBackend {
    windows: HashMap<String, OpenWindow>,
    buffer: Vec<u32>,
}

impl MinifbBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of windows currently open.
    pub fn open_windows(&self) -> usize {
        self.windows.len()
    }

    /// True if `key` is held in any open window.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.windows.values().any(|w| w.window.is_key_down(key))
    }

    fn open(spec: &WindowSpec) -> Result<OpenWindow, WindowError> {
        let opts = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        };
        let mut window = Window::new(&spec.name, spec.width, spec.height, opts).map_err(
            |source| WindowError::Minifb {
                name: spec.name.clone(),
                source,
            },
        )?;
        window.set_position(spec.x as isize, spec.y as isize);
        log::debug!(
            "opened window {:?} {}x{} at ({}, {})",
            spec.name,
            spec.width,
            spec.height,
            spec.x,
            spec.y
        );
        Ok(OpenWindow {
            window,
            width: spec.width,
            height: spec.height,
        })
    }
}

impl PreviewBackend for MinifbBackend {
    type Error = WindowError;

    fn present(&mut self, spec: &WindowSpec, image: &ImageF64) -> Result<(), Self::Error> {
        let stale = self.windows.get(&spec.name).is_some_and(|w| {
            !w.window.is_open() || w.width != spec.width || w.height != spec.height
        });
        if stale {
            self.windows.remove(&spec.name);
        }
        if !self.windows.contains_key(&spec.name) {
            let opened = Self::open(spec)?;
            self.windows.insert(spec.name.clone(), opened);
        }

        self.buffer.clear();
        self.buffer.extend(image.data.iter().map(|&v| gray_to_rgb(v)));

        if let Some(open) = self.windows.get_mut(&spec.name) {
            open.window.set_position(spec.x as isize, spec.y as isize);
            open.window
                .update_with_buffer(&self.buffer, image.width, image.height)
                .map_err(|source| WindowError::Minifb {
                    name: spec.name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn pump(&mut self) -> Result<(), Self::Error> {
        for open in self.windows.values_mut() {
            open.window.update();
        }
        self.windows.retain(|name, open| {
            let keep = open.window.is_open();
            if !keep {
                log::debug!("window {name:?} closed");
            }
            keep
        });
        Ok(())
    }
}
