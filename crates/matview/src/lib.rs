//! Facade crate for the `matview` workspace.
//!
//! This crate provides:
//! - re-exports of `matview-core` (layout conversion, random helpers,
//!   stopwatch, calendar dates, window tiling),
//! - (feature `image`, default) grayscale loading into normalized `f64`
//!   buffers and flat matrices,
//! - (feature `window`) a `minifb` preview backend for [`Monitor`] and
//!   [`loop_window`].
//!
//! ## Quickstart
//!
//! ```no_run
//! use matview::load::load_as_flat_matrix;
//! use matview::{Monitor, MonitorConfig, RecordingBackend};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let flat = load_as_flat_matrix("frame.png")?;
//! let mut monitor = Monitor::new(MonitorConfig {
//!     image_width: 64,
//!     image_height: 64,
//!     ..Default::default()
//! })?;
//! monitor.add_win(flat);
//! let placed = monitor.display(&mut RecordingBackend::new())?;
//! println!("placed {} windows", placed.len());
//! # Ok(())
//! # }
//! ```

pub use matview_core as core;

pub use matview_core::{
    debug_print, image_to_flat_vector, image_to_matrix, init_with_level, loop_window,
    matrix_summary, matrix_to_image, random_double, random_int, vector_to_image, CivilDate,
    ClockError, ImageF64, InvalidMonitorConfig, LayoutError, Monitor, MonitorConfig,
    MonitorConfigIoError, MonitorError, PreviewBackend, RandomError, RandomSource,
    RecordingBackend, ScreenLayout, Stopwatch, WindowSpec, PREVIEW_WINDOW_NAME,
};

#[cfg(feature = "image")]
pub mod load;

#[cfg(feature = "window")]
pub mod window;

#[cfg(feature = "tracing")]
pub use matview_core::init_tracing;
