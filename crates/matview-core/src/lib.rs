//! Core helpers for prototyping numeric image processing on `nalgebra`
//! matrices.
//!
//! This crate does no image decoding and opens no windows itself. It covers
//! matrix/image layout conversion, random sampling, timing, calendar dates
//! and the placement logic for tiled preview windows. Concrete loaders and
//! window backends live in the `matview` facade crate.

mod clock;
mod layout;
mod logger;
mod monitor;
mod random;
mod stopwatch;

pub use clock::{CivilDate, ClockError};
pub use layout::{
    image_to_flat_vector, image_to_matrix, matrix_to_image, pixel_count, vector_to_image,
    ImageF64, LayoutError,
};
pub use monitor::{
    loop_window, InvalidMonitorConfig, Monitor, MonitorConfig, MonitorConfigIoError,
    MonitorError, PreviewBackend, RecordingBackend, ScreenLayout, WindowSpec,
    PREVIEW_WINDOW_NAME,
};
pub use random::{random_double, random_int, RandomError, RandomSource};
pub use stopwatch::Stopwatch;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{debug_print, init_with_level, matrix_summary};
