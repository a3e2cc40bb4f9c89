#![cfg(feature = "image")]

use approx::assert_abs_diff_eq;
use image::GrayImage;
use matview::load::{load_as_flat_matrix, load_grayscale_normalized, save_grayscale, LoadError};
use matview::{image_to_matrix, matrix_to_image, Monitor, MonitorConfig, RecordingBackend};

fn write_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("fixture.png");
    GrayImage::from_raw(2, 2, vec![0, 128, 255, 64])
        .expect("raw")
        .save(&path)
        .expect("save fixture");
    path
}

#[test]
fn normalizes_known_samples() {
    let dir = tempfile::tempdir().expect("tempdir");
    let img = load_grayscale_normalized(write_fixture(&dir)).expect("load");
    assert_eq!((img.width, img.height), (2, 2));
    for (got, want) in img.data.iter().zip([0.0, 0.502, 1.0, 0.251]) {
        assert_abs_diff_eq!(*got, want, epsilon = 1.0 / 255.0);
    }
}

#[test]
fn flat_matrix_is_column_major() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flat = load_as_flat_matrix(write_fixture(&dir)).expect("load");
    assert_eq!(flat.shape(), (4, 1));
    // column 0 is (0, 255), column 1 is (128, 64)
    let want = [0.0, 1.0, 128.0 / 255.0, 64.0 / 255.0];
    for (got, want) in flat.iter().zip(want) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
    }

    let back = matrix_to_image(&flat, 2, 2).expect("reshape");
    assert_eq!(image_to_matrix(&back), flat);
}

#[test]
fn missing_file_fails_to_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_grayscale_normalized(dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }), "{err}");
}

#[test]
fn garbage_fails_to_decode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("garbage.png");
    std::fs::write(&path, b"definitely not an image").expect("write");
    let err = load_grayscale_normalized(&path).unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }), "{err}");
}

#[test]
fn save_then_load_preserves_quantized_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = load_grayscale_normalized(write_fixture(&dir)).expect("load");
    let out = dir.path().join("nested/out/copy.png");
    save_grayscale(&src, &out).expect("save");
    let again = load_grayscale_normalized(&out).expect("reload");
    assert_eq!(again, src);
}

#[test]
fn loaded_frames_tile_into_monitor() {
    let dir = tempfile::tempdir().expect("tempdir");
    let flat = load_as_flat_matrix(write_fixture(&dir)).expect("load");
    let mut monitor = Monitor::new(MonitorConfig {
        image_width: 2,
        image_height: 2,
        ..Default::default()
    })
    .expect("config");
    monitor.add_win(flat.clone());
    monitor.add_win(flat);

    let mut backend = RecordingBackend::new();
    let placed = monitor.display(&mut backend).expect("display");
    assert_eq!(placed.len(), 2);
    assert_eq!(backend.windows().len(), 2);
    assert!(monitor.is_empty());
}
