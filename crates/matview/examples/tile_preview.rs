use std::time::Duration;

use matview::load::load_grayscale_normalized;
use matview::window::MinifbBackend;
use matview::{image_to_matrix, init_with_level, random_double, Monitor, MonitorConfig};
use minifb::Key;
use nalgebra::DMatrix;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(log::LevelFilter::Info)?;

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: tile_preview <image_path> [monitor.json]");
        return Ok(());
    };
    let img = load_grayscale_normalized(&path)?;
    let config = match std::env::args().nth(2) {
        Some(cfg) => MonitorConfig::load_json(cfg)?,
        None => MonitorConfig {
            horizontal: 2,
            vertical: 2,
            window_width: 300,
            window_height: 300,
            ..Default::default()
        },
    };
    let config = MonitorConfig {
        image_width: img.width,
        image_height: img.height,
        ..config
    };

    let base = image_to_matrix(&img);
    let mut monitor = Monitor::new(config)?;
    let mut backend = MinifbBackend::new();

    loop {
        for _ in 0..monitor.config().horizontal * monitor.config().vertical {
            let mut noisy: DMatrix<f64> = base.clone();
            for v in noisy.iter_mut() {
                *v = (*v + random_double(-0.1, 0.1)?).clamp(0.0, 1.0);
            }
            monitor.add_win(noisy);
        }
        monitor.display(&mut backend)?;
        if backend.open_windows() == 0 || backend.is_key_down(Key::Escape) {
            break;
        }
        std::thread::sleep(Duration::from_millis(30));
    }
    Ok(())
}
