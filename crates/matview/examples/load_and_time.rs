use matview::load::load_as_flat_matrix;
use matview::{debug_print, init_with_level, matrix_summary, random_double, Stopwatch};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(log::LevelFilter::Debug)?;

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: load_and_time <image_path>");
        return Ok(());
    };

    let mut sw = Stopwatch::new("load");
    sw.start();
    let mut flat = load_as_flat_matrix(&path)?;
    sw.stop()?;

    sw.start();
    for v in flat.iter_mut() {
        *v = (*v + random_double(-0.05, 0.05)?).clamp(0.0, 1.0);
    }
    sw.stop()?;

    debug_print("noisy", &matrix_summary(&flat));
    println!("{}", matrix_summary(&flat));
    Ok(())
}
