//! Explicit start/stop stopwatch reporting to stderr.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::clock::ClockError;

#[derive(Clone, Debug)]
pub struct Stopwatch {
    label: String,
    started: Option<Instant>,
}

impl Stopwatch {
    /// Create an idle stopwatch; nothing is measured until [`Stopwatch::start`].
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Capture the start instant, restarting if already running.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Elapsed milliseconds so far, without stopping.
    pub fn elapsed_ms(&self) -> Option<f64> {
        self.started.map(|t| duration_ms(t.elapsed()))
    }

    /// Stop and print `"<label>: <ms> ms"` to stderr.
    pub fn stop(&mut self) -> Result<Duration, ClockError> {
        let mut stderr = io::stderr();
        self.stop_to(&mut stderr)
    }

    /// Stop and write the report line to `out`.
    ///
    /// A failed write does not lose the measurement.
    pub fn stop_to<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<Duration, ClockError> {
        let started = self.started.take().ok_or(ClockError::NotStarted)?;
        let elapsed = started.elapsed();
        let line = format!("{}: {:.3} ms", self.label, duration_ms(elapsed));
        log::debug!("{line}");
        let _ = writeln!(out, "{line}");
        Ok(elapsed)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new("elapsed")
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_fails() {
        let mut sw = Stopwatch::new("idle");
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed_ms(), None);
        assert_eq!(sw.stop_to(&mut Vec::<u8>::new()), Err(ClockError::NotStarted));
    }

    #[test]
    fn reports_one_line_per_stop() {
        let mut sw = Stopwatch::new("blur");
        sw.start();
        std::thread::sleep(Duration::from_millis(2));
        let mut out: Vec<u8> = Vec::new();
        let elapsed = sw.stop_to(&mut out).expect("running");
        assert!(elapsed >= Duration::from_millis(2));

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("blur: "), "{text}");
        assert!(text.trim_end().ends_with(" ms"), "{text}");
        assert!(!sw.is_running());
    }

    #[test]
    fn can_be_restarted() {
        let mut sw = Stopwatch::default();
        sw.start();
        sw.stop_to(&mut Vec::<u8>::new()).expect("first");
        sw.start();
        assert!(sw.elapsed_ms().is_some());
        sw.stop_to(&mut Vec::<u8>::new()).expect("second");
    }
}
