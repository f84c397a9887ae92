use std::fmt::{Display, Error, Formatter};

/// A timer accumulating the time spent between calls to `start`/`resume` and `pause`.
///
/// A disabled timer ignores every call, so it costs nothing when counters are off.
#[derive(Copy, Clone, Debug, Default)]
pub struct Timer {
    time: f64,
    start: Option<f64>,
    enabled: bool,
}

impl Timer {
    /// Creates a new disabled timer initialized to zero.
    pub fn new() -> Self {
        Timer {
            time: 0.0,
            start: None,
            enabled: false,
        }
    }

    /// Enables this timer.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disables this timer. The time measured so far is kept.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.start = None;
    }

    /// Resets the timer to 0.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.start = None;
    }

    /// Starts the timer from zero.
    pub fn start(&mut self) {
        if self.enabled {
            self.time = 0.0;
            self.start = Some(instant::now());
        }
    }

    /// Pauses the timer, accumulating the time elapsed since the last start or resume.
    pub fn pause(&mut self) {
        if let Some(start) = self.start.take() {
            self.time += instant::now() - start;
        }
    }

    /// Resumes the timer without resetting the accumulated time.
    pub fn resume(&mut self) {
        if self.enabled {
            self.start = Some(instant::now());
        }
    }

    /// The accumulated time, in milliseconds.
    pub fn time(&self) -> f64 {
        self.time
    }
}

impl Display for Timer {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{:.4}ms", self.time)
    }
}
