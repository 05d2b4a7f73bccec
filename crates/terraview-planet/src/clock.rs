//! Simulation clock: UTC hour and day of year.

/// In-simulation UTC time.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// UTC decimal hour in `[0, 24)`.
    pub utc_hours: f64,
    /// Day of year in `[1, 365]`.
    pub day_of_year: u32,
    /// Simulated seconds per real second.
    pub time_scale: f64,
    /// Whether the clock is paused.
    pub paused: bool,
    /// Total simulated seconds since creation. Monotonic.
    elapsed_seconds: f64,
}

impl SimClock {
    pub fn new(utc_hours: f64, day_of_year: u32, time_scale: f64) -> Self {
        Self {
            utc_hours: utc_hours.rem_euclid(24.0),
            day_of_year: day_of_year.clamp(1, 365),
            time_scale,
            paused: false,
            elapsed_seconds: 0.0,
        }
    }

    /// Advance by `dt` real-time seconds.
    pub fn tick(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        let sim_dt = dt * self.time_scale;
        self.elapsed_seconds += sim_dt;

        let hours = self.utc_hours + sim_dt / 3600.0;
        let days = (hours / 24.0).floor();
        self.utc_hours = hours - days * 24.0;
        let day_index = (self.day_of_year as i64 - 1 + days as i64).rem_euclid(365);
        self.day_of_year = day_index as u32 + 1;
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(12.0, 172, 1.0)
    }
}
