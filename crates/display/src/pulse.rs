use foundation::math::map_range;
use imagery::EnvironmentalSample;

/// Timer advance per tick at speed 1.0.
pub const PULSE_STEP: f64 = 0.05;
/// Peak size change, in pixels, either side of the base size.
pub const PULSE_AMPLITUDE: f64 = 20.0;
pub const BASE_EARTH_SIZE: f64 = 300.0;
/// Radians of rotation per unit of pulse timer.
pub const ROTATION_RATE: f64 = 0.02;

/// `co2 + temperature` in `[0, 1000]` maps linearly onto `[0.4, 1.5]`.
pub const SPEED_INPUT_MAX: f64 = 1000.0;
pub const SPEED_MIN: f64 = 0.4;
pub const SPEED_MAX: f64 = 1.5;

/// Readings assumed before any resolution has completed.
pub const DEFAULT_CO2_PPM: f64 = 400.0;
pub const DEFAULT_TEMPERATURE_C: f64 = 15.0;

pub fn readings(metrics: Option<&EnvironmentalSample>) -> (f64, f64) {
    metrics.map_or((DEFAULT_CO2_PPM, DEFAULT_TEMPERATURE_C), |m| {
        (m.co2_ppm, m.temperature_c)
    })
}

/// Heartbeat speed for the given readings.
pub fn pulse_speed(metrics: Option<&EnvironmentalSample>) -> f64 {
    let (co2, temp) = readings(metrics);
    map_range(co2 + temp, 0.0, SPEED_INPUT_MAX, SPEED_MIN, SPEED_MAX)
}

/// Geometry of one animation frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PulseFrame {
    /// 0-based tick index.
    pub index: u64,
    pub speed: f64,
    /// Timer after this tick's advance.
    pub timer: f64,
    pub earth_size: f64,
    pub rotation: f64,
}

/// Open-ended sine pulse, advanced once per display refresh.
///
/// Speed is re-derived on every tick so a new resolution changes the
/// heartbeat without resetting the phase.
#[derive(Debug, Default, Clone)]
pub struct PulseAnimator {
    index: u64,
    timer: f64,
}

impl PulseAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> f64 {
        self.timer
    }

    pub fn tick(&mut self, metrics: Option<&EnvironmentalSample>) -> PulseFrame {
        let speed = pulse_speed(metrics);
        self.timer += speed * PULSE_STEP;
        let frame = PulseFrame {
            index: self.index,
            speed,
            timer: self.timer,
            earth_size: BASE_EARTH_SIZE + self.timer.sin() * PULSE_AMPLITUDE,
            rotation: self.timer * ROTATION_RATE,
        };
        self.index += 1;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::{BASE_EARTH_SIZE, PULSE_AMPLITUDE, PulseAnimator, pulse_speed};
    use imagery::compute_metrics;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn default_speed_uses_assumed_readings() {
        // (400 + 15) / 1000 * 1.1 + 0.4
        assert_close(pulse_speed(None), 0.8565, 1e-12);
    }

    #[test]
    fn warmer_years_beat_faster() {
        let early = pulse_speed(Some(&compute_metrics(2016)));
        let late = pulse_speed(Some(&compute_metrics(2025)));
        assert!(late > early);
    }

    #[test]
    fn timer_advances_by_speed_times_step() {
        let m = compute_metrics(2021);
        let mut anim = PulseAnimator::new();
        let speed = pulse_speed(Some(&m));
        let f0 = anim.tick(Some(&m));
        let f1 = anim.tick(Some(&m));
        assert_eq!(f0.index, 0);
        assert_eq!(f1.index, 1);
        assert_close(f1.timer, 2.0 * speed * 0.05, 1e-12);
        assert_close(f1.rotation, f1.timer * 0.02, 1e-12);
    }

    #[test]
    fn size_stays_within_amplitude() {
        let mut anim = PulseAnimator::new();
        for _ in 0..2000 {
            let f = anim.tick(None);
            assert!((f.earth_size - BASE_EARTH_SIZE).abs() <= PULSE_AMPLITUDE + 1e-9);
        }
    }
}
