//! Simulated environmental readings.
//!
//! There is no observational data behind these numbers: CO₂ climbs linearly
//! from a 2015 baseline and temperature gains an extra slope after 2020.

const BASELINE_YEAR: i32 = 2015;
const ACCELERATION_YEAR: i32 = 2020;

const BASELINE_CO2_PPM: f64 = 400.0;
const CO2_PPM_PER_YEAR: f64 = 2.5;

const BASELINE_TEMPERATURE_C: f64 = 14.0;
const TEMPERATURE_C_PER_YEAR: f64 = 0.02;
const ACCELERATED_TEMPERATURE_C_PER_YEAR: f64 = 0.03;

/// CO₂ concentration and mean surface temperature for one year.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnvironmentalSample {
    pub co2_ppm: f64,
    pub temperature_c: f64,
}

/// Pure, total mapping from a calendar year to simulated readings.
pub fn compute_metrics(year: i32) -> EnvironmentalSample {
    let elapsed = (year - BASELINE_YEAR) as f64;
    let co2_ppm = BASELINE_CO2_PPM + elapsed * CO2_PPM_PER_YEAR;

    let mut temperature_c = BASELINE_TEMPERATURE_C + elapsed * TEMPERATURE_C_PER_YEAR;
    if year > ACCELERATION_YEAR {
        temperature_c += (year - ACCELERATION_YEAR) as f64 * ACCELERATED_TEMPERATURE_C_PER_YEAR;
    }

    EnvironmentalSample {
        co2_ppm,
        temperature_c,
    }
}

#[cfg(test)]
mod tests {
    use super::compute_metrics;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn co2_is_linear_from_baseline() {
        assert_eq!(compute_metrics(2015).co2_ppm, 400.0);
        assert_eq!(compute_metrics(2020).co2_ppm, 412.5);
        assert_eq!(compute_metrics(2021).co2_ppm, 415.0);
        assert_eq!(compute_metrics(2010).co2_ppm, 387.5);
    }

    #[test]
    fn temperature_accelerates_only_after_2020() {
        assert_close(compute_metrics(2020).temperature_c, 14.1, 1e-12);
        assert_close(compute_metrics(2021).temperature_c, 14.15, 1e-12);
        assert_close(compute_metrics(2025).temperature_c, 14.35, 1e-12);
    }

    #[test]
    fn matches_reference_arithmetic_exactly() {
        for year in 2010..2030 {
            let mut expected = 14.0 + ((year - 2015) as f64 * 0.02);
            if year > 2020 {
                expected += (year - 2020) as f64 * 0.03;
            }
            assert_eq!(compute_metrics(year).temperature_c, expected, "year {year}");
        }
    }
}
