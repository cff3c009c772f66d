//! Text and bar readouts drawn over the planet.

use foundation::math::map_range;
use imagery::iso_date;

use crate::pulse::readings;
use crate::state::DisplayState;

/// A horizontal indicator bar.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bar {
    pub width: f64,
    pub color: [u8; 3],
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// CO₂ bar: 100..200 px and green → red across 400..500 ppm.
pub fn co2_bar(co2: f64) -> Bar {
    Bar {
        width: map_range(co2, 400.0, 500.0, 100.0, 200.0),
        color: [
            channel(map_range(co2, 400.0, 500.0, 0.0, 255.0)),
            channel(map_range(co2, 400.0, 500.0, 255.0, 0.0)),
            0,
        ],
    }
}

/// Temperature bar: 100..200 px and blue → red across 14..16 °C.
pub fn temperature_bar(temp: f64) -> Bar {
    Bar {
        width: map_range(temp, 14.0, 16.0, 100.0, 200.0),
        color: [
            channel(map_range(temp, 14.0, 16.0, 0.0, 255.0)),
            0,
            channel(map_range(temp, 14.0, 16.0, 255.0, 0.0)),
        ],
    }
}

/// Everything the HUD prints for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub co2_label: String,
    pub co2_bar: Bar,
    pub temperature_label: String,
    pub temperature_bar: Bar,
    pub title: String,
    pub heartbeat: String,
    /// `None` while nothing has resolved yet.
    pub image_date: Option<String>,
    pub centroid: Option<String>,
}

pub const LOADING_MESSAGE: &str = "Loading Earth Image...";

impl Overlay {
    pub fn compose(state: Option<&DisplayState>, target_year: i32, speed: f64) -> Self {
        let (co2, temp) = readings(state.map(|s| &s.metrics));
        Self {
            co2_label: format!("CO₂ Level: {co2:.2} ppm"),
            co2_bar: co2_bar(co2),
            temperature_label: format!("Temperature: {temp:.2}°C"),
            temperature_bar: temperature_bar(temp),
            title: format!("Earth in {target_year}"),
            heartbeat: format!("Heartbeat: {speed:.2}"),
            image_date: state.map(|s| format!("Image Date: {}", iso_date(s.metadata.date))),
            centroid: state
                .and_then(|s| s.metadata.centroid)
                .map(|c| format!("Centroid: {c}")),
        }
    }
}
