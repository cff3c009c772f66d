use serde::{Deserialize, Serialize};

/// Sub-satellite point of a full-disk image, in degrees.
///
/// Field names match the imagery API's `centroid_coordinates` object.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

impl Centroid {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The null island centroid used for synthesized records.
    pub fn origin() -> Self {
        Self::default()
    }
}

impl std::fmt::Display for Centroid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}°, {:.2}°", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::Centroid;

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Centroid::new(12.3456, -98.7).to_string(), "12.35°, -98.70°");
    }

    #[test]
    fn deserializes_api_shape() {
        let c: Centroid = serde_json::from_str(r#"{"lat": 1.5, "lon": -2.25}"#).unwrap();
        assert_eq!(c, Centroid::new(1.5, -2.25));
    }
}
