//! Input data and configuration types.
//!
//! Configuration is designed to be easily serializable and loadable from
//! JSON while keeping complexity minimal; input points arrive in memory but
//! carry serde derives because batches are commonly shipped as JSON.

use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A single input record: one metric value measured at one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Place label merged into the cell label on aggregation.
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub coordinates: Coordinates,
    /// Metric value summed per cell.
    pub value: f64,
}

/// Globe visualization configuration.
///
/// # Example
///
/// ```rust
/// use hexglobe::GlobeConfig;
///
/// let config = GlobeConfig::default();
/// assert_eq!(config.hex_resolution, 3);
///
/// let json = r#"{
///     "hex_resolution": 2,
///     "globe_radius": 120.0,
///     "tooltips_limit": 10
/// }"#;
/// let config = GlobeConfig::from_json(json).unwrap();
/// assert_eq!(config.tooltips_limit, Some(10));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobeConfig {
    /// Hexagonal cell resolution (1-5, coarser = larger hexagons)
    #[serde(default = "GlobeConfig::default_hex_resolution")]
    pub hex_resolution: u8,

    /// Radius of the sphere in world units
    #[serde(default = "GlobeConfig::default_globe_radius")]
    pub globe_radius: f64,

    /// Fraction in [0,1] bounding the tallest bar to
    /// `2 * highest_bar_fraction * globe_radius` above the surface
    #[serde(default = "GlobeConfig::default_highest_bar_fraction")]
    pub highest_bar_fraction: f64,

    /// Relative margin in [0,1] shrinking each bar footprint toward the
    /// cell center (0 = full hexagon)
    #[serde(default = "GlobeConfig::default_hex_margin")]
    pub hex_margin: f64,

    /// Maximum number of rank-visible overlay labels (None means all)
    #[serde(default)]
    pub tooltips_limit: Option<usize>,
}

impl GlobeConfig {
    const fn default_hex_resolution() -> u8 {
        3
    }

    const fn default_globe_radius() -> f64 {
        100.0
    }

    const fn default_highest_bar_fraction() -> f64 {
        0.5
    }

    const fn default_hex_margin() -> f64 {
        0.2
    }

    pub fn with_hex_resolution(mut self, resolution: u8) -> Self {
        assert!(
            (1..=5).contains(&resolution),
            "Hex resolution must be between 1 and 5"
        );
        self.hex_resolution = resolution;
        self
    }

    pub fn with_globe_radius(mut self, radius: f64) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "Globe radius must be positive"
        );
        self.globe_radius = radius;
        self
    }

    pub fn with_highest_bar_fraction(mut self, fraction: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&fraction),
            "Highest bar fraction must be between 0 and 1"
        );
        self.highest_bar_fraction = fraction;
        self
    }

    pub fn with_hex_margin(mut self, margin: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&margin),
            "Hex margin must be between 0 and 1"
        );
        self.hex_margin = margin;
        self
    }

    pub fn with_tooltips_limit(mut self, limit: usize) -> Self {
        self.tooltips_limit = Some(limit);
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.hex_resolution) {
            return Err("Hex resolution must be between 1 and 5".to_string());
        }

        if !self.globe_radius.is_finite() || self.globe_radius <= 0.0 {
            return Err("Globe radius must be positive and finite".to_string());
        }

        if !(0.0..=1.0).contains(&self.highest_bar_fraction) {
            return Err("Highest bar fraction must be between 0 and 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.hex_margin) {
            return Err("Hex margin must be between 0 and 1".to_string());
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: GlobeConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            hex_resolution: Self::default_hex_resolution(),
            globe_radius: Self::default_globe_radius(),
            highest_bar_fraction: Self::default_highest_bar_fraction(),
            hex_margin: Self::default_hex_margin(),
            tooltips_limit: None,
        }
    }
}

/// Base and active styling the renderer applies to bar materials and
/// overlay labels. Colors are CSS-style strings passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub bar_color: String,
    pub bar_opacity: f64,
    pub bar_active_color: String,
    pub bar_active_opacity: f64,
    pub active_background_color: String,
    pub active_text_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bar_color: "#62a0ea".to_string(),
            bar_opacity: 0.8,
            bar_active_color: "#ffa348".to_string(),
            bar_active_opacity: 1.0,
            active_background_color: "#ffa348".to_string(),
            active_text_color: "#ffffff".to_string(),
        }
    }
}
