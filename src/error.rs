//! Error types for hexglobe operations.

use thiserror::Error;

/// Result type alias for hexglobe operations.
pub type Result<T> = std::result::Result<T, GlobeError>;

/// Errors that can occur during globe data processing.
#[derive(Error, Debug)]
pub enum GlobeError {
    /// Latitude/longitude pair outside the valid range or non-finite.
    #[error("Invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Cell resolution outside the supported range.
    #[error("Invalid cell resolution: {0}")]
    InvalidResolution(u8),

    /// A cell id string that does not parse.
    #[error("Invalid cell id: {0}")]
    InvalidCellId(String),

    /// Input geometry that cannot be interpreted.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Catch-all for validation and internal failures.
    #[error("{0}")]
    Other(String),
}
