//! Hexagonal-bin bar charts on a sphere, with occlusion-aware overlay labels.
//!
//! Buckets geographic points into hexagonal cells, aggregates their values,
//! and produces bar geometry, background tiles, and per-frame overlay label
//! placement for an external 3D renderer. The crate owns the data and
//! interaction model; rendering stays on the other side of the seam.
//!
//! ```rust
//! use hexglobe::prelude::*;
//!
//! let mut globe = HexGlobe::new(GlobeConfig::default(), Theme::default())?;
//! globe.update(&[GeoPoint {
//!     city: "New York".to_string(),
//!     country: None,
//!     coordinates: Coordinates { lat: 40.7128, lon: -74.0060 },
//!     value: 8_804_190.0,
//! }])?;
//!
//! let camera = CameraSnapshot::look_at(
//!     DVec3::new(0.0, 0.0, 300.0),
//!     DVec3::ZERO,
//!     55.0,
//!     800.0 / 600.0,
//!     1.0,
//!     1000.0,
//! );
//! let frame = globe.on_frame(&camera, Viewport { width: 800.0, height: 600.0 });
//! assert_eq!(frame.anchors.len(), 1);
//! # Ok::<(), hexglobe::GlobeError>(())
//! ```

pub mod aggregate;
pub mod camera;
pub mod cells;
pub mod error;
pub mod geometry;
pub mod globe;
pub mod height;
pub mod overlay;
pub mod projection;
pub mod selection;
pub mod types;

pub use aggregate::{AggregatedCell, aggregate};
pub use camera::{CameraSnapshot, Ray};
pub use cells::{BoundaryRing, CellGeometry, CellId};
pub use error::{GlobeError, Result};
pub use geometry::{BarInstance, HexTile};
pub use globe::{FrameOutput, HexGlobe};
pub use overlay::{AnchorState, OverlayAnchor, Viewport, VisibilityRanker};
pub use selection::{HighlightCommand, PointerEvent, SelectionState};
pub use types::{Coordinates, GeoPoint, GlobeConfig, Theme};

pub use glam::{DVec2, DVec3};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GlobeError, HexGlobe, Result};

    pub use crate::{Coordinates, GeoPoint, GlobeConfig, Theme};

    pub use crate::{CameraSnapshot, Viewport};

    pub use crate::{AnchorState, OverlayAnchor, SelectionState};

    pub use glam::{DVec2, DVec3};
}
