//! skywcs: composable sky-to-pixel transformations for astronomical imaging
//!
//! This crate maps between unit vectors on the celestial sphere and 2-D
//! projection-plane or pixel coordinates. The building blocks are small
//! [`Transformer`](transform::Transformer) stages (rotations, projections,
//! distortions, affine scalers) that chain into a [`Converter`]; a [`Wcs`]
//! is the canonical sky → pixel chain and is usually assembled with a
//! [`WcsBuilder`].
//!
//! Polygons whose projected outline wraps around a projection seam (the 180°
//! meridian of a plate carrée map, for example) are detected and split by the
//! straddle/clip machinery in [`projection::straddle`] and [`projection::clip`].
//!
//! ```rust
//! use skywcs::{ProjectionKind, WcsBuilder};
//!
//! let builder = WcsBuilder {
//!     ref_ra: 10f64.to_radians(),
//!     ref_de: 10f64.to_radians(),
//!     width: 800.0,
//!     height: 600.0,
//!     projection: ProjectionKind::Sin,
//!     pixel_scale: 1e-4,
//!     ..WcsBuilder::default()
//! };
//! let wcs = builder.build().unwrap();
//! let pixel = wcs.rade_to_pixel(builder.ref_ra, builder.ref_de).unwrap();
//! assert!((pixel.x - 400.0).abs() < 1e-9);
//! assert!((pixel.y - 300.0).abs() < 1e-9);
//! ```

use thiserror::Error;

pub mod constants;
pub mod coordinates;
pub mod framelib;
pub mod projection;
pub mod transform;
pub mod wcs;

// Re-export commonly used types
pub use coordinates::position::Position;
pub use framelib::CoordinateSystem;
pub use projection::{Deprojecter, Projecter, Projection, ProjectionKind};
pub use transform::converter::{Converter, Workspace};
pub use transform::rotater::Rotater;
pub use transform::scaler::Scaler;
pub use transform::Transformer;
pub use wcs::builder::WcsBuilder;
pub use wcs::Wcs;

/// Main error type for the skywcs library
#[derive(Debug, Error)]
pub enum WcsError {
    #[error("Dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Chain dimension mismatch at stage {stage}: previous stage produces {expected} components but stage accepts {actual}")]
    ChainDimensionMismatch {
        stage: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown coordinate frame: {0}")]
    UnknownFrame(String),

    #[error("Unknown projection: {0}")]
    UnknownProjection(String),

    #[error("Transformation is not invertible: {0}")]
    NotInvertible(String),

    #[error("No shadow points in the {0} projection")]
    UnsupportedShadow(ProjectionKind),

    #[error("Illegal configuration: {0}")]
    IllegalConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for skywcs operations
pub type Result<T> = std::result::Result<T, WcsError>;
