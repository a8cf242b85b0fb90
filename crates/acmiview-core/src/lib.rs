//! # acmiview Core
//!
//! Error handling, configuration and coordinate conversion shared by the acmiview
//! replay engine.
//!
//! - **Errors**: the import error taxonomy (fatal import errors, per-record errors,
//!   geodetic errors) using `thiserror`, serializable for structured logging.
//! - **Configuration**: YAML files with environment variable overrides and validation.
//! - **Geo**: projection of WGS84 longitude/latitude/altitude into a local
//!   East-North-Up frame around an injected reference point.
//!
//! ## Example
//!
//! ```
//! use acmiview_core::geo::ReferencePoint;
//!
//! let reference = ReferencePoint::new(120.0, 60.0, 0.0);
//! let p = reference.to_local(120.0, 60.0, 1000.0).unwrap();
//! assert!((p.up() - 1000.0).abs() < 1e-6);
//! ```

pub mod config;
pub mod error;
pub mod geo;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{AcmiViewError, GeoError, ImportError, RecordError, Result};
pub use geo::{geodetic_to_local, LocalPosition, ReferencePoint};
