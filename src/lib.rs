//! # routesculpt
//!
//! Geospatial route processing for map art and 3d-printable terrain sculptures:
//! polyline decoding, route normalization, path simplification and
//! elevation based vertex coloring.

pub mod common;
pub mod input;
pub mod model;

pub use common::color::{ColorStop, Gradient, GradientPreset, RGB};
pub use common::error::{DecodeError, RouteError};
pub use common::types::{BoundingBox, GeoPoint};
pub use model::route::{normalize, normalize_polyline, RouteData, RouteStatistics};
pub use model::simplify::{simplify, simplify_to_count};
pub use model::terrain::{colorize, VertexColorBuffer};
