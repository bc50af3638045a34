//! Pure domain types with minimal dependencies
//!
//! Coordinates, measurements and cached statistics. Nothing in here talks to
//! the image, the clock or the renderer.

pub mod geometry;
pub mod point;

pub use geometry::*;
pub use point::*;
