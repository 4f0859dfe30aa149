//! Document model for decoded notes.
//!
//! Everything a note parses into lives here: points, curves, colors and the
//! bounding types used when planning a canvas. The parser in
//! [`crate::note`] produces these types; [`crate::geometry`],
//! [`crate::path`] and [`crate::render`] consume them.
//!
//! # Example
//!
//! ```
//! use notesketch::ir::{Curve, CurvePoint, NoteDocument, Rgba};
//!
//! let document = NoteDocument {
//!     curves: vec![
//!         Curve::new(vec![CurvePoint::new(10.0, 10.0), CurvePoint::new(20.0, 20.0)])
//!             .with_width(1.0)
//!             .with_color(Rgba::BLACK),
//!     ],
//!     width: 800.0,
//!     height: 1000.0,
//! };
//! assert_eq!(document.point_count(), 2);
//! ```

mod bounds;
mod color;
pub mod io_json;
mod model;
mod point;

// Re-export core types for convenient access
pub use bounds::{Bounds, CropRect};
pub use color::Rgba;
pub use model::{Curve, NoteDocument, DEFAULT_STROKE_WIDTH};
pub use point::CurvePoint;
