//! View Projection Module
//!
//! Bidirectional mapping between the canonical 3D model space and the 2D
//! pixel space of each named view, plus the per-render canvas frame the
//! mapping is expressed in.
//!
//! Every view is a fixed orthogonal projection: two model axes are visible,
//! one (the depth axis) is unrecoverable from a 2D click and must be carried
//! over from prior state. See [`view::ViewKind`] for the axis tables.

pub mod bounds;
pub mod view;

pub use bounds::CanvasBounds;
pub use view::ViewKind;
