//! Endomap Core Library
//!
//! The projection and marker-placement core of a clinical lesion-mapping
//! application. Lesions are stored once, in a canonical 3D model space, and
//! projected into four fixed orthogonal views so that a marker placed in any
//! view appears correctly in all others.
//!
//! # Modules
//!
//! - [`space`] - Canonical model space bounds and clamping
//! - [`projection`] - View projection (3D <-> 2D) and canvas bounds
//! - [`markers`] - Lesion records and the marker engine (single source of truth)
//! - [`interaction`] - Pointer-event controllers for 2D canvas and 3D viewport surfaces
//! - [`overlay`] - Per-view drawing-stroke bitmaps with bounded undo/redo history
//! - [`config`] - Centralized interaction tunables
//!
//! # Example
//!
//! ```
//! use endomap_core::markers::{LesionMarkerEngine, Severity};
//! use endomap_core::projection::{CanvasBounds, ViewKind};
//! use glam::{Vec2, Vec3};
//!
//! let mut engine = LesionMarkerEngine::new();
//! let id = engine.create(Vec3::new(1.0, 0.0, 0.0), Severity::Deep);
//!
//! // Project the marker into the coronal view of a 500x500 canvas at zoom 1.
//! let bounds = CanvasBounds::compute(500.0, 500.0, 1.0);
//! let px = ViewKind::Coronal.project(engine.get(&id).unwrap().position, &bounds);
//! assert_eq!(px, Vec2::new(350.0, 250.0));
//! ```

pub mod config;
pub mod interaction;
pub mod markers;
pub mod overlay;
pub mod projection;
pub mod space;
