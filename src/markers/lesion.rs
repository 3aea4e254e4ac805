//! Lesion Records
//!
//! The durable annotation entity: a canonical 3D position plus clinical
//! attributes. Serialized as-is by the persistence collaborator, which stores
//! the marker list as a plain array of these records.

use glam::Vec3;
use serde::{Deserialize, Serialize};

// ============================================================================
// SEVERITY
// ============================================================================

/// Clinical severity grade of a lesion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Peritoneal surface involvement only.
    Superficial,
    /// Intermediate infiltration.
    Moderate,
    /// Deep infiltrating lesion.
    Deep,
}

impl Severity {
    /// Stable identifier, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Superficial => "superficial",
            Severity::Moderate => "moderate",
            Severity::Deep => "deep",
        }
    }

    /// Marker fill color (RGBA) for this grade, shared by every view.
    pub fn color(&self) -> [f32; 4] {
        match self {
            Severity::Superficial => [0.95, 0.77, 0.20, 1.0],
            Severity::Moderate => [0.89, 0.45, 0.13, 1.0],
            Severity::Deep => [0.73, 0.13, 0.18, 1.0],
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// LESION
// ============================================================================

/// A single lesion marker.
///
/// Identity is the `id`; uniqueness of `id` within an engine is a hard
/// invariant. The position is the only view-independent location datum --
/// every rendered surface derives its pixel coordinates from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesion {
    /// Opaque unique identifier, assigned by the engine at creation.
    pub id: String,
    /// Position in canonical model space.
    pub position: Vec3,
    /// Clinical severity grade.
    pub severity: Severity,
    /// Optional anatomical location tag (e.g. "uterosacral ligament, left").
    pub location: Option<String>,
    /// Optional free-text clinical note.
    pub note: Option<String>,
}

// ============================================================================
// TESTS
// ============================================================================
