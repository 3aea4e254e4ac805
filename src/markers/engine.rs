//! Lesion Marker Engine
//!
//! Owns the full collection of lesion markers and the current selection.
//! All writes go through the engine's mutating operations; renderers and
//! export collaborators only read. The surrounding event loop serializes
//! access, so no locking is involved anywhere.
//!
//! Unknown ids on `move_marker`/`remove`/attribute edits are silent no-ops:
//! callers cannot distinguish "applied" from "id not found" and must not
//! rely on it.

use std::path::Path;

use glam::{Vec2, Vec3};
use log::{debug, info};

use super::lesion::{Lesion, Severity};
use crate::projection::{CanvasBounds, ViewKind};

// ============================================================================
// SIMPLE RNG (xorshift32)
// ============================================================================

/// Minimal deterministic pseudo-random number generator (xorshift32).
/// Supplies the random suffix of marker ids.
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed. A seed of 0 is bumped to 1
    /// because xorshift32 requires a non-zero state.
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    /// Advance the state and return the next pseudo-random `u32`.
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

/// Seed derived from the wall clock at engine creation. Only the RNG stream
/// is clock-seeded; id uniqueness itself rests on the monotonic counter.
fn clock_seed() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(0x9e37_79b9)
}

// ============================================================================
// ENGINE
// ============================================================================

/// The single source of truth for all lesion markers.
///
/// One engine instance is shared (by reference) between every rendered view
/// and every interaction controller of an editing session; its lifetime is
/// tied to whatever owns that session. There is no ambient global.
pub struct LesionMarkerEngine {
    /// Markers in creation order. Draw order follows insertion order, so the
    /// last entry renders topmost.
    markers: Vec<Lesion>,
    /// Id of the currently selected marker, if any.
    selected: Option<String>,
    /// Monotonic counter feeding id generation.
    next_index: u64,
    /// Random-suffix stream for id generation.
    rng: SimpleRng,
}

impl LesionMarkerEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    /// Create an empty engine with a fixed id-suffix seed. Deterministic ids
    /// for tests and replay tooling.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            markers: Vec::new(),
            selected: None,
            next_index: 0,
            rng: SimpleRng::new(seed),
        }
    }

    /// Generate a fresh marker id: monotonic counter plus random suffix.
    /// The counter alone guarantees process-lifetime uniqueness even under
    /// rapid successive calls; the suffix keeps ids from separate sessions
    /// from colliding in merged exports.
    fn next_id(&mut self) -> String {
        let index = self.next_index;
        self.next_index += 1;
        format!("lesion-{}-{:08x}", index, self.rng.next_u32())
    }

    // ========================================================================
    // MUTATING OPERATIONS
    // ========================================================================

    /// Create a marker at `position` with the given severity and return its
    /// id. The new marker becomes the selected one.
    pub fn create(&mut self, position: Vec3, severity: Severity) -> String {
        let id = self.next_id();
        self.markers.push(Lesion {
            id: id.clone(),
            position,
            severity,
            location: None,
            note: None,
        });
        self.selected = Some(id.clone());
        info!(
            "marker {id} created at ({:.2}, {:.2}, {:.2}) severity={severity}",
            position.x, position.y, position.z
        );
        id
    }

    /// Replace the position of an existing marker. Position only; severity,
    /// note, and selection are untouched. Unknown id: no-op.
    pub fn move_marker(&mut self, id: &str, new_position: Vec3) {
        match self.markers.iter_mut().find(|m| m.id == id) {
            Some(marker) => marker.position = new_position,
            None => debug!("move_marker: unknown id {id}"),
        }
    }

    /// Set the severity of an existing marker. Unknown id: no-op.
    pub fn set_severity(&mut self, id: &str, severity: Severity) {
        match self.markers.iter_mut().find(|m| m.id == id) {
            Some(marker) => marker.severity = severity,
            None => debug!("set_severity: unknown id {id}"),
        }
    }

    /// Set or clear the anatomical location tag. Unknown id: no-op.
    pub fn set_location(&mut self, id: &str, location: Option<String>) {
        match self.markers.iter_mut().find(|m| m.id == id) {
            Some(marker) => marker.location = location,
            None => debug!("set_location: unknown id {id}"),
        }
    }

    /// Set or clear the free-text note. Unknown id: no-op.
    pub fn set_note(&mut self, id: &str, note: Option<String>) {
        match self.markers.iter_mut().find(|m| m.id == id) {
            Some(marker) => marker.note = note,
            None => debug!("set_note: unknown id {id}"),
        }
    }

    /// Delete a marker. If it was selected, selection becomes none.
    /// Unknown id: no-op.
    pub fn remove(&mut self, id: &str) {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        if self.markers.len() == before {
            debug!("remove: unknown id {id}");
            return;
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        info!("marker {id} removed ({} remaining)", self.markers.len());
    }

    /// Empty the collection; selection becomes none.
    ///
    /// The engine holds no undo stack for markers -- a caller that wants
    /// clear to be reversible re-issues `create` for each record it held.
    pub fn clear(&mut self) {
        let count = self.markers.len();
        self.markers.clear();
        self.selected = None;
        info!("markers cleared ({count} removed)");
    }

    // ========================================================================
    // HIT TESTING
    // ========================================================================

    /// Return the id of the topmost marker whose projection into `view` lies
    /// within `radius_px` of `point` (inclusive), or `None`.
    ///
    /// Markers render in insertion order, so the later-created marker draws
    /// on top and wins ties -- the scan runs newest-first and stops at the
    /// first hit. Callers scale `radius_px` with the current zoom
    /// (`base_hit_radius * zoom`) so hit targets stay proportional on screen.
    pub fn hit_test(
        &self,
        point: Vec2,
        view: ViewKind,
        bounds: &CanvasBounds,
        radius_px: f32,
    ) -> Option<String> {
        self.markers
            .iter()
            .rev()
            .find(|m| view.project(m.position, bounds).distance(point) <= radius_px)
            .map(|m| m.id.clone())
    }

    /// Return the id of the newest marker within `radius` model units of
    /// `position`, or `None`. The 3D counterpart of [`Self::hit_test`] for
    /// the 3D viewport surface, where no single 2D view applies.
    pub fn nearest_within(&self, position: Vec3, radius: f32) -> Option<String> {
        self.markers
            .iter()
            .rev()
            .find(|m| m.position.distance(position) <= radius)
            .map(|m| m.id.clone())
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    /// All markers in creation order. Read-only: export and render
    /// collaborators must not mutate through this.
    pub fn markers(&self) -> &[Lesion] {
        &self.markers
    }

    /// Look up a marker by id.
    pub fn get(&self, id: &str) -> Option<&Lesion> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// The currently selected marker, if any.
    pub fn selected(&self) -> Option<&Lesion> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Id of the currently selected marker, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a marker by id. Returns false (selection unchanged) if the id
    /// is unknown.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    // ========================================================================
    // PERSISTENCE SEAM
    // ========================================================================

    /// Save the marker list to a JSON file (array of lesion records).
    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("{e}"))?;
        }
        let json = serde_json::to_string_pretty(&self.markers).map_err(|e| format!("{e}"))?;
        std::fs::write(path, json).map_err(|e| format!("{e}"))?;
        info!("saved {} markers to {}", self.markers.len(), path.display());
        Ok(())
    }

    /// Load a marker list from a JSON file, replacing the current collection.
    /// Selection becomes none.
    pub fn load(&mut self, path: &Path) -> Result<(), String> {
        let json = std::fs::read_to_string(path).map_err(|e| format!("{e}"))?;
        let loaded: Vec<Lesion> = serde_json::from_str(&json).map_err(|e| format!("{e}"))?;
        let count = loaded.len();
        self.markers = loaded;
        self.selected = None;
        info!("loaded {count} markers from {}", path.display());
        Ok(())
    }
}

impl Default for LesionMarkerEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> LesionMarkerEngine {
        LesionMarkerEngine::with_seed(42)
    }

    fn bounds() -> CanvasBounds {
        CanvasBounds::compute(500.0, 500.0, 1.0)
    }

    #[test]
    fn test_create_appends_and_selects() {
        let mut e = engine();
        let id = e.create(Vec3::new(1.0, 0.0, 0.0), Severity::Superficial);
        assert_eq!(e.len(), 1);
        assert_eq!(e.selected_id(), Some(id.as_str()));
        assert_eq!(e.get(&id).unwrap().position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ids_unique_under_rapid_creation() {
        let mut e = engine();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..500 {
            assert!(ids.insert(e.create(Vec3::ZERO, Severity::Moderate)));
        }
    }

    #[test]
    fn test_move_replaces_position_only() {
        let mut e = engine();
        let id = e.create(Vec3::ZERO, Severity::Deep);
        e.set_note(&id, Some("posterior cul-de-sac".to_string()));
        e.move_marker(&id, Vec3::new(0.5, 0.5, -1.0));

        let m = e.get(&id).unwrap();
        assert_eq!(m.position, Vec3::new(0.5, 0.5, -1.0));
        assert_eq!(m.severity, Severity::Deep);
        assert_eq!(m.note.as_deref(), Some("posterior cul-de-sac"));
        assert_eq!(e.selected_id(), Some(id.as_str()));
    }

    #[test]
    fn test_unknown_id_mutations_are_noops() {
        let mut e = engine();
        let id = e.create(Vec3::ZERO, Severity::Moderate);
        e.move_marker("lesion-99-deadbeef", Vec3::ONE);
        e.set_severity("lesion-99-deadbeef", Severity::Deep);
        e.remove("lesion-99-deadbeef");
        assert_eq!(e.len(), 1);
        assert_eq!(e.get(&id).unwrap().position, Vec3::ZERO);
        assert_eq!(e.get(&id).unwrap().severity, Severity::Moderate);
    }

    #[test]
    fn test_remove_clears_selection_of_removed_marker() {
        let mut e = engine();
        let a = e.create(Vec3::ZERO, Severity::Superficial);
        let b = e.create(Vec3::ONE, Severity::Deep);
        assert_eq!(e.selected_id(), Some(b.as_str()));

        // Removing an unselected marker leaves selection alone
        e.remove(&a);
        assert_eq!(e.selected_id(), Some(b.as_str()));

        e.remove(&b);
        assert!(e.selected().is_none());
        assert!(e.is_empty());
    }

    #[test]
    fn test_clear_empties_and_deselects() {
        let mut e = engine();
        e.create(Vec3::ZERO, Severity::Superficial);
        e.create(Vec3::ONE, Severity::Deep);
        e.clear();
        assert!(e.is_empty());
        assert!(e.selected_id().is_none());
    }

    #[test]
    fn test_hit_test_prefers_later_creation() {
        let mut e = engine();
        let _first = e.create(Vec3::new(1.0, 0.0, 0.0), Severity::Superficial);
        let second = e.create(Vec3::new(1.0, 0.0, 0.0), Severity::Deep);
        for view in ViewKind::ALL {
            let px = view.project(Vec3::new(1.0, 0.0, 0.0), &bounds());
            let hit = e.hit_test(px, view, &bounds(), 10.0);
            assert_eq!(hit.as_deref(), Some(second.as_str()), "{view}");
        }
    }

    #[test]
    fn test_hit_test_radius_is_inclusive() {
        let mut e = engine();
        e.create(Vec3::new(1.0, 0.0, 0.0), Severity::Moderate);
        // Coronal projection lands at (350, 250); probe 10px to the right.
        let probe = Vec2::new(360.0, 250.0);
        assert!(
            e.hit_test(probe, ViewKind::Coronal, &bounds(), 10.0)
                .is_some()
        );
        assert!(
            e.hit_test(probe, ViewKind::Coronal, &bounds(), 9.99)
                .is_none()
        );
    }

    #[test]
    fn test_hit_test_misses_removed_marker() {
        let mut e = engine();
        let id = e.create(Vec3::new(0.0, 1.0, 0.0), Severity::Deep);
        let px = ViewKind::Coronal.project(Vec3::new(0.0, 1.0, 0.0), &bounds());
        assert!(e.hit_test(px, ViewKind::Coronal, &bounds(), 25.0).is_some());

        e.remove(&id);
        assert!(e.hit_test(px, ViewKind::Coronal, &bounds(), 25.0).is_none());
    }

    #[test]
    fn test_nearest_within_recency_and_radius() {
        let mut e = engine();
        e.create(Vec3::new(0.0, 0.0, 0.0), Severity::Superficial);
        let near = e.create(Vec3::new(0.05, 0.0, 0.0), Severity::Deep);

        assert_eq!(
            e.nearest_within(Vec3::new(0.02, 0.0, 0.0), 0.1).as_deref(),
            Some(near.as_str())
        );
        assert!(e.nearest_within(Vec3::new(1.5, 1.5, 1.5), 0.1).is_none());
    }

    #[test]
    fn test_select_known_and_unknown() {
        let mut e = engine();
        let a = e.create(Vec3::ZERO, Severity::Superficial);
        e.create(Vec3::ONE, Severity::Deep);

        assert!(e.select(&a));
        assert_eq!(e.selected_id(), Some(a.as_str()));
        assert!(!e.select("lesion-7-00000000"));
        assert_eq!(e.selected_id(), Some(a.as_str()));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.json");

        let mut e = engine();
        let id = e.create(Vec3::new(0.5, -0.5, 1.0), Severity::Moderate);
        e.set_location(&id, Some("rectovaginal septum".to_string()));
        e.save(&path).unwrap();

        let mut restored = LesionMarkerEngine::with_seed(7);
        restored.create(Vec3::ZERO, Severity::Deep); // replaced by load
        restored.load(&path).unwrap();

        assert_eq!(restored.len(), 1);
        assert!(restored.selected_id().is_none());
        let m = restored.get(&id).unwrap();
        assert_eq!(m.position, Vec3::new(0.5, -0.5, 1.0));
        assert_eq!(m.location.as_deref(), Some("rectovaginal septum"));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let mut e = engine();
        assert!(e.load(Path::new("/nonexistent/markers.json")).is_err());
    }
}
