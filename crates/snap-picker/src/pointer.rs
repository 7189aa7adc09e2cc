//! Per-command pointer state: ad-hoc snaps, restrictions, a forced axis and
//! the construction-plane override.

use snap_core::{AxisSnap, PlaneSnap, SceneObject, Snap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerModel {
    snaps: Vec<Snap>,
    restrictions: Vec<Snap>,
    choice: Option<AxisSnap>,
    construction_plane: Option<PlaneSnap>,
}

impl PointerModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snap offered by the current command
    pub fn add_snap(&mut self, snap: impl Into<Snap>) -> &mut Self {
        self.snaps.push(snap.into());
        self
    }

    /// Limit `intersect` to exactly these snaps
    pub fn restrict_to(&mut self, snap: impl Into<Snap>) -> &mut Self {
        self.restrictions.push(snap.into());
        self
    }

    pub fn clear_restrictions(&mut self) -> &mut Self {
        self.restrictions.clear();
        self
    }

    /// Force every pick onto `axis`
    pub fn set_choice(&mut self, axis: AxisSnap) -> &mut Self {
        self.choice = Some(axis);
        self
    }

    pub fn clear_choice(&mut self) -> &mut Self {
        self.choice = None;
        self
    }

    pub fn set_construction_plane(&mut self, plane: PlaneSnap) -> &mut Self {
        self.construction_plane = Some(plane);
        self
    }

    pub fn snaps(&self) -> &[Snap] {
        &self.snaps
    }

    pub fn restrictions(&self) -> &[Snap] {
        &self.restrictions
    }

    pub fn choice(&self) -> Option<&AxisSnap> {
        self.choice.as_ref()
    }

    pub fn construction_plane(&self) -> Option<&PlaneSnap> {
        self.construction_plane.as_ref()
    }

    /// Plane used for the fallback pick
    ///
    /// Orthographic views always pick on the view's own plane.
    pub fn actual_construction_plane_given(&self, base: &PlaneSnap, is_ortho: bool) -> PlaneSnap {
        match &self.construction_plane {
            Some(plane) if !is_ortho => plane.clone(),
            _ => base.clone(),
        }
    }

    pub(crate) fn snappers(&self) -> Vec<SceneObject> {
        self.snaps.iter().map(SceneObject::snapper).collect()
    }

    pub(crate) fn point_snappers(&self) -> Vec<SceneObject> {
        self.snaps
            .iter()
            .filter(|snap| matches!(snap, Snap::Point(_)))
            .map(SceneObject::snapper)
            .collect()
    }

    pub(crate) fn restriction_snappers(&self) -> Vec<SceneObject> {
        self.restrictions.iter().map(SceneObject::snapper).collect()
    }
}
