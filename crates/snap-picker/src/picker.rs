//! Snap picker
//!
//! Casts the pointer ray against the candidate set for the current mode,
//! clusters coincident hits, classifies them into snaps, orders them by
//! priority and projects each onto its snap. `nearby` is the loose hover
//! query, `intersect` the authoritative one.

use glam::{Vec2, Vec3};
use snap_core::{
    AxisSnap, CurveEdgeSnap, CurveSnap, FaceSnap, GeometryDatabase, Intersectable, PickerConfig,
    PointSnap, Projection, Ray, Result, SceneObject, Snap, SnapError, SnapResult, TopologyModel,
    inst2curve,
};

use crate::cache::GeometryCache;
use crate::pointer::PointerModel;
use crate::raycast::{CpuRaycaster, Intersection, RaycastParams, Raycaster};
use crate::viewport::Viewport;

/// A classified hit before projection
#[derive(Debug, Clone, PartialEq)]
struct Classified {
    snap: Snap,
    point: Vec3,
}

pub struct SnapPicker<R: Raycaster = CpuRaycaster> {
    raycaster: R,
    config: PickerConfig,
    ray: Ray,
    viewport: Viewport,
}

impl SnapPicker<CpuRaycaster> {
    pub fn new(config: PickerConfig) -> Self {
        Self::with_raycaster(CpuRaycaster, config)
    }
}

impl Default for SnapPicker<CpuRaycaster> {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}

impl<R: Raycaster> SnapPicker<R> {
    pub fn with_raycaster(raycaster: R, config: PickerConfig) -> Self {
        Self {
            raycaster,
            config,
            ray: Ray::default(),
            viewport: Viewport::default(),
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Derive the ray from a pointer position (pixels, origin top-left) and
    /// remember the viewport's modes for the next picks
    pub fn set_from_viewport(&mut self, pointer: Vec2, viewport: &Viewport) {
        self.ray = viewport.ray_from_pointer(pointer);
        self.viewport = viewport.clone();
    }

    /// Use a ray derived elsewhere
    pub fn set_ray(&mut self, ray: Ray) {
        self.ray = ray;
    }

    fn params(&self, resolution: Vec2, points_threshold: f32) -> RaycastParams {
        RaycastParams {
            points_threshold,
            line_threshold: self.config.line_threshold,
            scale: self.viewport.camera.pixel_scale(resolution),
        }
    }

    /// Point snaps near the pointer, for hover feedback
    pub fn nearby(
        &self,
        pointer: &PointerModel,
        cache: &GeometryCache,
        db: &dyn GeometryDatabase,
    ) -> Result<Vec<PointSnap>> {
        if !cache.enabled() {
            return Ok(Vec::new());
        }

        cache.set_resolution(self.viewport.resolution());
        let params = self.params(cache.resolution(), self.config.nearby_points_threshold);

        let additional = pointer.point_snappers();
        let candidates: Vec<&SceneObject> = cache.points().iter().chain(&additional).collect();
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.raycaster.intersect_objects(&self.ray, &candidates, &params);
        let classified = classify_hits(&hits, &candidates, cache, db)?;
        log::trace!("nearby: {} hits, {} snaps", hits.len(), classified.len());

        Ok(classified
            .into_iter()
            .filter_map(|c| match c.snap {
                Snap::Point(point) => Some(point),
                _ => None,
            })
            .take(self.config.nearby_limit)
            .collect())
    }

    /// Snaps under the pointer, best first
    ///
    /// Falls back to the construction plane when nothing is found. A forced
    /// choice on the pointer model bypasses every other candidate.
    pub fn intersect(
        &self,
        pointer: &PointerModel,
        cache: &GeometryCache,
        db: &dyn GeometryDatabase,
    ) -> Result<Vec<SnapResult>> {
        if !cache.enabled() {
            log::trace!("intersect: snapping disabled");
            return Ok(self.intersect_construction_plane(pointer));
        }
        if let Some(choice) = pointer.choice() {
            return Ok(self.intersect_choice(choice));
        }

        cache.set_resolution(self.viewport.resolution());
        let params = self.params(cache.resolution(), self.config.points_threshold);

        let restrictions = pointer.restriction_snappers();
        let additional = if restrictions.is_empty() {
            pointer.snappers()
        } else {
            Vec::new()
        };
        let candidates: Vec<&SceneObject> = if restrictions.is_empty() {
            cache
                .snappers()
                .iter()
                .chain(&additional)
                .chain(db.visible_objects())
                .collect()
        } else {
            restrictions.iter().collect()
        };

        let mut hits = self.raycaster.intersect_objects(&self.ray, &candidates, &params);
        if !self.viewport.is_xray() {
            hits = find_all_very_close_together(hits, self.config.clustering_epsilon);
        }

        let mut classified = classify_hits(&hits, &candidates, cache, db)?;
        classified.sort_by_key(|c| c.snap.priority());
        log::trace!(
            "intersect: {} candidates, {} hits, {} snaps",
            candidates.len(),
            hits.len(),
            classified.len()
        );

        let results: Vec<SnapResult> = classified
            .into_iter()
            .map(|Classified { snap, point }| {
                let projection = snap.project(point);
                SnapResult::new(snap, projection)
            })
            .collect();

        if results.is_empty() {
            return Ok(self.intersect_construction_plane(pointer));
        }
        Ok(results)
    }

    fn intersect_construction_plane(&self, pointer: &PointerModel) -> Vec<SnapResult> {
        let plane = pointer.actual_construction_plane_given(
            &self.viewport.construction_plane,
            self.viewport.is_ortho(),
        );
        let snap = Snap::from(plane);
        let snapper = SceneObject::snapper(&snap);
        let params = self.params(self.viewport.resolution(), self.config.points_threshold);

        let hits = self.raycaster.intersect_objects(&self.ray, &[&snapper], &params);
        match hits.first() {
            Some(hit) => {
                let projection = snap.project(hit.point);
                vec![SnapResult::new(snap, projection)]
            }
            None => {
                log::trace!("construction plane missed");
                Vec::new()
            }
        }
    }

    fn intersect_choice(&self, choice: &AxisSnap) -> Vec<SnapResult> {
        match choice.intersect(&self.ray) {
            Some(position) => {
                let projection = Projection {
                    position,
                    orientation: choice.orientation,
                };
                vec![SnapResult::new(Snap::Axis(choice.clone()), projection)]
            }
            None => Vec::new(),
        }
    }
}

/// Keep the hits within `epsilon` of the nearest one
///
/// `hits` must be sorted by ascending distance.
pub(crate) fn find_all_very_close_together(
    mut hits: Vec<Intersection>,
    epsilon: f32,
) -> Vec<Intersection> {
    let Some(nearest) = hits.first().map(|hit| hit.distance) else {
        return hits;
    };
    hits.retain(|hit| (hit.distance - nearest).abs() < epsilon);
    hits
}

fn classify_hits(
    hits: &[Intersection],
    candidates: &[&SceneObject],
    cache: &GeometryCache,
    db: &dyn GeometryDatabase,
) -> Result<Vec<Classified>> {
    let mut result = Vec::with_capacity(hits.len());
    for hit in hits {
        if let Some(snap) = classify(candidates[hit.object], hit, cache, db)? {
            result.push(Classified {
                snap,
                point: hit.point,
            });
        }
    }
    Ok(result)
}

/// Map a hit object to its snap; regions yield None
pub(crate) fn classify(
    object: &SceneObject,
    hit: &Intersection,
    cache: &GeometryCache,
    db: &dyn GeometryDatabase,
) -> Result<Option<Snap>> {
    let snap = match &object.intersectable {
        Intersectable::Face(id) => match db.lookup_topology_item(*id) {
            Some(TopologyModel::Face(model)) => Snap::Face(FaceSnap::new(*id, model)),
            _ => return Err(SnapError::MissingTopology(*id)),
        },
        Intersectable::CurveEdge(id) => match db.lookup_topology_item(*id) {
            Some(TopologyModel::Edge(model)) => Snap::CurveEdge(CurveEdgeSnap::new(*id, model)),
            _ => return Err(SnapError::MissingTopology(*id)),
        },
        Intersectable::CurveSegment(item) => {
            let instance = db.lookup(*item).ok_or(SnapError::MissingItem(*item))?;
            let curve = inst2curve(instance).ok_or(SnapError::NotACurve(*item))?;
            Snap::Curve(CurveSnap::new(*item, curve))
        }
        Intersectable::PointBuffer(handle) => {
            let index = hit.index.ok_or(SnapError::InvalidSnapTarget)?;
            Snap::Point(cache.get(*handle, index)?.clone())
        }
        Intersectable::Snapper(snap) => snap.clone(),
        Intersectable::Region(_) => return Ok(None),
        Intersectable::Unclassified => return Err(SnapError::InvalidSnapTarget),
    };
    Ok(Some(snap))
}
