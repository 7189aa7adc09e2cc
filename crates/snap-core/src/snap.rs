//! Snap targets
//!
//! A snap is a read-only view over a persistent model (or an analytic
//! construction) that a pointer can lock onto. Every variant declares its
//! tie-break priority next to its definition; lower wins.

use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, TopologyId};
use crate::math::{Plane, Ray, orientation_towards};
use crate::model::{CurveModel, EdgeModel, FaceModel};

/// Exact position and orientation produced by `Snap::project`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub position: Vec3,
    pub orientation: Quat,
}

/// Output unit of a pick operation
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub snap: Snap,
    pub position: Vec3,
    pub orientation: Quat,
}

impl SnapResult {
    pub fn new(snap: Snap, projection: Projection) -> Self {
        Self {
            snap,
            position: projection.position,
            orientation: projection.orientation,
        }
    }
}

/// A vertex, midpoint, center or any other single location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSnap {
    #[serde(default)]
    pub name: Option<String>,
    pub position: Vec3,
    #[serde(default)]
    pub orientation: Quat,
}

impl PointSnap {
    pub const PRIORITY: i32 = 1;

    pub fn new(position: Vec3) -> Self {
        Self {
            name: None,
            position,
            orientation: Quat::IDENTITY,
        }
    }

    pub fn named(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(position)
        }
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn project(&self, _approximate: Vec3) -> Projection {
        Projection {
            position: self.position,
            orientation: self.orientation,
        }
    }
}

/// A free-standing curve
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSnap {
    pub item: ItemId,
    pub curve: Arc<CurveModel>,
}

impl CurveSnap {
    pub const PRIORITY: i32 = 2;

    pub fn new(item: ItemId, curve: Arc<CurveModel>) -> Self {
        Self { item, curve }
    }

    pub fn project(&self, approximate: Vec3) -> Projection {
        project_on_polyline(self.curve.polyline.closest_point(approximate), approximate)
    }
}

/// An edge of a solid
#[derive(Debug, Clone, PartialEq)]
pub struct CurveEdgeSnap {
    pub edge: TopologyId,
    pub model: Arc<EdgeModel>,
}

impl CurveEdgeSnap {
    pub const PRIORITY: i32 = 2;

    pub fn new(edge: TopologyId, model: Arc<EdgeModel>) -> Self {
        Self { edge, model }
    }

    pub fn project(&self, approximate: Vec3) -> Projection {
        project_on_polyline(self.model.polyline.closest_point(approximate), approximate)
    }
}

/// A face of a solid
#[derive(Debug, Clone, PartialEq)]
pub struct FaceSnap {
    pub face: TopologyId,
    pub model: Arc<FaceModel>,
}

impl FaceSnap {
    pub const PRIORITY: i32 = 3;

    pub fn new(face: TopologyId, model: Arc<FaceModel>) -> Self {
        Self { face, model }
    }

    pub fn project(&self, approximate: Vec3) -> Projection {
        match self.model.mesh.closest_point(approximate) {
            Some((position, normal)) => Projection {
                position,
                orientation: orientation_towards(normal),
            },
            None => Projection {
                position: approximate,
                orientation: Quat::IDENTITY,
            },
        }
    }
}

/// An infinite line, e.g. a world axis or an extension of an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSnap {
    #[serde(default)]
    pub name: Option<String>,
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
    pub orientation: Quat,
}

impl AxisSnap {
    pub const PRIORITY: i32 = 4;

    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize_or(Vec3::Z);
        Self {
            name: None,
            origin,
            direction,
            orientation: orientation_towards(direction),
        }
    }

    pub fn named(name: impl Into<String>, origin: Vec3, direction: Vec3) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(origin, direction)
        }
    }

    pub fn x() -> Self {
        Self::named("x", Vec3::ZERO, Vec3::X)
    }

    pub fn y() -> Self {
        Self::named("y", Vec3::ZERO, Vec3::Y)
    }

    pub fn z() -> Self {
        Self::named("z", Vec3::ZERO, Vec3::Z)
    }

    /// Point on the axis nearest to the ray
    ///
    /// None when the ray is parallel to the axis or the nearest approach lies
    /// behind the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        ray.approach_line(self.origin, self.direction)
            .map(|approach| approach.on_line)
    }

    pub fn project(&self, approximate: Vec3) -> Projection {
        let s = (approximate - self.origin).dot(self.direction);
        Projection {
            position: self.origin + self.direction * s,
            orientation: self.orientation,
        }
    }
}

/// The ambient construction plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSnap {
    pub origin: Vec3,
    /// Unit normal
    pub normal: Vec3,
    pub orientation: Quat,
}

impl PlaneSnap {
    pub const PRIORITY: i32 = Snap::DEFAULT_PRIORITY;

    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or(Vec3::Z);
        Self {
            origin,
            normal,
            orientation: orientation_towards(normal),
        }
    }

    /// World XY plane through the origin
    pub fn xy() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.origin, self.normal)
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        ray.intersect_plane(&self.plane()).map(|t| ray.at(t))
    }

    pub fn project(&self, approximate: Vec3) -> Projection {
        Projection {
            position: self.plane().project(approximate),
            orientation: self.orientation,
        }
    }
}

impl Default for PlaneSnap {
    fn default() -> Self {
        Self::xy()
    }
}

/// Any snap target
#[derive(Debug, Clone, PartialEq)]
pub enum Snap {
    Point(PointSnap),
    Curve(CurveSnap),
    CurveEdge(CurveEdgeSnap),
    Face(FaceSnap),
    Axis(AxisSnap),
    ConstructionPlane(PlaneSnap),
}

impl Snap {
    /// Priority of snaps without a more specific rank
    pub const DEFAULT_PRIORITY: i32 = 10;

    pub fn priority(&self) -> i32 {
        match self {
            Snap::Point(_) => PointSnap::PRIORITY,
            Snap::Curve(_) => CurveSnap::PRIORITY,
            Snap::CurveEdge(_) => CurveEdgeSnap::PRIORITY,
            Snap::Face(_) => FaceSnap::PRIORITY,
            Snap::Axis(_) => AxisSnap::PRIORITY,
            Snap::ConstructionPlane(_) => PlaneSnap::PRIORITY,
        }
    }

    pub fn project(&self, approximate: Vec3) -> Projection {
        match self {
            Snap::Point(s) => s.project(approximate),
            Snap::Curve(s) => s.project(approximate),
            Snap::CurveEdge(s) => s.project(approximate),
            Snap::Face(s) => s.project(approximate),
            Snap::Axis(s) => s.project(approximate),
            Snap::ConstructionPlane(s) => s.project(approximate),
        }
    }

    /// Short variant name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Snap::Point(_) => "point",
            Snap::Curve(_) => "curve",
            Snap::CurveEdge(_) => "edge",
            Snap::Face(_) => "face",
            Snap::Axis(_) => "axis",
            Snap::ConstructionPlane(_) => "plane",
        }
    }

    pub fn as_point(&self) -> Option<&PointSnap> {
        match self {
            Snap::Point(point) => Some(point),
            _ => None,
        }
    }
}

impl From<PointSnap> for Snap {
    fn from(snap: PointSnap) -> Self {
        Snap::Point(snap)
    }
}

impl From<AxisSnap> for Snap {
    fn from(snap: AxisSnap) -> Self {
        Snap::Axis(snap)
    }
}

impl From<PlaneSnap> for Snap {
    fn from(snap: PlaneSnap) -> Self {
        Snap::ConstructionPlane(snap)
    }
}

fn project_on_polyline(closest: Option<(Vec3, Vec3)>, approximate: Vec3) -> Projection {
    match closest {
        Some((position, tangent)) => Projection {
            position,
            orientation: orientation_towards(tangent),
        },
        None => Projection {
            position: approximate,
            orientation: Quat::IDENTITY,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::model::Polyline;

    fn segment_curve() -> CurveSnap {
        let polyline = Polyline::new(vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)]);
        CurveSnap::new(ItemId::new(1), Arc::new(CurveModel { polyline: Arc::new(polyline) }))
    }

    #[test]
    fn test_priorities() {
        let face = FaceSnap::new(
            TopologyId::face(ItemId::new(0), 0),
            Arc::new(FaceModel { mesh: Arc::new(Mesh::cube()) }),
        );
        assert_eq!(Snap::from(PointSnap::new(Vec3::ZERO)).priority(), 1);
        assert_eq!(Snap::Curve(segment_curve()).priority(), 2);
        assert_eq!(Snap::Face(face).priority(), 3);
        assert_eq!(Snap::from(AxisSnap::x()).priority(), 4);
        assert_eq!(Snap::from(PlaneSnap::xy()).priority(), 10);
        assert_eq!(CurveEdgeSnap::PRIORITY, CurveSnap::PRIORITY);
    }

    #[test]
    fn test_point_project_ignores_input() {
        let snap = PointSnap::named("center", Vec3::new(1.0, 2.0, 3.0));
        let projection = snap.project(Vec3::new(9.0, 9.0, 9.0));
        assert_eq!(projection.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(projection.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_curve_project_onto_polyline() {
        let projection = segment_curve().project(Vec3::new(1.5, 0.3, 0.0));
        assert!(projection.position.distance(Vec3::new(1.5, 0.0, 0.0)) < 1e-5);
        assert!((projection.orientation * Vec3::Z).distance(Vec3::X) < 1e-5);
    }

    #[test]
    fn test_face_project_onto_surface() {
        let top = Mesh::cube_faces()[4].clone();
        let face = FaceSnap::new(
            TopologyId::face(ItemId::new(0), 4),
            Arc::new(FaceModel { mesh: Arc::new(top) }),
        );
        let projection = face.project(Vec3::new(0.2, -0.1, 0.48));
        assert!(projection.position.distance(Vec3::new(0.2, -0.1, 0.5)) < 1e-5);
        assert!((projection.orientation * Vec3::Z).distance(Vec3::Z) < 1e-5);
    }

    #[test]
    fn test_axis_intersect() {
        let axis = AxisSnap::x();
        let ray = Ray::new(Vec3::new(2.0, 1.0, 10.0), Vec3::NEG_Z);
        let hit = axis.intersect(&ray).unwrap();
        assert!(hit.distance(Vec3::new(2.0, 0.0, 0.0)) < 1e-5);
    }

    #[test]
    fn test_axis_intersect_parallel_is_none() {
        let axis = AxisSnap::z();
        let ray = Ray::new(Vec3::new(1.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(axis.intersect(&ray).is_none());
    }

    #[test]
    fn test_axis_project() {
        let axis = AxisSnap::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
        let projection = axis.project(Vec3::new(3.0, 3.0, 4.0));
        assert!(projection.position.distance(Vec3::new(0.0, 1.0, 4.0)) < 1e-5);
        assert_eq!(axis.direction, Vec3::Z);
    }

    #[test]
    fn test_plane_intersect_and_project() {
        let plane = PlaneSnap::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        let ray = Ray::new(Vec3::new(1.0, 2.0, 5.0), Vec3::NEG_Z);
        let hit = plane.intersect(&ray).unwrap();
        assert!(hit.distance(Vec3::new(1.0, 2.0, 1.0)) < 1e-5);

        let projection = plane.project(Vec3::new(1.0, 2.0, 7.0));
        assert!(projection.position.distance(Vec3::new(1.0, 2.0, 1.0)) < 1e-5);
        assert_eq!(projection.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_point_snap_from_json() {
        let snap: PointSnap = serde_json::from_str(r#"{"position":[1.0,0.0,0.0]}"#).unwrap();
        assert_eq!(snap, PointSnap::new(Vec3::X));
    }
}
