//! Persistent models referenced by snaps.
//!
//! Models are immutable once registered with a database; snaps and scene
//! objects share them through `Arc`.

use std::sync::Arc;

use glam::Vec3;

use crate::ids::TopologyId;
use crate::math::closest_point_on_segment;
use crate::mesh::Mesh;

/// Polyline approximation of a curve or edge
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec3>,
    pub closed: bool,
}

impl Polyline {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points, closed: false }
    }

    pub fn closed(points: Vec<Vec3>) -> Self {
        Self { points, closed: true }
    }

    /// Consecutive point pairs, including the closing segment
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if self.points.len() > 2 => Some((last, first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    /// Closest point to `p` and the unit tangent of the segment it lies on
    pub fn closest_point(&self, p: Vec3) -> Option<(Vec3, Vec3)> {
        let best = self
            .segments()
            .map(|(a, b)| (closest_point_on_segment(p, a, b), (b - a).normalize_or_zero()))
            .min_by(|(a, _), (b, _)| a.distance_squared(p).total_cmp(&b.distance_squared(p)));

        // 点が1つだけの場合
        best.or_else(|| self.points.first().map(|&only| (only, Vec3::ZERO)))
    }
}

/// A face of a solid; its tessellation is the picking and projection surface
#[derive(Debug, Clone, PartialEq)]
pub struct FaceModel {
    pub mesh: Arc<Mesh>,
}

/// An edge of a solid
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeModel {
    pub polyline: Arc<Polyline>,
}

/// Curve-level representation of a space instance
#[derive(Debug, Clone, PartialEq)]
pub struct CurveModel {
    pub polyline: Arc<Polyline>,
}

/// Result of a topology lookup
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyModel {
    Face(Arc<FaceModel>),
    Edge(Arc<EdgeModel>),
}

/// Instance-level model stored per item
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceModel {
    Curve(Arc<CurveModel>),
    Solid {
        faces: Vec<TopologyId>,
        edges: Vec<TopologyId>,
    },
    Region(Arc<Mesh>),
}

/// Converts an instance-level model to its curve-level representation
pub fn inst2curve(instance: &InstanceModel) -> Option<Arc<CurveModel>> {
    match instance {
        InstanceModel::Curve(curve) => Some(Arc::clone(curve)),
        InstanceModel::Solid { .. } | InstanceModel::Region(_) => None,
    }
}
