//! Raycastable scene proxies and the tag that ties them back to a snap.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::ids::{BufferHandle, ItemId, TopologyId};
use crate::mesh::Mesh;
use crate::model::Polyline;
use crate::snap::Snap;

/// Point buffer element
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
}

impl PointVertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

/// Raycastable geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Vec3),
    /// One hit per element, reported with its index
    Points(Arc<[PointVertex]>),
    Polyline(Arc<Polyline>),
    Mesh(Arc<Mesh>),
    /// Infinite line
    Line { origin: Vec3, direction: Vec3 },
    /// Infinite plane
    Plane { origin: Vec3, normal: Vec3 },
}

/// What a hit on a scene object means
///
/// Produced by whoever builds the scene; the picker turns it into a `Snap`.
#[derive(Debug, Clone, PartialEq)]
pub enum Intersectable {
    Face(TopologyId),
    CurveEdge(TopologyId),
    CurveSegment(ItemId),
    PointBuffer(BufferHandle),
    /// Planar region; never snapped to
    Region(ItemId),
    /// Proxy carrying its snap directly
    Snapper(Snap),
    Unclassified,
}

/// A raycastable object in the candidate set
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub intersectable: Intersectable,
    pub shape: Shape,
}

impl SceneObject {
    pub fn new(intersectable: Intersectable, shape: Shape) -> Self {
        Self { intersectable, shape }
    }

    /// Proxy object that reports `snap` when hit
    pub fn snapper(snap: &Snap) -> Self {
        let shape = match snap {
            Snap::Point(point) => Shape::Point(point.position),
            Snap::Curve(curve) => Shape::Polyline(Arc::clone(&curve.curve.polyline)),
            Snap::CurveEdge(edge) => Shape::Polyline(Arc::clone(&edge.model.polyline)),
            Snap::Face(face) => Shape::Mesh(Arc::clone(&face.model.mesh)),
            Snap::Axis(axis) => Shape::Line {
                origin: axis.origin,
                direction: axis.direction,
            },
            Snap::ConstructionPlane(plane) => Shape::Plane {
                origin: plane.origin,
                normal: plane.normal,
            },
        };
        Self::new(Intersectable::Snapper(snap.clone()), shape)
    }

    /// Point buffer registered under `handle`
    pub fn point_buffer(handle: BufferHandle, points: Arc<[PointVertex]>) -> Self {
        Self::new(Intersectable::PointBuffer(handle), Shape::Points(points))
    }
}

/// Raw bytes of a point buffer
pub fn point_bytes(points: &[PointVertex]) -> &[u8] {
    bytemuck::cast_slice(points)
}
