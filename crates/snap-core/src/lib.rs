pub mod config;
pub mod database;
pub mod error;
pub mod ids;
pub mod math;
pub mod mesh;
pub mod model;
pub mod scene;
pub mod snap;
pub mod storage;

// Re-exports
pub use config::PickerConfig;
pub use database::{GeometryDatabase, ModelDatabase};
pub use error::{Result, SnapError};
pub use ids::{BufferHandle, Generation, ItemId, TopologyId, TopologyKind};
pub use math::{AABB, Plane, Ray};
pub use mesh::{Mesh, Triangle, Vertex};
pub use model::{CurveModel, EdgeModel, FaceModel, InstanceModel, Polyline, TopologyModel, inst2curve};
pub use scene::{Intersectable, PointVertex, SceneObject, Shape, point_bytes};
pub use snap::{
    AxisSnap, CurveEdgeSnap, CurveSnap, FaceSnap, PlaneSnap, PointSnap, Projection, Snap,
    SnapResult,
};
pub use storage::ModelStorage;

// Re-export glam types for consistent version usage
pub use glam;
