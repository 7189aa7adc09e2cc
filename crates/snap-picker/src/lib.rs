pub mod cache;
pub mod camera;
pub mod catalog;
pub mod picker;
pub mod pointer;
pub mod raycast;
pub mod viewport;

pub use cache::GeometryCache;
pub use camera::{Camera, Projection};
pub use catalog::{CatalogSnapshot, ChangeListener, SnapCatalog, SnapManager, SubscriptionId, Subscriptions};
pub use picker::SnapPicker;
pub use pointer::PointerModel;
pub use raycast::{CpuRaycaster, Intersection, PixelScale, RaycastParams, Raycaster};
pub use viewport::Viewport;

// Re-export the core crate so hosts share one glam version
pub use snap_core;
pub use snap_core::glam;
