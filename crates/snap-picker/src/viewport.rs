//! Viewport state consumed by the picker

use glam::{Vec2, Vec3};
use snap_core::{PlaneSnap, Ray};

use crate::camera::Camera;

/// A view onto the scene: camera, pixel size and drawing modes
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub camera: Camera,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Plane points fall back to when nothing else is hit
    pub construction_plane: PlaneSnap,
    /// X-ray mode shows (and picks) occluded geometry
    pub xray: bool,
}

impl Viewport {
    pub fn new(camera: Camera, width: u32, height: u32) -> Self {
        Self {
            camera,
            width,
            height,
            construction_plane: PlaneSnap::xy(),
            xray: false,
        }
    }

    pub fn with_construction_plane(mut self, plane: PlaneSnap) -> Self {
        self.construction_plane = plane;
        self
    }

    pub fn with_xray(mut self, xray: bool) -> Self {
        self.xray = xray;
        self
    }

    pub fn is_ortho(&self) -> bool {
        self.camera.is_orthographic()
    }

    pub fn is_xray(&self) -> bool {
        self.xray
    }

    /// Size in pixels
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Pixel position (origin top-left) to normalized device coordinates
    pub fn normalized_pointer(&self, pointer: Vec2) -> Vec2 {
        let size = self.resolution().max(Vec2::ONE);
        Vec2::new(
            pointer.x / size.x * 2.0 - 1.0,
            -(pointer.y / size.y * 2.0 - 1.0),
        )
    }

    pub fn ray_from_pointer(&self, pointer: Vec2) -> Ray {
        self.camera.ray(self.normalized_pointer(pointer))
    }

    /// Resize and keep the camera aspect in sync
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.camera.set_aspect(width.max(1) as f32 / height.max(1) as f32);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let mut camera = Camera::new(4.0 / 3.0);
        camera.set_position(Vec3::new(0.0, 0.0, 10.0));
        Self::new(camera, 800, 600)
    }
}
