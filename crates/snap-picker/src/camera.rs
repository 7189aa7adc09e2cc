use glam::{Mat4, Vec2, Vec3};
use snap_core::Ray;

use crate::raycast::PixelScale;

/// 投影方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// 透視投影（垂直画角、ラジアン）
    Perspective { fov: f32 },
    /// 平行投影（ビューの高さ、ワールド単位）
    Orthographic { height: f32 },
}

/// 3Dカメラ
/// 位置、注視点、上方向ベクトルと投影方式を持つ
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// デフォルト値で新しい透視カメラを作成
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::Perspective {
                fov: 45.0_f32.to_radians(),
            },
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// 平行投影カメラを作成
    pub fn orthographic(aspect: f32, height: f32) -> Self {
        Self {
            projection: Projection::Orthographic { height },
            ..Self::new(aspect)
        }
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    /// 視線方向（単位ベクトル）
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// View-Projection行列を構築
    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.position, self.target, self.up);
        let proj = match self.projection {
            Projection::Perspective { fov } => {
                Mat4::perspective_rh(fov, self.aspect, self.near, self.far)
            }
            Projection::Orthographic { height } => {
                let half_h = height * 0.5;
                let half_w = half_h * self.aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        };
        proj * view
    }

    /// 正規化デバイス座標（-1..1）からレイを生成
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let inverse = self.build_view_projection_matrix().inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

        match self.projection {
            Projection::Perspective { .. } => Ray::new(self.position, far - self.position),
            Projection::Orthographic { .. } => Ray::new(near, self.forward()),
        }
    }

    /// 1ピクセルあたりのワールド長（解像度はピクセル単位）
    pub fn pixel_scale(&self, resolution: Vec2) -> PixelScale {
        let height_px = resolution.y.max(1.0);
        match self.projection {
            Projection::Perspective { fov } => PixelScale::Perspective {
                per_unit_distance: 2.0 * (fov * 0.5).tan() / height_px,
            },
            Projection::Orthographic { height } => PixelScale::Orthographic {
                per_pixel: height / height_px,
            },
        }
    }

    /// カメラ位置を設定
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// カメラの注視点を設定
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// アスペクト比を設定
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_down(camera: Camera) -> Camera {
        Camera {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            ..camera
        }
    }

    #[test]
    fn test_camera_new() {
        let camera = Camera::new(16.0 / 9.0);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 5.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.up, Vec3::Y);
        assert!(!camera.is_orthographic());
    }

    #[test]
    fn test_view_projection_not_identity() {
        let camera = Camera::new(1.0);
        let vp = camera.build_view_projection_matrix();
        assert_ne!(vp, Mat4::IDENTITY);
    }

    #[test]
    fn test_center_ray_looks_at_target() {
        let camera = top_down(Camera::new(4.0 / 3.0));
        let ray = camera.ray(Vec2::ZERO);

        assert!(ray.origin.distance(camera.position) < 1e-5);
        assert!(ray.direction.distance(Vec3::NEG_Z) < 1e-4);
    }

    #[test]
    fn test_perspective_rays_diverge() {
        let camera = top_down(Camera::new(1.0));
        let right = camera.ray(Vec2::new(1.0, 0.0));

        assert!(right.origin.distance(camera.position) < 1e-5);
        assert!(right.direction.x > 0.1);
    }

    #[test]
    fn test_orthographic_rays_parallel() {
        let camera = top_down(Camera::orthographic(1.0, 4.0));
        let ray = camera.ray(Vec2::new(1.0, 0.0));

        assert!(ray.direction.distance(Vec3::NEG_Z) < 1e-5);
        // 右端はビュー幅の半分だけずれる
        assert!((ray.origin.x - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_pixel_scale() {
        let ortho = Camera::orthographic(1.0, 6.0);
        assert_eq!(
            ortho.pixel_scale(Vec2::new(600.0, 600.0)),
            PixelScale::Orthographic { per_pixel: 0.01 }
        );

        let perspective = Camera::new(1.0);
        let PixelScale::Perspective { per_unit_distance } =
            perspective.pixel_scale(Vec2::new(600.0, 600.0))
        else {
            panic!("expected perspective scale");
        };
        assert!((per_unit_distance - 2.0 * 22.5_f32.to_radians().tan() / 600.0).abs() < 1e-7);
    }

    #[test]
    fn test_set_position() {
        let mut camera = Camera::new(1.0);
        camera.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_set_target() {
        let mut camera = Camera::new(1.0);
        camera.set_target(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.target, Vec3::new(1.0, 0.0, 0.0));
    }
}
