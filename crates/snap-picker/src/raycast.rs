//! Ray/object intersection primitive
//!
//! Provides CPU-based picking of scene objects. Points and lines are picked
//! by a screen-space radius, meshes and planes by exact intersection.

use glam::Vec3;
use snap_core::{Plane, Ray, SceneObject, Shape};

/// World size of one pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelScale {
    /// Grows linearly with distance from the camera
    Perspective { per_unit_distance: f32 },
    /// Constant over the whole view
    Orthographic { per_pixel: f32 },
}

impl PixelScale {
    /// World length covered by `pixels` at distance `t` along the ray
    pub fn world_length(&self, pixels: f32, t: f32) -> f32 {
        match *self {
            PixelScale::Perspective { per_unit_distance } => pixels * per_unit_distance * t,
            PixelScale::Orthographic { per_pixel } => pixels * per_pixel,
        }
    }
}

impl Default for PixelScale {
    fn default() -> Self {
        PixelScale::Orthographic { per_pixel: 0.01 }
    }
}

/// Pick radii for one raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastParams {
    /// Point radius (pixels)
    pub points_threshold: f32,
    /// Line radius (pixels)
    pub line_threshold: f32,
    pub scale: PixelScale,
}

impl RaycastParams {
    fn point_tolerance(&self, t: f32) -> f32 {
        self.scale.world_length(self.points_threshold, t)
    }

    fn line_tolerance(&self, t: f32) -> f32 {
        self.scale.world_length(self.line_threshold, t)
    }
}

/// One ray hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Distance along the ray
    pub distance: f32,
    /// Hit point (on the object for lines and surfaces)
    pub point: Vec3,
    /// Position of the object in the candidate slice
    pub object: usize,
    /// Element index within a point buffer
    pub index: Option<usize>,
}

/// Casts a ray against a candidate set
pub trait Raycaster {
    /// Every hit, sorted by ascending distance
    fn intersect_objects(
        &self,
        ray: &Ray,
        objects: &[&SceneObject],
        params: &RaycastParams,
    ) -> Vec<Intersection>;
}

/// Brute-force raycaster over the bundled shapes
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuRaycaster;

impl CpuRaycaster {
    fn intersect_shape(
        ray: &Ray,
        shape: &Shape,
        object: usize,
        params: &RaycastParams,
        hits: &mut Vec<Intersection>,
    ) {
        match shape {
            Shape::Point(point) => {
                let hit = ray
                    .approach_point(*point)
                    .filter(|a| a.gap <= params.point_tolerance(a.t));
                if let Some(a) = hit {
                    hits.push(Intersection {
                        distance: a.t,
                        point: a.on_ray,
                        object,
                        index: None,
                    });
                }
            }
            Shape::Points(points) => {
                for (index, vertex) in points.iter().enumerate() {
                    let Some(a) = ray.approach_point(vertex.position()) else {
                        continue;
                    };
                    if a.gap <= params.point_tolerance(a.t) {
                        hits.push(Intersection {
                            distance: a.t,
                            point: a.on_ray,
                            object,
                            index: Some(index),
                        });
                    }
                }
            }
            Shape::Polyline(polyline) => {
                // 最も近いセグメントのみ
                let nearest = polyline
                    .segments()
                    .filter_map(|(a, b)| ray.approach_segment(a, b))
                    .filter(|a| a.gap <= params.line_tolerance(a.t))
                    .min_by(|a, b| a.t.total_cmp(&b.t));
                if let Some(a) = nearest {
                    hits.push(Intersection {
                        distance: a.t,
                        point: a.on_line,
                        object,
                        index: None,
                    });
                }
            }
            Shape::Mesh(mesh) => {
                let Some(bounds) = mesh.bounds() else {
                    return;
                };
                if ray.intersect_aabb(&bounds).is_none() {
                    return;
                }
                let nearest = mesh
                    .triangles()
                    .filter_map(|tri| ray.intersect_triangle(tri.a, tri.b, tri.c))
                    .min_by(f32::total_cmp);
                if let Some(t) = nearest {
                    hits.push(Intersection {
                        distance: t,
                        point: ray.at(t),
                        object,
                        index: None,
                    });
                }
            }
            Shape::Line { origin, direction } => {
                let hit = ray
                    .approach_line(*origin, *direction)
                    .filter(|a| a.gap <= params.line_tolerance(a.t));
                if let Some(a) = hit {
                    hits.push(Intersection {
                        distance: a.t,
                        point: a.on_line,
                        object,
                        index: None,
                    });
                }
            }
            Shape::Plane { origin, normal } => {
                let plane = Plane::new(*origin, *normal);
                if let Some(t) = ray.intersect_plane(&plane) {
                    hits.push(Intersection {
                        distance: t,
                        point: ray.at(t),
                        object,
                        index: None,
                    });
                }
            }
        }
    }
}

impl Raycaster for CpuRaycaster {
    fn intersect_objects(
        &self,
        ray: &Ray,
        objects: &[&SceneObject],
        params: &RaycastParams,
    ) -> Vec<Intersection> {
        let mut hits = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            Self::intersect_shape(ray, &object.shape, i, params, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use snap_core::{Intersectable, Mesh, PointVertex, Polyline};

    fn params() -> RaycastParams {
        RaycastParams {
            points_threshold: 10.0,
            line_threshold: 5.0,
            scale: PixelScale::Orthographic { per_pixel: 0.01 },
        }
    }

    fn object(shape: Shape) -> SceneObject {
        SceneObject::new(Intersectable::Unclassified, shape)
    }

    fn down_at(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_points_within_threshold_report_index() {
        let points: Arc<[PointVertex]> = vec![
            PointVertex::new(Vec3::new(5.0, 0.0, 0.0)),
            PointVertex::new(Vec3::new(0.05, 0.0, 1.0)),
            PointVertex::new(Vec3::new(0.0, 0.0, 0.0)),
        ]
        .into();
        let buffer = object(Shape::Points(points));

        let hits = CpuRaycaster.intersect_objects(&down_at(0.0, 0.0), &[&buffer], &params());
        assert_eq!(hits.len(), 2);
        // 近い順（z=1の点が先）
        assert_eq!(hits[0].index, Some(1));
        assert_eq!(hits[1].index, Some(2));
        assert!((hits[0].distance - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_perspective_threshold_grows_with_distance() {
        let scale = PixelScale::Perspective { per_unit_distance: 0.001 };
        assert!((scale.world_length(10.0, 1.0) - 0.01).abs() < 1e-7);
        assert!((scale.world_length(10.0, 100.0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_polyline_hit_on_curve() {
        let line = object(Shape::Polyline(Arc::new(Polyline::new(vec![
            Vec3::new(-1.0, 0.02, 0.0),
            Vec3::new(1.0, 0.02, 0.0),
        ]))));

        let hits = CpuRaycaster.intersect_objects(&down_at(0.5, 0.0), &[&line], &params());
        assert_eq!(hits.len(), 1);
        assert!(hits[0].point.distance(Vec3::new(0.5, 0.02, 0.0)) < 1e-5);

        let miss = CpuRaycaster.intersect_objects(&down_at(0.5, 0.5), &[&line], &params());
        assert!(miss.is_empty());
    }

    #[test]
    fn test_mesh_nearest_face() {
        let cube = object(Shape::Mesh(Arc::new(Mesh::cube())));

        let hits = CpuRaycaster.intersect_objects(&down_at(0.1, 0.2), &[&cube], &params());
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 9.5).abs() < 1e-5);
        assert!(hits[0].point.distance(Vec3::new(0.1, 0.2, 0.5)) < 1e-5);
    }

    #[test]
    fn test_line_and_plane() {
        let axis = object(Shape::Line { origin: Vec3::ZERO, direction: Vec3::X });
        let plane = object(Shape::Plane { origin: Vec3::new(0.0, 0.0, -1.0), normal: Vec3::Z });

        let hits = CpuRaycaster.intersect_objects(&down_at(3.0, 0.01), &[&plane, &axis], &params());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object, 1);
        assert_eq!(hits[1].object, 0);
        assert!((hits[1].distance - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_hits_sorted_across_objects() {
        let far = object(Shape::Point(Vec3::new(0.0, 0.0, -5.0)));
        let near = object(Shape::Point(Vec3::new(0.0, 0.0, 5.0)));

        let hits = CpuRaycaster.intersect_objects(&down_at(0.0, 0.0), &[&far, &near], &params());
        let order: Vec<_> = hits.iter().map(|h| h.object).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_behind_origin_ignored() {
        let behind = object(Shape::Point(Vec3::new(0.0, 0.0, 20.0)));
        let hits = CpuRaycaster.intersect_objects(&down_at(0.0, 0.0), &[&behind], &params());
        assert!(hits.is_empty());
    }
}
