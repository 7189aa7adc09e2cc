use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::math::{AABB, closest_point_on_triangle};

/// 頂点構造体
/// 位置と法線を含む
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// 新しい頂点を作成
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// 三角形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    /// 面法線（縮退三角形はゼロ）
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        closest_point_on_triangle(p, self.a, self.b, self.c)
    }
}

/// メッシュ構造体
/// 頂点とインデックスを含む（面のテッセレーション）
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// 空のメッシュを作成
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// 4頂点の平面四角形（2三角形）
    pub fn quad(corners: [Vec3; 4]) -> Self {
        let normal = (corners[1] - corners[0])
            .cross(corners[2] - corners[0])
            .normalize_or_zero()
            .to_array();
        let vertices = corners
            .iter()
            .map(|c| Vertex::new(c.to_array(), normal))
            .collect();
        Self {
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// キューブの6面を個別メッシュとして生成（1x1x1、原点中心）
    /// 順序: +X, -X, +Y, -Y, +Z, -Z
    pub fn cube_faces() -> [Mesh; 6] {
        let h = 0.5;
        [
            Mesh::quad([
                Vec3::new(h, -h, -h),
                Vec3::new(h, h, -h),
                Vec3::new(h, h, h),
                Vec3::new(h, -h, h),
            ]),
            Mesh::quad([
                Vec3::new(-h, -h, h),
                Vec3::new(-h, h, h),
                Vec3::new(-h, h, -h),
                Vec3::new(-h, -h, -h),
            ]),
            Mesh::quad([
                Vec3::new(-h, h, -h),
                Vec3::new(-h, h, h),
                Vec3::new(h, h, h),
                Vec3::new(h, h, -h),
            ]),
            Mesh::quad([
                Vec3::new(-h, -h, h),
                Vec3::new(-h, -h, -h),
                Vec3::new(h, -h, -h),
                Vec3::new(h, -h, h),
            ]),
            Mesh::quad([
                Vec3::new(-h, -h, h),
                Vec3::new(h, -h, h),
                Vec3::new(h, h, h),
                Vec3::new(-h, h, h),
            ]),
            Mesh::quad([
                Vec3::new(h, -h, -h),
                Vec3::new(-h, -h, -h),
                Vec3::new(-h, h, -h),
                Vec3::new(h, h, -h),
            ]),
        ]
    }

    /// 全面を結合したキューブメッシュ
    pub fn cube() -> Self {
        let mut mesh = Mesh::new();
        for face in Self::cube_faces() {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend_from_slice(&face.vertices);
            mesh.indices.extend(face.indices.iter().map(|i| base + i));
        }
        mesh
    }

    /// 三角形をイテレート（範囲外インデックスは無視）
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let p = |i: u32| self.vertices.get(i as usize).map(|v| Vec3::from(v.position));
            Some(Triangle {
                a: p(tri[0])?,
                b: p(tri[1])?,
                c: p(tri[2])?,
            })
        })
    }

    /// バウンディングボックス
    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }

    /// 最近点とその三角形の法線を返す
    pub fn closest_point(&self, p: Vec3) -> Option<(Vec3, Vec3)> {
        self.triangles()
            .map(|tri| (tri.closest_point(p), tri.normal()))
            .min_by(|(a, _), (b, _)| a.distance_squared(p).total_cmp(&b.distance_squared(p)))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        // 3 floats * 2 attributes * 4 bytes = 24 bytes
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_cube_counts() {
        let cube = Mesh::cube();
        // 6 faces * 4 vertices = 24 vertices
        assert_eq!(cube.vertices.len(), 24);
        // 6 faces * 2 triangles = 12 triangles
        assert_eq!(cube.triangles().count(), 12);
    }

    #[test]
    fn test_cube_face_normals_point_outward() {
        let faces = Mesh::cube_faces();
        let expected = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        for (face, normal) in faces.iter().zip(expected) {
            for tri in face.triangles() {
                assert!(tri.normal().distance(normal) < 1e-5);
            }
        }
    }

    #[test]
    fn test_closest_point_on_top_face() {
        let top = &Mesh::cube_faces()[4];
        let (point, normal) = top.closest_point(Vec3::new(0.1, 0.2, 3.0)).unwrap();
        assert!(point.distance(Vec3::new(0.1, 0.2, 0.5)) < 1e-5);
        assert!(normal.distance(Vec3::Z) < 1e-5);
    }

    #[test]
    fn test_bounds() {
        let bounds = Mesh::cube().bounds().unwrap();
        assert_eq!(bounds.min, Vec3::splat(-0.5));
        assert_eq!(bounds.max, Vec3::splat(0.5));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::new();
        assert_eq!(mesh.triangles().count(), 0);
        assert!(mesh.bounds().is_none());
        assert!(mesh.closest_point(Vec3::ZERO).is_none());
    }
}
