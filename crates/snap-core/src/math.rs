//! Ray and closest-point primitives shared by picking and projection.

pub use glam::{Mat4, Quat, Vec2, Vec3};

/// Below this, directions are treated as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Ray for raycasting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

/// Closest approach between a ray and a line or segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    /// Distance along the ray
    pub t: f32,
    /// Point on the ray
    pub on_ray: Vec3,
    /// Point on the line or segment
    pub on_line: Vec3,
    /// Gap between the two points
    pub gap: f32,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Check intersection with AABB using slab method
    /// Returns the distance to intersection point if hit, None otherwise
    pub fn intersect_aabb(&self, aabb: &AABB) -> Option<f32> {
        let inv = |d: f32| if d.abs() > f32::EPSILON { 1.0 / d } else { f32::MAX };
        let inv_dir = Vec3::new(
            inv(self.direction.x),
            inv(self.direction.y),
            inv(self.direction.z),
        );

        let t1 = (aabb.min - self.origin) * inv_dir;
        let t2 = (aabb.max - self.origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }

    /// Distance along the ray to the plane, rejecting hits behind the origin
    pub fn intersect_plane(&self, plane: &Plane) -> Option<f32> {
        let denom = self.direction.dot(plane.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None; // parallel to the plane
        }

        let t = (plane.origin - self.origin).dot(plane.normal) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Möller–Trumbore ray/triangle test
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let pvec = self.direction.cross(edge2);
        let det = edge1.dot(pvec);
        if det.abs() <= 1e-9 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = self.origin - a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = self.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        (t >= 0.0).then_some(t)
    }

    /// Closest approach to a point; None when the point is behind the origin
    pub fn approach_point(&self, point: Vec3) -> Option<Approach> {
        let t = (point - self.origin).dot(self.direction);
        if t < 0.0 {
            return None;
        }
        let on_ray = self.at(t);
        Some(Approach {
            t,
            on_ray,
            on_line: point,
            gap: on_ray.distance(point),
        })
    }

    /// Closest approach to the infinite line `origin + direction * s`
    ///
    /// None for parallel lines or when the closest point lies behind the ray
    /// origin.
    pub fn approach_line(&self, origin: Vec3, direction: Vec3) -> Option<Approach> {
        let u = direction.normalize_or_zero();
        if u == Vec3::ZERO {
            return None;
        }
        let w = self.origin - origin;
        let b = self.direction.dot(u);
        let denom = 1.0 - b * b;
        if denom < PARALLEL_EPSILON {
            return None;
        }
        let d = self.direction.dot(w);
        let e = u.dot(w);

        let s = (e - b * d) / denom;
        let t = s * b - d;
        if t < 0.0 {
            return None;
        }
        let on_ray = self.at(t);
        let on_line = origin + u * s;
        Some(Approach {
            t,
            on_ray,
            on_line,
            gap: on_ray.distance(on_line),
        })
    }

    /// Closest approach to the segment `a..b`
    pub fn approach_segment(&self, a: Vec3, b: Vec3) -> Option<Approach> {
        let u = b - a;
        let c = u.dot(u);
        if c < PARALLEL_EPSILON {
            return self.approach_point(a);
        }
        let w = self.origin - a;
        let bu = self.direction.dot(u);
        let d = self.direction.dot(w);
        let e = u.dot(w);

        let denom = c - bu * bu;
        let s = if denom.abs() < PARALLEL_EPSILON {
            0.0
        } else {
            ((e - bu * d) / denom).clamp(0.0, 1.0)
        };
        let t = s * bu - d;
        if t < 0.0 {
            return None;
        }
        let on_ray = self.at(t);
        let on_line = a + u * s;
        Some(Approach {
            t,
            on_ray,
            on_line,
            gap: on_ray.distance(on_line),
        })
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, None when empty
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |aabb, p| {
            Self::new(aabb.min.min(p), aabb.max.max(p))
        }))
    }

    /// Check if a point is inside the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Infinite plane through `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    /// Unit normal
    pub normal: Vec3,
}

impl Plane {
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        Self {
            origin,
            normal: normal.normalize_or(Vec3::Z),
        }
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project(&self, point: Vec3) -> Vec3 {
        point - self.normal * (point - self.origin).dot(self.normal)
    }
}

/// Rotation taking +Z onto `direction`; identity for a zero vector
pub fn orientation_towards(direction: Vec3) -> Quat {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_arc(Vec3::Z, dir)
    }
}

/// Closest point on segment `a..b` to `point`
pub fn closest_point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < PARALLEL_EPSILON {
        return a;
    }
    let s = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * s
}

/// Closest point on triangle `abc` to `p` (Voronoi region walk)
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
