//! Ray queries used by panning
//!
//! Hosts answer the gesture-start hit test with these, and the default pan
//! strategy intersects the cursor ray with a camera-facing plane.

use glam::Vec3;

/// Ray for raycasting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing `direction`
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Check intersection with AABB using slab method
    /// Returns the distance to intersection point if hit, None otherwise
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let safe_inv = |d: f32| {
            if d.abs() > f32::EPSILON {
                1.0 / d
            } else {
                f32::MAX
            }
        };
        let inv_dir = Vec3::new(
            safe_inv(self.direction.x),
            safe_inv(self.direction.y),
            safe_inv(self.direction.z),
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
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box centered at `center` with edge lengths `scale`
    pub fn unit_cube(center: Vec3, scale: Vec3) -> Self {
        let half = scale * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Check if a point is inside the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Infinite plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Signed ray distance to the plane. None when the ray is parallel.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        Some((self.point - ray.origin).dot(self.normal) / denom)
    }

    /// Intersection point, only in front of the ray origin
    pub fn intersect_point(&self, ray: &Ray) -> Option<Vec3> {
        let t = self.intersect(ray)?;
        if t < 0.0 {
            return None;
        }
        Some(ray.at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_aabb_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);

        let t = ray.intersect_aabb(&aabb).unwrap();
        assert!((t - 4.5).abs() < 0.001); // front face at z = 0.5
        assert!(ray.at(t).abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-5));
    }

    #[test]
    fn test_ray_aabb_miss() {
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);

        assert!(ray.intersect_aabb(&aabb).is_none());
    }

    #[test]
    fn test_ray_aabb_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);

        assert!(ray.intersect_aabb(&aabb).is_none());
    }

    #[test]
    fn test_ray_inside_aabb() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);

        assert_eq!(ray.intersect_aabb(&aabb), Some(0.0));
    }

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert!(ray.at(5.0).abs_diff_eq(Vec3::new(0.0, 3.0, 4.0), 1e-5));
    }

    #[test]
    fn test_aabb_contains() {
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);

        assert!(aabb.contains(Vec3::ZERO));
        assert!(aabb.contains(Vec3::new(0.4, 0.4, 0.4)));
        assert!(!aabb.contains(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_unit_cube() {
        let aabb = Aabb::unit_cube(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));

        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_plane_intersection() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, -1.0));

        let hit = plane.intersect_point(&ray).unwrap();
        assert!(hit.abs_diff_eq(Vec3::new(10.0, 0.0, -10.0), 1e-4));
    }

    #[test]
    fn test_plane_parallel_ray() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(plane.intersect(&ray).is_none());
        assert!(plane.intersect_point(&ray).is_none());
    }

    #[test]
    fn test_plane_behind_ray() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert_eq!(plane.intersect(&ray), Some(-10.0));
        assert!(plane.intersect_point(&ray).is_none());
    }
}
