//! Camera snapshots and ray tests.
//!
//! The external renderer owns the live camera; each frame it hands the core
//! an immutable [`CameraSnapshot`] (position + combined view-projection
//! matrix). Projecting anchors to screen space, casting pointer rays, and
//! testing occlusion against the solid sphere are all derived from that
//! snapshot.

use glam::{DMat4, DVec2, DVec3};

/// Immutable per-frame camera state supplied by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub position: DVec3,
    pub view_projection: DMat4,
}

impl CameraSnapshot {
    pub fn new(position: DVec3, view_projection: DMat4) -> Self {
        Self {
            position,
            view_projection,
        }
    }

    /// Build a perspective camera looking at `target`. Primarily a test and
    /// example convenience; production snapshots come from the renderer.
    pub fn look_at(
        position: DVec3,
        target: DVec3,
        fov_y_degrees: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        let view = DMat4::look_at_rh(position, target, DVec3::Y);
        let projection = DMat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far);
        Self {
            position,
            view_projection: projection * view,
        }
    }

    /// Project a world-space point to normalized device coordinates.
    pub fn project_to_ndc(&self, point: DVec3) -> DVec3 {
        self.view_projection.project_point3(point)
    }

    /// Ray from the camera origin through a screen point given in NDC.
    ///
    /// Unprojects two depths inside the frustum so the direction is correct
    /// for both [0,1] and [-1,1] depth conventions.
    pub fn ray_through_ndc(&self, ndc: DVec2) -> Ray {
        let inverse = self.view_projection.inverse();
        let near = inverse.project_point3(DVec3::new(ndc.x, ndc.y, 0.25));
        let far = inverse.project_point3(DVec3::new(ndc.x, ndc.y, 0.75));
        Ray {
            origin: self.position,
            direction: (far - near).normalize(),
        }
    }

    /// Ray from the camera toward a world-space point.
    pub fn ray_toward(&self, point: DVec3) -> Ray {
        Ray {
            origin: self.position,
            direction: (point - self.position).normalize(),
        }
    }
}

/// A half-line in world space with unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Nearest positive intersection distance with a sphere, if any.
    pub fn intersect_sphere(&self, center: DVec3, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_discriminant = discriminant.sqrt();
        let t = -b - sqrt_discriminant;
        if t > 0.0 {
            return Some(t);
        }
        let t = -b + sqrt_discriminant;
        (t > 0.0).then_some(t)
    }

    /// Nearest positive intersection distance with a capsule around the
    /// segment `[a, b]`, if any.
    ///
    /// The distance returned is along the ray to the capsule surface,
    /// approximated from the closest approach between the ray and the
    /// segment. Used as the picking proxy for bar meshes.
    pub fn intersect_capsule(&self, a: DVec3, b: DVec3, radius: f64) -> Option<f64> {
        let segment = b - a;
        let segment_len_sq = segment.length_squared();
        if segment_len_sq <= f64::EPSILON {
            return self.intersect_sphere(a, radius);
        }

        // Closest points between the ray origin + t * direction (t >= 0)
        // and the segment a + s * segment (s in [0, 1]).
        let w0 = self.origin - a;
        let b_dot = self.direction.dot(segment);
        let d = self.direction.dot(w0);
        let e = segment.dot(w0);
        let denominator = segment_len_sq - b_dot * b_dot;

        let mut t = if denominator.abs() > f64::EPSILON {
            (b_dot * e - segment_len_sq * d) / denominator
        } else {
            // Parallel: closest approach at the segment start.
            -d
        };
        t = t.max(0.0);
        let s = ((e + t * b_dot) / segment_len_sq).clamp(0.0, 1.0);
        t = (s * b_dot - d).max(0.0);

        let closest_ray = self.origin + self.direction * t;
        let closest_segment = a + segment * s;
        let distance_sq = closest_ray.distance_squared(closest_segment);
        if distance_sq > radius * radius {
            return None;
        }
        let hit = (t - (radius * radius - distance_sq).sqrt()).max(0.0);
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> CameraSnapshot {
        CameraSnapshot::look_at(
            DVec3::new(0.0, 0.0, 300.0),
            DVec3::ZERO,
            55.0,
            800.0 / 600.0,
            1.0,
            1000.0,
        )
    }

    #[test]
    fn test_project_center_of_view() {
        let camera = test_camera();
        let ndc = camera.project_to_ndc(DVec3::ZERO);
        assert!(ndc.x.abs() < 1e-9);
        assert!(ndc.y.abs() < 1e-9);
    }

    #[test]
    fn test_project_offset_point_is_off_center() {
        let camera = test_camera();
        let ndc = camera.project_to_ndc(DVec3::new(50.0, 0.0, 0.0));
        assert!(ndc.x > 0.0);
        assert!(ndc.y.abs() < 1e-9);
    }

    #[test]
    fn test_ray_through_center_points_at_target() {
        let camera = test_camera();
        let ray = camera.ray_through_ndc(DVec2::ZERO);
        assert!((ray.direction - DVec3::NEG_Z).length() < 1e-9);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn test_ray_sphere_hit() {
        let ray = Ray {
            origin: DVec3::new(0.0, 0.0, 300.0),
            direction: DVec3::NEG_Z,
        };
        let t = ray.intersect_sphere(DVec3::ZERO, 100.0).unwrap();
        assert!((t - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let ray = Ray {
            origin: DVec3::new(0.0, 0.0, 300.0),
            direction: DVec3::Z,
        };
        assert!(ray.intersect_sphere(DVec3::ZERO, 100.0).is_none());

        let offset = Ray {
            origin: DVec3::new(200.0, 0.0, 300.0),
            direction: DVec3::NEG_Z,
        };
        assert!(offset.intersect_sphere(DVec3::ZERO, 100.0).is_none());
    }

    #[test]
    fn test_ray_inside_sphere_hits_far_side() {
        let ray = Ray {
            origin: DVec3::ZERO,
            direction: DVec3::X,
        };
        let t = ray.intersect_sphere(DVec3::ZERO, 100.0).unwrap();
        assert!((t - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_capsule_hit() {
        // Vertical segment at the origin, ray shooting down -Z toward it.
        let ray = Ray {
            origin: DVec3::new(0.0, 5.0, 100.0),
            direction: DVec3::NEG_Z,
        };
        let t = ray
            .intersect_capsule(DVec3::ZERO, DVec3::new(0.0, 10.0, 0.0), 2.0)
            .unwrap();
        assert!((t - 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_capsule_miss() {
        let ray = Ray {
            origin: DVec3::new(10.0, 5.0, 100.0),
            direction: DVec3::NEG_Z,
        };
        assert!(
            ray.intersect_capsule(DVec3::ZERO, DVec3::new(0.0, 10.0, 0.0), 2.0)
                .is_none()
        );
    }

    #[test]
    fn test_ray_capsule_degenerate_segment() {
        let ray = Ray {
            origin: DVec3::new(0.0, 0.0, 100.0),
            direction: DVec3::NEG_Z,
        };
        let t = ray.intersect_capsule(DVec3::ZERO, DVec3::ZERO, 5.0).unwrap();
        assert!((t - 95.0).abs() < 1e-9);
    }
}
