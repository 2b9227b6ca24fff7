/// Orbit camera
///
/// Spherical coordinates around a target point. Also owns the two
/// conversions the hover feature lives on: cursor -> world ray for
/// picking, and world point -> screen position for anchoring panels.
use glam::{Mat4, Vec3, Vec4Swizzles};

use crate::scene::picking::Ray;

const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 500.0;

const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 80.0;
const MIN_PITCH: f32 = -0.2;
const MAX_PITCH: f32 = 1.45;

const ORBIT_SPEED: f32 = 0.008;
const ZOOM_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3, radius: f32, yaw_deg: f32, pitch_deg: f32) -> Self {
        Self {
            target,
            radius: radius.clamp(MIN_RADIUS, MAX_RADIUS),
            yaw: yaw_deg.to_radians(),
            pitch: pitch_deg.to_radians().clamp(MIN_PITCH, MAX_PITCH),
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.radius * Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y, aspect.max(0.01), Z_NEAR, Z_FAR);
        proj * view
    }

    /// Unproject a cursor position (logical pixels, origin top-left) into
    /// a world-space ray.
    pub fn screen_ray(&self, cursor: (f32, f32), viewport: (f32, f32)) -> Ray {
        let (width, height) = viewport;
        let ndc_x = 2.0 * cursor.0 / width.max(1.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.1 / height.max(1.0);

        let inverse = self.view_projection(width / height.max(1.0)).inverse();
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Ray {
            origin: near,
            dir: (far - near).normalize_or_zero(),
        }
    }

    /// Project a world point to screen coordinates (logical pixels).
    /// Returns None when the point is behind the camera.
    pub fn world_to_screen(&self, point: Vec3, viewport: (f32, f32)) -> Option<(f32, f32)> {
        let (width, height) = viewport;
        let clip = self.view_projection(width / height.max(1.0)) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some((
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
        ))
    }

    /// Rotate around the target from a pointer drag delta.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * ORBIT_SPEED;
        self.pitch = (self.pitch + dy * ORBIT_SPEED).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Dolly toward/away from the target. Positive wheel steps zoom in.
    pub fn zoom(&mut self, steps: f32) {
        self.radius = (self.radius * (1.0 - steps * ZOOM_STEP)).clamp(MIN_RADIUS, MAX_RADIUS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: (f32, f32) = (1280.0, 800.0);

    fn camera() -> OrbitCamera {
        OrbitCamera::new(Vec3::new(0.0, 1.0, 0.0), 14.0, 45.0, 28.0)
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = camera();
        let ray = camera.screen_ray((VIEWPORT.0 / 2.0, VIEWPORT.1 / 2.0), VIEWPORT);
        let expected = (camera.target - camera.eye()).normalize();
        assert!(ray.dir.dot(expected) > 0.999, "dir {:?} vs {:?}", ray.dir, expected);
        assert!((ray.origin - camera.eye()).length() < 1.0);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = camera();
        let (x, y) = camera.world_to_screen(camera.target, VIEWPORT).unwrap();
        assert!((x - VIEWPORT.0 / 2.0).abs() < 1.0);
        assert!((y - VIEWPORT.1 / 2.0).abs() < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = camera();
        let behind = camera.eye() + (camera.eye() - camera.target);
        assert!(camera.world_to_screen(behind, VIEWPORT).is_none());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = camera();
        for _ in 0..100 {
            camera.zoom(5.0);
        }
        assert!(camera.radius >= MIN_RADIUS);
        for _ in 0..100 {
            camera.zoom(-5.0);
        }
        assert!(camera.radius <= MAX_RADIUS);
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut camera = camera();
        camera.orbit(0.0, 10_000.0);
        assert!(camera.pitch <= MAX_PITCH);
        camera.orbit(0.0, -20_000.0);
        assert!(camera.pitch >= MIN_PITCH);
    }
}
