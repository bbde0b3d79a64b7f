use eframe::egui::{Pos2, Rect, Vec2, pos2};

pub(in crate::app) type Vec3 = [f32; 3];

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: Vec3, factor: f32) -> Vec3 {
    [a[0] * factor, a[1] * factor, a[2] * factor]
}

fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalized(a: Vec3) -> Vec3 {
    let length = dot(a, a).sqrt();
    if length <= f32::EPSILON {
        [0.0, 0.0, -1.0]
    } else {
        scale(a, 1.0 / length)
    }
}

/// A point placed on screen by the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Projected {
    pub(in crate::app) pos: Pos2,
    pub(in crate::app) depth: f32,
    /// Screen pixels per world unit at this depth.
    pub(in crate::app) scale: f32,
}

/// Orbit camera looking at `target` from `distance` away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct OrbitCamera {
    pub(in crate::app) target: Vec3,
    pub(in crate::app) yaw: f32,
    pub(in crate::app) pitch: f32,
    pub(in crate::app) distance: f32,
    pub(in crate::app) fov_y: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: [0.0, 0.0, 0.0],
            yaw: 0.0,
            pitch: 0.0,
            distance: 10.0,
            fov_y: 50.0_f32.to_radians(),
        }
    }
}

impl OrbitCamera {
    const NEAR: f32 = 0.05;
    const MIN_DISTANCE: f32 = 0.5;
    const MAX_DISTANCE: f32 = 5000.0;
    const MAX_PITCH: f32 = 1.54;
    const ORBIT_SPEED: f32 = 0.008;

    pub(in crate::app) fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let offset = [cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw];
        add(self.target, scale(offset, self.distance))
    }

    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = normalized(sub(self.target, self.eye()));
        let right = normalized(cross(forward, [0.0, 1.0, 0.0]));
        let up = cross(right, forward);
        (forward, right, up)
    }

    fn focal_length(&self, rect: Rect) -> f32 {
        (rect.height().max(1.0) * 0.5) / (self.fov_y * 0.5).tan()
    }

    pub(in crate::app) fn project(&self, rect: Rect, world: Vec3) -> Option<Projected> {
        let (forward, right, up) = self.basis();
        let relative = sub(world, self.eye());
        let depth = dot(relative, forward);
        if depth <= Self::NEAR {
            return None;
        }

        let scale = self.focal_length(rect) / depth;
        let center = rect.center();
        Some(Projected {
            pos: pos2(
                center.x + dot(relative, right) * scale,
                center.y - dot(relative, up) * scale,
            ),
            depth,
            scale,
        })
    }

    pub(in crate::app) fn orbit(&mut self, drag: Vec2) {
        self.yaw -= drag.x * Self::ORBIT_SPEED;
        self.pitch = (self.pitch + drag.y * Self::ORBIT_SPEED).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    /// Moves the target so the scene follows the pointer at target depth.
    pub(in crate::app) fn pan(&mut self, rect: Rect, drag: Vec2) {
        let (_forward, right, up) = self.basis();
        let world_per_pixel = self.distance / self.focal_length(rect);
        let shift = add(scale(right, -drag.x), scale(up, drag.y));
        self.target = add(self.target, scale(shift, world_per_pixel));
    }

    pub(in crate::app) fn zoom(&mut self, scroll: f32) {
        let factor = (1.0 - scroll * 0.0015).clamp(0.85, 1.15);
        self.distance = (self.distance * factor).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    /// Frames an axis-aligned box while keeping the current orientation.
    pub(in crate::app) fn fit(&mut self, min: Vec3, max: Vec3) {
        let center = scale(add(min, max), 0.5);
        let radius = dot(sub(max, min), sub(max, min)).sqrt() * 0.5;
        self.target = center;
        self.distance = (radius / (self.fov_y * 0.5).sin() * 1.1)
            .clamp(Self::MIN_DISTANCE * 2.0, Self::MAX_DISTANCE);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))
    }

    #[test]
    fn default_camera_sits_on_positive_z() {
        let camera = OrbitCamera::default();
        let eye = camera.eye();
        assert!(eye[0].abs() < 1e-5 && eye[1].abs() < 1e-5);
        assert!((eye[2] - 10.0).abs() < 1e-5);
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let camera = OrbitCamera::default();
        let projected = camera.project(viewport(), [0.0, 0.0, 0.0]).unwrap();
        assert!((projected.pos.x - 400.0).abs() < 1e-3);
        assert!((projected.pos.y - 300.0).abs() < 1e-3);
        assert!((projected.depth - 10.0).abs() < 1e-4);
    }

    #[test]
    fn axes_map_to_screen_directions() {
        let camera = OrbitCamera::default();
        let right = camera.project(viewport(), [1.0, 0.0, 0.0]).unwrap();
        let up = camera.project(viewport(), [0.0, 1.0, 0.0]).unwrap();
        assert!(right.pos.x > 400.0);
        assert!(up.pos.y < 300.0);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let camera = OrbitCamera::default();
        assert!(camera.project(viewport(), [0.0, 0.0, 11.0]).is_none());
        assert!(camera.project(viewport(), [0.0, 0.0, 9.0]).is_some());
    }

    #[test]
    fn zoom_and_orbit_stay_in_range() {
        let mut camera = OrbitCamera::default();
        for _ in 0..400 {
            camera.zoom(1000.0);
            camera.orbit(vec2(0.0, 500.0));
        }
        assert!(camera.distance >= OrbitCamera::MIN_DISTANCE);
        assert!(camera.pitch <= OrbitCamera::MAX_PITCH);
        assert!(camera.project(viewport(), camera.target).is_some());
    }

    #[test]
    fn fit_keeps_box_in_front_of_camera() {
        let mut camera = OrbitCamera::default();
        camera.fit([-20.0, -5.0, -30.0], [40.0, 5.0, 30.0]);
        assert_eq!(camera.target, [10.0, 0.0, 0.0]);
        for corner in [[-20.0, -5.0, -30.0], [40.0, 5.0, 30.0]] {
            assert!(camera.project(viewport(), corner).is_some());
        }
    }

    #[test]
    fn pan_moves_target_against_drag() {
        let mut camera = OrbitCamera::default();
        camera.pan(viewport(), vec2(100.0, 0.0));
        assert!(camera.target[0] < 0.0);
    }
}
