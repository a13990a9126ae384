//! Fly camera
//!
//! Position plus yaw/pitch in degrees. Keyboard input moves along the
//! front/right basis, mouse input turns it.

use crate::renderer::viewer::{Projection, Viewer, Viewport};
use glam::{Mat4, Vec3};

/// Pitch limit in degrees, short of straight up or down.
pub const PITCH_LIMIT: f32 = 89.0;

/// Which movement keys are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// A first-person fly camera.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub world_up: Vec3,
    /// Degrees. -90 looks down -Z.
    yaw: f32,
    /// Degrees, within +/-89.
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    /// Units per second.
    pub move_speed: f32,
    /// Degrees per unit of mouse movement.
    pub turn_speed: f32,
    pub projection: Projection,
}

impl Camera {
    /// Create a camera. `yaw` and `pitch` are in degrees.
    pub fn new(
        position: Vec3,
        world_up: Vec3,
        yaw: f32,
        pitch: f32,
        move_speed: f32,
        turn_speed: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            world_up,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            move_speed,
            turn_speed,
            projection: Projection::perspective(60.0, 1.0, 0.1, 100.0),
        };
        camera.update_basis();
        camera
    }

    /// Match the projection's aspect ratio to a viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.projection.set_aspect(viewport.aspect());
    }

    /// Move along the current basis for the keys held.
    pub fn apply_keys(&mut self, keys: MoveKeys, delta_time: f32) {
        let velocity = self.move_speed * delta_time;

        if keys.forward {
            self.position += self.front * velocity;
        }
        if keys.back {
            self.position -= self.front * velocity;
        }
        if keys.left {
            self.position -= self.right * velocity;
        }
        if keys.right {
            self.position += self.right * velocity;
        }
    }

    /// Turn by a mouse delta. Positive `dy` looks up.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.turn_speed;
        self.pitch = (self.pitch + dy * self.turn_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_basis();
    }

    fn update_basis(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }
}

impl Viewer for Camera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::Y, -90.0, 0.0, 5.0, 0.5)
    }

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        assert!((f.length() - 1.0).abs() < EPSILON);
        assert!((r.length() - 1.0).abs() < EPSILON);
        assert!((u.length() - 1.0).abs() < EPSILON);
        assert!(f.dot(r).abs() < EPSILON);
        assert!(f.dot(u).abs() < EPSILON);
        assert!(r.dot(u).abs() < EPSILON);
    }

    #[test]
    fn test_initial_front_looks_down_negative_z() {
        let camera = camera();
        assert!((camera.front() - Vec3::NEG_Z).length() < EPSILON);
        assert!((camera.right() - Vec3::X).length() < EPSILON);
        assert!((camera.up() - Vec3::Y).length() < EPSILON);
    }

    #[test]
    fn test_pitch_pins_at_limit() {
        let mut camera = camera();
        camera.apply_mouse_delta(0.0, 10_000.0);
        assert_eq!(camera.pitch(), 89.0);
        camera.apply_mouse_delta(0.0, 1.0);
        assert_eq!(camera.pitch(), 89.0);

        camera.apply_mouse_delta(0.0, -100_000.0);
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn test_basis_stays_orthonormal() {
        let mut camera = camera();
        let deltas = [
            (12.0, 3.0),
            (-250.0, 40.0),
            (3.5, -700.0),
            (1000.0, 1000.0),
            (-0.25, 0.5),
        ];
        for (dx, dy) in deltas {
            camera.apply_mouse_delta(dx, dy);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn test_apply_keys_moves_along_front() {
        let mut camera = camera();
        let keys = MoveKeys {
            forward: true,
            ..Default::default()
        };
        camera.apply_keys(keys, 0.5);
        assert!((camera.position - Vec3::new(0.0, 0.0, -2.5)).length() < EPSILON);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut camera = camera();
        let keys = MoveKeys {
            forward: true,
            back: true,
            left: true,
            right: true,
        };
        camera.apply_keys(keys, 1.0);
        assert!(camera.position.length() < EPSILON);
    }

    #[test]
    fn test_view_matrix_centres_eye() {
        let mut camera = Camera::new(Vec3::new(3.0, 2.0, 1.0), Vec3::Y, 30.0, -20.0, 5.0, 0.5);
        camera.apply_mouse_delta(4.0, 2.0);
        let eye = camera.view_matrix() * camera.position.extend(1.0);
        assert!(eye.truncate().length() < EPSILON);

        let ahead = camera.view_matrix() * (camera.position + camera.front()).extend(1.0);
        assert!((ahead.truncate() - Vec3::new(0.0, 0.0, -1.0)).length() < EPSILON);
    }
}
