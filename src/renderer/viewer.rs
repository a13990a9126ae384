//! Viewer abstractions
//!
//! Projection and viewport types shared by the camera and the shadow-casting
//! lights.

use glam::{Mat4, Vec3};

/// Viewport information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// A viewport covering a whole surface.
    pub fn new_at_origin(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Get the aspect ratio. A zero height is treated as one pixel.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Projection mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov: f32,
        /// Aspect ratio (width / height).
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Orthographic projection centred on the view axis.
    Orthographic {
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    /// Create a perspective projection.
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::Perspective {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Create an orthographic projection.
    pub fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Self {
        Self::Orthographic {
            width,
            height,
            near,
            far,
        }
    }

    /// Get the projection matrix. Depth maps to 0..1.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov, aspect, near, far),
            Projection::Orthographic {
                width,
                height,
                near,
                far,
            } => Mat4::orthographic_rh(
                -width / 2.0,
                width / 2.0,
                -height / 2.0,
                height / 2.0,
                near,
                far,
            ),
        }
    }

    /// Update the aspect ratio. Orthographic projections are unaffected.
    pub fn set_aspect(&mut self, aspect: f32) {
        if let Projection::Perspective { aspect: a, .. } = self {
            *a = aspect;
        }
    }
}

/// Anything the lit pass can render from.
pub trait Viewer {
    /// Eye position in world space.
    fn position(&self) -> Vec3;

    fn view_matrix(&self) -> Mat4;

    fn projection_matrix(&self) -> Mat4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_aspect() {
        assert!((Viewport::new_at_origin(1366, 768).aspect() - 1366.0 / 768.0).abs() < 1e-6);
        assert_eq!(Viewport::new_at_origin(800, 0).aspect(), 800.0);
    }

    #[test]
    fn test_set_aspect_only_touches_perspective() {
        let mut perspective = Projection::perspective(60.0, 1.0, 0.1, 100.0);
        perspective.set_aspect(2.0);
        assert!(matches!(perspective, Projection::Perspective { aspect, .. } if aspect == 2.0));

        let mut ortho = Projection::orthographic(40.0, 40.0, 0.1, 100.0);
        ortho.set_aspect(2.0);
        assert_eq!(ortho, Projection::orthographic(40.0, 40.0, 0.1, 100.0));
    }

    #[test]
    fn test_orthographic_is_symmetric() {
        let m = Projection::orthographic(40.0, 20.0, 0.1, 100.0).matrix();
        let corner = m * glam::Vec4::new(20.0, 10.0, -0.1, 1.0);
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
        assert!(corner.z.abs() < 1e-5);
    }
}
