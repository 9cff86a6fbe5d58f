//! Model orientation and rotation matrices

use nalgebra::{Rotation3, Vector3};
use std::f32::consts::TAU;

/// Orientation of the displayed model (in radians)
///
/// Yaw spins continuously about the vertical axis; pitch is a fixed tilt
/// toward the viewer so the top of the model stays in view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw: yaw.rem_euclid(TAU),
            pitch,
        }
    }

    /// Advance yaw by `step`, keeping it in `[0, 2π)`
    pub fn advance_yaw(&mut self, step: f32) {
        self.yaw = (self.yaw + step).rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if self.yaw >= TAU {
            self.yaw = 0.0;
        }
    }

    /// Rotation applying yaw first, then pitch
    pub fn rotation(&self) -> Rotation3<f32> {
        let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch);
        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), -self.yaw);
        pitch * yaw
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(0.0, 0.45)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix3, Point3};

    #[test]
    fn test_advance_wraps() {
        let mut orientation = Orientation::new(0.0, 0.0);
        orientation.advance_yaw(1.0);
        assert!((orientation.yaw - 1.0).abs() < 1e-6);

        orientation.advance_yaw(TAU);
        assert!((orientation.yaw - 1.0).abs() < 1e-5);

        for _ in 0..1000 {
            orientation.advance_yaw(0.035);
            assert!((0.0..TAU).contains(&orientation.yaw));
        }
    }

    #[test]
    fn test_identity_rotation() {
        let orientation = Orientation::new(0.0, 0.0);
        let matrix = orientation.rotation().into_inner();
        assert!((matrix - Matrix3::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_yaw_then_pitch() {
        // A quarter turn of yaw sends +x toward the viewer's depth axis
        let orientation = Orientation::new(std::f32::consts::FRAC_PI_2, 0.0);
        let p = orientation.rotation() * Point3::new(1.0, 0.0, 0.0);
        assert!(p.x.abs() < 1e-6);
        assert!((p.z - 1.0).abs() < 1e-6);

        // Pitch then tilts that depth into screen y
        let orientation = Orientation::new(std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
        let p = orientation.rotation() * Point3::new(1.0, 0.0, 0.0);
        assert!((p.y + 1.0).abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }
}
