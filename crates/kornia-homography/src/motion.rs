use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::linalg;

/// One camera motion hypothesis recovered from a homography.
///
/// The motion maps points from the reference camera to the current camera as
/// `x2 = R * x1 + t * d`, where `d` is the (unknown) distance from the reference
/// camera to the observed plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraMotion {
    /// Relative rotation between the two camera frames.
    pub rotation: DMat3,
    /// Translation between the camera centers divided by the plane distance.
    pub translation: DVec3,
    /// Unit normal of the observed plane in the reference camera frame.
    ///
    /// Zero when the homography is a pure rotation.
    pub normal: DVec3,
}

impl CameraMotion {
    /// Create a new camera motion.
    pub fn new(rotation: DMat3, translation: DVec3, normal: DVec3) -> Self {
        Self {
            rotation,
            translation,
            normal,
        }
    }

    /// Whether the motion carries no translation.
    pub fn is_pure_rotation(&self, epsilon: f64) -> bool {
        self.translation.abs().max_element() < epsilon
    }

    /// The calibrated (Euclidean) homography `R + t * n^T` described by this motion.
    pub fn euclidean_homography(&self) -> DMat3 {
        self.rotation + linalg::outer(self.translation, self.normal)
    }
}

/// Compose the image-to-image homography induced by a plane.
///
/// H = K * (R + t * n^T / d) * K^-1
///
/// # Arguments
///
/// * `rotation` - The rotation between the two cameras.
/// * `translation` - The translation between the two cameras.
/// * `normal` - The unit plane normal in the reference camera frame.
/// * `distance` - The distance from the reference camera to the plane.
/// * `k` - The camera intrinsics, shared by both views.
pub fn compose_homography(
    rotation: &DMat3,
    translation: &DVec3,
    normal: &DVec3,
    distance: f64,
    k: &DMat3,
) -> DMat3 {
    let euclidean = *rotation + linalg::outer(*translation / distance, *normal);
    *k * euclidean * k.inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compose_homography_identity() {
        let k = linalg::mat3_from_rows(&[
            [500.0, 0.0, 320.0],
            [0.0, 500.0, 240.0],
            [0.0, 0.0, 1.0],
        ]);
        let h = compose_homography(&DMat3::IDENTITY, &DVec3::ZERO, &DVec3::Z, 1.0, &k);
        assert!(linalg::max_abs_diff(&h, &DMat3::IDENTITY) < 1e-12);
    }

    #[test]
    fn test_compose_homography_maps_plane_points() {
        let k = linalg::mat3_from_rows(&[
            [500.0, 0.0, 320.0],
            [0.0, 520.0, 240.0],
            [0.0, 0.0, 1.0],
        ]);
        let rotation = DMat3::from_rotation_y(0.2);
        let translation = DVec3::new(0.3, -0.1, 0.05);
        let normal = DVec3::new(0.1, 0.2, 1.0).normalize();
        let distance = 2.5;
        let h = compose_homography(&rotation, &translation, &normal, distance, &k);

        // a point on the plane n^T X = d, seen from both cameras
        let point = DVec3::new(0.4, -0.3, 0.0);
        let point = point + normal * (distance - normal.dot(point));
        assert_relative_eq!(normal.dot(point), distance, epsilon = 1e-12);

        let x1 = k * point;
        let x2 = k * (rotation * point + translation);
        let x2_hat = h * x1;
        assert_relative_eq!(x2_hat.x / x2_hat.z, x2.x / x2.z, epsilon = 1e-9);
        assert_relative_eq!(x2_hat.y / x2_hat.z, x2.y / x2.z, epsilon = 1e-9);
    }

    #[test]
    fn test_euclidean_homography() {
        let motion = CameraMotion::new(
            DMat3::IDENTITY,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        );
        let expected = linalg::mat3_from_rows(&[[1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(motion.euclidean_homography(), expected);
        assert!(!motion.is_pure_rotation(1e-9));

        let still = CameraMotion::new(DMat3::IDENTITY, DVec3::ZERO, DVec3::ZERO);
        assert!(still.is_pure_rotation(1e-9));
    }

    #[test]
    fn test_motion_serde() -> Result<(), Box<dyn std::error::Error>> {
        let motion = CameraMotion::new(
            DMat3::from_rotation_z(0.5),
            DVec3::new(0.1, 0.2, 0.3),
            DVec3::Z,
        );
        let json = serde_json::to_string(&motion)?;
        let decoded: CameraMotion = serde_json::from_str(&json)?;
        assert!(decoded.rotation.abs_diff_eq(motion.rotation, 1e-12));
        assert!(decoded.translation.abs_diff_eq(motion.translation, 1e-12));
        assert_eq!(decoded.normal, motion.normal);
        Ok(())
    }
}
