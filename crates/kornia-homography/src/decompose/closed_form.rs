//! Closed-form homography decomposition.
//!
//! Reference: Z. Zhang and A.R. Hanson, "3D Reconstruction based on homography mapping".
//!
//! The right singular vectors `v1`, `v3` of the normalized homography, i.e. the
//! eigenvectors of `Hnorm^T * Hnorm`, span the plane containing `t*` and `n`.
//! Scaling them by factors derived from the extreme singular values gives two
//! groups of `(t*, n)` pairs, each defined up to the sign of both members:
//!
//! - (A) `t* = (v1' - v3') / (e1 - e3)`, `n = (e1 * v3' - e3 * v1') / (e1 - e3)`
//! - (B) `t* = (v1' + v3') / (e1 - e3)`, `n = (e1 * v3' + e3 * v1') / (e1 - e3)`

use glam::{DMat3, DVec3};

use super::{is_rotation_valid, DecompositionParams, NormalizedHomography};
use crate::linalg;
use crate::motion::CameraMotion;

/// Sign applied to `(t*, n)` for each candidate of a solution group, in enumeration order.
const SIGN_COMBINATIONS: [(f64, f64); 4] = [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)];

/// Enumerate the candidate motions of a normalized homography.
///
/// Up to eight candidates are produced, group (A) first. Candidates whose
/// rotation is not valid under `params.rotation_epsilon` are skipped.
pub fn decompose(hnorm: &NormalizedHomography, params: &DecompositionParams) -> Vec<CameraMotion> {
    let h = hnorm.matrix();
    let (eigenvalues, eigenvectors) = linalg::symmetric_eigen3(&(h.transpose() * *h));

    let lambda1 = eigenvalues[0].max(0.0).sqrt();
    let lambda3 = eigenvalues[2].max(0.0).sqrt();
    let (v1, v3) = (eigenvectors[0], eigenvectors[2]);

    let lambda1m3 = lambda1 - lambda3;
    let lambda1m3_2 = lambda1m3 * lambda1m3;
    let lambda1t3 = lambda1 * lambda3;

    let t1 = 1.0 / (2.0 * lambda1t3);
    let t2 = (1.0 + 4.0 * lambda1t3 / lambda1m3_2).sqrt();
    let t12 = t1 * t2;

    let e1 = -t1 + t12;
    let e3 = -t1 - t12;

    let nv1p = (e1 * e1 * lambda1m3_2 + 2.0 * e1 * (lambda1t3 - 1.0) + 1.0).sqrt();
    let nv3p = (e3 * e3 * lambda1m3_2 + 2.0 * e3 * (lambda1t3 - 1.0) + 1.0).sqrt();
    let v1p = v1 * nv1p;
    let v3p = v3 * nv3p;

    let inv_e1me3 = 1.0 / (e1 - e3);
    let groups = [
        (
            (v1p - v3p) * inv_e1me3,
            (v3p * e1 - v1p * e3) * inv_e1me3,
        ),
        (
            (v1p + v3p) * inv_e1me3,
            (v3p * e1 + v1p * e3) * inv_e1me3,
        ),
    ];

    let mut motions = Vec::with_capacity(8);
    for (tstar, n) in groups {
        for (sign_t, sign_n) in SIGN_COMBINATIONS {
            if let Some(motion) =
                motion_from_tstar_n(h, tstar * sign_t, n * sign_n, params.rotation_epsilon)
            {
                motions.push(motion);
            }
        }
    }

    motions
}

/// Recover the motion for one `(t*, n)` pair.
///
/// R = Hnorm * (I + t* * n^T)^-1, t = R * t*
///
/// The rotation is negated when its determinant is negative. Returns `None`
/// when the result is not a valid rotation.
pub fn motion_from_tstar_n(
    hnorm: &DMat3,
    tstar: DVec3,
    n: DVec3,
    rotation_epsilon: f64,
) -> Option<CameraMotion> {
    let mut rotation = *hnorm * (DMat3::IDENTITY + linalg::outer(tstar, n)).inverse();
    if rotation.determinant() < 0.0 {
        rotation = -rotation;
    }

    if !is_rotation_valid(&rotation, rotation_epsilon) {
        log::trace!("closed form: discarding t* = {tstar:?}, n = {n:?}");
        return None;
    }

    Some(CameraMotion::new(rotation, rotation * tstar, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::DEFAULT_ROTATION_EPSILON;

    #[test]
    fn test_motion_from_tstar_n_exact() {
        let rotation = DMat3::from_rotation_x(0.25) * DMat3::from_rotation_z(-0.4);
        let translation = DVec3::new(0.2, -0.1, 0.3);
        let normal = DVec3::new(0.1, -0.2, 1.0).normalize();
        let hnorm = rotation + linalg::outer(translation, normal);

        let tstar = rotation.transpose() * translation;
        let motion = motion_from_tstar_n(&hnorm, tstar, normal, DEFAULT_ROTATION_EPSILON)
            .expect("rotation should be valid");

        assert!(linalg::max_abs_diff(&motion.rotation, &rotation) < 1e-12);
        assert!(motion.translation.abs_diff_eq(translation, 1e-12));
        assert_eq!(motion.normal, normal);
    }

    #[test]
    fn test_motion_from_tstar_n_flips_negative_determinant() {
        let rotation = DMat3::from_rotation_y(0.3);
        let translation = DVec3::new(0.0, 0.1, 0.2);
        let normal = DVec3::Z;
        let hnorm = -(rotation + linalg::outer(translation, normal));

        let tstar = rotation.transpose() * translation;
        let motion = motion_from_tstar_n(&hnorm, tstar, normal, DEFAULT_ROTATION_EPSILON)
            .expect("rotation should be valid");
        assert!(linalg::max_abs_diff(&motion.rotation, &rotation) < 1e-12);
    }

    #[test]
    fn test_motion_from_tstar_n_rejects_wrong_pair() {
        let rotation = DMat3::from_rotation_z(0.5);
        let hnorm = rotation + linalg::outer(DVec3::new(0.5, 0.0, 0.1), DVec3::Z);

        // a pair unrelated to the homography does not yield a rotation
        let motion = motion_from_tstar_n(
            &hnorm,
            DVec3::new(0.0, 2.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DEFAULT_ROTATION_EPSILON,
        );
        assert!(motion.is_none());
    }

    #[test]
    fn test_decompose_recovers_motion() {
        let rotation = DMat3::from_rotation_y(-0.2) * DMat3::from_rotation_x(0.1);
        let translation = DVec3::new(0.15, 0.05, -0.1);
        let normal = DVec3::new(-0.2, 0.1, 1.0).normalize();
        let euclidean = rotation + linalg::outer(translation, normal);

        let hnorm = NormalizedHomography::from_calibrated(&(euclidean * 3.0));
        let motions = decompose(&hnorm, &DecompositionParams::default());

        assert!(!motions.is_empty() && motions.len() <= 8);
        for motion in &motions {
            assert!(is_rotation_valid(&motion.rotation, DEFAULT_ROTATION_EPSILON));
        }

        let found = motions.iter().any(|m| {
            linalg::max_abs_diff(&m.rotation, &rotation) < 1e-6
                && m.translation.abs_diff_eq(translation, 1e-6)
                && m.normal.abs_diff_eq(normal, 1e-6)
        });
        assert!(found);
    }
}
