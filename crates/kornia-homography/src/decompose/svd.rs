//! SVD-based homography decomposition.
//!
//! Reference: E. Malis and M. Vargas, "Deeper understanding of the homography
//! decomposition for vision-based control", INRIA research report 6303.
//!
//! The normals are expressed analytically from the symmetric matrix
//! `S = Hnorm^T * Hnorm - I` and its minors, which avoids computing singular
//! vectors. When all singular values are equal `S` vanishes and the homography
//! is a pure rotation.

use glam::{DMat3, DVec3};

use super::{is_rotation_valid, DecompositionParams, NormalizedHomography};
use crate::linalg;
use crate::motion::CameraMotion;

/// Enumerate the candidate motions of a normalized homography.
///
/// Returns a single motion with zero translation and normal for a pure
/// rotation, otherwise up to four candidates ordered as
/// `(Ra, ta, na)`, `(Ra, -ta, -na)`, `(Rb, tb, nb)`, `(Rb, -tb, -nb)`.
/// Candidates whose rotation is not valid under `params.rotation_epsilon` are skipped.
pub fn decompose(hnorm: &NormalizedHomography, params: &DecompositionParams) -> Vec<CameraMotion> {
    let h = hnorm.matrix();
    let s = h.transpose() * *h - DMat3::IDENTITY;

    if linalg::max_abs(&s) < params.pure_rotation_tolerance {
        log::debug!("svd: homography is a pure rotation");
        let rotation = if h.determinant() < 0.0 { -*h } else { *h };
        return vec![CameraMotion::new(rotation, DVec3::ZERO, DVec3::ZERO)];
    }

    let m00 = opposite_of_minor(&s, 0, 0);
    let m11 = opposite_of_minor(&s, 1, 1);
    let m22 = opposite_of_minor(&s, 2, 2);

    // non-negative in exact arithmetic
    let rt_m00 = m00.max(0.0).sqrt();
    let rt_m11 = m11.max(0.0).sqrt();
    let rt_m22 = m22.max(0.0).sqrt();

    let e01 = linalg::sign(opposite_of_minor(&s, 0, 1));
    let e02 = linalg::sign(opposite_of_minor(&s, 0, 2));
    let e12 = linalg::sign(opposite_of_minor(&s, 1, 2));

    let s00 = s.x_axis.x;
    let s11 = s.y_axis.y;
    let s22 = s.z_axis.z;
    let s01 = s.y_axis.x;
    let s02 = s.z_axis.x;
    let s12 = s.z_axis.y;

    // the normals are built from the row with the largest |S_ii|
    let indx = if s00.abs() < s11.abs() {
        if s11.abs() < s22.abs() {
            2
        } else {
            1
        }
    } else if s00.abs() < s22.abs() {
        2
    } else {
        0
    };

    let (npa, npb) = match indx {
        0 => (
            DVec3::new(s00, s01 + rt_m22, s02 + e12 * rt_m11),
            DVec3::new(s00, s01 - rt_m22, s02 - e12 * rt_m11),
        ),
        1 => (
            DVec3::new(s01 + rt_m22, s11, s12 - e02 * rt_m00),
            DVec3::new(s01 - rt_m22, s11, s12 + e02 * rt_m00),
        ),
        _ => (
            DVec3::new(s02 + e01 * rt_m11, s12 + rt_m00, s22),
            DVec3::new(s02 - e01 * rt_m11, s12 - rt_m00, s22),
        ),
    };

    let trace_s = s00 + s11 + s22;
    let v = 2.0 * (1.0 + trace_s - m00 - m11 - m22).max(0.0).sqrt();

    let esii = linalg::sign(s.col(indx)[indx]);
    let r = (2.0 + trace_s + v).max(0.0).sqrt();
    let n_t = (2.0 + trace_s - v).max(0.0).sqrt();

    let na = npa.normalize();
    let nb = npb.normalize();

    let half_nt = 0.5 * n_t;
    let esii_t_r = esii * r;

    let ta_star = (nb * esii_t_r - na * n_t) * half_nt;
    let tb_star = (na * esii_t_r - nb * n_t) * half_nt;

    let mut motions = Vec::with_capacity(4);
    for (tstar, n) in [(ta_star, na), (tb_star, nb)] {
        let rotation = rotation_from_tstar_n(h, tstar, n, v);
        if !is_rotation_valid(&rotation, params.rotation_epsilon) {
            log::trace!("svd: discarding t* = {tstar:?}, n = {n:?}");
            continue;
        }
        let t = rotation * tstar;
        motions.push(CameraMotion::new(rotation, t, n));
        motions.push(CameraMotion::new(rotation, -t, -n));
    }

    motions
}

/// Negated minor of `m` obtained by deleting `row` and `col`.
///
/// For the diagonal entries of `Hnorm^T * Hnorm - I` this is non-negative and
/// its square root enters the closed-form expression of the normals.
pub fn opposite_of_minor(m: &DMat3, row: usize, col: usize) -> f64 {
    let x1 = if col == 0 { 1 } else { 0 };
    let x2 = if col == 2 { 1 } else { 2 };
    let y1 = if row == 0 { 1 } else { 0 };
    let y2 = if row == 2 { 1 } else { 2 };

    let at = |r: usize, c: usize| m.col(c)[r];
    at(y1, x2) * at(y2, x1) - at(y1, x1) * at(y2, x2)
}

/// Rotation associated with one `(t*, n)` pair.
///
/// R = Hnorm * (I - (2 / v) * t* * n^T)
///
/// The rotation is negated when its determinant is negative.
pub fn rotation_from_tstar_n(hnorm: &DMat3, tstar: DVec3, n: DVec3, v: f64) -> DMat3 {
    let rotation = *hnorm * (DMat3::IDENTITY - linalg::outer(tstar, n) * (2.0 / v));
    if rotation.determinant() < 0.0 {
        -rotation
    } else {
        rotation
    }
}
