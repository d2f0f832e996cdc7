//! # Homography decomposition
//!
//! A homography `H` between two views of a plane, once the intrinsics `K` are
//! removed, is proportional to the Euclidean homography `R + t * n^T`. The
//! decomposition runs in three steps:
//!
//! 1. normalize: `Hnorm = K^-1 * H * K`, scaled so that its middle singular value is one
//! 2. decompose: the selected [`DecompositionMethod`] enumerates raw `(R, t, n)` candidates
//! 3. filter: candidates that put the plane behind a camera are dropped
//!
//! - [`closed_form`]: Zhang & Hanson, eigen-decomposition of `Hnorm^T * Hnorm`
//! - [`svd`]: Malis & Vargas, singular values and signed minors, with a pure rotation case

use glam::DMat3;
use serde::{Deserialize, Serialize};

use crate::error::DecompositionError;
use crate::linalg;
use crate::motion::CameraMotion;

/// Closed-form decomposition after Zhang & Hanson.
pub mod closed_form;

/// SVD-based decomposition after Malis & Vargas.
pub mod svd;

/// Default tolerance used by [`is_rotation_valid`].
pub const DEFAULT_ROTATION_EPSILON: f64 = 0.01;

/// Threshold below which `|det K|` is considered singular by the checked entry point.
const SINGULAR_INTRINSICS_EPS: f64 = 1e-12;

/// Enumeration of the decomposition algorithms available in this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecompositionMethod {
    /// Closed-form solution from the eigen-decomposition of `Hnorm^T * Hnorm`.
    ClosedForm,
    /// Solution from the singular values of `Hnorm` and the minors of `Hnorm^T * Hnorm - I`.
    #[default]
    SvdBased,
}

impl std::fmt::Display for DecompositionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecompositionMethod::ClosedForm => write!(f, "closed-form"),
            DecompositionMethod::SvdBased => write!(f, "svd"),
        }
    }
}

impl std::str::FromStr for DecompositionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed-form" | "zhang" => Ok(DecompositionMethod::ClosedForm),
            "svd" | "svd-based" | "inria" => Ok(DecompositionMethod::SvdBased),
            _ => Err(format!(
                "unknown decomposition method '{s}', expected 'closed-form' or 'svd'"
            )),
        }
    }
}

/// Numeric tolerances of the decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionParams {
    /// Tolerance on orthonormality and determinant when validating rotations.
    pub rotation_epsilon: f64,
    /// Maximum entry of `Hnorm^T * Hnorm - I` for the homography to be treated as a pure rotation.
    pub pure_rotation_tolerance: f64,
}

impl Default for DecompositionParams {
    fn default() -> Self {
        Self {
            rotation_epsilon: DEFAULT_ROTATION_EPSILON,
            pure_rotation_tolerance: 1e-3,
        }
    }
}

/// A homography with the intrinsics and the arbitrary scale removed.
///
/// Holds `K^-1 * H * K / s` where `s` is the middle singular value of
/// `K^-1 * H * K`, the normalization under which a Euclidean homography
/// `R + t * n^T` has unit middle singular value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedHomography {
    matrix: DMat3,
    scale: f64,
}

impl NormalizedHomography {
    /// Normalize an image-to-image homography with the camera intrinsics.
    pub fn new(h: &DMat3, k: &DMat3) -> Self {
        Self::from_calibrated(&(k.inverse() * *h * *k))
    }

    /// Normalize a homography that already relates calibrated image coordinates.
    pub fn from_calibrated(h: &DMat3) -> Self {
        if !h.is_finite() {
            return Self {
                matrix: *h,
                scale: f64::NAN,
            };
        }

        let sigma = linalg::singular_values3(h);
        let scale = sigma[1];
        log::trace!("homography singular values: {sigma:?}");
        Self {
            matrix: *h * (1.0 / scale),
            scale,
        }
    }

    /// The normalized matrix.
    pub fn matrix(&self) -> &DMat3 {
        &self.matrix
    }

    /// The scale that was divided out.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Decomposes homographies into camera motion hypotheses with a fixed algorithm.
///
/// Only holds configuration, each call normalizes into its own [`NormalizedHomography`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HomographyDecomposer {
    method: DecompositionMethod,
    params: DecompositionParams,
}

impl HomographyDecomposer {
    /// Create a decomposer with the default tolerances.
    pub fn new(method: DecompositionMethod) -> Self {
        Self::with_params(method, DecompositionParams::default())
    }

    /// Create a decomposer with explicit tolerances.
    pub fn with_params(method: DecompositionMethod, params: DecompositionParams) -> Self {
        Self { method, params }
    }

    /// The algorithm used by this decomposer.
    pub fn method(&self) -> DecompositionMethod {
        self.method
    }

    /// The tolerances used by this decomposer.
    pub fn params(&self) -> &DecompositionParams {
        &self.params
    }

    /// Decompose the homography `h` observed by a camera with intrinsics `k`.
    ///
    /// Returns every candidate that is a proper rotation and keeps the plane in
    /// front of both cameras, in enumeration order. The result is empty when no
    /// admissible motion exists, including for malformed input.
    pub fn decompose_homography(&self, h: &DMat3, k: &DMat3) -> Vec<CameraMotion> {
        self.decompose_normalized(&NormalizedHomography::new(h, k))
    }

    /// Same as [`Self::decompose_homography`], writing into a caller-owned vector.
    ///
    /// The vector is cleared first.
    pub fn decompose_homography_into(
        &self,
        h: &DMat3,
        k: &DMat3,
        motions: &mut Vec<CameraMotion>,
    ) {
        motions.clear();
        motions.extend(self.decompose_homography(h, k));
    }

    /// Decompose an already normalized homography.
    pub fn decompose_normalized(&self, hnorm: &NormalizedHomography) -> Vec<CameraMotion> {
        if !hnorm.matrix().is_finite() {
            log::debug!("skipping decomposition of non-finite homography");
            return Vec::new();
        }

        let candidates = match self.method {
            DecompositionMethod::ClosedForm => closed_form::decompose(hnorm, &self.params),
            DecompositionMethod::SvdBased => svd::decompose(hnorm, &self.params),
        };
        let num_candidates = candidates.len();

        let motions = candidates
            .into_iter()
            .filter(|motion| {
                if !is_rotation_valid(&motion.rotation, self.params.rotation_epsilon) {
                    log::debug!("rejecting candidate with invalid rotation: {motion:?}");
                    return false;
                }
                if !passes_same_side_of_plane_constraint(motion) {
                    log::debug!("rejecting candidate with plane behind the camera: {motion:?}");
                    return false;
                }
                true
            })
            .collect::<Vec<_>>();

        log::debug!(
            "{} decomposition kept {}/{} candidates",
            self.method,
            motions.len(),
            num_candidates
        );

        motions
    }

    /// Checked variant of [`Self::decompose_homography`].
    ///
    /// Reports malformed input and empty results as errors instead of
    /// returning an empty vector.
    pub fn try_decompose_homography(
        &self,
        h: &DMat3,
        k: &DMat3,
    ) -> Result<Vec<CameraMotion>, DecompositionError> {
        if !h.is_finite() {
            return Err(DecompositionError::NonFiniteInput { name: "homography" });
        }
        if !k.is_finite() {
            return Err(DecompositionError::NonFiniteInput { name: "intrinsic" });
        }

        let det = k.determinant();
        if det.abs() < SINGULAR_INTRINSICS_EPS {
            return Err(DecompositionError::SingularIntrinsics { det });
        }

        let hnorm = NormalizedHomography::new(h, k);
        let sigma = hnorm.scale();
        if !sigma.is_finite() || sigma <= f64::EPSILON {
            return Err(DecompositionError::DegenerateHomography { sigma });
        }

        let motions = self.decompose_normalized(&hnorm);
        if motions.is_empty() {
            return Err(DecompositionError::NoAdmissibleMotion);
        }

        Ok(motions)
    }
}

/// Decompose a homography with the given algorithm and default tolerances.
///
/// # Arguments
///
/// * `h` - The image-to-image homography, at any scale.
/// * `k` - The camera intrinsics.
/// * `method` - The decomposition algorithm.
///
/// # Returns
///
/// The admissible camera motions, possibly none.
pub fn decompose_homography(
    h: &DMat3,
    k: &DMat3,
    method: DecompositionMethod,
) -> Vec<CameraMotion> {
    HomographyDecomposer::new(method).decompose_homography(h, k)
}

/// Check that `r` is a proper rotation.
///
/// `r` is accepted when `max|R^T * R - I| < epsilon` and `|det(R) - 1| < epsilon`.
/// Matrices with NaN entries are rejected.
pub fn is_rotation_valid(r: &DMat3, epsilon: f64) -> bool {
    let rtr = r.transpose() * *r;
    if !(linalg::max_abs_diff(&rtr, &DMat3::IDENTITY) < epsilon) {
        return false;
    }
    (r.determinant() - 1.0).abs() < epsilon
}

/// Check that the observed plane lies in front of both cameras.
///
/// A reference point on the plane stays visible when `1 + n^T * R^T * t > 0`.
pub fn passes_same_side_of_plane_constraint(motion: &CameraMotion) -> bool {
    let proj = motion
        .normal
        .dot(motion.rotation.transpose() * motion.translation);
    1.0 + proj > 0.0
}
