#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia Homography
//!
//! Recover the relative camera motion `(R, t, n)` encoded by a planar homography.
//!
//! Given the image-to-image homography `H` between two views of a plane and the
//! camera intrinsics `K`, the decomposition returns every physically plausible
//! hypothesis: a rotation `R`, a translation `t` scaled by the inverse plane
//! distance and the plane normal `n` in the reference camera frame.
//!
//! Two solvers are available:
//!
//! - **Closed form** (Z. Zhang and A.R. Hanson, "3D Reconstruction based on homography mapping")
//! - **SVD based** (E. Malis and M. Vargas, "Deeper understanding of the homography
//!   decomposition for vision-based control")
//!
//! ## Example
//!
//! ```rust
//! use kornia_homography::{linalg, DecompositionMethod, HomographyDecomposer};
//!
//! let k = linalg::mat3_from_rows(&[
//!     [600.0, 0.0, 320.0],
//!     [0.0, 600.0, 240.0],
//!     [0.0, 0.0, 1.0],
//! ]);
//! let h = linalg::mat3_from_rows(&[
//!     [81.1551391671253, 88.2921244076486, -3654.60266252177],
//!     [97.9788368422579, 106.556736454251, -10832.7494480565],
//!     [0.0194699936416257, 0.0235813413282153, 7.77972095366621],
//! ]);
//!
//! let decomposer = HomographyDecomposer::new(DecompositionMethod::SvdBased);
//! let motions = decomposer.decompose_homography(&h, &k);
//! assert!(!motions.is_empty());
//!
//! for motion in &motions {
//!     println!("R: {:?}", motion.rotation);
//!     println!("t: {:?}", motion.translation);
//!     println!("n: {:?}", motion.normal);
//! }
//! ```

/// Homography decomposition solvers and the shared normalization and filtering logic.
pub mod decompose;

/// Errors reported by the checked decomposition entry point.
pub mod error;

/// Conversions and small numerical helpers on top of `glam` and `faer`.
pub mod linalg;

/// Camera motion hypotheses.
pub mod motion;

pub use decompose::{
    decompose_homography, is_rotation_valid, passes_same_side_of_plane_constraint,
    DecompositionMethod, DecompositionParams, HomographyDecomposer, NormalizedHomography,
    DEFAULT_ROTATION_EPSILON,
};
pub use error::DecompositionError;
pub use motion::{compose_homography, CameraMotion};
