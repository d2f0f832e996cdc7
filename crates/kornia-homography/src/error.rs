/// Errors returned by [`HomographyDecomposer::try_decompose_homography`](crate::HomographyDecomposer::try_decompose_homography).
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DecompositionError {
    /// One of the input matrices contains NaN or infinite entries.
    #[error("The {name} matrix contains non-finite entries")]
    NonFiniteInput {
        /// Name of the offending matrix.
        name: &'static str,
    },

    /// The intrinsic matrix cannot be inverted.
    #[error("The intrinsic matrix is singular (det = {det})")]
    SingularIntrinsics {
        /// Determinant of the intrinsic matrix.
        det: f64,
    },

    /// The homography has no usable scale (its middle singular value vanishes).
    #[error("The homography is degenerate, middle singular value is {sigma}")]
    DegenerateHomography {
        /// Middle singular value of `K^-1 H K`.
        sigma: f64,
    },

    /// No candidate motion survived the validity filters.
    #[error("No admissible camera motion could be recovered from the homography")]
    NoAdmissibleMotion,
}
