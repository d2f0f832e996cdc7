use glam::{DMat3, DVec3};

/// Build a matrix from a row-major 3x3 array.
///
/// `glam` stores matrices column-major, so the array is transposed on the way in.
///
/// Example:
///
/// ```
/// use kornia_homography::linalg::mat3_from_rows;
///
/// let k = mat3_from_rows(&[[600.0, 0.0, 320.0], [0.0, 600.0, 240.0], [0.0, 0.0, 1.0]]);
/// assert_eq!(k.z_axis.x, 320.0);
/// ```
pub fn mat3_from_rows(rows: &[[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(rows).transpose()
}

/// Convert a matrix back to a row-major 3x3 array.
pub fn mat3_to_rows(m: &DMat3) -> [[f64; 3]; 3] {
    m.transpose().to_cols_array_2d()
}

/// Copy a matrix into an owned faer matrix.
pub fn mat3_to_faer(m: &DMat3) -> faer::Mat<f64> {
    faer::Mat::<f64>::from_fn(3, 3, |i, j| m.col(j)[i])
}

/// Singular values of a 3x3 matrix, in non-increasing order.
pub fn singular_values3(m: &DMat3) -> [f64; 3] {
    let s = mat3_to_faer(m).singular_values();
    [s[0], s[1], s[2]]
}

/// Eigen-decomposition of a symmetric 3x3 matrix.
///
/// Returns the eigenvalues in non-increasing order together with the matching
/// unit eigenvectors. Only the lower triangle of `m` is read.
pub fn symmetric_eigen3(m: &DMat3) -> ([f64; 3], [DVec3; 3]) {
    let eig = mat3_to_faer(m).selfadjoint_eigendecomposition(faer::Side::Lower);
    let (u, s) = (eig.u(), eig.s().column_vector());

    // faer sorts eigenvalues in non-decreasing order
    let mut values = [0.0; 3];
    let mut vectors = [DVec3::ZERO; 3];
    for k in 0..3 {
        let j = 2 - k;
        values[k] = s.read(j);
        vectors[k] = DVec3::new(u.read(0, j), u.read(1, j), u.read(2, j));
    }
    (values, vectors)
}

/// Outer product `a * b^T`.
pub fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Largest absolute entry of a matrix. NaN entries propagate.
pub fn max_abs(m: &DMat3) -> f64 {
    m.to_cols_array().iter().fold(0.0, |acc: f64, v| {
        if v.is_nan() || v.abs() > acc {
            v.abs()
        } else {
            acc
        }
    })
}

/// Infinity norm of the difference of two matrices, taken element-wise.
pub fn max_abs_diff(a: &DMat3, b: &DMat3) -> f64 {
    max_abs(&(*a - *b))
}

/// Sign of `x` with zero counted as positive.
pub(crate) fn sign(x: f64) -> f64 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}
