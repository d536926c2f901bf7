//! Sample workload payloads for the driver and tests
//!
//! Random integer matrices and a naive multiply, used as opaque task bodies
//! that give the worker something real to chew on. The queue chain has no
//! dependency on this module.

use rand::Rng;

pub type Matrix = Vec<Vec<i64>>;

/// Generate a `rows x cols` matrix of random integers in `0..=max_value`.
pub fn generate_matrix(rows: usize, cols: usize, max_value: i64) -> Matrix {
    let mut rng = rand::thread_rng();
    (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(0..=max_value)).collect())
        .collect()
}

/// Naive O(n^3) matrix product.
///
/// `a` must be `M x N` and `b` must be `N x P`; returns `M x P`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    debug_assert!(!a.is_empty() && !b.is_empty());
    debug_assert_eq!(a[0].len(), b.len());

    let rows = a.len();
    let inner = b.len();
    let cols = b[0].len();

    let mut result = vec![vec![0i64; cols]; rows];
    for (i, row) in a.iter().enumerate() {
        for j in 0..cols {
            let mut acc = 0i64;
            for k in 0..inner {
                acc += row[k] * b[k][j];
            }
            result[i][j] = acc;
        }
    }
    result
}

/// Identity matrix of the given size.
pub fn identity(size: usize) -> Matrix {
    (0..size)
        .map(|i| (0..size).map(|j| i64::from(i == j)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_matrix_dimensions_and_range() {
        let matrix = generate_matrix(4, 7, 100);

        assert_eq!(matrix.len(), 4);
        for row in &matrix {
            assert_eq!(row.len(), 7);
            for &value in row {
                assert!((0..=100).contains(&value));
            }
        }
    }

    #[test]
    fn test_multiply_by_identity_is_identity_operation() {
        let matrix = generate_matrix(5, 5, 50);
        let product = multiply(&matrix, &identity(5));

        assert_eq!(product, matrix);
    }

    #[test]
    fn test_multiply_known_product() {
        let a = vec![vec![1, 2], vec![3, 4]];
        let b = vec![vec![5, 6], vec![7, 8]];

        assert_eq!(multiply(&a, &b), vec![vec![19, 22], vec![43, 50]]);
    }

    #[test]
    fn test_multiply_rectangular_shapes() {
        let a = generate_matrix(2, 3, 10);
        let b = generate_matrix(3, 4, 10);

        let product = multiply(&a, &b);
        assert_eq!(product.len(), 2);
        assert_eq!(product[0].len(), 4);
    }
}
