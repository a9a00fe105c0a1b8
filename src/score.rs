//! Pairwise incompatibility scoring.

use log::trace;

/// Floor for the self-pairing sentinel placed on the matrix diagonal.
const SELF_PAIR_SENTINEL: f64 = 1000.0;

/// Builds the symmetric incompatibility matrix for a group of residents.
///
/// Entry (i, j) is the weighted Manhattan distance between the two
/// residents' ordinal preference vectors; higher means less compatible.
/// The diagonal carries a sentinel strictly above every off-diagonal
/// entry, so self-pairing is never objective-favorable even before the
/// explicit exclusion constraint rules it out.
///
/// Dimensions must agree: every preference row has one code per weight.
pub fn compatibility_matrix(preferences: &[Vec<f64>], weights: &[f64]) -> Vec<Vec<f64>> {
    let num_residents = preferences.len();
    let mut matrix = vec![vec![0.0; num_residents]; num_residents];
    let mut max_pair_cost = 0.0f64;

    for i in 0..num_residents {
        debug_assert_eq!(preferences[i].len(), weights.len());
        for j in (i + 1)..num_residents {
            let cost: f64 = preferences[i]
                .iter()
                .zip(&preferences[j])
                .zip(weights)
                .map(|((a, b), w)| (a - b).abs() * w)
                .sum();
            matrix[i][j] = cost;
            matrix[j][i] = cost;
            max_pair_cost = max_pair_cost.max(cost);
        }
    }

    // the sentinel must stay strictly above the worst achievable pair cost
    let sentinel = SELF_PAIR_SENTINEL.max(10.0 * max_pair_cost);
    for i in 0..num_residents {
        matrix[i][i] = sentinel;
    }

    trace!(
        "Compatibility matrix built for {} residents (max pair cost {:.3}).",
        num_residents, max_pair_cost
    );
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_manhattan_distance() {
        let preferences = vec![vec![1.0, 4.0], vec![3.0, 1.0]];
        let weights = vec![2.0, 0.5];
        let matrix = compatibility_matrix(&preferences, &weights);

        // |1-3|*2 + |4-1|*0.5 = 5.5
        assert_eq!(matrix[0][1], 5.5);
        assert_eq!(matrix[1][0], 5.5);
    }

    #[test]
    fn matrix_is_symmetric_with_dominant_diagonal() {
        let preferences = vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 1.0, 2.0],
            vec![2.0, 4.0, 1.0],
        ];
        let weights = vec![1.0, 3.0, 0.5];
        let matrix = compatibility_matrix(&preferences, &weights);

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(matrix[i][j], matrix[j][i]);
                if i != j {
                    assert!(matrix[i][i] > matrix[i][j]);
                }
            }
        }
    }

    #[test]
    fn sentinel_scales_with_large_weights() {
        let preferences = vec![vec![1.0], vec![1000.0]];
        let weights = vec![10.0];
        let matrix = compatibility_matrix(&preferences, &weights);

        assert!(matrix[0][0] > matrix[0][1]);
    }

    #[test]
    fn empty_input_builds_empty_matrix() {
        let matrix = compatibility_matrix(&[], &[]);
        assert!(matrix.is_empty());
    }
}
