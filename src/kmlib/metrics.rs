use ndarray::{ArrayView1, ArrayView2};

use crate::kmlib::PointStore;

/// Computes the squared Euclidean distance between two vectors.
/// No square root is taken, so the value is only useful for comparisons and
/// for the within-cluster sum of squares.
///
/// # Parameters
/// - `a`: The first vector.
/// - `b`: The second vector, same length as `a`.
///
/// # Returns
/// The sum over all coordinates of the squared coordinate-wise difference.
/// - 0.0 iff the vectors are identical.
pub fn sq_euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}

/// Within-cluster sum of squared distances.
///
/// # Parameters
/// - `points`: The observations.
/// - `assignments`: Cluster index per observation. Unassigned observations are skipped.
/// - `centroids`: K x d matrix of centroid positions.
///
/// # Returns
/// Sum over every assigned observation of its squared distance to its centroid.
pub fn wcss(points: &PointStore, assignments: &[Option<usize>], centroids: ArrayView2<f64>) -> f64 {
    assignments
        .iter()
        .enumerate()
        .filter_map(|(idx, label)| label.map(|c| (idx, c)))
        .map(|(idx, c)| sq_euclidean(points.point(idx), centroids.row(c)))
        .sum()
}

/// Pair-counting Jaccard measure between two labelings of the same observations.
/// Every pair (i, j) with i < j is checked for being in the same cluster under each labeling.
///
/// # Parameters
/// - `truth`: Reference labeling.
/// - `predicted`: Computed labeling, same length as `truth`.
///
/// # Returns
/// |pairs together in both| / |pairs together in either|, between 0 and 1.
/// - 1.0 when neither labeling puts any pair together (the labelings agree).
pub fn jaccard<T: PartialEq>(truth: &[T], predicted: &[T]) -> f64 {
    let n = truth.len().min(predicted.len());
    let mut union: u64 = 0;
    let mut intersect: u64 = 0;

    for i in 0..n {
        for j in (i + 1)..n {
            let same_truth = truth[i] == truth[j];
            let same_pred = predicted[i] == predicted[j];
            if same_truth || same_pred {
                union += 1;
            }
            if same_truth && same_pred {
                intersect += 1;
            }
        }
    }

    if union == 0 {
        return 1.0;
    }
    intersect as f64 / union as f64
}
