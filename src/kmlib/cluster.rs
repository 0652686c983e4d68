use crate::kmlib::{metrics, KmError, PointStore, Result};
use ndarray::Array1;

/// A centroid plus the indices of the observations currently assigned to it.
/// Members are row indices into the `PointStore`, the cluster never holds point data.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub centroid: Array1<f64>,
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn new(centroid: Array1<f64>) -> Self {
        Self {
            centroid,
            members: Vec::new(),
        }
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Per-coordinate mean of the members. None when the cluster has no members
    pub fn mean(&self, points: &PointStore) -> Option<Array1<f64>> {
        if self.members.is_empty() {
            return None;
        }

        let mut new_centroid = Array1::<f64>::zeros(points.dim());
        for &idx in &self.members {
            new_centroid += &points.point(idx);
        }
        new_centroid /= self.members.len() as f64;

        Some(new_centroid)
    }

    /// Replace the centroid with the mean of the members.
    /// Returns the squared distance the centroid moved, or None (centroid untouched)
    /// when there are no members to average.
    pub fn update_centroid(&mut self, points: &PointStore) -> Option<f64> {
        let new_centroid = self.mean(points)?;
        let shift = metrics::sq_euclidean(self.centroid.view(), new_centroid.view());
        self.centroid = new_centroid;
        Some(shift)
    }
}

/// Build one cluster per seed index. Each centroid is an owned copy of the seed
/// observation so it can move independently afterwards.
pub fn seed_clusters(points: &PointStore, seeds: &[usize]) -> Result<Vec<Cluster>> {
    let n = points.len();
    let k = seeds.len();
    if k == 0 || k > n {
        return Err(KmError::InvalidK { k, n });
    }

    let mut seen = vec![false; n];
    for &seed in seeds {
        if seed >= n {
            return Err(KmError::SeedOutOfRange { seed, n });
        }
        if seen[seed] {
            return Err(KmError::DuplicateSeed(seed));
        }
        seen[seed] = true;
    }

    Ok(seeds
        .iter()
        .map(|&seed| Cluster::new(points.point(seed).to_owned()))
        .collect())
}
