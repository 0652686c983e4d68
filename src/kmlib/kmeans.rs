use crate::kmlib::{
    cluster::seed_clusters, metrics, Cluster, EmptyClusterPolicy, KmError, KmParams, PointStore,
    Result,
};
use ndarray::{Array2, ArrayView2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Done,
}

/// Final state of a run, whether it converged or used up `max_iter`
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster of each observation. None only when no iteration was performed
    pub assignments: Vec<Option<usize>>,
    /// K x d
    pub centroids: Array2<f64>,
    pub iterations: usize,
}

impl KMeansResult {
    pub fn labels(&self) -> &[Option<usize>] {
        &self.assignments
    }

    pub fn centroids(&self) -> ArrayView2<f64> {
        self.centroids.view()
    }

    pub fn k(&self) -> usize {
        self.centroids.nrows()
    }

    pub fn wcss(&self, points: &PointStore) -> f64 {
        metrics::wcss(points, &self.assignments, self.centroids.view())
    }

    /// Member indices of every cluster, in observation order
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut ret = vec![Vec::new(); self.k()];
        for (idx, label) in self.assignments.iter().enumerate() {
            if let Some(c) = label {
                ret[*c].push(idx);
            }
        }
        ret
    }
}

/// Lloyd's relocation loop over a borrowed set of observations.
///
/// Each `step` rebuilds every cluster's membership from scratch (nearest
/// centroid, lowest index wins ties) and then moves each centroid to the mean
/// of its members. The loop is done once no centroid moved more than
/// `tolerance` (squared distance) or `max_iter` steps were taken.
pub struct Lloyd<'a> {
    points: &'a PointStore,
    params: KmParams,
    clusters: Vec<Cluster>,
    assignments: Vec<Option<usize>>,
    iterations: usize,
    state: LoopState,
}

impl<'a> Lloyd<'a> {
    /// Seed one cluster per index in `seeds`. Fails before any iteration on bad seeds
    pub fn new(points: &'a PointStore, seeds: &[usize], params: &KmParams) -> Result<Self> {
        let clusters = seed_clusters(points, seeds)?;
        let state = if params.max_iter == 0 {
            LoopState::Done
        } else {
            LoopState::Running
        };
        Ok(Self {
            points,
            params: *params,
            clusters,
            assignments: vec![None; points.len()],
            iterations: 0,
            state,
        })
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn assignments(&self) -> &[Option<usize>] {
        &self.assignments
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Within-cluster sum of squares for the current labels and centroids
    pub fn wcss(&self) -> f64 {
        self.assignments
            .iter()
            .enumerate()
            .filter_map(|(idx, label)| label.map(|c| (idx, c)))
            .map(|(idx, c)| {
                metrics::sq_euclidean(self.points.point(idx), self.clusters[c].centroid.view())
            })
            .sum()
    }

    /// Index of the closest centroid. Strict less-than so the first minimum wins
    fn nearest(&self, idx: usize) -> usize {
        let point = self.points.point(idx);
        let mut closest = 0;
        let mut closest_dist = metrics::sq_euclidean(point, self.clusters[0].centroid.view());
        for (c, cluster) in self.clusters.iter().enumerate().skip(1) {
            let dist = metrics::sq_euclidean(point, cluster.centroid.view());
            if dist < closest_dist {
                closest = c;
                closest_dist = dist;
            }
        }
        closest
    }

    /// Assignment step: relabel every observation and rebuild memberships
    pub fn assign(&mut self) -> Result<()> {
        for cluster in self.clusters.iter_mut() {
            cluster.members.clear();
        }

        let mut counts = vec![0usize; self.clusters.len()];
        for idx in 0..self.points.len() {
            let closest = self.nearest(idx);
            self.assignments[idx] = Some(closest);
            counts[closest] += 1;
        }

        // Size every membership list before filling so growth can't fail halfway
        for (cluster, &count) in self.clusters.iter_mut().zip(counts.iter()) {
            cluster.members.try_reserve_exact(count)?;
        }
        for (idx, label) in self.assignments.iter().enumerate() {
            if let Some(c) = label {
                self.clusters[*c].members.push(idx);
            }
        }

        Ok(())
    }

    /// Centroid update step. Returns true if any centroid moved beyond the tolerance
    pub fn update(&mut self) -> Result<bool> {
        let iteration = self.iterations + 1;
        let mut moved = 0;

        for (c, cluster) in self.clusters.iter_mut().enumerate() {
            match cluster.update_centroid(self.points) {
                Some(shift) => {
                    if shift > self.params.tolerance {
                        moved += 1;
                    }
                }
                None => match self.params.empty_policy {
                    EmptyClusterPolicy::Keep => {
                        warn!("cluster {} is empty on iteration {}", c, iteration);
                    }
                    EmptyClusterPolicy::Fail => {
                        return Err(KmError::DegenerateCluster {
                            cluster: c,
                            iteration,
                        });
                    }
                },
            }
        }

        trace!("iteration {} moved {} centroids", iteration, moved);
        Ok(moved > 0)
    }

    /// One full iteration, if the loop isn't already done
    pub fn step(&mut self) -> Result<LoopState> {
        if self.state == LoopState::Done {
            return Ok(self.state);
        }

        // Centroids may be half updated after a failure, nothing to resume
        let changed = match self.assign().and_then(|_| self.update()) {
            Ok(changed) => changed,
            Err(e) => {
                self.state = LoopState::Done;
                return Err(e);
            }
        };
        self.iterations += 1;

        if log_enabled!(log::Level::Debug) {
            debug!("iteration {} wcss {}", self.iterations, self.wcss());
        }

        if !changed {
            info!("converged after {} iterations", self.iterations);
            self.state = LoopState::Done;
        } else if self.iterations >= self.params.max_iter {
            info!("stopped at --max-iter {}", self.params.max_iter);
            self.state = LoopState::Done;
        }

        Ok(self.state)
    }

    /// Iterate until done and hand back labels and centroids
    pub fn run(mut self) -> Result<KMeansResult> {
        while self.step()? == LoopState::Running {}
        Ok(self.into_result())
    }

    pub fn into_result(self) -> KMeansResult {
        let k = self.clusters.len();
        let d = self.points.dim();
        let centroids = Array2::from_shape_fn((k, d), |(i, j)| self.clusters[i].centroid[j]);
        KMeansResult {
            assignments: self.assignments,
            centroids,
            iterations: self.iterations,
        }
    }
}

/// Run Lloyd's algorithm from the observations at `seeds`
pub fn kmeans(points: &PointStore, seeds: &[usize], params: &KmParams) -> Result<KMeansResult> {
    Lloyd::new(points, seeds, params)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn params(max_iter: usize) -> KmParams {
        KmParams {
            max_iter,
            ..Default::default()
        }
    }

    fn blobs(n: usize, d: usize, seed: u64) -> PointStore {
        let mut rng = StdRng::seed_from_u64(seed);
        let centers = [-20.0, 0.0, 15.0, 40.0];
        let mut flat = Vec::with_capacity(n * d);
        for i in 0..n {
            let center = centers[i % centers.len()];
            for _ in 0..d {
                flat.push(center + rng.gen_range(-6.0..6.0));
            }
        }
        PointStore::from_flat(n, d, flat).unwrap()
    }

    #[test]
    fn two_groups_on_a_line() {
        let points = PointStore::from_flat(4, 1, vec![1.0, 2.0, 9.0, 10.0]).unwrap();
        let result = kmeans(&points, &[0, 2], &params(10)).unwrap();
        assert_eq!(result.labels(), &[Some(0), Some(0), Some(1), Some(1)]);
        assert_eq!(result.centroids.column(0).to_vec(), vec![1.5, 9.5]);
        assert_eq!(result.iterations, 2);
    }

    #[test]
    fn every_point_its_own_cluster() {
        let points =
            PointStore::from_rows(&[vec![0.0, 0.0], vec![0.0, 1.0], vec![10.0, 10.0]]).unwrap();
        let result = kmeans(&points, &[0, 1, 2], &params(5)).unwrap();
        assert_eq!(result.labels(), &[Some(0), Some(1), Some(2)]);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.centroids, points.view().to_owned());
    }

    #[test]
    fn k_equals_n_stops_early() {
        let points = blobs(12, 3, 7);
        let seeds: Vec<usize> = (0..12).rev().collect();
        let result = kmeans(&points, &seeds, &params(100)).unwrap();
        assert_eq!(result.iterations, 1);
        for (idx, label) in result.labels().iter().enumerate() {
            assert_eq!(*label, Some(11 - idx));
        }
    }

    #[test]
    fn zero_iterations_returns_seeds() {
        let points = PointStore::from_flat(4, 1, vec![1.0, 2.0, 9.0, 10.0]).unwrap();
        let lloyd = Lloyd::new(&points, &[3, 1], &params(0)).unwrap();
        assert_eq!(lloyd.state(), LoopState::Done);
        let result = lloyd.run().unwrap();
        assert_eq!(result.iterations, 0);
        assert!(result.labels().iter().all(|l| l.is_none()));
        assert_eq!(result.centroids.column(0).to_vec(), vec![10.0, 2.0]);
        assert_eq!(result.wcss(&points), 0.0);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        // 1.0 is equally far from both seeds
        let points = PointStore::from_flat(3, 1, vec![0.0, 2.0, 1.0]).unwrap();
        let mut lloyd = Lloyd::new(&points, &[0, 1], &params(1)).unwrap();
        lloyd.assign().unwrap();
        assert_eq!(lloyd.assignments(), &[Some(0), Some(1), Some(0)]);
        assert_eq!(lloyd.clusters()[0].members, vec![0, 2]);
        assert_eq!(lloyd.clusters()[1].members, vec![1]);
    }

    #[test]
    fn memberships_partition_points() {
        let points = blobs(200, 2, 11);
        let mut lloyd = Lloyd::new(&points, &[0, 1, 2, 3, 4], &params(50)).unwrap();
        while lloyd.step().unwrap() == LoopState::Running {
            let mut seen = vec![0usize; points.len()];
            for (c, cluster) in lloyd.clusters().iter().enumerate() {
                for &idx in &cluster.members {
                    seen[idx] += 1;
                    assert_eq!(lloyd.assignments()[idx], Some(c));
                }
            }
            assert!(seen.iter().all(|&s| s == 1));
        }
        let total: usize = lloyd.clusters().iter().map(|c| c.len()).sum();
        assert_eq!(total, points.len());
    }

    #[test]
    fn centroids_are_member_means() {
        let points = blobs(150, 3, 3);
        let mut lloyd = Lloyd::new(&points, &[5, 17, 42], &params(100)).unwrap();
        while lloyd.step().unwrap() == LoopState::Running {}
        for cluster in lloyd.clusters() {
            if let Some(mean) = cluster.mean(&points) {
                let off = metrics::sq_euclidean(mean.view(), cluster.centroid.view());
                assert!(off <= 1e-4);
            }
        }
    }

    #[test]
    fn wcss_never_increases() {
        for seed in 0..5 {
            let points = blobs(300, 4, seed);
            let seeds = [0, 1, 2, 3, 4, 5, 6];
            let mut lloyd = Lloyd::new(&points, &seeds, &params(100)).unwrap();
            let mut prev = f64::INFINITY;
            while lloyd.step().unwrap() == LoopState::Running {
                let cur = lloyd.wcss();
                assert!(cur <= prev + 1e-9 * prev.abs().max(1.0), "{} > {}", cur, prev);
                prev = cur;
            }
            assert!(lloyd.wcss() <= prev + 1e-9 * prev.abs().max(1.0));
        }
    }

    #[test]
    fn repeated_runs_match() {
        let points = blobs(250, 3, 21);
        let seeds = [10, 20, 30, 40];
        let a = kmeans(&points, &seeds, &params(100)).unwrap();
        let b = kmeans(&points, &seeds, &params(100)).unwrap();
        assert_eq!(a.labels(), b.labels());
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn concurrent_runs_share_points() {
        let points = blobs(120, 2, 5);
        let expected = kmeans(&points, &[0, 1, 2], &params(100)).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| kmeans(&points, &[0, 1, 2], &params(100)).unwrap()))
                .collect();
            for handle in handles {
                let got = handle.join().unwrap();
                assert_eq!(got.labels(), expected.labels());
            }
        });
    }

    #[test]
    fn max_iter_caps_the_loop() {
        let points = blobs(400, 2, 9);
        let result = kmeans(&points, &[0, 1, 2, 3, 4, 5], &params(1)).unwrap();
        assert_eq!(result.iterations, 1);
        assert!(result.labels().iter().all(|l| l.is_some()));
    }

    #[test]
    fn empty_cluster_keep_policy() {
        // Identical points: the tie always goes to cluster 0 and cluster 1 empties
        let points = PointStore::from_flat(2, 1, vec![5.0, 5.0]).unwrap();
        let result = kmeans(&points, &[0, 1], &params(10)).unwrap();
        assert_eq!(result.labels(), &[Some(0), Some(0)]);
        assert_eq!(result.centroids.column(0).to_vec(), vec![5.0, 5.0]);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.members(), vec![vec![0, 1], vec![]]);
    }

    #[test]
    fn empty_cluster_fail_policy() {
        let points = PointStore::from_flat(2, 1, vec![5.0, 5.0]).unwrap();
        let strict = KmParams {
            empty_policy: EmptyClusterPolicy::Fail,
            ..params(10)
        };
        let err = kmeans(&points, &[0, 1], &strict).unwrap_err();
        assert!(matches!(
            err,
            KmError::DegenerateCluster {
                cluster: 1,
                iteration: 1
            }
        ));
    }

    #[test]
    fn failed_step_ends_the_loop() {
        let points = PointStore::from_flat(2, 1, vec![5.0, 5.0]).unwrap();
        let strict = KmParams {
            empty_policy: EmptyClusterPolicy::Fail,
            ..params(10)
        };
        let mut lloyd = Lloyd::new(&points, &[0, 1], &strict).unwrap();
        assert!(lloyd.step().is_err());
        assert_eq!(lloyd.state(), LoopState::Done);
        assert_eq!(lloyd.iterations(), 0);
        assert_eq!(lloyd.step().unwrap(), LoopState::Done);
    }

    #[test]
    fn bad_seeds_fail_before_iterating() {
        let points = PointStore::from_flat(3, 1, vec![0.0, 1.0, 2.0]).unwrap();
        assert!(matches!(
            kmeans(&points, &[0, 3], &params(10)),
            Err(KmError::SeedOutOfRange { seed: 3, n: 3 })
        ));
        assert!(matches!(
            kmeans(&points, &[1, 1], &params(10)),
            Err(KmError::DuplicateSeed(1))
        ));
    }
}
