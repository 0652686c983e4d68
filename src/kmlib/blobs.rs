use crate::kmlib::{KmError, PointStore, Result};
use ndarray::Array2;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Blob centers are drawn uniformly inside [-CENTER_BOX, CENTER_BOX) on every axis
const CENTER_BOX: f64 = 10.0;

/// Synthetic observations with the blob each one was drawn from
#[derive(Debug, Clone)]
pub struct Blobs {
    pub points: PointStore,
    pub labels: Vec<usize>,
    /// K x d
    pub centers: Array2<f64>,
}

impl Blobs {
    /// Index of the first observation of every blob, usable as seeds
    pub fn first_of_each(&self) -> Vec<usize> {
        let k = self.centers.nrows();
        let mut ret = vec![None; k];
        for (idx, &label) in self.labels.iter().enumerate() {
            ret[label].get_or_insert(idx);
        }
        ret.into_iter().flatten().collect()
    }
}

/// Draw `n` observations of dimension `dim` around `k` random centers.
/// Blob sizes differ by at most one and the observations come out shuffled.
/// Each coordinate gets normal noise with standard deviation `spread`.
/// The same `seed` always gives the same blobs.
pub fn make_blobs(n: usize, k: usize, dim: usize, spread: f64, seed: Option<u64>) -> Result<Blobs> {
    if n == 0 {
        return Err(KmError::EmptyInput);
    }
    if dim == 0 {
        return Err(KmError::ZeroDimension);
    }
    if k == 0 || k > n {
        return Err(KmError::InvalidK { k, n });
    }
    if !spread.is_finite() || spread <= 0.0 {
        return Err(KmError::InvalidSpread(spread));
    }
    let size = n.checked_mul(dim).ok_or(KmError::TooLarge { n, d: dim })?;
    let noise = Normal::new(0.0, spread).map_err(|_| KmError::InvalidSpread(spread))?;

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let centers = Array2::from_shape_fn((k, dim), |_| rng.gen_range(-CENTER_BOX..CENTER_BOX));

    let mut labels = Vec::new();
    labels.try_reserve_exact(n)?;
    for c in 0..k {
        let count = n / k + usize::from(c < n % k);
        labels.extend(std::iter::repeat(c).take(count));
    }
    labels.shuffle(&mut rng);

    let mut flat = Vec::new();
    flat.try_reserve_exact(size)?;
    for &c in &labels {
        for j in 0..dim {
            flat.push(centers[[c, j]] + noise.sample(&mut rng));
        }
    }

    Ok(Blobs {
        points: PointStore::from_flat(n, dim, flat)?,
        labels,
        centers,
    })
}
