use crate::kmlib::{KmError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Immutable N x d observation matrix in one contiguous buffer.
/// Clusters refer to rows by index, never by copy.
#[derive(Debug, Clone)]
pub struct PointStore {
    data: Array2<f64>,
}

impl PointStore {
    /// Wrap an already shaped matrix after checking it is usable
    pub fn new(data: Array2<f64>) -> Result<Self> {
        let (n, d) = data.dim();
        if n == 0 {
            return Err(KmError::EmptyInput);
        }
        if d == 0 {
            return Err(KmError::ZeroDimension);
        }
        for (row, point) in data.rows().into_iter().enumerate() {
            if let Some((col, value)) = point.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(KmError::BadValue {
                    row,
                    col,
                    value: value.to_string(),
                });
            }
        }
        Ok(Self { data })
    }

    /// Build from a row-major flat buffer of `n * d` values
    pub fn from_flat(n: usize, d: usize, values: Vec<f64>) -> Result<Self> {
        if n == 0 {
            return Err(KmError::EmptyInput);
        }
        if d == 0 {
            return Err(KmError::ZeroDimension);
        }
        let size = n.checked_mul(d).ok_or(KmError::TooLarge { n, d })?;
        if values.len() < size {
            // First row that comes up short
            return Err(KmError::DimensionMismatch {
                expected: d,
                found: values.len() % d,
                row: values.len() / d,
            });
        }
        if values.len() > size {
            return Err(KmError::TrailingValues(values.len() - size));
        }
        let data = Array2::from_shape_vec((n, d), values).map_err(|_| KmError::DimensionMismatch {
            expected: d,
            found: 0,
            row: 0,
        })?;
        Self::new(data)
    }

    /// Build from nested rows, every row must have the same length
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let d = rows.first().map(|r| r.len()).ok_or(KmError::EmptyInput)?;
        let mut flat = Vec::with_capacity(rows.len() * d);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != d {
                return Err(KmError::DimensionMismatch {
                    expected: d,
                    found: values.len(),
                    row,
                });
            }
            flat.extend_from_slice(values);
        }
        Self::from_flat(rows.len(), d, flat)
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Dimensionality of every observation
    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    pub fn point(&self, idx: usize) -> ArrayView1<f64> {
        self.data.row(idx)
    }

    pub fn view(&self) -> ArrayView2<f64> {
        self.data.view()
    }
}
