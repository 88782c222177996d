use std::slice::ChunksExact;

/// Accepted points in acceptance order.
///
/// Coordinates are stored flat, `[x0, y0, x1, y1, ...]` for `D = 2`.
#[derive(Clone, Debug, PartialEq)]
pub struct Samples {
    dimension: usize,
    coords: Vec<f64>,
}

impl Samples {
    pub(crate) fn new(dimension: usize) -> Self {
        Self {
            dimension,
            coords: Vec::new(),
        }
    }

    /// Wraps flat coordinates. Returns `None` if `coords` is not a whole number of points.
    pub fn from_flat(dimension: usize, coords: Vec<f64>) -> Option<Self> {
        if dimension == 0 || coords.len() % dimension != 0 {
            return None;
        }
        Some(Self { dimension, coords })
    }

    pub(crate) fn push(&mut self, point: &[f64]) -> usize {
        debug_assert_eq!(point.len(), self.dimension);
        let index = self.len();
        self.coords.extend_from_slice(point);
        index
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.coords.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.dimension)?;
        self.coords.get(start..start + self.dimension)
    }

    pub fn first(&self) -> Option<&[f64]> {
        self.get(0)
    }

    pub fn iter(&self) -> ChunksExact<'_, f64> {
        self.coords.chunks_exact(self.dimension)
    }

    pub fn as_flat(&self) -> &[f64] {
        &self.coords
    }

    pub fn into_flat(self) -> Vec<f64> {
        self.coords
    }

    pub fn to_vecs(&self) -> Vec<Vec<f64>> {
        self.iter().map(|p| p.to_vec()).collect()
    }
}

impl<'a> IntoIterator for &'a Samples {
    type Item = &'a [f64];
    type IntoIter = ChunksExact<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
