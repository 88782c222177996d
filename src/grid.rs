use crate::domain::Domain;
use crate::error::{Result, SamplingError};

/// Marker for a cell that holds no point.
const EMPTY: usize = usize::MAX;

/// Smallest half-width of the neighbor window, in cells.
///
/// Points closer than `r` differ by less than `r / cell_size = sqrt(D)` cells along any axis,
/// so two steps are enough up to `D = 4`. Higher dimensions widen the window to
/// `ceil(sqrt(D))`, see [`BackgroundGrid::window`].
pub const MIN_WINDOW: usize = 2;

/// A dense background grid over the sampling domain.
///
/// The domain is divided into cubic cells of side `r / sqrt(D)`. A cell's diagonal then equals
/// `r`, so two accepted points can never share a cell and each slot holds at most one point
/// index. Slots are stored in a flat arena, axis 0 varying fastest.
#[derive(Clone, Debug)]
pub struct BackgroundGrid {
    /// Side length of a cell.
    pub cell_size: f64,
    /// Number of cells along each axis.
    pub resolution: Vec<usize>,
    /// Linear offset of one step along each axis.
    strides: Vec<usize>,
    /// Point index per cell, or `EMPTY`.
    cells: Vec<usize>,
    /// Number of non-empty cells.
    occupied: usize,
    /// Half-width of the neighbor window along each axis.
    window: usize,
}

impl BackgroundGrid {
    /// Creates an empty grid covering `domain` for minimum distance `min_distance`.
    ///
    /// The total cell count is computed in floating point before anything is allocated and
    /// compared against `max_cells`.
    pub fn new(domain: &Domain, min_distance: f64, max_cells: usize) -> Result<Self> {
        if !(min_distance.is_finite() && min_distance > 0.0) {
            return Err(SamplingError::InvalidParameter(format!(
                "min_distance must be positive and finite, got {}",
                min_distance
            )));
        }

        let dim = domain.dimension();
        let cell_size = min_distance / (dim as f64).sqrt();

        let axis_cells: Vec<f64> = domain
            .extents()
            .iter()
            .map(|e| (e / cell_size).ceil().max(1.0))
            .collect();
        let total: f64 = axis_cells.iter().product();
        if !total.is_finite() || total > max_cells as f64 {
            return Err(SamplingError::ResourceLimitExceeded {
                cells: total,
                limit: max_cells,
            });
        }

        // ceil(r / cell_size) rather than ceil(sqrt(D)) so rounding in cell_size can only widen it
        let window = ((min_distance / cell_size).ceil() as usize).max(MIN_WINDOW);

        let resolution: Vec<usize> = axis_cells.iter().map(|&n| n as usize).collect();
        let mut strides = Vec::with_capacity(dim);
        let mut stride = 1usize;
        for &n in &resolution {
            strides.push(stride);
            stride *= n;
        }

        log::debug!(
            "background grid: {} axes, cell size {:.6}, resolution {:?}, {} cells, window +-{}",
            dim,
            cell_size,
            resolution,
            stride,
            window
        );

        Ok(Self {
            cell_size,
            resolution,
            strides,
            cells: vec![EMPTY; stride],
            occupied: 0,
            window,
        })
    }

    pub fn dimension(&self) -> usize {
        self.resolution.len()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Half-width of the neighbor window: 2 up to four dimensions, `ceil(sqrt(D))` above.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of cells holding a point.
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Maps a point to its cell index, `floor(x_d / cell_size)` per axis.
    ///
    /// Coordinates are clamped into the grid so rounding at the upper domain edge never yields
    /// an index past the last cell.
    pub fn cell_of(&self, point: &[f64]) -> Vec<usize> {
        point
            .iter()
            .zip(&self.resolution)
            .map(|(&x, &n)| self.axis_cell(x, n))
            .collect()
    }

    /// Linear arena index of the cell containing `point`, without allocating.
    pub fn linear_index_of(&self, point: &[f64]) -> usize {
        point
            .iter()
            .zip(&self.resolution)
            .zip(&self.strides)
            .map(|((&x, &n), &s)| self.axis_cell(x, n) * s)
            .sum()
    }

    #[inline]
    fn axis_cell(&self, x: f64, n: usize) -> usize {
        // float-to-int casts saturate, negative coordinates land in cell 0
        ((x / self.cell_size).floor() as usize).min(n - 1)
    }

    /// Linear arena index of a cell index.
    pub fn linear_index(&self, cell: &[usize]) -> usize {
        cell.iter().zip(&self.strides).map(|(&c, &s)| c * s).sum()
    }

    /// Inverse of [`linear_index`](Self::linear_index).
    pub fn cell_coords(&self, linear: usize) -> Vec<usize> {
        self.strides
            .iter()
            .zip(&self.resolution)
            .map(|(&s, &n)| (linear / s) % n)
            .collect()
    }

    fn check_bounds(&self, cell: &[usize]) -> Result<()> {
        if cell.len() != self.resolution.len()
            || cell.iter().zip(&self.resolution).any(|(&c, &n)| c >= n)
        {
            return Err(SamplingError::InvalidState(format!(
                "cell {:?} outside grid of resolution {:?}",
                cell, self.resolution
            )));
        }
        Ok(())
    }

    pub fn is_occupied(&self, cell: &[usize]) -> bool {
        self.check_bounds(cell).is_ok() && self.cells[self.linear_index(cell)] != EMPTY
    }

    /// Point index stored in the cell at `linear`, if any.
    pub fn occupant(&self, linear: usize) -> Option<usize> {
        match self.cells.get(linear) {
            Some(&p) if p != EMPTY => Some(p),
            _ => None,
        }
    }

    /// Stores `point` in `cell`.
    ///
    /// Placing into an occupied cell means the caller skipped the acceptance test; this is
    /// reported as `InvalidState` and the grid is left unchanged.
    pub fn place(&mut self, cell: &[usize], point: usize) -> Result<()> {
        self.check_bounds(cell)?;
        self.place_linear(self.linear_index(cell), point)
    }

    pub(crate) fn place_linear(&mut self, linear: usize, point: usize) -> Result<()> {
        let slot = self.cells.get_mut(linear).ok_or_else(|| {
            SamplingError::InvalidState(format!("linear cell {} outside grid", linear))
        })?;
        if *slot != EMPTY {
            return Err(SamplingError::InvalidState(format!(
                "cell {} already holds point {}, refusing to place point {}",
                linear, *slot, point
            )));
        }
        *slot = point;
        self.occupied += 1;
        Ok(())
    }

    /// All point indices stored within [`window`](Self::window) cells of `cell` along every
    /// axis, clipped to the grid.
    pub fn neighbors_within_window(&self, cell: &[usize]) -> Vec<usize> {
        let mut found = Vec::new();
        self.visit_window(cell, |p| {
            found.push(p);
            true
        });
        found
    }

    /// Calls `visitor` with every point index in the window around `cell`.
    ///
    /// The visitor returns `false` to stop early; the return value reports whether the whole
    /// window was visited.
    pub fn visit_window<F>(&self, cell: &[usize], mut visitor: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        debug_assert!(self.check_bounds(cell).is_ok());
        let dim = self.resolution.len();
        let lo: Vec<usize> = cell.iter().map(|&c| c.saturating_sub(self.window)).collect();
        let hi: Vec<usize> = cell
            .iter()
            .zip(&self.resolution)
            .map(|(&c, &n)| c.saturating_add(self.window).min(n - 1))
            .collect();

        let mut cursor = lo.clone();
        let mut linear = self.linear_index(&cursor);
        loop {
            let p = self.cells[linear];
            if p != EMPTY && !visitor(p) {
                return false;
            }

            // odometer step, axis 0 fastest
            let mut axis = 0;
            loop {
                if axis == dim {
                    return true;
                }
                if cursor[axis] < hi[axis] {
                    cursor[axis] += 1;
                    linear += self.strides[axis];
                    break;
                }
                linear -= (cursor[axis] - lo[axis]) * self.strides[axis];
                cursor[axis] = lo[axis];
                axis += 1;
            }
        }
    }

    /// Iterates over `(cell index, point index)` for every occupied cell.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Vec<usize>, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p != EMPTY)
            .map(move |(i, &p)| (self.cell_coords(i), p))
    }
}
