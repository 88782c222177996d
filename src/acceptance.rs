use crate::domain::Domain;
use crate::grid::BackgroundGrid;

/// Why a candidate was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// At least one coordinate lies outside `[0, extent_d)`.
    OutOfBounds,
    /// The candidate's own cell already holds a point.
    CellOccupied,
    /// An accepted point lies closer than the minimum distance.
    TooClose { neighbor: usize },
}

/// Outcome of testing one candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The candidate may be placed; `cell` is the linear grid index it belongs in.
    Accepted { cell: usize },
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

/// Read-only view used to decide whether a candidate keeps its distance.
///
/// Holds no state of its own: the answer depends only on the domain, the grid and the points
/// accepted so far. Nothing is mutated.
pub struct AcceptanceTest<'a> {
    domain: &'a Domain,
    grid: &'a BackgroundGrid,
    /// Accepted coordinates, flat with stride `D`.
    points: &'a [f64],
    min_distance_sq: f64,
}

impl<'a> AcceptanceTest<'a> {
    pub fn new(
        domain: &'a Domain,
        grid: &'a BackgroundGrid,
        points: &'a [f64],
        min_distance: f64,
    ) -> Self {
        Self {
            domain,
            grid,
            points,
            min_distance_sq: min_distance * min_distance,
        }
    }

    /// Runs the bounds, occupancy and neighbor checks in that order.
    pub fn check(&self, candidate: &[f64]) -> Verdict {
        if !self.domain.contains(candidate) {
            return Verdict::Rejected(Rejection::OutOfBounds);
        }

        let cell = self.grid.cell_of(candidate);
        let linear = self.grid.linear_index(&cell);
        if self.grid.occupant(linear).is_some() {
            return Verdict::Rejected(Rejection::CellOccupied);
        }

        let dim = self.domain.dimension();
        let mut conflict = None;
        self.grid.visit_window(&cell, |j| {
            let other = &self.points[j * dim..(j + 1) * dim];
            let d2: f64 = other
                .iter()
                .zip(candidate)
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            if d2 < self.min_distance_sq {
                conflict = Some(j);
                return false;
            }
            true
        });

        match conflict {
            Some(neighbor) => Verdict::Rejected(Rejection::TooClose { neighbor }),
            None => Verdict::Accepted { cell: linear },
        }
    }

    pub fn accepts(&self, candidate: &[f64]) -> bool {
        self.check(candidate).is_accepted()
    }
}
