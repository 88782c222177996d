use crate::acceptance::Rejection;

/// Counters collected while a sampler runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplingStats {
    /// Outer iterations, one per frontier point popped.
    pub iterations: usize,
    /// Candidates generated and tested.
    pub candidates: usize,
    /// Points placed, including the seed.
    pub accepted: usize,
    pub out_of_bounds: usize,
    pub occupied: usize,
    pub too_close: usize,
    /// Zero-norm direction vectors that had to be redrawn.
    pub degenerate_directions: usize,
    /// Frontier points retired after running out of attempts.
    pub dropped: usize,
    /// True if the run stopped on the sample cap.
    pub capped: bool,
}

impl SamplingStats {
    pub(crate) fn record_rejection(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::OutOfBounds => self.out_of_bounds += 1,
            Rejection::CellOccupied => self.occupied += 1,
            Rejection::TooClose { .. } => self.too_close += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.out_of_bounds + self.occupied + self.too_close
    }

    /// Share of tested candidates that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.candidates == 0 {
            return 0.0;
        }
        // the seed is placed without a candidate
        self.accepted.saturating_sub(1) as f64 / self.candidates as f64
    }
}
