use rand::Rng;

/// Points that may still spawn new candidates, stored as indices into the output.
///
/// Order carries no meaning. Removal swaps the chosen slot with the last one.
#[derive(Clone, Debug, Default)]
pub struct ActiveFrontier {
    active: Vec<usize>,
}

impl ActiveFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            active: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: usize) {
        self.active.push(point);
    }

    /// Puts a previously popped point back.
    pub fn reinsert(&mut self, point: usize) {
        self.active.push(point);
    }

    /// Removes and returns a uniformly chosen point, or `None` when empty.
    pub fn pop_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.active.is_empty() {
            return None;
        }
        let slot = rng.gen_range(0..self.active.len());
        Some(self.active.swap_remove(slot))
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[cfg(test)]
    fn contains(&self, point: usize) -> bool {
        self.active.contains(&point)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter().copied()
    }
}
