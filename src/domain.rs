use crate::error::{Result, SamplingError};

/// Axis-aligned hyper-rectangle `[0, extent_0) x ... x [0, extent_{D-1})`.
///
/// All sampling happens inside a domain anchored at the origin. The upper bound of every
/// axis is exclusive, so a point with a coordinate equal to its extent lies outside.
#[derive(Clone, Debug, PartialEq)]
pub struct Domain {
    extents: Vec<f64>,
}

impl Domain {
    /// Creates a domain from its per-axis extents.
    ///
    /// Fails with `InvalidParameter` for an empty extent list or any extent that is not a
    /// positive finite number.
    pub fn new(extents: Vec<f64>) -> Result<Self> {
        if extents.is_empty() {
            return Err(SamplingError::InvalidParameter(
                "domain needs at least one axis".into(),
            ));
        }
        for (axis, &e) in extents.iter().enumerate() {
            if !(e.is_finite() && e > 0.0) {
                return Err(SamplingError::InvalidParameter(format!(
                    "extent of axis {} must be positive and finite, got {}",
                    axis, e
                )));
            }
        }
        Ok(Self { extents })
    }

    pub fn dimension(&self) -> usize {
        self.extents.len()
    }

    pub fn extents(&self) -> &[f64] {
        &self.extents
    }

    /// Returns true if every coordinate satisfies `0 <= x_d < extent_d`.
    ///
    /// A point of the wrong dimension is never contained.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.extents.len()
            && point
                .iter()
                .zip(&self.extents)
                .all(|(&x, &e)| x >= 0.0 && x < e)
    }

    /// Length of the main diagonal.
    pub fn diagonal(&self) -> f64 {
        self.extents.iter().map(|e| e * e).sum::<f64>().sqrt()
    }

    /// Product of the extents (area in 2D, volume in 3D).
    pub fn volume(&self) -> f64 {
        self.extents.iter().product()
    }

    /// The longest extent.
    pub fn longest_extent(&self) -> f64 {
        longest_extent(&self.extents)
    }
}

/// Largest value in `extents`, 0 when empty.
pub(crate) fn longest_extent(extents: &[f64]) -> f64 {
    extents.iter().cloned().fold(0.0, f64::max)
}
