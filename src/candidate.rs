use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// How many zero-norm normal vectors are redrawn before an attempt is given up.
pub const MAX_DIRECTION_RETRIES: usize = 8;

/// Squared norms below this cannot be normalized reliably.
const MIN_NORM_SQ: f64 = 1e-200;

/// Distribution of the candidate distance within the shell `[r, 2r)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialDistribution {
    /// Distance uniform in `[r, 2r)`. Candidates bunch up near the inner sphere, which
    /// produces slightly tighter packings.
    #[default]
    Uniform,
    /// Distance distributed so candidates are uniform over the volume of the shell.
    Volumetric,
}

/// Produces candidate points in the shell between `r` and `2r` around a source point.
///
/// Directions are drawn as a vector of independent standard normals scaled to unit length,
/// which is uniform on the unit sphere in any dimension. In 2D this matches picking a uniform
/// angle, in 3D it matches the `arccos(2v - 1)` polar angle construction.
#[derive(Clone, Copy, Debug)]
pub struct ShellSampler {
    min_distance: f64,
    radial: RadialDistribution,
}

impl ShellSampler {
    pub fn new(min_distance: f64, radial: RadialDistribution) -> Self {
        Self {
            min_distance,
            radial,
        }
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Writes a candidate around `source` into `out`.
    ///
    /// Returns the number of degenerate direction draws that were discarded, or `None` if all
    /// `MAX_DIRECTION_RETRIES` draws were degenerate. `out` is unspecified in that case.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        source: &[f64],
        rng: &mut R,
        out: &mut Vec<f64>,
    ) -> Option<usize> {
        out.clear();
        out.resize(source.len(), 0.0);
        let discarded = random_direction(rng, out)?;

        let distance = self.distance(source.len(), rng);
        for (c, &s) in out.iter_mut().zip(source) {
            *c = s + *c * distance;
        }
        Some(discarded)
    }

    /// Draws a distance in `[r, 2r)` according to the radial distribution.
    pub fn distance<R: Rng + ?Sized>(&self, dimension: usize, rng: &mut R) -> f64 {
        let r = self.min_distance;
        match self.radial {
            RadialDistribution::Uniform => rng.gen_range(r..2.0 * r),
            RadialDistribution::Volumetric => {
                // inverse CDF of rho^(D-1) on [r, 2r)
                let d = dimension as f64;
                let u: f64 = rng.r#gen();
                let rho = r * (1.0 + u * (2f64.powf(d) - 1.0)).powf(1.0 / d);
                rho.clamp(r, 2.0 * r * (1.0 - f64::EPSILON))
            }
        }
    }
}

/// Fills `out` with a direction uniformly distributed on the unit sphere.
///
/// Returns the number of zero-norm draws discarded before success, or `None` when the retry
/// budget ran out.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R, out: &mut [f64]) -> Option<usize> {
    direction_from(out, |v| {
        for c in v.iter_mut() {
            *c = rng.sample(StandardNormal);
        }
    })
}

/// Retry loop behind [`random_direction`]: `draw` fills the vector, which is kept once it can
/// be normalized.
fn direction_from<F>(out: &mut [f64], mut draw: F) -> Option<usize>
where
    F: FnMut(&mut [f64]),
{
    for attempt in 0..MAX_DIRECTION_RETRIES {
        draw(out);
        if normalize(out) {
            return Some(attempt);
        }
        log::trace!("degenerate direction draw {}, resampling", attempt);
    }
    log::warn!(
        "direction sampling failed {} times in a row, skipping attempt",
        MAX_DIRECTION_RETRIES
    );
    None
}

/// Scales `v` to unit length in place. Returns false, leaving `v` untouched, if its norm is
/// too small to divide by.
pub fn normalize(v: &mut [f64]) -> bool {
    let norm_sq: f64 = v.iter().map(|c| c * c).sum();
    if !(norm_sq.is_finite() && norm_sq > MIN_NORM_SQ) {
        return false;
    }
    let inv = 1.0 / norm_sq.sqrt();
    v.iter_mut().for_each(|c| *c *= inv);
    true
}
