use serde::{Deserialize, Serialize};

use crate::candidate::RadialDistribution;
use crate::domain::{self, Domain};
use crate::error::{Result, SamplingError};

/// Default ceiling on background grid cells (64 Mi slots, 512 MiB of indices).
pub const DEFAULT_MAX_GRID_CELLS: usize = 1 << 26;

/// Default number of candidates tried per frontier point.
pub const DEFAULT_MAX_ATTEMPTS: usize = 30;

/// What happens to a frontier point during one outer iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    /// Stop at the first accepted candidate and put the point back into the frontier.
    /// The point is retired only after `k` consecutive failures (Bridson's algorithm).
    #[default]
    SingleAccept,
    /// Keep every accepted candidate among the `k` attempts, then retire the point
    /// regardless of success. Yields a sparser, faster-converging point set.
    AllCandidates,
}

/// Parameters of a sampling run.
///
/// Every field is checked by [`validate`](Self::validate) before a sampler is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of axes, `D >= 1`.
    pub dimension: usize,
    /// Minimum distance `r` between any two points.
    pub min_distance: f64,
    /// Domain size along each axis; the domain is `[0, e_0) x ... x [0, e_{D-1})`.
    pub extents: Vec<f64>,
    /// Candidates tried per frontier point, `k`.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Stop as soon as this many points have been accepted.
    #[serde(default)]
    pub sample_cap: Option<usize>,
    #[serde(default)]
    pub rng_seed: u64,
    #[serde(default = "default_max_grid_cells")]
    pub max_grid_cells: usize,
    #[serde(default)]
    pub policy: ExpansionPolicy,
    #[serde(default)]
    pub radial: RadialDistribution,
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_max_grid_cells() -> usize {
    DEFAULT_MAX_GRID_CELLS
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::new(vec![1.0, 1.0], 0.03)
    }
}

impl SamplerConfig {
    /// Configuration over `extents` with minimum distance `min_distance`; the dimension is
    /// taken from the number of extents.
    pub fn new(extents: Vec<f64>, min_distance: f64) -> Self {
        Self {
            dimension: extents.len(),
            min_distance,
            extents,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            sample_cap: None,
            rng_seed: 0,
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
            policy: ExpansionPolicy::default(),
            radial: RadialDistribution::default(),
        }
    }

    /// Parses a JSON document and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SamplerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_max_attempts(mut self, k: usize) -> Self {
        self.max_attempts = k;
        self
    }

    pub fn with_sample_cap(mut self, cap: usize) -> Self {
        self.sample_cap = Some(cap);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    pub fn with_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_radial(mut self, radial: RadialDistribution) -> Self {
        self.radial = radial;
        self
    }

    pub fn with_max_grid_cells(mut self, cells: usize) -> Self {
        self.max_grid_cells = cells;
        self
    }

    /// Sets the minimum distance to `fraction` of the longest extent, so the same fraction
    /// gives a similar point count whatever the domain size.
    pub fn with_relative_radius(mut self, fraction: f64) -> Self {
        self.min_distance = fraction * domain::longest_extent(&self.extents);
        self
    }

    /// Checks every parameter.
    pub fn validate(&self) -> Result<()> {
        if self.dimension < 1 {
            return Err(SamplingError::InvalidParameter(
                "dimension must be at least 1".into(),
            ));
        }
        if self.extents.len() != self.dimension {
            return Err(SamplingError::InvalidParameter(format!(
                "expected {} extents for dimension {}, got {}",
                self.dimension,
                self.dimension,
                self.extents.len()
            )));
        }
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            return Err(SamplingError::InvalidParameter(format!(
                "min_distance must be positive and finite, got {}",
                self.min_distance
            )));
        }
        if self.sample_cap == Some(0) {
            return Err(SamplingError::InvalidParameter(
                "sample_cap must be positive".into(),
            ));
        }
        self.domain().map(|_| ())
    }

    /// The sampling domain described by `extents`.
    pub fn domain(&self) -> Result<Domain> {
        Domain::new(self.extents.clone())
    }
}
