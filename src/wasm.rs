use js_sys::{Array, Float64Array};
use wasm_bindgen::prelude::*;

use crate::candidate::RadialDistribution;
use crate::config::{ExpansionPolicy, SamplerConfig};
use crate::sampler::sample;
use crate::samples::Samples;
use crate::validation::verify;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_DEFAULTS: &'static str = r#"
export const DEFAULT_MAX_ATTEMPTS = 30;
"#;

/// Poisson disk sampler exposed to JavaScript.
///
/// Points are returned as a flat `Float64Array` of `count * dimension` coordinates.
#[wasm_bindgen]
pub struct PoissonDisk {
    config: SamplerConfig,
    samples: Option<Samples>,
}

#[wasm_bindgen]
impl PoissonDisk {
    /// Creates a sampler over `[0, extents[0]) x [0, extents[1]) x ...`.
    ///
    /// # Arguments
    ///
    /// * `extents` - Domain size along each axis; its length sets the dimension.
    /// * `min_distance` - Minimum distance between any two points.
    /// * `max_attempts` - Candidates tried around each active point.
    /// * `seed` - Seed of the random generator; equal seeds give equal point sets.
    #[wasm_bindgen(constructor)]
    pub fn new(
        extents: &[f64],
        min_distance: f64,
        max_attempts: usize,
        seed: u64,
    ) -> Result<PoissonDisk, JsError> {
        let config = SamplerConfig::new(extents.to_vec(), min_distance)
            .with_max_attempts(max_attempts)
            .with_seed(seed);
        config.validate()?;
        Ok(PoissonDisk {
            config,
            samples: None,
        })
    }

    /// Like the constructor, but with a seed drawn from the platform's entropy source.
    #[wasm_bindgen(js_name = newRandomSeed)]
    pub fn new_random_seed(
        extents: &[f64],
        min_distance: f64,
        max_attempts: usize,
    ) -> Result<PoissonDisk, JsError> {
        PoissonDisk::new(extents, min_distance, max_attempts, rand::random::<u64>())
    }

    /// Stops sampling once `cap` points have been accepted.
    #[wasm_bindgen(js_name = setCap)]
    pub fn set_cap(&mut self, cap: usize) -> Result<(), JsError> {
        let config = self.config.clone().with_sample_cap(cap);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Switches between single-accept (`false`, default) and all-candidates (`true`) expansion.
    #[wasm_bindgen(js_name = setAllCandidates)]
    pub fn set_all_candidates(&mut self, enabled: bool) {
        self.config.policy = if enabled {
            ExpansionPolicy::AllCandidates
        } else {
            ExpansionPolicy::SingleAccept
        };
    }

    /// Draws candidate distances uniformly over the shell volume instead of uniformly in radius.
    #[wasm_bindgen(js_name = setVolumetric)]
    pub fn set_volumetric(&mut self, enabled: bool) {
        self.config.radial = if enabled {
            RadialDistribution::Volumetric
        } else {
            RadialDistribution::Uniform
        };
    }

    #[wasm_bindgen(getter)]
    pub fn seed(&self) -> u64 {
        self.config.rng_seed
    }

    #[wasm_bindgen(getter)]
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Number of points of the last run, 0 before `generate`.
    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.samples.as_ref().map_or(0, Samples::len)
    }

    /// Runs the sampler and returns the flat coordinates.
    pub fn generate(&mut self) -> Result<Vec<f64>, JsError> {
        let samples = sample(&self.config)?;
        let flat = samples.as_flat().to_vec();
        self.samples = Some(samples);
        Ok(flat)
    }

    /// The points of the last run as an array of per-point `Float64Array`s.
    pub fn points(&self) -> Array {
        let out = Array::new();
        if let Some(samples) = &self.samples {
            for p in samples.iter() {
                out.push(&Float64Array::from(p));
            }
        }
        out
    }

    /// Re-checks the last run by brute force: containment and pairwise distances.
    pub fn verify(&self) -> Result<bool, JsError> {
        let Some(samples) = &self.samples else {
            return Ok(false);
        };
        let domain = self.config.domain()?;
        Ok(verify(samples, &domain, self.config.min_distance).is_ok())
    }
}
