use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::acceptance::{AcceptanceTest, Verdict};
use crate::candidate::{ShellSampler, MAX_DIRECTION_RETRIES};
use crate::config::{ExpansionPolicy, SamplerConfig};
use crate::domain::Domain;
use crate::error::{Result, SamplingError};
use crate::frontier::ActiveFrontier;
use crate::grid::BackgroundGrid;
use crate::samples::Samples;
use crate::stats::SamplingStats;

/// Lifecycle of a sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerState {
    Running,
    Terminated,
}

/// What a single call to [`PoissonSampler::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The first point was placed uniformly at random.
    Seeded { index: usize },
    /// A frontier point was expanded. `accepted` counts new points, `retired` tells whether
    /// `source` left the frontier for good.
    Expanded {
        source: usize,
        accepted: usize,
        retired: bool,
    },
    /// Nothing left to do, either because the frontier ran dry or the cap was hit.
    Terminated,
}

/// Grid-accelerated Poisson disk sampler over a hyper-rectangle (Bridson's algorithm,
/// generalized to `D` dimensions).
///
/// The sampler owns the background grid, the frontier and the output, but not the random
/// number generator: every call that needs randomness borrows one from the caller, so a run
/// is fully determined by the configuration and the generator's state.
///
/// ```
/// use poissond::{PoissonSampler, SamplerConfig};
/// use rand::SeedableRng;
///
/// let config = SamplerConfig::new(vec![1.0, 1.0], 0.1);
/// let mut sampler = PoissonSampler::new(config).unwrap();
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
/// let points = sampler.run(&mut rng).unwrap();
/// assert!(points.len() > 1);
/// ```
#[derive(Clone, Debug)]
pub struct PoissonSampler {
    config: SamplerConfig,
    domain: Domain,
    grid: BackgroundGrid,
    frontier: ActiveFrontier,
    samples: Samples,
    shell: ShellSampler,
    state: SamplerState,
    stats: SamplingStats,
    /// Upper bound on outer iterations, see `step`.
    iteration_limit: usize,
    origin: Vec<f64>,
    candidate: Vec<f64>,
}

impl PoissonSampler {
    /// Validates `config` and allocates the background grid.
    ///
    /// No randomness is consumed here; the seed point is drawn on the first `step`.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        let domain = config.domain()?;
        let grid = BackgroundGrid::new(&domain, config.min_distance, config.max_grid_cells)?;
        if config.min_distance >= domain.diagonal() {
            log::debug!(
                "min distance {} reaches the domain diagonal {}, only the seed point will fit",
                config.min_distance,
                domain.diagonal()
            );
        }

        // every iteration either fills a fresh cell or retires a point that owns one
        let iteration_limit = grid.cell_count().saturating_mul(2);
        let dim = config.dimension;

        Ok(Self {
            shell: ShellSampler::new(config.min_distance, config.radial),
            frontier: ActiveFrontier::new(),
            samples: Samples::new(dim),
            state: SamplerState::Running,
            stats: SamplingStats::default(),
            iteration_limit,
            origin: Vec::with_capacity(dim),
            candidate: Vec::with_capacity(dim),
            config,
            domain,
            grid,
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn grid(&self) -> &BackgroundGrid {
        &self.grid
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn stats(&self) -> &SamplingStats {
        &self.stats
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn into_samples(self) -> Samples {
        self.samples
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Indices of the points currently eligible for expansion.
    pub fn frontier(&self) -> impl Iterator<Item = usize> + '_ {
        self.frontier.iter()
    }

    /// Runs until termination and returns the accepted points.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Samples> {
        while self.step(rng)? != StepOutcome::Terminated {}

        log::debug!(
            "poisson sampling finished: {} points in {} iterations, {} candidates, acceptance {:.3}{}",
            self.samples.len(),
            self.stats.iterations,
            self.stats.candidates,
            self.stats.acceptance_rate(),
            if self.stats.capped { ", stopped on cap" } else { "" }
        );
        Ok(&self.samples)
    }

    /// Advances the sampler by one outer iteration.
    ///
    /// The first call places the seed point. Each later call pops a random frontier point and
    /// tries up to `max_attempts` candidates around it.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StepOutcome> {
        self.step_with(rng, |shell: &ShellSampler, source: &[f64], rng: &mut R, out: &mut Vec<f64>| {
            shell.generate(source, rng, out)
        })
    }

    /// `step` with the candidate generator passed in.
    fn step_with<R, G>(&mut self, rng: &mut R, mut generate: G) -> Result<StepOutcome>
    where
        R: Rng + ?Sized,
        G: FnMut(&ShellSampler, &[f64], &mut R, &mut Vec<f64>) -> Option<usize>,
    {
        if self.state == SamplerState::Terminated {
            return Ok(StepOutcome::Terminated);
        }

        if self.samples.is_empty() {
            let index = self.seed(rng)?;
            return Ok(StepOutcome::Seeded { index });
        }

        let Some(source) = self.frontier.pop_random(rng) else {
            log::debug!("frontier exhausted after {} points", self.samples.len());
            self.state = SamplerState::Terminated;
            return Ok(StepOutcome::Terminated);
        };

        self.stats.iterations += 1;
        if self.stats.iterations > self.iteration_limit {
            self.state = SamplerState::Terminated;
            return Err(SamplingError::InvalidState(format!(
                "outer iteration {} exceeds the bound of {} for {} grid cells",
                self.stats.iterations,
                self.iteration_limit,
                self.grid.cell_count()
            )));
        }

        let mut origin = std::mem::take(&mut self.origin);
        let mut candidate = std::mem::take(&mut self.candidate);
        origin.clear();
        origin.extend_from_slice(self.point(source)?);

        let mut accepted = 0;
        for _ in 0..self.config.max_attempts {
            self.stats.candidates += 1;
            match generate(&self.shell, &origin, rng, &mut candidate) {
                Some(discarded) => self.stats.degenerate_directions += discarded,
                None => {
                    self.stats.degenerate_directions += MAX_DIRECTION_RETRIES;
                    continue;
                }
            }

            let verdict = AcceptanceTest::new(
                &self.domain,
                &self.grid,
                self.samples.as_flat(),
                self.config.min_distance,
            )
            .check(&candidate);

            match verdict {
                Verdict::Accepted { cell } => {
                    self.place(cell, &candidate)?;
                    accepted += 1;
                    if self.cap_reached() || self.config.policy == ExpansionPolicy::SingleAccept {
                        break;
                    }
                }
                Verdict::Rejected(rejection) => {
                    log::trace!("candidate {:?} around {} rejected: {:?}", candidate, source, rejection);
                    self.stats.record_rejection(rejection);
                }
            }
        }

        self.origin = origin;
        self.candidate = candidate;

        let retired = match self.config.policy {
            ExpansionPolicy::SingleAccept => accepted == 0,
            ExpansionPolicy::AllCandidates => true,
        };
        if retired {
            self.stats.dropped += 1;
        } else {
            self.frontier.reinsert(source);
        }

        self.stop_if_capped();
        Ok(StepOutcome::Expanded {
            source,
            accepted,
            retired,
        })
    }

    /// Checks that every occupied grid cell holds exactly the point that maps to it and that
    /// every accepted point is in the grid.
    pub fn verify_grid(&self) -> Result<()> {
        let mut seen = 0;
        for (cell, index) in self.grid.occupied_cells() {
            let point = self.point(index)?;
            let expected = self.grid.cell_of(point);
            if expected != cell {
                return Err(SamplingError::InvalidState(format!(
                    "point {} maps to cell {:?} but is stored in {:?}",
                    index, expected, cell
                )));
            }
            seen += 1;
        }
        if seen != self.samples.len() {
            return Err(SamplingError::InvalidState(format!(
                "grid holds {} points, output has {}",
                seen,
                self.samples.len()
            )));
        }
        Ok(())
    }

    fn seed<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize> {
        let seed: Vec<f64> = self
            .domain
            .extents()
            .iter()
            .map(|&e| rng.gen_range(0.0..e))
            .collect();
        let cell = self.grid.linear_index_of(&seed);
        let index = self.place(cell, &seed)?;
        log::trace!("seed point {:?}", seed);
        self.stop_if_capped();
        Ok(index)
    }

    /// Puts an accepted point into the grid, the output and the frontier.
    fn place(&mut self, cell: usize, point: &[f64]) -> Result<usize> {
        let index = self.samples.len();
        self.grid.place_linear(cell, index)?;
        self.samples.push(point);
        self.frontier.push(index);
        self.stats.accepted += 1;
        Ok(index)
    }

    fn point(&self, index: usize) -> Result<&[f64]> {
        self.samples.get(index).ok_or_else(|| {
            SamplingError::InvalidState(format!("point {} not in output", index))
        })
    }

    fn cap_reached(&self) -> bool {
        self.config
            .sample_cap
            .is_some_and(|cap| self.samples.len() >= cap)
    }

    fn stop_if_capped(&mut self) {
        if self.cap_reached() {
            log::debug!("sample cap of {} reached", self.samples.len());
            self.stats.capped = true;
            self.state = SamplerState::Terminated;
        }
    }
}

/// Runs a sampler for `config` with a ChaCha8 generator seeded from `config.rng_seed`.
///
/// The same configuration gives the same points on every platform.
pub fn sample(config: &SamplerConfig) -> Result<Samples> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
    let mut sampler = PoissonSampler::new(config.clone())?;
    sampler.run(&mut rng)?;
    Ok(sampler.into_samples())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_new_consumes_no_randomness() {
        let sampler = PoissonSampler::new(SamplerConfig::new(vec![1.0, 1.0], 0.1)).unwrap();
        assert_eq!(sampler.state(), SamplerState::Running);
        assert!(sampler.samples().is_empty());
        assert_eq!(sampler.frontier_len(), 0);
    }

    #[test]
    fn test_first_step_seeds() {
        let mut sampler = PoissonSampler::new(SamplerConfig::new(vec![2.0, 3.0], 0.1)).unwrap();
        let mut r = rng(4);
        assert_eq!(sampler.step(&mut r).unwrap(), StepOutcome::Seeded { index: 0 });
        assert_eq!(sampler.samples().len(), 1);
        assert_eq!(sampler.frontier_len(), 1);
        assert!(sampler.domain().contains(sampler.samples().get(0).unwrap()));
        sampler.verify_grid().unwrap();
    }

    #[test]
    fn test_single_accept_reinserts_source() {
        let mut sampler = PoissonSampler::new(SamplerConfig::new(vec![1.0, 1.0], 0.05)).unwrap();
        let mut r = rng(8);
        sampler.step(&mut r).unwrap();
        match sampler.step(&mut r).unwrap() {
            StepOutcome::Expanded { source, accepted, retired } => {
                assert_eq!(source, 0);
                assert_eq!(accepted, 1);
                assert!(!retired);
                assert_eq!(sampler.frontier_len(), 2);
                assert!(sampler.frontier().any(|p| p == 0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_all_candidates_retires_source() {
        let config = SamplerConfig::new(vec![1.0, 1.0], 0.05)
            .with_policy(ExpansionPolicy::AllCandidates);
        let mut sampler = PoissonSampler::new(config).unwrap();
        let mut r = rng(8);
        sampler.step(&mut r).unwrap();
        match sampler.step(&mut r).unwrap() {
            StepOutcome::Expanded { source, accepted, retired } => {
                assert_eq!(source, 0);
                assert!(accepted >= 1);
                assert!(retired);
                assert!(!sampler.frontier().any(|p| p == 0));
                assert_eq!(sampler.frontier_len(), accepted);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_terminated_sampler_stays_terminated() {
        let config = SamplerConfig::new(vec![1.0], 0.5).with_max_attempts(0);
        let mut sampler = PoissonSampler::new(config).unwrap();
        let mut r = rng(1);
        sampler.run(&mut r).unwrap();
        assert_eq!(sampler.state(), SamplerState::Terminated);
        assert_eq!(sampler.step(&mut r).unwrap(), StepOutcome::Terminated);
        assert_eq!(sampler.samples().len(), 1);
        assert_eq!(sampler.stats().dropped, 1);
    }

    #[test]
    fn test_cap_of_one_stops_after_seed() {
        let config = SamplerConfig::new(vec![1.0, 1.0], 0.05).with_sample_cap(1);
        let mut sampler = PoissonSampler::new(config).unwrap();
        let mut r = rng(2);
        assert_eq!(sampler.step(&mut r).unwrap(), StepOutcome::Seeded { index: 0 });
        assert_eq!(sampler.state(), SamplerState::Terminated);
        assert!(sampler.stats().capped);
    }

    #[test]
    fn test_degenerate_attempts_count_toward_k() {
        let config = SamplerConfig::new(vec![1.0, 1.0], 0.05).with_max_attempts(5);
        let mut sampler = PoissonSampler::new(config).unwrap();
        let mut r = rng(3);
        sampler.step(&mut r).unwrap();

        let outcome = sampler
            .step_with(&mut r, |_: &ShellSampler, _: &[f64], _: &mut ChaCha8Rng, _: &mut Vec<f64>| None)
            .unwrap();
        assert_eq!(outcome, StepOutcome::Expanded { source: 0, accepted: 0, retired: true });

        let stats = sampler.stats();
        assert_eq!(stats.candidates, 5);
        assert_eq!(stats.degenerate_directions, 5 * MAX_DIRECTION_RETRIES);
        assert_eq!(stats.rejected(), 0);
        assert_eq!(stats.dropped, 1);
        assert_eq!(sampler.frontier_len(), 0);
        assert_eq!(sampler.step(&mut r).unwrap(), StepOutcome::Terminated);
        assert_eq!(sampler.samples().len(), 1);
    }

    #[test]
    fn test_degenerate_attempts_mixed_with_real_ones() {
        let config = SamplerConfig::new(vec![1.0, 1.0], 0.05).with_max_attempts(30);
        let mut sampler = PoissonSampler::new(config).unwrap();
        let mut r = rng(12);
        sampler.step(&mut r).unwrap();

        let mut calls = 0;
        sampler
            .step_with(&mut r, |shell: &ShellSampler, source: &[f64], rng: &mut ChaCha8Rng, out: &mut Vec<f64>| {
                calls += 1;
                if calls <= 2 {
                    None
                } else {
                    shell.generate(source, rng, out)
                }
            })
            .unwrap();

        let stats = sampler.stats();
        assert!(calls >= 3);
        assert_eq!(stats.candidates, calls, "every generator call is one attempt");
        assert_eq!(stats.degenerate_directions, 2 * MAX_DIRECTION_RETRIES);
        assert_eq!(stats.candidates, stats.rejected() + stats.accepted - 1 + 2);
    }

    #[test]
    fn test_stats_add_up() {
        let mut sampler = PoissonSampler::new(SamplerConfig::new(vec![1.0, 1.0], 0.08)).unwrap();
        sampler.run(&mut rng(6)).unwrap();
        let stats = *sampler.stats();
        assert_eq!(stats.accepted, sampler.samples().len());
        assert_eq!(stats.candidates, stats.rejected() + stats.accepted - 1);
        // every point is retired exactly once under single-accept
        assert_eq!(stats.dropped, stats.accepted);
        assert_eq!(stats.iterations, stats.dropped + stats.accepted - 1);
    }
}
