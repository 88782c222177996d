use poissond::validation::{min_pairwise_distance, verify};
use poissond::{
    sample, ExpansionPolicy, PoissonSampler, RadialDistribution, SamplerConfig, SamplerState,
    StepOutcome,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn configs() -> Vec<SamplerConfig> {
    vec![
        SamplerConfig::new(vec![10.0], 0.3),
        SamplerConfig::new(vec![1.0, 1.0], 0.04),
        SamplerConfig::new(vec![2.0, 0.5], 0.07),
        SamplerConfig::new(vec![1.0, 1.0, 1.0], 0.12),
        SamplerConfig::new(vec![1.0, 0.8, 0.6, 0.5], 0.3).with_max_attempts(20),
    ]
}

#[test]
fn test_min_distance_and_containment() {
    for (i, config) in configs().into_iter().enumerate() {
        let config = config.with_seed(100 + i as u64);
        let samples = sample(&config).unwrap();
        assert!(samples.len() > 1, "config {} produced {} points", i, samples.len());

        let domain = config.domain().unwrap();
        assert_eq!(verify(&samples, &domain, config.min_distance), Ok(()), "config {}", i);

        let min = min_pairwise_distance(&samples).unwrap();
        assert!(min >= config.min_distance, "config {}: min distance {} < {}", i, min, config.min_distance);

        for p in &samples {
            for (d, (&x, &e)) in p.iter().zip(&config.extents).enumerate() {
                assert!(x >= 0.0 && x < e, "config {}: axis {} coordinate {} outside [0, {})", i, d, x, e);
            }
        }
    }
}

#[test]
fn test_other_policies_keep_invariants() {
    let base = SamplerConfig::new(vec![1.0, 1.0], 0.05).with_seed(3);
    for config in [
        base.clone().with_policy(ExpansionPolicy::AllCandidates),
        base.clone().with_radial(RadialDistribution::Volumetric),
        base.clone()
            .with_policy(ExpansionPolicy::AllCandidates)
            .with_radial(RadialDistribution::Volumetric),
    ] {
        let samples = sample(&config).unwrap();
        let domain = config.domain().unwrap();
        assert!(samples.len() > 1);
        assert_eq!(verify(&samples, &domain, config.min_distance), Ok(()), "{:?}", config);
    }
}

#[test]
fn test_grid_consistent_after_every_step() {
    let config = SamplerConfig::new(vec![1.0, 0.7], 0.06);
    let mut sampler = PoissonSampler::new(config).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    loop {
        let outcome = sampler.step(&mut rng).unwrap();
        sampler.verify_grid().unwrap();
        assert_eq!(sampler.grid().occupied_count(), sampler.samples().len());
        // the frontier is always a subset of the output
        assert!(sampler.frontier().all(|p| p < sampler.samples().len()));
        if outcome == StepOutcome::Terminated {
            break;
        }
    }
    assert_eq!(sampler.state(), SamplerState::Terminated);
    assert_eq!(sampler.frontier_len(), 0);
}

#[test]
fn test_deterministic_under_seed() {
    for config in configs() {
        let a = sample(&config.clone().with_seed(42)).unwrap();
        let b = sample(&config.clone().with_seed(42)).unwrap();
        assert_eq!(a, b);

        let c = sample(&config.clone().with_seed(43)).unwrap();
        assert_ne!(a.first(), c.first(), "different seeds should move the seed point");
    }
}

#[test]
fn test_caller_owned_generator() {
    let config = SamplerConfig::new(vec![1.0, 1.0], 0.05);

    let mut a = PoissonSampler::new(config.clone()).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let first = a.run(&mut rng).unwrap().clone();

    let mut b = PoissonSampler::new(config).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let dyn_rng: &mut dyn RngCore = &mut rng;
    let second = b.run(dyn_rng).unwrap();

    assert_eq!(&first, second);
}

#[test]
fn test_terminates_within_iteration_bound() {
    for (i, config) in configs().into_iter().enumerate() {
        let mut sampler = PoissonSampler::new(config.with_seed(i as u64)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(i as u64);
        sampler.run(&mut rng).unwrap();
        let cells = sampler.grid().cell_count();
        let stats = sampler.stats();
        assert!(stats.iterations <= 2 * cells, "config {}: {} iterations for {} cells", i, stats.iterations, cells);
        assert!(sampler.samples().len() <= cells);
    }

    // in three dimensions points are sparse enough relative to cells that even the iteration
    // count stays below the cell count
    let config = SamplerConfig::new(vec![1.0, 1.0, 1.0], 0.15);
    let mut sampler = PoissonSampler::new(config).unwrap();
    sampler.run(&mut ChaCha8Rng::seed_from_u64(9)).unwrap();
    assert!(sampler.stats().iterations <= sampler.grid().cell_count());
}

#[test]
fn test_one_dimensional_run_can_exceed_cell_count() {
    // two cells of side 0.5: seed, one accepted neighbor, then both points retire
    let mut exceeded = 0;
    for seed in 0..20 {
        let config = SamplerConfig::new(vec![1.0], 0.5);
        let mut sampler = PoissonSampler::new(config).unwrap();
        sampler.run(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        assert_eq!(sampler.grid().resolution, vec![2]);

        let iterations = sampler.stats().iterations;
        match sampler.samples().len() {
            1 => assert_eq!(iterations, 1, "seed {}", seed),
            2 => {
                assert_eq!(iterations, 3, "seed {}", seed);
                exceeded += 1;
            }
            n => panic!("seed {}: {} points in two cells", seed, n),
        }
        assert!(iterations <= 2 * sampler.grid().cell_count());
    }
    assert!(exceeded > 0, "no run filled both cells");
}

#[test]
fn test_min_distance_holds_in_high_dimensions() {
    for (dim, r, seeds) in [(5, 0.5, 0..2), (6, 0.5, 0..4), (7, 0.6, 0..2)] {
        for seed in seeds {
            let config = SamplerConfig::new(vec![1.0; dim], r).with_seed(seed);
            let samples = sample(&config).unwrap();
            let domain = config.domain().unwrap();
            assert!(samples.len() > 1, "dim {} seed {}", dim, seed);
            assert_eq!(verify(&samples, &domain, r), Ok(()), "dim {} seed {}", dim, seed);
        }
    }
}

#[test]
fn test_radius_beyond_diagonal_gives_single_point() {
    for extents in [vec![1.0], vec![1.0, 1.0], vec![2.0, 1.0, 0.5], vec![1.0; 5]] {
        let diagonal = extents.iter().map(|e| e * e).sum::<f64>().sqrt();
        for r in [diagonal, diagonal * 1.5] {
            let config = SamplerConfig::new(extents.clone(), r).with_seed(11);
            let samples = sample(&config).unwrap();
            assert_eq!(samples.len(), 1, "extents {:?} r {}", extents, r);
        }
    }
}

#[test]
fn test_zero_attempts_gives_single_point() {
    for config in configs() {
        let config = config.with_max_attempts(0);
        let mut sampler = PoissonSampler::new(config).unwrap();
        sampler.run(&mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(sampler.samples().len(), 1);
        assert_eq!(sampler.stats().candidates, 0);
        assert_eq!(sampler.stats().iterations, 1);
    }
}

#[test]
fn test_cap_bounds_output() {
    for cap in [1, 2, 17, 100] {
        let config = SamplerConfig::new(vec![1.0, 1.0], 0.03).with_sample_cap(cap).with_seed(2);
        let samples = sample(&config).unwrap();
        assert_eq!(samples.len(), cap);
    }

    let all = SamplerConfig::new(vec![1.0, 1.0], 0.03)
        .with_policy(ExpansionPolicy::AllCandidates)
        .with_sample_cap(100);
    assert_eq!(sample(&all).unwrap().len(), 100);
}

#[test]
fn test_capped_run_is_prefix_of_full_run() {
    let config = SamplerConfig::new(vec![1.0, 1.0], 0.05).with_seed(8);
    let full = sample(&config).unwrap();
    let capped = sample(&config.clone().with_sample_cap(40)).unwrap();
    assert_eq!(capped.as_flat(), &full.as_flat()[..40 * 2]);
}
