use poissond::validation::min_pairwise_distance;
use poissond::{PoissonSampler, SamplerConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Samples the unit cube in 1 to 4 dimensions and prints how the sampler did.
fn main() {
    for dim in 1..=4 {
        let r = 0.05 * (dim as f64).sqrt();
        let config = SamplerConfig::new(vec![1.0; dim], r).with_seed(dim as u64);
        let mut sampler = PoissonSampler::new(config).expect("valid configuration");
        let mut rng = ChaCha8Rng::seed_from_u64(dim as u64);
        let count = sampler.run(&mut rng).expect("sampling failed").len();

        let stats = sampler.stats();
        let min = min_pairwise_distance(sampler.samples()).unwrap_or(f64::INFINITY);
        let density = count as f64 / sampler.domain().volume();
        println!(
            "D={} r={:.3}: {} points ({:.0} per unit volume), {} cells, {} candidates, acceptance {:.3}, closest pair {:.4}",
            dim,
            r,
            count,
            density,
            sampler.grid().cell_count(),
            stats.candidates,
            stats.acceptance_rate(),
            min
        );
    }
}
