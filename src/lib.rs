//! # poissond
//!
//! `poissond` generates Poisson disk point sets (blue noise) in any number of dimensions. It is
//! designed to be used in Rust as well as compiled to WebAssembly (WASM). Points are placed
//! inside an axis-aligned box so that no two lie closer than a minimum distance `r`, using
//! Bridson's fast rejection sampling with a background grid.
//!
//! ## Features
//!
//! - **Any dimension**: one sampler for 1D, 2D, 3D and beyond; directions come from normalized
//!   Gaussian vectors so no per-dimension formulas are needed.
//! - **Spatial Partitioning**: a dense background grid with cells of side `r / sqrt(D)` answers
//!   proximity queries by looking at a small window of cells around the candidate.
//! - **Reproducible**: the random generator is passed in by the caller; [`sample`] seeds a
//!   ChaCha8 generator from the configuration.
//! - **WASM-first**: the [`wasm::PoissonDisk`] class exposes the sampler to JavaScript.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`PoissonSampler`] struct, configured with a
//! [`SamplerConfig`]. For a one-shot run use [`sample`].
//!
//! ```
//! use poissond::{sample, SamplerConfig};
//!
//! let config = SamplerConfig::new(vec![1.0, 1.0], 0.05).with_seed(7);
//! let points = sample(&config).unwrap();
//! for p in &points {
//!     assert!(p[0] >= 0.0 && p[0] < 1.0);
//! }
//! ```

mod acceptance;
mod candidate;
mod config;
mod domain;
mod error;
mod frontier;
mod grid;
mod sampler;
mod samples;
mod stats;
pub mod validation;
pub mod wasm;

pub use acceptance::AcceptanceTest;
pub use acceptance::Rejection;
pub use acceptance::Verdict;
pub use candidate::random_direction;
pub use candidate::RadialDistribution;
pub use candidate::ShellSampler;
pub use candidate::MAX_DIRECTION_RETRIES;
pub use config::ExpansionPolicy;
pub use config::SamplerConfig;
pub use config::DEFAULT_MAX_ATTEMPTS;
pub use config::DEFAULT_MAX_GRID_CELLS;
pub use domain::Domain;
pub use error::Result;
pub use error::SamplingError;
pub use frontier::ActiveFrontier;
pub use grid::BackgroundGrid;
pub use grid::MIN_WINDOW;
pub use sampler::sample;
pub use sampler::PoissonSampler;
pub use sampler::SamplerState;
pub use sampler::StepOutcome;
pub use samples::Samples;
pub use stats::SamplingStats;
