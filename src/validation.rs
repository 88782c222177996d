//! Brute-force checks of a finished point set.
//!
//! These do not use the background grid at all, so they make a useful independent check of
//! the sampler. Pair checks are quadratic in the number of points and run in parallel.

use rayon::prelude::*;

use crate::domain::Domain;
use crate::samples::Samples;

/// The first property a point set was found to break.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Violation {
    /// Points have a different number of coordinates than the domain has axes.
    DimensionMismatch { expected: usize, found: usize },
    /// A coordinate lies outside `[0, extent_d)`.
    OutOfDomain { index: usize },
    /// Two points are closer than the minimum distance.
    TooClose { a: usize, b: usize, distance: f64 },
}

fn distance_sq(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Smallest distance between any two points, or `None` for fewer than two points.
pub fn min_pairwise_distance(samples: &Samples) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let points = samples.as_flat();
    let dim = samples.dimension();
    let n = samples.len();

    let min_sq = (0..n)
        .into_par_iter()
        .map(|i| {
            let a = &points[i * dim..(i + 1) * dim];
            ((i + 1)..n)
                .map(|j| distance_sq(a, &points[j * dim..(j + 1) * dim]))
                .fold(f64::INFINITY, f64::min)
        })
        .reduce(|| f64::INFINITY, f64::min);
    Some(min_sq.sqrt())
}

/// Checks dimension, domain containment and minimum distance of every point.
pub fn verify(samples: &Samples, domain: &Domain, min_distance: f64) -> Result<(), Violation> {
    if samples.dimension() != domain.dimension() {
        return Err(Violation::DimensionMismatch {
            expected: domain.dimension(),
            found: samples.dimension(),
        });
    }

    if let Some(index) = samples.iter().position(|p| !domain.contains(p)) {
        return Err(Violation::OutOfDomain { index });
    }

    let points = samples.as_flat();
    let dim = samples.dimension();
    let n = samples.len();
    let r_sq = min_distance * min_distance;

    let clash = (0..n).into_par_iter().find_map_first(|i| {
        let a = &points[i * dim..(i + 1) * dim];
        ((i + 1)..n).find_map(|j| {
            let d2 = distance_sq(a, &points[j * dim..(j + 1) * dim]);
            (d2 < r_sq).then(|| Violation::TooClose {
                a: i,
                b: j,
                distance: d2.sqrt(),
            })
        })
    });

    match clash {
        Some(v) => Err(v),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_pairwise_distance() {
        let samples = Samples::from_flat(2, vec![0.0, 0.0, 3.0, 4.0, 0.0, 1.0]).unwrap();
        assert!((min_pairwise_distance(&samples).unwrap() - 1.0).abs() < 1e-12);

        let single = Samples::from_flat(2, vec![0.5, 0.5]).unwrap();
        assert_eq!(min_pairwise_distance(&single), None);
    }

    #[test]
    fn test_verify_reports_violations() {
        let domain = Domain::new(vec![1.0, 1.0]).unwrap();

        let ok = Samples::from_flat(2, vec![0.1, 0.1, 0.5, 0.5]).unwrap();
        assert_eq!(verify(&ok, &domain, 0.2), Ok(()));

        let outside = Samples::from_flat(2, vec![0.1, 0.1, 1.0, 0.5]).unwrap();
        assert_eq!(verify(&outside, &domain, 0.2), Err(Violation::OutOfDomain { index: 1 }));

        let close = Samples::from_flat(2, vec![0.1, 0.1, 0.9, 0.9, 0.1, 0.15]).unwrap();
        match verify(&close, &domain, 0.2) {
            Err(Violation::TooClose { a, b, distance }) => {
                assert_eq!((a, b), (0, 2));
                assert!((distance - 0.05).abs() < 1e-12);
            }
            other => panic!("unexpected {:?}", other),
        }

        let flat = Samples::from_flat(3, vec![0.1, 0.1, 0.1]).unwrap();
        assert!(matches!(
            verify(&flat, &domain, 0.2),
            Err(Violation::DimensionMismatch { expected: 2, found: 3 })
        ));
    }
}
