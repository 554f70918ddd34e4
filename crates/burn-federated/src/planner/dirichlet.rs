use alloc::vec;
use alloc::vec::Vec;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma};

use super::{IndexPlan, block_sizes, class_pools};
use crate::PartitionError;
use crate::config::DirichletParams;

/// Dirichlet non-IID plan.
///
/// Each participant receives exactly its uniform block size. For every class a vector
/// over participants is drawn from `Dirichlet(alpha, ..., alpha)`; participants then
/// take turns drawing one sample at a time from the classes that still have samples,
/// weighting each class by their share of that class's vector. A large `alpha` gives
/// every participant a near-uniform class mix, a small one concentrates each class on
/// a few participants.
pub(super) fn plan(
    size: usize,
    num_parties: usize,
    params: &DirichletParams<'_>,
) -> Result<IndexPlan, PartitionError> {
    let mut pools = class_pools(size, params.target, params.num_classes)?;
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

    for pool in pools.iter_mut() {
        pool.shuffle(&mut rng);
    }

    // proportions[c][i]: share of class c drawn for party i.
    let proportions = (0..params.num_classes)
        .map(|_| sample_dirichlet(&mut rng, params.alpha, num_parties))
        .collect::<Result<Vec<_>, _>>()?;

    let mut remaining = block_sizes(size, num_parties);
    let mut parts: Vec<Vec<usize>> = remaining.iter().map(|&n| Vec::with_capacity(n)).collect();
    let mut left = size;

    while left > 0 {
        for party in 0..num_parties {
            if remaining[party] == 0 {
                continue;
            }
            let class = pick_class(&mut rng, &pools, |c| proportions[c][party]);
            // Quotas sum to the sample count, so some class still has samples.
            let Some(index) = pools[class].pop() else {
                continue;
            };
            parts[party].push(index);
            remaining[party] -= 1;
            left -= 1;
        }
    }

    for part in parts.iter_mut() {
        part.sort_unstable();
    }

    Ok(IndexPlan::new(parts))
}

/// Draws a probability vector from a symmetric Dirichlet distribution by
/// normalizing independent `Gamma(alpha, 1)` samples.
fn sample_dirichlet<R: Rng>(
    rng: &mut R,
    alpha: f64,
    len: usize,
) -> Result<Vec<f64>, PartitionError> {
    let gamma = Gamma::new(alpha, 1.0).map_err(|_| PartitionError::NonPositiveAlpha(alpha))?;
    let mut draws: Vec<f64> = (0..len).map(|_| gamma.sample(rng)).collect();
    let total: f64 = draws.iter().sum();

    if total > 0.0 && total.is_finite() {
        draws.iter_mut().for_each(|d| *d /= total);
    } else {
        // Every draw underflowed, which only happens for tiny alpha.
        draws = vec![1.0 / len as f64; len];
    }

    Ok(draws)
}

/// Picks a non-empty class with probability proportional to `weight`.
///
/// Falls back to a uniform pick among the non-empty classes when they all weigh zero.
/// Returns an empty class only when every pool is empty.
fn pick_class<R: Rng>(
    rng: &mut R,
    pools: &[Vec<usize>],
    weight: impl Fn(usize) -> f64,
) -> usize {
    let available = || (0..pools.len()).filter(move |&c| !pools[c].is_empty());
    let total: f64 = available().map(&weight).sum();

    if total > 0.0 {
        let mut threshold = rng.random::<f64>() * total;
        let mut last = 0;
        for class in available() {
            let w = weight(class);
            if w <= 0.0 {
                continue;
            }
            if threshold < w {
                return class;
            }
            threshold -= w;
            last = class;
        }
        // Accumulated rounding pushed the threshold past the last bucket.
        return last;
    }

    let candidates: Vec<usize> = available().collect();
    if candidates.is_empty() {
        return 0;
    }
    candidates[rng.random_range(0..candidates.len())]
}
