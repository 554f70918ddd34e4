use alloc::format;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::IndexPlan;
use crate::PartitionError;
use crate::config::UniformParams;

pub(super) fn plan(
    size: usize,
    num_parties: usize,
    params: &UniformParams<'_>,
) -> Result<IndexPlan, PartitionError> {
    let sizes = match params.proportions {
        Some(proportions) => weighted_block_sizes(size, num_parties, proportions)?,
        None => block_sizes(size, num_parties),
    };

    let Some(seed) = params.shuffle_seed else {
        return Ok(IndexPlan::from_block_sizes(&sizes));
    };

    let mut order: Vec<usize> = (0..size).collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    let mut rest = order.as_slice();
    let parts = sizes
        .iter()
        .map(|&len| {
            let (head, tail) = rest.split_at(len);
            rest = tail;
            let mut part = head.to_vec();
            part.sort_unstable();
            part
        })
        .collect();

    Ok(IndexPlan::new(parts))
}

/// Sizes of `num_parties` contiguous near-equal blocks covering `size` units.
///
/// Every block holds `size / num_parties` units and the remainder goes one unit at a
/// time to the last blocks, so 10 units over 3 parties gives `[3, 3, 4]`.
pub fn block_sizes(size: usize, num_parties: usize) -> Vec<usize> {
    if num_parties == 0 {
        return Vec::new();
    }
    let base = size / num_parties;
    let remainder = size % num_parties;
    (0..num_parties)
        .map(|i| base + usize::from(i >= num_parties - remainder))
        .collect()
}

/// Largest-remainder apportionment of `size` units by relative weight.
///
/// Ties in the fractional parts favour later parties, so equal weights give the same
/// sizes as [`block_sizes`].
fn weighted_block_sizes(
    size: usize,
    num_parties: usize,
    weights: &[f64],
) -> Result<Vec<usize>, PartitionError> {
    if weights.len() != num_parties {
        return Err(PartitionError::InvalidProportions(format!(
            "expected {num_parties} proportions, got {}",
            weights.len()
        )));
    }
    if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
        return Err(PartitionError::InvalidProportions(format!(
            "proportions must be finite and non-negative, got {w}"
        )));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(PartitionError::InvalidProportions(
            "proportions must not all be zero".into(),
        ));
    }

    let mut sizes = Vec::with_capacity(num_parties);
    let mut fractions = Vec::with_capacity(num_parties);
    for (i, w) in weights.iter().enumerate() {
        let exact = w / total * size as f64;
        // Truncation is the floor for non-negative values.
        let whole = (exact as usize).min(size);
        sizes.push(whole);
        fractions.push((exact - whole as f64, i));
    }

    let assigned: usize = sizes.iter().sum();
    let mut missing = size.saturating_sub(assigned);
    fractions.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.cmp(&a.1)));
    for &(_, i) in fractions.iter().cycle() {
        if missing == 0 {
            break;
        }
        sizes[i] += 1;
        missing -= 1;
    }

    // Rounding can only overshoot by a unit or two; take them back from the end.
    let mut excess = sizes.iter().sum::<usize>().saturating_sub(size);
    for slot in sizes.iter_mut().rev() {
        let take = excess.min(*slot);
        *slot -= take;
        excess -= take;
    }

    Ok(sizes)
}
