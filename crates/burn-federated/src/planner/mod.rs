//! Index planning.
//!
//! The planner decides which positions along the split axis each participant owns.
//! It never touches array data: given the axis length, the number of participants
//! and a [`Strategy`], it returns one index set per participant. Every plan is a
//! disjoint cover of `0..size`, with each index set sorted in ascending order.
//!
//! Seeded strategies draw from a [`ChaCha8Rng`](rand_chacha::ChaCha8Rng) created from
//! the configured `random_state`. Its stream does not depend on the `rand` version, so
//! a seed keeps producing the same plan.

mod dirichlet;
mod flow;
mod label_skew;
mod uniform;

use alloc::vec;
use alloc::vec::Vec;

use crate::PartitionError;
use crate::config::Strategy;

pub use uniform::block_sizes;

/// The index sets assigned to each participant, in party order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IndexPlan {
    parts: Vec<Vec<usize>>,
}

impl IndexPlan {
    /// Creates a plan from explicit index sets.
    pub fn new(parts: Vec<Vec<usize>>) -> Self {
        Self { parts }
    }

    /// Creates a plan of contiguous blocks with the given sizes.
    pub fn from_block_sizes(sizes: &[usize]) -> Self {
        let mut start = 0;
        let parts = sizes
            .iter()
            .map(|&size| {
                let block = (start..start + size).collect();
                start += size;
                block
            })
            .collect();
        Self { parts }
    }

    /// Number of index sets, one per participant.
    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// The index sets.
    pub fn parts(&self) -> &[Vec<usize>] {
        &self.parts
    }

    /// The index set of the participant at `position`.
    pub fn part(&self, position: usize) -> Option<&[usize]> {
        self.parts.get(position).map(Vec::as_slice)
    }

    /// Size of every index set.
    pub fn sizes(&self) -> Vec<usize> {
        self.parts.iter().map(Vec::len).collect()
    }

    /// Consumes the plan, returning the index sets.
    pub fn into_parts(self) -> Vec<Vec<usize>> {
        self.parts
    }

    /// Verifies that the index sets cover `0..size` exactly once.
    pub fn verify_coverage(&self, size: usize) -> bool {
        let mut covered = vec![false; size];
        for &idx in self.parts.iter().flatten() {
            match covered.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        covered.into_iter().all(|c| c)
    }
}

/// Computes the index plan of `size` units over `num_parties` participants.
///
/// # Arguments
/// * `size` - Length of the array along the split axis.
/// * `num_parties` - Number of participants, at least one.
/// * `strategy` - The resolved split strategy.
///
/// # Returns
/// One ascending index set per participant. The sets are pairwise disjoint and their
/// union is `0..size`. When `num_parties > size` some sets are empty. Calling it twice
/// with the same arguments returns the same plan.
pub fn plan(
    size: usize,
    num_parties: usize,
    strategy: &Strategy<'_>,
) -> Result<IndexPlan, PartitionError> {
    if num_parties == 0 {
        return Err(PartitionError::EmptyParties);
    }

    let plan = match strategy {
        Strategy::Uniform(params) => uniform::plan(size, num_parties, params)?,
        Strategy::Dirichlet(params) => dirichlet::plan(size, num_parties, params)?,
        Strategy::LabelSkew(params) => label_skew::plan(size, num_parties, params)?,
    };

    debug_assert!(plan.verify_coverage(size));
    log::debug!(
        "Planned {} split of {} units over {} parties: {:?}",
        strategy.method(),
        size,
        num_parties,
        plan.sizes()
    );

    Ok(plan)
}

/// Checks that a target is aligned with the sample axis and returns the sample
/// indices of every class, in ascending order.
fn class_pools(
    size: usize,
    target: &[usize],
    num_classes: usize,
) -> Result<Vec<Vec<usize>>, PartitionError> {
    if target.len() != size {
        return Err(PartitionError::TargetLengthMismatch {
            expected: size,
            actual: target.len(),
        });
    }

    let mut pools = vec![Vec::new(); num_classes];
    for (index, &label) in target.iter().enumerate() {
        let pool = pools
            .get_mut(label)
            .ok_or_else(|| PartitionError::LabelOutOfRange {
                index,
                label,
                num_classes,
            })?;
        pool.push(index);
    }

    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SplitConfig, SplitMethod};

    #[test]
    fn test_from_block_sizes() {
        let plan = IndexPlan::from_block_sizes(&[2, 0, 3]);

        assert_eq!(plan.parts(), &[vec![0, 1], vec![], vec![2, 3, 4]]);
        assert!(plan.verify_coverage(5));
        assert!(!plan.verify_coverage(6));
    }

    #[test]
    fn test_verify_coverage_rejects_overlap() {
        let plan = IndexPlan::new(vec![vec![0, 1], vec![1, 2]]);

        assert!(!plan.verify_coverage(3));
    }

    #[test]
    #[should_panic = "EmptyParties"]
    fn test_plan_requires_parties() {
        plan(10, 0, &Strategy::default()).unwrap();
    }

    #[test]
    #[should_panic = "TargetLengthMismatch { expected: 4, actual: 3 }"]
    fn test_target_length_should_match() {
        let config = SplitConfig::new()
            .with_split_method(SplitMethod::Dirichlet)
            .with_num_classes(2)
            .with_alpha(1.0)
            .with_random_state(0)
            .with_target(vec![0, 1, 0]);

        plan(4, 2, &config.strategy().unwrap()).unwrap();
    }

    #[test]
    #[should_panic = "LabelOutOfRange { index: 2, label: 3, num_classes: 2 }"]
    fn test_labels_should_be_in_range() {
        let config = SplitConfig::new()
            .with_split_method(SplitMethod::LabelSkew)
            .with_num_classes(2)
            .with_max_class_nums(1)
            .with_random_state(0)
            .with_target(vec![0, 1, 3, 0]);

        plan(4, 2, &config.strategy().unwrap()).unwrap();
    }
}
