use alloc::vec::Vec;
use ndarray::{Array, ArrayBase, Axis, Data, Dimension, RemoveAxis, Slice};

use crate::PartitionError;
use crate::planner::IndexPlan;

/// Cuts an array into one sub-array per index set of `plan`.
///
/// Contiguous index sets are copied out of a slice of the source, any other set is
/// gathered with [`ArrayBase::select`]. Every output keeps the source shape except
/// along `axis`, where its extent is the size of its index set. The source is left
/// untouched and the outputs own their data.
///
/// # Arguments
/// * `array` - The source array.
/// * `axis` - The axis to cut.
/// * `plan` - A disjoint cover of `0..array.len_of(axis)`.
pub fn materialize<A, S, D>(
    array: &ArrayBase<S, D>,
    axis: Axis,
    plan: &IndexPlan,
) -> Result<Vec<Array<A, D>>, PartitionError>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension + RemoveAxis,
{
    check_axis(array.ndim(), axis.index())?;

    let len = array.len_of(axis);
    if !plan.verify_coverage(len) {
        return Err(PartitionError::PlanSizeMismatch(len));
    }

    Ok(plan
        .parts()
        .iter()
        .map(|part| match contiguous_range(part) {
            Some((start, end)) => array.slice_axis(axis, Slice::from(start..end)).to_owned(),
            None => array.select(axis, part),
        })
        .collect())
}

/// Checks that `axis` exists on an array of dimension `ndim`.
pub(crate) fn check_axis(ndim: usize, axis: usize) -> Result<(), PartitionError> {
    if axis >= ndim {
        return Err(PartitionError::AxisOutOfBounds { axis, ndim });
    }
    Ok(())
}

/// Returns `start..end` when the indices are exactly that range, in order.
fn contiguous_range(indices: &[usize]) -> Option<(usize, usize)> {
    let Some(&start) = indices.first() else {
        return Some((0, 0));
    };
    indices
        .iter()
        .enumerate()
        .all(|(offset, &idx)| idx == start + offset)
        .then(|| (start, start + indices.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use ndarray::{Array3, array};

    #[test]
    fn test_materialize_rows() {
        let x = array![[0, 1], [2, 3], [4, 5], [6, 7], [8, 9]];
        let plan = IndexPlan::new(vec![vec![0, 1], vec![2, 4], vec![3]]);

        let shards = materialize(&x, Axis(0), &plan).unwrap();

        assert_eq!(shards[0], array![[0, 1], [2, 3]]);
        assert_eq!(shards[1], array![[4, 5], [8, 9]]);
        assert_eq!(shards[2], array![[6, 7]]);
    }

    #[test]
    fn test_materialize_feature_axis_preserves_shape() {
        let x = Array3::<u8>::zeros((4, 28, 28));
        let plan = IndexPlan::from_block_sizes(&[9, 9, 10]);

        let shards = materialize(&x, Axis(2), &plan).unwrap();

        let shapes: Vec<_> = shards.iter().map(|s| s.shape().to_vec()).collect();
        assert_eq!(shapes, vec![vec![4, 28, 9], vec![4, 28, 9], vec![4, 28, 10]]);
    }

    #[test]
    fn test_materialize_empty_shard() {
        let x = array![1.0, 2.0];
        let plan = IndexPlan::from_block_sizes(&[0, 1, 1]);

        let shards = materialize(&x, Axis(0), &plan).unwrap();

        assert_eq!(shards[0].len(), 0);
        assert_eq!(shards[2], array![2.0]);
    }

    #[test]
    fn test_materialize_does_not_alias_source() {
        let x = array![[1, 2], [3, 4]];
        let plan = IndexPlan::from_block_sizes(&[1, 1]);

        let mut shards = materialize(&x, Axis(0), &plan).unwrap();
        shards[0][[0, 0]] = 42;

        assert_eq!(x[[0, 0]], 1);
    }

    #[test]
    #[should_panic = "AxisOutOfBounds { axis: 3, ndim: 3 }"]
    fn test_axis_should_be_in_bound() {
        let x = Array3::<u8>::zeros((2, 2, 2));
        materialize(&x, Axis(3), &IndexPlan::from_block_sizes(&[1, 1])).unwrap();
    }

    #[test]
    #[should_panic = "PlanSizeMismatch(3)"]
    fn test_plan_should_cover_axis() {
        let x = array![1, 2, 3];
        materialize(&x, Axis(0), &IndexPlan::from_block_sizes(&[1, 1])).unwrap();
    }

    #[test]
    fn test_contiguous_range() {
        assert_eq!(contiguous_range(&[]), Some((0, 0)));
        assert_eq!(contiguous_range(&[3, 4, 5]), Some((3, 6)));
        assert_eq!(contiguous_range(&[3, 5]), None);
        assert_eq!(contiguous_range(&[4, 3]), None);
    }
}
