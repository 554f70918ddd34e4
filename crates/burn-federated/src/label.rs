use alloc::vec;
use alloc::vec::Vec;
use ndarray::{Array1, ArrayBase, ArrayView1, Axis, Data, Dimension, Ix1, Ix2};

use crate::config::{SplitConfig, Strategy};
use crate::planner::plan;
use crate::slicer::materialize;
use crate::{PartitionError, PartitionWay};

/// Splits a label vector so that it stays aligned with the matching data split.
///
/// The labels are viewed as a 1-D vector (a `(n, 1)` column is accepted too) and the
/// output shards are always 1-D. With `config.axis == 0` the labels are split exactly
/// like the samples of a data array with the same configuration, so both splits agree
/// index for index. With a feature axis, the data split is vertical: every participant
/// keeps all samples, so each receives the full label vector.
///
/// # Returns
/// The shards in party order, together with the way they relate to the source.
pub fn split_labels<A, S, D>(
    labels: &ArrayBase<S, D>,
    num_parties: usize,
    config: &SplitConfig,
) -> Result<(PartitionWay, Vec<Array1<A>>), PartitionError>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    if num_parties == 0 {
        return Err(PartitionError::EmptyParties);
    }
    let strategy = config.strategy()?;
    let labels = as_label_vector(labels)?;

    match (config.axis, &strategy) {
        (0, _) => {}
        (_, Strategy::Uniform(_)) => {
            return Ok((PartitionWay::Replicated, vec![labels.to_owned(); num_parties]));
        }
        (axis, strategy) => {
            return Err(PartitionError::SampleAxisOnly {
                method: strategy.method(),
                axis,
            });
        }
    }

    let plan = plan(labels.len(), num_parties, &strategy)?;
    let shards = materialize(&labels, Axis(0), &plan)?;

    Ok((PartitionWay::Horizontal, shards))
}

/// Views an array as a 1-D label vector.
fn as_label_vector<A, S, D>(labels: &ArrayBase<S, D>) -> Result<ArrayView1<'_, A>, PartitionError>
where
    S: Data<Elem = A>,
    D: Dimension,
{
    let not_a_label = || PartitionError::NotALabelVector(labels.shape().to_vec());

    match labels.shape() {
        [_] => labels
            .view()
            .into_dimensionality::<Ix1>()
            .map_err(|_| not_a_label()),
        [_, 1] => labels
            .view()
            .into_dimensionality::<Ix2>()
            .map(|column| column.index_axis_move(Axis(1), 0))
            .map_err(|_| not_a_label()),
        _ => Err(not_a_label()),
    }
}
