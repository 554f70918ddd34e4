use alloc::vec::Vec;
use ndarray::{ArrayBase, ArrayD, Axis, Data, Dimension, RemoveAxis};

use crate::config::SplitConfig;
use crate::fed::{FedNdarray, PartitionWay, Partitions};
use crate::label::split_labels;
use crate::parties::PartyList;
use crate::placement::Placement;
use crate::planner::plan;
use crate::slicer::{check_axis, materialize};
use crate::PartitionError;

/// Hands every shard to its participant and collects the resulting handles.
///
/// # Arguments
/// * `placement` - Where the shards are placed.
/// * `parties` - The participants, in the order of `shards`.
/// * `shards` - One shard per participant.
///
/// # Returns
/// The ordered participant to handle mapping, or
/// [`PartitionError::ShardCountMismatch`] if the lengths differ. Nothing is placed in
/// that case.
pub fn assemble<P, T, M>(
    placement: &mut M,
    parties: &PartyList<P>,
    shards: Vec<T>,
) -> Result<Partitions<P, M::Handle>, PartitionError>
where
    P: Clone,
    M: Placement<P, T>,
{
    if parties.len() != shards.len() {
        return Err(PartitionError::ShardCountMismatch {
            parties: parties.len(),
            shards: shards.len(),
        });
    }

    let entries = parties
        .iter()
        .zip(shards)
        .map(|(party, shard)| (party.clone(), placement.place(party, shard)))
        .collect();

    Ok(Partitions::new(entries))
}

/// Partitions `source` across `parties` and places the shards.
///
/// This is the end-to-end entry point: the configuration is resolved, the index plan
/// computed, the array cut and each shard placed with `placement`. Every configuration
/// error is reported before any data is copied.
///
/// When `config.is_label` is set the source is treated as a label vector, see
/// [`split_labels`]; the shards are then always one-dimensional.
///
/// # Example
///
/// ```rust
/// use burn_federated::{HostPlacement, PartyList, SplitConfig, create_ndarray};
/// use ndarray::Array3;
///
/// let x = Array3::<f32>::zeros((10, 4, 4));
/// let parties = PartyList::new(vec!["alice", "bob", "carol"]).unwrap();
/// let mut placement = HostPlacement;
///
/// let fed = create_ndarray(&x, &parties, &SplitConfig::new(), &mut placement).unwrap();
///
/// assert_eq!(fed.partition_shape(&"alice"), Some(&[3, 4, 4][..]));
/// assert_eq!(fed.partition_shape(&"carol"), Some(&[4, 4, 4][..]));
/// ```
pub fn create_ndarray<P, A, S, D, M>(
    source: &ArrayBase<S, D>,
    parties: &PartyList<P>,
    config: &SplitConfig,
    placement: &mut M,
) -> Result<FedNdarray<P, M::Handle>, PartitionError>
where
    P: Clone,
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension + RemoveAxis,
    M: Placement<P, ArrayD<A>>,
{
    let (partition_way, shards): (PartitionWay, Vec<ArrayD<A>>) = if config.is_label {
        let (way, shards) = split_labels(source, parties.len(), config)?;
        (way, shards.into_iter().map(|s| s.into_dyn()).collect())
    } else {
        let strategy = config.strategy()?;
        check_axis(source.ndim(), config.axis)?;
        let axis = Axis(config.axis);
        let plan = plan(source.len_of(axis), parties.len(), &strategy)?;
        let shards = materialize(source, axis, &plan)?;
        (
            PartitionWay::from_axis(config.axis),
            shards.into_iter().map(|s| s.into_dyn()).collect(),
        )
    };

    let shard_shapes: Vec<Vec<usize>> = shards.iter().map(|s| s.shape().to_vec()).collect();
    log::debug!(
        "Partitioned array of shape {:?} {:?} into {:?}",
        source.shape(),
        partition_way,
        shard_shapes
    );

    let partitions = assemble(placement, parties, shards)?;

    Ok(FedNdarray::new(
        partitions,
        partition_way,
        source.shape().to_vec(),
        shard_shapes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::HostPlacement;
    use crate::SplitMethod;
    use alloc::vec;
    use ndarray::{Array1, Array2, array};

    fn parties() -> PartyList<&'static str> {
        PartyList::new(vec!["alice", "bob", "carol"]).unwrap()
    }

    #[test]
    fn test_assemble_preserves_party_order() {
        let mut placement = HostPlacement;
        let partitions = assemble(&mut placement, &parties(), vec![1, 2, 3]).unwrap();

        let order: Vec<_> = partitions.parties().copied().collect();
        assert_eq!(order, vec!["alice", "bob", "carol"]);
        assert_eq!(partitions[&"bob"].value(), &2);
    }

    #[test]
    #[should_panic = "ShardCountMismatch { parties: 3, shards: 2 }"]
    fn test_assemble_lengths_should_match() {
        let mut placement = HostPlacement;
        assemble(&mut placement, &parties(), vec![1, 2]).unwrap();
    }

    #[test]
    fn test_create_horizontal() {
        let x = Array2::from_shape_fn((10, 2), |(i, j)| (i * 2 + j) as f32);
        let mut placement = HostPlacement;

        let fed = create_ndarray(&x, &parties(), &SplitConfig::new(), &mut placement).unwrap();

        assert_eq!(fed.partition_way(), PartitionWay::Horizontal);
        assert_eq!(fed.global_shape(), &[10, 2]);
        let carol: ArrayD<f32> = fed.reveal(&placement, &"carol").unwrap();
        assert_eq!(carol.shape(), &[4, 2]);
        assert_eq!(carol[[0, 0]], 12.0);
    }

    #[test]
    fn test_create_vertical() {
        let x = Array2::<u8>::zeros((5, 7));
        let mut placement = HostPlacement;

        let fed = create_ndarray(&x, &parties(), &SplitConfig::new().with_axis(1), &mut placement)
            .unwrap();

        assert_eq!(fed.partition_way(), PartitionWay::Vertical);
        let shapes: Vec<_> = fed.partition_shapes().map(|(_, s)| s.to_vec()).collect();
        assert_eq!(shapes, vec![vec![5, 2], vec![5, 2], vec![5, 3]]);
    }

    #[test]
    fn test_create_with_proportions() {
        let x = Array1::from_iter(0..20);
        let config = SplitConfig::new().with_proportions(vec![0.5, 0.25, 0.25]);
        let mut placement = HostPlacement;

        let fed = create_ndarray(&x, &parties(), &config, &mut placement).unwrap();

        assert_eq!(fed.partition_shape(&"alice"), Some(&[10][..]));
        assert_eq!(fed.partition_shape(&"bob"), Some(&[5][..]));
        assert_eq!(fed.partition_shape(&"dave"), None);
    }

    #[test]
    fn test_create_labels() {
        let y = array![0, 1, 2, 0, 1, 2, 0];
        let mut placement = HostPlacement;

        let fed = create_ndarray(&y, &parties(), &SplitConfig::new().with_is_label(true), &mut placement)
            .unwrap();

        assert_eq!(fed.partition_way(), PartitionWay::Horizontal);
        let alice: ArrayD<i32> = fed.reveal(&placement, &"alice").unwrap();
        assert_eq!(alice.ndim(), 1);
    }

    #[test]
    #[should_panic = "AxisOutOfBounds { axis: 2, ndim: 2 }"]
    fn test_create_axis_should_be_in_bound() {
        let x = Array2::<u8>::zeros((5, 7));
        let mut placement = HostPlacement;
        create_ndarray(&x, &parties(), &SplitConfig::new().with_axis(2), &mut placement).unwrap();
    }

    #[test]
    #[should_panic = "MissingParameter { method: Dirichlet, param: \"num_classes\" }"]
    fn test_create_reports_configuration_errors() {
        let x = Array2::<u8>::zeros((5, 7));
        let mut placement = HostPlacement;
        let config = SplitConfig::new().with_split_method(SplitMethod::Dirichlet);
        create_ndarray(&x, &parties(), &config, &mut placement).unwrap();
    }
}
