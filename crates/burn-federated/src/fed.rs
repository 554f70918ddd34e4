use alloc::vec::Vec;
use core::ops::Index;

use crate::placement::Placement;

/// Describes how the shards of a [`FedNdarray`] relate to the source array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartitionWay {
    /// Sharded along the sample axis: each participant owns a subset of the samples.
    Horizontal,
    /// Sharded along a feature axis: each participant owns a subset of the features.
    Vertical,
    /// Not sharded: every participant holds the whole array.
    Replicated,
}

impl PartitionWay {
    /// The way a split along `axis` distributes the data.
    pub fn from_axis(axis: usize) -> Self {
        if axis == 0 {
            PartitionWay::Horizontal
        } else {
            PartitionWay::Vertical
        }
    }
}

/// An ordered mapping from participant to the handle of its placed shard.
///
/// The order is the order of the party list the shards were assembled with.
#[derive(Clone, Debug, PartialEq)]
pub struct Partitions<P, H> {
    entries: Vec<(P, H)>,
}

impl<P, H> Partitions<P, H> {
    pub(crate) fn new(entries: Vec<(P, H)>) -> Self {
        Self { entries }
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no participants.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(participant, handle)` pairs in party order.
    pub fn iter(&self) -> impl Iterator<Item = (&P, &H)> {
        self.entries.iter().map(|(p, h)| (p, h))
    }

    /// Iterates over the participants in order.
    pub fn parties(&self) -> impl Iterator<Item = &P> {
        self.entries.iter().map(|(p, _)| p)
    }

    /// Consumes the mapping, returning its entries in order.
    pub fn into_inner(self) -> Vec<(P, H)> {
        self.entries
    }
}

impl<P: PartialEq, H> Partitions<P, H> {
    /// The handle placed for `party`, if it takes part.
    pub fn get(&self, party: &P) -> Option<&H> {
        self.entries.iter().find(|(p, _)| p == party).map(|(_, h)| h)
    }
}

impl<P: PartialEq, H> Index<&P> for Partitions<P, H> {
    type Output = H;

    /// Panics if `party` does not take part.
    fn index(&self, party: &P) -> &H {
        self.get(party).expect("participant is not part of the partition")
    }
}

/// An array partitioned across the participants of a simulated federation.
///
/// A `FedNdarray` holds one placed shard per participant, along with metadata
/// describing the partition: its [`PartitionWay`], the shape of the source array and
/// the shape of every shard, so shapes can be inspected without revealing anything.
#[derive(Clone, Debug, PartialEq)]
pub struct FedNdarray<P, H> {
    /// Placed shards, in party order.
    partitions: Partitions<P, H>,
    /// How the source was distributed.
    partition_way: PartitionWay,
    /// Shape of the source array.
    global_shape: Vec<usize>,
    /// Shape of each shard, in party order.
    shard_shapes: Vec<Vec<usize>>,
}

impl<P, H> FedNdarray<P, H> {
    pub(crate) fn new(
        partitions: Partitions<P, H>,
        partition_way: PartitionWay,
        global_shape: Vec<usize>,
        shard_shapes: Vec<Vec<usize>>,
    ) -> Self {
        debug_assert_eq!(partitions.len(), shard_shapes.len());
        Self {
            partitions,
            partition_way,
            global_shape,
            shard_shapes,
        }
    }

    /// The placed shards.
    pub fn partitions(&self) -> &Partitions<P, H> {
        &self.partitions
    }

    /// How the source array was distributed.
    pub fn partition_way(&self) -> PartitionWay {
        self.partition_way
    }

    /// Shape of the source array.
    pub fn global_shape(&self) -> &[usize] {
        &self.global_shape
    }

    /// Shape of every shard, in party order.
    pub fn partition_shapes(&self) -> impl Iterator<Item = (&P, &[usize])> {
        self.partitions
            .parties()
            .zip(self.shard_shapes.iter().map(Vec::as_slice))
    }

    /// Consumes the array, returning its placed shards.
    pub fn into_partitions(self) -> Partitions<P, H> {
        self.partitions
    }
}

impl<P: PartialEq, H> FedNdarray<P, H> {
    /// Shape of the shard owned by `party`.
    pub fn partition_shape(&self, party: &P) -> Option<&[usize]> {
        self.partitions
            .parties()
            .position(|p| p == party)
            .map(|idx| self.shard_shapes[idx].as_slice())
    }

    /// Fetches the concrete shard owned by `party` through the placement that holds it.
    pub fn reveal<T, M>(&self, placement: &M, party: &P) -> Option<T>
    where
        M: Placement<P, T, Handle = H>,
    {
        self.partitions.get(party).map(|h| placement.reveal(h))
    }
}
