use derive_new::new;

/// A capability that puts shards on virtual participants and reads them back.
///
/// The partitioning core only hands shards over; where they live and how they are
/// fetched is up to the implementation. A simulated federation can keep everything in
/// process with [`HostPlacement`], while a real deployment may ship the shard to a
/// remote party and return a reference to it.
pub trait Placement<P, T> {
    /// Reference to a placed shard.
    type Handle;

    /// Places `shard` at the logical location of `party`.
    fn place(&mut self, party: &P, shard: T) -> Self::Handle;

    /// Synchronously fetches the concrete value behind `handle`.
    fn reveal(&self, handle: &Self::Handle) -> T;
}

/// Keeps every shard in the current process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostPlacement;

/// A shard held in process on behalf of a participant.
#[derive(Clone, Debug, PartialEq, new)]
pub struct HostShard<P, T> {
    party: P,
    value: T,
}

impl<P, T> HostShard<P, T> {
    /// The participant owning the shard.
    pub fn party(&self) -> &P {
        &self.party
    }

    /// The shard itself.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the handle, returning the shard.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<P: Clone, T: Clone> Placement<P, T> for HostPlacement {
    type Handle = HostShard<P, T>;

    fn place(&mut self, party: &P, shard: T) -> Self::Handle {
        HostShard::new(party.clone(), shard)
    }

    fn reveal(&self, handle: &Self::Handle) -> T {
        handle.value.clone()
    }
}
