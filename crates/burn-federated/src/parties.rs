use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::HashSet;

use crate::PartitionError;

/// An ordered list of distinct participants taking part in a simulated federation.
///
/// The order of the list is significant: the i-th planned index set is always handed
/// to the i-th participant, so two runs with the same list produce the same mapping.
/// Participants can be any identifier that can be compared and hashed, typically a
/// device handle or a name.
///
/// # Example
///
/// ```rust
/// use burn_federated::PartyList;
///
/// let parties = PartyList::new(vec!["alice", "bob", "carol"]).unwrap();
/// assert_eq!(parties.len(), 3);
/// assert_eq!(parties.position(&"bob"), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartyList<P> {
    parties: Vec<P>,
}

impl<P: Eq + Hash> PartyList<P> {
    /// Creates a [`PartyList`] from the given participants.
    ///
    /// # Arguments
    /// * `parties` - The participants, in the order shards should be assigned.
    ///
    /// # Returns
    /// A `PartyList` if the participants are non-empty and pairwise distinct, or a
    /// `PartitionError` otherwise.
    pub fn new(parties: Vec<P>) -> Result<Self, PartitionError> {
        if parties.is_empty() {
            return Err(PartitionError::EmptyParties);
        }

        if let Some(idx) = first_duplicate(&parties) {
            return Err(PartitionError::DuplicateParty(idx));
        }

        Ok(Self { parties })
    }

    /// Position of a participant in the list.
    pub fn position(&self, party: &P) -> Option<usize> {
        self.parties.iter().position(|p| p == party)
    }
}

/// Position of the first participant that already appeared earlier in the list.
fn first_duplicate<P: Eq + Hash>(parties: &[P]) -> Option<usize> {
    let mut seen = HashSet::with_capacity(parties.len());
    parties.iter().position(|party| !seen.insert(party))
}

impl<P> PartyList<P> {
    /// Number of participants.
    pub fn len(&self) -> usize {
        self.parties.len()
    }

    /// Always false, a party list holds at least one participant.
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Iterates over the participants in order.
    pub fn iter(&self) -> core::slice::Iter<'_, P> {
        self.parties.iter()
    }

    /// The participants as a slice.
    pub fn as_slice(&self) -> &[P] {
        &self.parties
    }
}

impl<P: Eq + Hash> TryFrom<Vec<P>> for PartyList<P> {
    type Error = PartitionError;

    fn try_from(parties: Vec<P>) -> Result<Self, Self::Error> {
        Self::new(parties)
    }
}

impl<'a, P> IntoIterator for &'a PartyList<P> {
    type Item = &'a P;
    type IntoIter = core::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
