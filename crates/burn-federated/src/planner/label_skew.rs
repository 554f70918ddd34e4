use alloc::vec;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::flow::FlowNetwork;
use super::{IndexPlan, block_sizes, class_pools};
use crate::PartitionError;
use crate::config::LabelSkewParams;

/// Label-skew non-IID plan.
///
/// Every participant owns at most `max_class_nums` classes and only receives samples
/// of those classes. Ownership is derived from a seeded permutation so that every
/// class has at least one owner, and samples of a shared class are routed between its
/// owners so that each participant ends up as close as possible to its uniform block
/// size.
pub(super) fn plan(
    size: usize,
    num_parties: usize,
    params: &LabelSkewParams<'_>,
) -> Result<IndexPlan, PartitionError> {
    let num_classes = params.num_classes;
    let max_class_nums = params.max_class_nums.min(num_classes);
    if num_parties.saturating_mul(max_class_nums) < num_classes {
        return Err(PartitionError::InsufficientClassCoverage {
            num_parties,
            max_class_nums: params.max_class_nums,
            num_classes,
        });
    }

    let mut pools = class_pools(size, params.target, num_classes)?;
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

    let class_sizes: Vec<usize> = pools.iter().map(Vec::len).collect();
    let owned = assign_classes(&mut rng, num_parties, &class_sizes, max_class_nums);
    for pool in pools.iter_mut() {
        pool.shuffle(&mut rng);
    }

    let quotas = block_sizes(size, num_parties);
    let counts = route_counts(&pools, &owned, &quotas);

    let mut parts: Vec<Vec<usize>> = vec![Vec::new(); num_parties];
    for (class, pool) in pools.iter().enumerate() {
        let mut rest = pool.as_slice();
        for (party, part) in parts.iter_mut().enumerate() {
            let (head, tail) = rest.split_at(counts[class][party]);
            part.extend_from_slice(head);
            rest = tail;
        }
    }

    for part in parts.iter_mut() {
        part.sort_unstable();
    }

    Ok(IndexPlan::new(parts))
}

/// Returns the classes owned by every party.
///
/// Classes with samples are shuffled ahead of the empty ones, and that order is laid
/// out cyclically over `num_parties * max_class_nums` slots: party `i` takes slots
/// `i, i + num_parties, i + 2 * num_parties, ...`. The slots cover every class at least
/// once; a party that lands on the same class twice simply owns fewer classes. A party
/// left with empty classes only is handed a class with samples in place of its first
/// one, so it shares that class with another party.
fn assign_classes(
    rng: &mut ChaCha8Rng,
    num_parties: usize,
    class_sizes: &[usize],
    max_class_nums: usize,
) -> Vec<Vec<usize>> {
    let num_classes = class_sizes.len();
    let (mut filled, mut empty): (Vec<usize>, Vec<usize>) =
        (0..num_classes).partition(|&class| class_sizes[class] > 0);
    filled.shuffle(rng);
    empty.shuffle(rng);
    let order: Vec<usize> = filled.iter().chain(&empty).copied().collect();

    let mut owned: Vec<Vec<usize>> = (0..num_parties)
        .map(|party| {
            let mut classes = Vec::with_capacity(max_class_nums);
            for turn in 0..max_class_nums {
                let class = order[(party + turn * num_parties) % num_classes];
                if !classes.contains(&class) {
                    classes.push(class);
                }
            }
            classes
        })
        .collect();

    if !filled.is_empty() {
        for (party, classes) in owned.iter_mut().enumerate() {
            if classes.iter().all(|&class| class_sizes[class] == 0) {
                classes[0] = filled[party % filled.len()];
            }
        }
    }

    owned
}

/// Decides how many samples of each class go to each party.
///
/// Classes are routed to their owners by a maximum flow capped by the per-party
/// quotas. Whatever the flow cannot place, because ownership makes the quotas
/// unreachable, goes to the least loaded owner of the class. A party that still has
/// nothing then takes one sample of an owned class from the most loaded co-owner.
fn route_counts(pools: &[Vec<usize>], owned: &[Vec<usize>], quotas: &[usize]) -> Vec<Vec<usize>> {
    let num_classes = pools.len();
    let num_parties = owned.len();

    // Empty classes get no node.
    let mut class_nodes = vec![None; num_classes];
    let mut nodes = 1;
    for (class, pool) in pools.iter().enumerate() {
        if !pool.is_empty() {
            class_nodes[class] = Some(nodes);
            nodes += 1;
        }
    }
    let source = 0;
    let party_node = |p: usize| nodes + p;
    let sink = nodes + num_parties;

    let mut network = FlowNetwork::new(sink + 1);
    for (class, pool) in pools.iter().enumerate() {
        if let Some(node) = class_nodes[class] {
            network.add_edge(source, node, pool.len());
        }
    }
    let mut routes = Vec::new();
    for (party, classes) in owned.iter().enumerate() {
        for &class in classes {
            if let Some(node) = class_nodes[class] {
                let edge = network.add_edge(node, party_node(party), pools[class].len());
                routes.push((class, party, edge));
            }
        }
        network.add_edge(party_node(party), sink, quotas[party]);
    }

    let routed = network.max_flow(source, sink);
    let total: usize = pools.iter().map(Vec::len).sum();

    let mut counts = vec![vec![0; num_parties]; num_classes];
    let mut loads = vec![0; num_parties];
    for (class, party, edge) in routes {
        let flow = network.flow(edge);
        counts[class][party] = flow;
        loads[party] += flow;
    }

    if routed < total {
        log::warn!(
            "Label skew cannot balance {total} samples over {num_parties} parties, \
             {} samples exceed the per-party quotas",
            total - routed
        );
        for (class, pool) in pools.iter().enumerate() {
            let placed: usize = counts[class].iter().sum();
            let leftover = pool.len() - placed;
            if leftover == 0 {
                continue;
            }
            let owner = (0..num_parties)
                .filter(|&p| owned[p].contains(&class))
                .min_by_key(|&p| (loads[p], p));
            if let Some(owner) = owner {
                counts[class][owner] += leftover;
                loads[owner] += leftover;
            }
        }
    }

    for party in 0..num_parties {
        if quotas[party] == 0 || loads[party] > 0 {
            continue;
        }
        let mut donor: Option<(usize, usize)> = None;
        for &class in &owned[party] {
            for other in 0..num_parties {
                if counts[class][other] > 0
                    && loads[other] > 1
                    && donor.is_none_or(|(_, best)| loads[other] > loads[best])
                {
                    donor = Some((class, other));
                }
            }
        }
        if let Some((class, other)) = donor {
            counts[class][other] -= 1;
            counts[class][party] += 1;
            loads[other] -= 1;
            loads[party] += 1;
        }
    }

    counts
}
