use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Debug)]
struct Edge {
    to: usize,
    capacity: usize,
    residual: usize,
}

/// A sparse flow network solved with Edmonds-Karp.
///
/// Edges are stored in pairs, the forward edge at an even id and its reverse right
/// after it, so `id ^ 1` is always the opposite direction.
#[derive(Clone, Debug)]
pub(super) struct FlowNetwork {
    adjacency: Vec<Vec<usize>>,
    edges: Vec<Edge>,
}

impl FlowNetwork {
    pub(super) fn new(nodes: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); nodes],
            edges: Vec::new(),
        }
    }

    /// Adds the edge `from -> to` and returns its id.
    pub(super) fn add_edge(&mut self, from: usize, to: usize, capacity: usize) -> usize {
        let id = self.edges.len();
        self.edges.push(Edge {
            to,
            capacity,
            residual: capacity,
        });
        self.edges.push(Edge {
            to: from,
            capacity: 0,
            residual: 0,
        });
        self.adjacency[from].push(id);
        self.adjacency[to].push(id + 1);
        id
    }

    /// Pushes as much flow as possible from `source` to `sink` and returns its value.
    pub(super) fn max_flow(&mut self, source: usize, sink: usize) -> usize {
        let nodes = self.adjacency.len();
        let mut total = 0;

        loop {
            // parent[v]: edge used to reach v.
            let mut parent = vec![usize::MAX; nodes];
            let mut visited = vec![false; nodes];
            visited[source] = true;
            let mut queue = VecDeque::from([source]);

            'bfs: while let Some(u) = queue.pop_front() {
                for &id in &self.adjacency[u] {
                    let edge = &self.edges[id];
                    if !visited[edge.to] && edge.residual > 0 {
                        visited[edge.to] = true;
                        parent[edge.to] = id;
                        if edge.to == sink {
                            break 'bfs;
                        }
                        queue.push_back(edge.to);
                    }
                }
            }

            if !visited[sink] {
                return total;
            }

            let mut bottleneck = usize::MAX;
            let mut v = sink;
            while v != source {
                let id = parent[v];
                bottleneck = bottleneck.min(self.edges[id].residual);
                v = self.edges[id ^ 1].to;
            }

            let mut v = sink;
            while v != source {
                let id = parent[v];
                self.edges[id].residual -= bottleneck;
                self.edges[id ^ 1].residual += bottleneck;
                v = self.edges[id ^ 1].to;
            }

            total += bottleneck;
        }
    }

    /// Flow currently carried by the edge with the given id.
    pub(super) fn flow(&self, id: usize) -> usize {
        let edge = &self.edges[id];
        edge.capacity.saturating_sub(edge.residual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_flow_simple() {
        // 0 -> {1, 2} -> 3
        let mut network = FlowNetwork::new(4);
        let e01 = network.add_edge(0, 1, 3);
        network.add_edge(0, 2, 2);
        network.add_edge(1, 3, 2);
        let e23 = network.add_edge(2, 3, 3);
        let e12 = network.add_edge(1, 2, 1);

        assert_eq!(network.max_flow(0, 3), 5);
        assert_eq!(network.flow(e01), 3);
        assert_eq!(network.flow(e12), 1);
        assert_eq!(network.flow(e23), 3);
    }

    #[test]
    fn test_max_flow_limited_by_sink_edges() {
        let mut network = FlowNetwork::new(3);
        let e01 = network.add_edge(0, 1, 10);
        network.add_edge(1, 2, 4);

        assert_eq!(network.max_flow(0, 2), 4);
        assert_eq!(network.flow(e01), 4);
    }

    #[test]
    fn test_max_flow_reroutes_through_reverse_edges() {
        // Node 2 only reaches the sink through 3, which the first path 0 -> 1 -> 3 -> 5
        // takes. The second path moves node 1 over to 4.
        let mut network = FlowNetwork::new(6);
        network.add_edge(0, 1, 1);
        network.add_edge(0, 2, 1);
        let e13 = network.add_edge(1, 3, 1);
        let e14 = network.add_edge(1, 4, 1);
        let e23 = network.add_edge(2, 3, 1);
        network.add_edge(3, 5, 1);
        network.add_edge(4, 5, 1);

        assert_eq!(network.max_flow(0, 5), 2);
        assert_eq!(network.flow(e13) + network.flow(e14), 1);
        assert_eq!(network.flow(e23), 1);
        assert_eq!(network.flow(e14), 1);
    }
}
