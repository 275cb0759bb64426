//! Graph algorithms: minimum spanning forests and single-source shortest
//! paths.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Add;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::heap::{Heap, HeapOrder};

/// An undirected weighted edge between two vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<W> {
    pub weight: W,
    pub from: usize,
    pub to: usize,
}

impl<W> Edge<W> {
    pub fn new(weight: W, from: usize, to: usize) -> Self { Self { weight, from, to } }
}

/// Disjoint sets over `0..len`, with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn len(&self) -> usize { self.parent.len() }

    pub fn is_empty(&self) -> bool { self.parent.is_empty() }

    /// The representative of the set containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut curr = x;
        while self.parent[curr] != root {
            let next = self.parent[curr];
            self.parent[curr] = root;
            curr = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`, returning `false` if they were
    /// already the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        match self.rank[a].cmp(&self.rank[b]) {
            Ordering::Greater => self.parent[b] = a,
            Ordering::Less => self.parent[a] = b,
            Ordering::Equal => {
                self.parent[b] = a;
                self.rank[a] += 1;
            }
        }
        true
    }
}

/// Kruskal's minimum spanning forest.
///
/// Edges are considered in ascending weight, ties in input order, and kept
/// when they join two different components. Incomparable weights (NaN) are
/// treated as ties.
///
/// # Returns
///
/// - `Ok(edges)`: The kept edges, in the order they were kept.
/// - [`Error::IndexOutOfBounds`] if an edge names a vertex `>= num_nodes`.
pub fn kruskal<W>(edges: &[Edge<W>], num_nodes: usize) -> Result<Vec<Edge<W>>>
where
    W: PartialOrd + Clone,
{
    if let Some(edge) = edges
        .iter()
        .find(|edge| edge.from >= num_nodes || edge.to >= num_nodes)
    {
        return Err(Error::IndexOutOfBounds {
            index: edge.from.max(edge.to),
            len: num_nodes,
        });
    }

    let mut sorted: Vec<&Edge<W>> = edges.iter().collect();
    sorted.sort_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal));

    let mut sets = UnionFind::new(num_nodes);
    let mut forest = Vec::new();
    for edge in sorted {
        if sets.union(edge.from, edge.to) {
            forest.push(edge.clone());
        } else {
            trace!("skipped edge {} - {}, it closes a cycle", edge.from, edge.to);
        }
    }

    debug!(
        "spanning forest of {} nodes has {} edges",
        num_nodes,
        forest.len()
    );
    Ok(forest)
}

/// A tentative distance in the frontier, ordered by distance alone.
struct Frontier<N, W> {
    distance: W,
    node: N,
}

impl<N, W: Ord> PartialEq for Frontier<N, W> {
    fn eq(&self, other: &Self) -> bool { self.distance == other.distance }
}

impl<N, W: Ord> Eq for Frontier<N, W> {}

impl<N, W: Ord> PartialOrd for Frontier<N, W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl<N, W: Ord> Ord for Frontier<N, W> {
    fn cmp(&self, other: &Self) -> Ordering { self.distance.cmp(&other.distance) }
}

/// Dijkstra's single-source shortest paths.
///
/// `graph` maps each vertex to its outgoing `(neighbour, weight)` pairs;
/// weights must not be negative. The zero distance is `W::default()`.
///
/// Every vertex that appears in `graph`, as a key or as a neighbour, has an
/// entry in the result, and so does `start`. Vertices that cannot be reached
/// map to [`None`].
pub fn dijkstra<N, W>(graph: &HashMap<N, Vec<(N, W)>>, start: &N) -> HashMap<N, Option<W>>
where
    N: Eq + Hash + Clone,
    W: Ord + Copy + Default + Add<Output = W>,
{
    let mut distances: HashMap<N, Option<W>> = HashMap::new();
    for (node, neighbours) in graph {
        distances.insert(node.clone(), None);
        for (neighbour, _) in neighbours {
            distances.insert(neighbour.clone(), None);
        }
    }
    distances.insert(start.clone(), Some(W::default()));

    let mut frontier = Heap::new(HeapOrder::Min);
    frontier.push(Frontier {
        distance: W::default(),
        node: start.clone(),
    });

    while let Some(Frontier { distance, node }) = frontier.pop() {
        if distances.get(&node).copied().flatten() < Some(distance) {
            continue;
        }
        let Some(neighbours) = graph.get(&node) else {
            continue;
        };
        for (neighbour, weight) in neighbours {
            let candidate = distance + *weight;
            let best = distances.entry(neighbour.clone()).or_insert(None);
            if best.map_or(true, |best| candidate < best) {
                *best = Some(candidate);
                frontier.push(Frontier {
                    distance: candidate,
                    node: neighbour.clone(),
                });
            }
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_union_find() {
        let mut sets = UnionFind::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(!sets.union(1, 0));
        assert_eq!(sets.find(0), sets.find(1));
        assert_ne!(sets.find(1), sets.find(3));
        assert!(sets.union(1, 4));
        assert_eq!(sets.find(0), sets.find(3));
        assert_eq!(sets.len(), 5);
    }

    #[test]
    fn test_kruskal() {
        let edges = [
            Edge::new(4, 0, 1),
            Edge::new(1, 1, 2),
            Edge::new(3, 0, 2),
            Edge::new(2, 2, 3),
            Edge::new(5, 1, 3),
        ];
        let forest = kruskal(&edges, 4).unwrap();
        assert_eq!(
            forest,
            vec![Edge::new(1, 1, 2), Edge::new(2, 2, 3), Edge::new(3, 0, 2)]
        );
    }

    #[test]
    fn test_kruskal_forest_and_float_weights() {
        let edges = [Edge::new(0.5, 0, 1), Edge::new(0.25, 2, 3)];
        let forest = kruskal(&edges, 5).unwrap();
        assert_eq!(forest, vec![Edge::new(0.25, 2, 3), Edge::new(0.5, 0, 1)]);
    }

    #[test]
    fn test_kruskal_bad_vertex() {
        let err = kruskal(&[Edge::new(1, 0, 3)], 3).unwrap_err();
        assert_eq!(err, Error::IndexOutOfBounds { index: 3, len: 3 });
        assert_eq!(err.kind(), ErrorKind::Index);
    }

    #[test]
    fn test_dijkstra() {
        let graph = HashMap::from([
            ("a", vec![("b", 7), ("c", 2)]),
            ("c", vec![("b", 3), ("d", 8)]),
            ("b", vec![("d", 1)]),
            ("e", vec![("a", 1)]),
        ]);
        let distances = dijkstra(&graph, &"a");
        assert_eq!(distances["a"], Some(0));
        assert_eq!(distances["c"], Some(2));
        assert_eq!(distances["b"], Some(5));
        assert_eq!(distances["d"], Some(6));
        assert_eq!(distances["e"], None);
        assert_eq!(distances.len(), 5);
    }

    #[test]
    fn test_dijkstra_start_outside_graph() {
        let graph: HashMap<u32, Vec<(u32, u64)>> = HashMap::from([(1, vec![(2, 4)])]);
        let distances = dijkstra(&graph, &9);
        assert_eq!(distances[&9], Some(0));
        assert_eq!(distances[&1], None);
        assert_eq!(distances[&2], None);
    }
}
