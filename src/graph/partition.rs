//! Community Partitioner
//!
//! Louvain-style modularity optimisation over the transfer multigraph.
//! Every transfer contributes weight 1, so parallel edges strengthen the
//! tie between two addresses.
//!
//! ## Algorithm Overview
//!
//! 1. **Local Moving Phase**: Visit nodes in seeded random order and move
//!    each into the neighbouring community with the largest positive
//!    modularity gain
//! 2. **Aggregation Phase**: Collapse communities into super-nodes
//! 3. **Repeat**: Until a level no longer improves modularity
//!
//! ## Modularity
//!
//! Q = Σc [ in_c / m - γ (tot_c / 2m)² ]
//!
//! Where:
//! - in_c = weight of edges inside community c
//! - tot_c = sum of degrees of nodes in c
//! - m = total edge weight
//! - γ = resolution
//!
//! Nodes are indexed in lexical address order. Ties between equally good
//! target communities go to the smallest community index, so a fixed seed
//! always yields the same partition.

use crate::errors::{GraphError, GraphResult};
use crate::graph::TransferGraph;
use crate::types::CommunitySummary;
use crate::utils::colour::community_colour;
use crate::utils::math::safe_percentage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Minimum modularity improvement for another pass or level
const MIN_IMPROVEMENT: f64 = 1e-7;

/// Partitioner configuration
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    /// Resolution parameter (higher = more, smaller communities)
    pub resolution: f64,
    /// Seed for the node visiting order
    pub seed: u64,
    /// Maximum number of aggregation levels
    pub max_levels: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 42,
            max_levels: 32,
        }
    }
}

/// Mapping from address to community id
///
/// Community ids are contiguous from 0, numbered by the lexically smallest
/// member address.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    assignments: BTreeMap<String, u32>,
    community_count: u32,
    modularity: f64,
}

impl Partition {
    pub fn get(&self, address: &str) -> Option<u32> {
        self.assignments.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn community_count(&self) -> u32 {
        self.community_count
    }

    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    /// (address, community) pairs in lexical address order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.assignments.iter().map(|(a, &c)| (a.as_str(), c))
    }

    /// Members of each community, in lexical order
    pub fn communities(&self) -> BTreeMap<u32, Vec<&str>> {
        let mut communities: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
        for (address, community) in self.iter() {
            communities.entry(community).or_default().push(address);
        }
        communities
    }

    /// Per-community summaries, largest community first
    pub fn summaries(&self) -> Vec<CommunitySummary> {
        let total = self.len();
        let mut summaries: Vec<CommunitySummary> = self
            .communities()
            .into_iter()
            .map(|(community, members)| CommunitySummary {
                community,
                size: members.len(),
                percentage_of_nodes: safe_percentage(members.len(), total),
                colour: community_colour(community),
                representative: members.first().map(|m| m.to_string()).unwrap_or_default(),
            })
            .collect();
        summaries.sort_by(|a, b| b.size.cmp(&a.size).then(a.community.cmp(&b.community)));
        summaries
    }
}

/// Weighted undirected graph used at each aggregation level
#[derive(Debug, Clone)]
struct LevelGraph {
    /// Symmetric adjacency without self-loops
    adjacency: Vec<BTreeMap<usize, f64>>,
    /// Self-loop weight per node
    loops: Vec<f64>,
}

impl LevelGraph {
    fn from_transfer_graph(graph: &TransferGraph, index: &HashMap<&str, usize>) -> Self {
        let n = index.len();
        let mut level = Self {
            adjacency: vec![BTreeMap::new(); n],
            loops: vec![0.0; n],
        };

        for edge in graph.edges() {
            let a = index[edge.source];
            let b = index[edge.target];
            level.add_edge(a, b, 1.0);
        }

        level
    }

    fn add_edge(&mut self, a: usize, b: usize, weight: f64) {
        if a == b {
            self.loops[a] += weight;
        } else {
            *self.adjacency[a].entry(b).or_insert(0.0) += weight;
            *self.adjacency[b].entry(a).or_insert(0.0) += weight;
        }
    }

    fn len(&self) -> usize {
        self.loops.len()
    }

    fn degree(&self, node: usize) -> f64 {
        self.adjacency[node].values().sum::<f64>() + 2.0 * self.loops[node]
    }

    fn total_weight(&self) -> f64 {
        let degree_sum: f64 = (0..self.len()).map(|node| self.degree(node)).sum();
        degree_sum / 2.0
    }

    /// Collapse each community into a single node
    fn aggregate(&self, communities: &[usize], community_count: usize) -> Self {
        let mut next = Self {
            adjacency: vec![BTreeMap::new(); community_count],
            loops: vec![0.0; community_count],
        };

        for node in 0..self.len() {
            let c = communities[node];
            next.loops[c] += self.loops[node];
            for (&neighbour, &weight) in &self.adjacency[node] {
                // Each undirected edge is stored twice; take it once
                if neighbour > node {
                    next.add_edge(c, communities[neighbour], weight);
                }
            }
        }

        next
    }
}

/// Louvain community detection
pub struct LouvainPartitioner {
    config: PartitionConfig,
}

impl LouvainPartitioner {
    pub fn new() -> Self {
        Self {
            config: PartitionConfig::default(),
        }
    }

    pub fn with_config(config: PartitionConfig) -> Self {
        Self { config }
    }

    /// Assign every node of the graph to a community
    pub fn partition(&self, graph: &TransferGraph) -> GraphResult<Partition> {
        if graph.is_empty() {
            return Err(GraphError::InvalidGraph(
                "cannot partition a graph with no nodes".to_string(),
            ));
        }

        let addresses = graph.sorted_nodes();
        let index: HashMap<&str, usize> = addresses
            .iter()
            .enumerate()
            .map(|(i, &address)| (address, i))
            .collect();

        let mut level = LevelGraph::from_transfer_graph(graph, &index);
        let total_weight = level.total_weight();

        // membership[original node] = community at the current level
        let mut membership: Vec<usize> = (0..addresses.len()).collect();

        if total_weight == 0.0 {
            // No edges: every node is its own community
            return Ok(self.finish(&addresses, &membership, 0.0));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut modularity = self.modularity(&level, &identity(level.len()), total_weight);

        for depth in 0..self.config.max_levels {
            let mut communities = identity(level.len());
            let moved = self.local_moving_phase(&level, &mut communities, total_weight, &mut rng);
            let (communities, community_count) = renumber(&communities);
            let new_modularity = self.modularity(&level, &communities, total_weight);

            debug!(
                "Level {}: {} nodes -> {} communities, modularity {:.6}",
                depth,
                level.len(),
                community_count,
                new_modularity
            );

            if !moved || new_modularity - modularity < MIN_IMPROVEMENT {
                break;
            }

            for community in membership.iter_mut() {
                *community = communities[*community];
            }
            modularity = new_modularity;
            level = level.aggregate(&communities, community_count);
        }

        let partition = self.finish(&addresses, &membership, modularity);
        info!(
            "Detected {} communities (modularity {:.4})",
            partition.community_count(),
            partition.modularity()
        );
        Ok(partition)
    }

    /// Local moving phase: move nodes to maximise modularity gain
    ///
    /// Returns true if any node changed community.
    fn local_moving_phase(
        &self,
        level: &LevelGraph,
        communities: &mut [usize],
        total_weight: f64,
        rng: &mut StdRng,
    ) -> bool {
        let n = level.len();
        let resolution = self.config.resolution;
        let two_m = 2.0 * total_weight;

        let degrees: Vec<f64> = (0..n).map(|node| level.degree(node)).collect();
        let mut community_degree: Vec<f64> = vec![0.0; n];
        for node in 0..n {
            community_degree[communities[node]] += degrees[node];
        }

        let mut order: Vec<usize> = (0..n).collect();
        let mut any_moved = false;
        let mut current = self.modularity(level, communities, total_weight);

        loop {
            order.shuffle(rng);
            let mut moved = false;

            for &node in &order {
                let own = communities[node];
                let node_degree = degrees[node];

                // Edge weight from node to each neighbouring community
                let mut neighbour_weights: BTreeMap<usize, f64> = BTreeMap::new();
                for (&neighbour, &weight) in &level.adjacency[node] {
                    *neighbour_weights.entry(communities[neighbour]).or_insert(0.0) += weight;
                }

                // Take the node out of its community
                community_degree[own] -= node_degree;
                let remove_cost = -neighbour_weights.get(&own).copied().unwrap_or(0.0)
                    + resolution * community_degree[own] * node_degree / two_m;

                let mut best_community = own;
                let mut best_gain = 0.0;
                for (&community, &weight) in &neighbour_weights {
                    let gain = remove_cost + weight
                        - resolution * community_degree[community] * node_degree / two_m;
                    // Strict comparison keeps the smallest index on ties
                    if gain > best_gain {
                        best_gain = gain;
                        best_community = community;
                    }
                }

                community_degree[best_community] += node_degree;
                if best_community != own {
                    communities[node] = best_community;
                    moved = true;
                    any_moved = true;
                }
            }

            let updated = self.modularity(level, communities, total_weight);
            if !moved || updated - current < MIN_IMPROVEMENT {
                break;
            }
            current = updated;
        }

        any_moved
    }

    /// Compute total modularity of an assignment on a level graph
    fn modularity(&self, level: &LevelGraph, communities: &[usize], total_weight: f64) -> f64 {
        if total_weight == 0.0 {
            return 0.0;
        }

        let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
        let mut degree: BTreeMap<usize, f64> = BTreeMap::new();

        for node in 0..level.len() {
            let c = communities[node];
            *degree.entry(c).or_insert(0.0) += level.degree(node);
            *internal.entry(c).or_insert(0.0) += level.loops[node];
            for (&neighbour, &weight) in &level.adjacency[node] {
                if neighbour > node && communities[neighbour] == c {
                    *internal.entry(c).or_insert(0.0) += weight;
                }
            }
        }

        degree
            .iter()
            .map(|(c, &tot)| {
                let inside = internal.get(c).copied().unwrap_or(0.0);
                inside / total_weight
                    - self.config.resolution * (tot / (2.0 * total_weight)).powi(2)
            })
            .sum()
    }

    /// Renumber by smallest member address and build the public partition
    fn finish(&self, addresses: &[&str], membership: &[usize], modularity: f64) -> Partition {
        // addresses are sorted, so first appearance = smallest member
        let (final_ids, community_count) = renumber(membership);

        let assignments = addresses
            .iter()
            .zip(final_ids)
            .map(|(address, community)| (address.to_string(), community as u32))
            .collect();

        Partition {
            assignments,
            community_count: community_count as u32,
            modularity,
        }
    }
}

impl Default for LouvainPartitioner {
    fn default() -> Self {
        Self::new()
    }
}

fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Renumber communities to be contiguous, in order of first appearance
fn renumber(communities: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let mut next_id = 0usize;

    let renumbered = communities
        .iter()
        .map(|&c| {
            *mapping.entry(c).or_insert_with(|| {
                let id = next_id;
                next_id += 1;
                id
            })
        })
        .collect();

    (renumbered, next_id)
}

/// Partition a graph with the given configuration
pub fn partition_graph(graph: &TransferGraph, config: &PartitionConfig) -> GraphResult<Partition> {
    LouvainPartitioner::with_config(config.clone()).partition(graph)
}
