//! Layout Engine
//!
//! Fruchterman-Reingold force-directed placement. All nodes repel each
//! other with force k²/d, connected nodes attract with force w·d²/k, and
//! the maximum step size cools linearly over the iteration budget.
//! Positions are finally centred and scaled into [-1, 1].

use crate::errors::{GraphError, GraphResult};
use crate::graph::TransferGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Distances below this are clamped to avoid infinite repulsion
const MIN_DISTANCE: f64 = 0.01;

/// Layout configuration
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Maximum number of simulation steps
    pub iterations: usize,
    /// Stop early when mean displacement per node falls below this
    pub threshold: f64,
    /// Seed for initial placement
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            threshold: 1e-4,
            seed: 42,
        }
    }
}

/// 2-D coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Mapping from address to position
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    positions: BTreeMap<String, Position>,
}

impl Layout {
    pub fn get(&self, address: &str) -> Option<Position> {
        self.positions.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
        self.positions.iter().map(|(a, &p)| (a.as_str(), p))
    }
}

/// Compute a spring layout for every node of the graph
pub fn spring_layout(graph: &TransferGraph, config: &LayoutConfig) -> GraphResult<Layout> {
    if graph.is_empty() {
        return Err(GraphError::InvalidGraph(
            "cannot lay out a graph with no nodes".to_string(),
        ));
    }

    let addresses = graph.sorted_nodes();
    let n = addresses.len();

    if n == 1 {
        let positions = addresses
            .iter()
            .map(|address| (address.to_string(), Position { x: 0.0, y: 0.0 }))
            .collect();
        return Ok(Layout { positions });
    }

    let index: HashMap<&str, usize> = addresses
        .iter()
        .enumerate()
        .map(|(i, &address)| (address, i))
        .collect();

    // Attraction weights: number of transfers between each pair
    let mut weights: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
    for edge in graph.edges() {
        let a = index[edge.source];
        let b = index[edge.target];
        if a != b {
            *weights[a].entry(b).or_insert(0.0) += 1.0;
            *weights[b].entry(a).or_insert(0.0) += 1.0;
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut positions: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();

    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1 * extent(&positions);
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for iteration in 0..config.iterations {
        let mut displacement = vec![[0.0f64; 2]; n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = positions[i][0] - positions[j][0];
                let dy = positions[i][1] - positions[j][1];
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let attraction = weights[i].get(&j).copied().unwrap_or(0.0);
                let force = k * k / (distance * distance) - attraction * distance / k;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }

        let mut total_step = 0.0;
        for (position, delta) in positions.iter_mut().zip(&displacement) {
            let mut length = (delta[0] * delta[0] + delta[1] * delta[1]).sqrt();
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            let step_x = delta[0] * temperature / length;
            let step_y = delta[1] * temperature / length;
            position[0] += step_x;
            position[1] += step_y;
            total_step += (step_x * step_x + step_y * step_y).sqrt();
        }

        temperature -= cooling;
        if total_step / (n as f64) < config.threshold {
            debug!("Layout converged after {} iterations", iteration + 1);
            break;
        }
    }

    rescale(&mut positions);

    let positions: BTreeMap<String, Position> = addresses
        .iter()
        .zip(&positions)
        .map(|(address, p)| {
            let position = Position { x: p[0], y: p[1] };
            let position = if position.is_finite() {
                position
            } else {
                Position { x: 0.0, y: 0.0 }
            };
            (address.to_string(), position)
        })
        .collect();

    info!("Computed spring layout for {} nodes", positions.len());
    Ok(Layout { positions })
}

/// Largest side of the bounding box
fn extent(positions: &[[f64; 2]]) -> f64 {
    (0..2)
        .map(|axis| {
            let (min, max) = positions.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
            max - min
        })
        .fold(0.0, f64::max)
}

/// Centre on the mean and scale so the largest absolute coordinate is 1
fn rescale(positions: &mut [[f64; 2]]) {
    let n = positions.len() as f64;
    for axis in 0..2 {
        let mean = positions.iter().map(|p| p[axis]).sum::<f64>() / n;
        for p in positions.iter_mut() {
            p[axis] -= mean;
        }
    }

    let limit = positions
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0, f64::max);

    if limit > 0.0 && limit.is_finite() {
        for p in positions.iter_mut() {
            p[0] /= limit;
            p[1] /= limit;
        }
    }
}
