//! Mathematical utility functions for graph statistics
//!
//! Ratio helpers with explicit zero-division handling so that degenerate
//! graphs never produce NaN or infinite statistics.

use bigdecimal::{BigDecimal, ToPrimitive};

/// Calculate percentage safely for usize values, returning 0.0 if total is zero.
///
/// # Examples
/// ```
/// use token_flow_graph::utils::math::safe_percentage;
///
/// assert_eq!(safe_percentage(50, 100), 50.0);
/// assert_eq!(safe_percentage(1, 4), 25.0);
/// assert_eq!(safe_percentage(50, 0), 0.0);  // Zero-division guard
/// ```
#[inline]
pub fn safe_percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Density of an undirected graph: `2E / (N(N - 1))`
///
/// Returns 0.0 for graphs with fewer than two nodes. Parallel edges are
/// counted individually, so multigraphs may exceed 1.0.
///
/// # Examples
/// ```
/// use token_flow_graph::utils::math::undirected_density;
///
/// assert_eq!(undirected_density(3, 3), 1.0);
/// assert_eq!(undirected_density(4, 3), 0.5);
/// assert_eq!(undirected_density(1, 1), 0.0);
/// ```
#[inline]
pub fn undirected_density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        0.0
    } else {
        (2 * edges) as f64 / (nodes as f64 * (nodes - 1) as f64)
    }
}

/// Mean degree: sum of degrees divided by node count, 0.0 for an empty graph
#[inline]
pub fn mean_degree(total_degree: usize, nodes: usize) -> f64 {
    if nodes == 0 {
        0.0
    } else {
        total_degree as f64 / nodes as f64
    }
}

/// Lossy conversion of an exact token amount to a finite `f64`
///
/// Amounts beyond the `f64` range saturate at `f64::MAX`.
pub fn decimal_to_f64(value: &BigDecimal) -> f64 {
    match value.to_f64() {
        Some(v) if v.is_finite() => v,
        Some(v) if v.is_sign_negative() => f64::MIN,
        _ => f64::MAX,
    }
}
