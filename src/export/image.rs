//! Image Renderer
//!
//! Draws the laid-out graph to a PNG: edges as thin half-transparent
//! lines, nodes as small filled circles coloured by community.

use crate::errors::{ExportError, ExportResult};
use crate::graph::{Layout, Partition, Position, TransferGraph};
use crate::utils::colour::community_rgb;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Node marker radius in pixels
const NODE_RADIUS: i32 = 3;

/// Edge line opacity
const EDGE_OPACITY: f64 = 0.5;

/// Fraction of each canvas side kept free around the drawing
const MARGIN_FRACTION: f64 = 0.05;

/// Rendering parameters
#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Maps layout coordinates in [-1, 1] onto canvas pixels
#[derive(Debug, Clone, Copy)]
struct CanvasMapping {
    width: f64,
    height: f64,
    margin_x: f64,
    margin_y: f64,
}

impl CanvasMapping {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            margin_x: width as f64 * MARGIN_FRACTION,
            margin_y: height as f64 * MARGIN_FRACTION,
        }
    }

    fn to_pixel(&self, position: Position) -> (i32, i32) {
        let usable_x = self.width - 2.0 * self.margin_x;
        let usable_y = self.height - 2.0 * self.margin_y;
        let px = self.margin_x + (position.x.clamp(-1.0, 1.0) + 1.0) / 2.0 * usable_x;
        // Screen y grows downwards
        let py = self.margin_y + (1.0 - position.y.clamp(-1.0, 1.0)) / 2.0 * usable_y;
        (px.round() as i32, py.round() as i32)
    }
}

fn render_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Render(err.to_string())
}

/// Render the graph to a PNG file
pub fn render_png(
    graph: &TransferGraph,
    partition: &Partition,
    layout: &Layout,
    options: &ImageOptions,
) -> ExportResult<()> {
    if options.width == 0 || options.height == 0 {
        return Err(ExportError::Render(format!(
            "Canvas must be non-empty, got {}x{}",
            options.width, options.height
        )));
    }
    if let Some(parent) = options.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mapping = CanvasMapping::new(options.width, options.height);
    let root =
        BitMapBackend::new(&options.path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let edge_style = BLACK.mix(EDGE_OPACITY).stroke_width(1);
    for edge in graph.edges() {
        if edge.source == edge.target {
            continue;
        }
        if let (Some(a), Some(b)) = (layout.get(edge.source), layout.get(edge.target)) {
            root.draw(&PathElement::new(
                vec![mapping.to_pixel(a), mapping.to_pixel(b)],
                edge_style,
            ))
            .map_err(render_error)?;
        }
    }

    for (address, position) in layout.iter() {
        let [r, g, b] = partition
            .get(address)
            .map(community_rgb)
            .unwrap_or([0x99, 0x99, 0x99]);
        root.draw(&Circle::new(
            mapping.to_pixel(position),
            NODE_RADIUS,
            RGBColor(r, g, b).filled(),
        ))
        .map_err(render_error)?;
    }

    root.present().map_err(render_error)?;
    info!(
        "Rendered {}x{} graph image to {}",
        options.width,
        options.height,
        options.path.display()
    );
    Ok(())
}
