//! Sankey layout engine.
//!
//! [`compute_sankey_layout`] runs the full pipeline once: link resolution,
//! node values, columns, depth relaxation and link stacking. After moving
//! nodes vertically, [`SankeyLayout::relayout`] redoes only the stacking.

mod breadth;
mod curve;
mod depth;
mod error;
mod links;
mod linker;
pub(crate) mod types;
mod values;

pub use curve::{CurvePath, DEFAULT_CURVATURE, curve_path};
pub use error::LayoutError;
pub use types::*;

use crate::config::SankeyConfig;
use crate::ir::SankeyGraph;

use breadth::compute_node_breadths;
use depth::{DepthParams, compute_node_depths};
use linker::link_graph;
use links::compute_link_depths;
use values::compute_node_values;

/// Lays out `graph` on a `config.width` x `config.height` canvas.
///
/// The graph must be acyclic, without self-loops, with finite non-negative
/// link values and endpoints that name existing nodes; violations are
/// returned as [`LayoutError`]s and nothing is laid out.
pub fn compute_sankey_layout(
    graph: &SankeyGraph,
    config: &SankeyConfig,
) -> Result<SankeyLayout, LayoutError> {
    config.validate()?;
    let (mut nodes, mut links) = link_graph(graph)?;
    if nodes.is_empty() {
        return Ok(SankeyLayout::empty(
            config.width,
            config.height,
            config.node_width,
        ));
    }

    compute_node_values(&mut nodes, &links);
    let max_breadth = compute_node_breadths(&mut nodes, &links, config.width, config.node_width)?;
    let ky = compute_node_depths(
        &mut nodes,
        &mut links,
        max_breadth + 1,
        DepthParams {
            height: config.height,
            padding: config.node_padding,
            iterations: config.iterations,
        },
    )?;
    compute_link_depths(&mut nodes, &mut links);

    tracing::debug!(
        nodes = nodes.len(),
        links = links.len(),
        columns = max_breadth + 1,
        ky,
        "computed sankey layout"
    );

    Ok(SankeyLayout {
        width: config.width,
        height: config.height,
        node_width: config.node_width,
        nodes,
        links,
    })
}

impl SankeyLayout {
    /// Restacks link offsets from the current node positions without
    /// touching columns, values or depths.
    pub fn relayout(&mut self) {
        compute_link_depths(&mut self.nodes, &mut self.links);
    }

    /// Moves node `index` to depth `y`, clamped so it stays on the canvas,
    /// and restacks links. Returns the depth actually applied. A non-finite
    /// `y` is rejected and leaves the layout untouched.
    pub fn move_node(&mut self, index: usize, y: f32) -> Result<f32, LayoutError> {
        if !y.is_finite() {
            return Err(LayoutError::InvalidDepth { index, y });
        }
        let node_count = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(LayoutError::NoSuchNode { index, node_count })?;
        let max_y = (self.height - node.height).max(0.0);
        node.y = y.clamp(0.0, max_y);
        let applied = node.y;
        self.relayout();
        Ok(applied)
    }

    /// Curves for every link, in link order.
    pub fn link_paths(&self, curvature: f32) -> Vec<CurvePath> {
        (0..self.links.len())
            .filter_map(|idx| curve_path(self, idx, curvature))
            .collect()
    }
}
