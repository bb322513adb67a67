use super::{SankeyLink, SankeyNode};

/// Orders each node's links by the centre of the node at their far end and
/// stacks them top-down from the node's top edge.
///
/// Only node positions and link thicknesses are read, so this is safe to
/// rerun after a caller moves nodes vertically.
pub(super) fn compute_link_depths(nodes: &mut [SankeyNode], links: &mut [SankeyLink]) {
    let centers: Vec<f32> = nodes.iter().map(SankeyNode::center).collect();
    for node in nodes.iter_mut() {
        node.outgoing
            .sort_by(|&a, &b| centers[links[a].target].total_cmp(&centers[links[b].target]));
        node.incoming
            .sort_by(|&a, &b| centers[links[a].source].total_cmp(&centers[links[b].source]));
    }

    for node in nodes.iter() {
        let mut sy = 0.0f32;
        for &link_idx in &node.outgoing {
            let link = &mut links[link_idx];
            link.source_offset = sy;
            sy += link.thickness;
        }
        let mut ty = 0.0f32;
        for &link_idx in &node.incoming {
            let link = &mut links[link_idx];
            link.target_offset = ty;
            ty += link.thickness;
        }
    }
}
