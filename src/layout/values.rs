use super::{SankeyLink, SankeyNode};

/// Sets each node's value to the larger of its outgoing and incoming totals.
pub(super) fn compute_node_values(nodes: &mut [SankeyNode], links: &[SankeyLink]) {
    for node in nodes.iter_mut() {
        let out_total: f32 = node.outgoing.iter().map(|&idx| links[idx].value).sum();
        let in_total: f32 = node.incoming.iter().map(|&idx| links[idx].value).sum();
        node.value = out_total.max(in_total);
    }
}
