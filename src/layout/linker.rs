use std::collections::HashMap;

use crate::ir::{Endpoint, SankeyGraph};

use super::{LayoutError, SankeyLink, SankeyNode};

/// Builds the node/link arena: resolves every link endpoint to a node index
/// once and fills each node's outgoing/incoming adjacency in link order.
pub(super) fn link_graph(
    graph: &SankeyGraph,
) -> Result<(Vec<SankeyNode>, Vec<SankeyLink>), LayoutError> {
    let mut id_to_idx: HashMap<&str, usize> = HashMap::with_capacity(graph.nodes.len());
    let mut nodes = Vec::with_capacity(graph.nodes.len());
    for (idx, spec) in graph.nodes.iter().enumerate() {
        if id_to_idx.insert(spec.id.as_str(), idx).is_some() {
            return Err(LayoutError::DuplicateNode {
                id: spec.id.clone(),
            });
        }
        let label = spec.label.clone().unwrap_or_else(|| spec.id.clone());
        nodes.push(SankeyNode::new(spec.id.clone(), label));
    }

    let resolve = |link: usize, endpoint: &Endpoint| -> Result<usize, LayoutError> {
        match endpoint {
            Endpoint::Index(index) if *index < graph.nodes.len() => Ok(*index),
            Endpoint::Index(index) => Err(LayoutError::NodeIndex {
                link,
                index: *index,
                node_count: graph.nodes.len(),
            }),
            Endpoint::Name(name) => {
                id_to_idx
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| LayoutError::UnknownNode {
                        link,
                        name: name.clone(),
                    })
            }
        }
    };

    let mut links = Vec::with_capacity(graph.links.len());
    for (link_idx, spec) in graph.links.iter().enumerate() {
        let source = resolve(link_idx, &spec.source)?;
        let target = resolve(link_idx, &spec.target)?;
        if source == target {
            return Err(LayoutError::SelfLoop {
                link: link_idx,
                node: nodes[source].id.clone(),
            });
        }
        if !spec.value.is_finite() || spec.value < 0.0 {
            return Err(LayoutError::InvalidValue {
                link: link_idx,
                value: spec.value,
            });
        }
        nodes[source].outgoing.push(link_idx);
        nodes[target].incoming.push(link_idx);
        links.push(SankeyLink::new(source, target, spec.value, spec.row));
    }

    Ok((nodes, links))
}
