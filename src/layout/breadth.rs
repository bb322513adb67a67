use super::{LayoutError, SankeyLink, SankeyNode};

/// Assigns every node a column and its horizontal geometry.
///
/// Layering starts with all nodes in column 0 and repeatedly advances the
/// targets of the current frontier by one column, so a node ends up in the
/// deepest layer at which it is reached. Sinks are then pulled into the last
/// column. Returns the index of that last column.
pub(super) fn compute_node_breadths(
    nodes: &mut [SankeyNode],
    links: &[SankeyLink],
    width: f32,
    node_width: f32,
) -> Result<usize, LayoutError> {
    let node_count = nodes.len();
    let mut frontier: Vec<usize> = (0..node_count).collect();
    let mut queued = vec![false; node_count];
    let mut layer = 0usize;

    while !frontier.is_empty() {
        // On a DAG no path is longer than node_count - 1 links.
        if layer >= node_count {
            let on_cycle = find_cycle_node(nodes, links, &frontier).unwrap_or(frontier[0]);
            let node = nodes[on_cycle].id.clone();
            return Err(LayoutError::Cycle { node });
        }
        let mut next = Vec::new();
        for &idx in &frontier {
            nodes[idx].breadth = layer;
            for &link_idx in &nodes[idx].outgoing {
                let target = links[link_idx].target;
                if !queued[target] {
                    queued[target] = true;
                    next.push(target);
                }
            }
        }
        for &idx in &next {
            queued[idx] = false;
        }
        frontier = next;
        layer += 1;
    }

    let max_breadth = layer.saturating_sub(1);
    for node in nodes.iter_mut() {
        if node.is_sink() {
            node.breadth = max_breadth;
        }
    }

    let kx = if max_breadth > 0 {
        (width - node_width) / max_breadth as f32
    } else {
        0.0
    };
    for node in nodes.iter_mut() {
        node.x = node.breadth as f32 * kx;
        node.width = node_width;
    }

    Ok(max_breadth)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Depth-first search for a back edge, starting from `starts` and then from
/// every other node. Returns the node the back edge points to, which lies on
/// a cycle.
fn find_cycle_node(
    nodes: &[SankeyNode],
    links: &[SankeyLink],
    starts: &[usize],
) -> Option<usize> {
    let mut visit = vec![Visit::New; nodes.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for start in starts.iter().copied().chain(0..nodes.len()) {
        if visit[start] != Visit::New {
            continue;
        }
        visit[start] = Visit::Active;
        stack.push((start, 0));
        while let Some(top) = stack.last_mut() {
            let (idx, next) = *top;
            let Some(&link_idx) = nodes[idx].outgoing.get(next) else {
                visit[idx] = Visit::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;
            let target = links[link_idx].target;
            match visit[target] {
                Visit::Active => return Some(target),
                Visit::New => {
                    visit[target] = Visit::Active;
                    stack.push((target, 0));
                }
                Visit::Done => {}
            }
        }
    }
    None
}
