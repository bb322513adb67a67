use std::cmp::Ordering;

use super::{LayoutError, SankeyLink, SankeyNode};

/// Vertical placement parameters for the relaxation.
#[derive(Debug, Clone, Copy)]
pub(super) struct DepthParams {
    pub height: f32,
    pub padding: f32,
    pub iterations: usize,
}

/// Assigns node `y`/`height` and link thickness, then relaxes node centres
/// toward their neighbours for `iterations` rounds. Returns the vertical
/// scale (units per flow value).
///
/// Fails when a column's gaps alone are taller than the canvas.
pub(super) fn compute_node_depths(
    nodes: &mut [SankeyNode],
    links: &mut [SankeyLink],
    column_count: usize,
    params: DepthParams,
) -> Result<f32, LayoutError> {
    let mut by_breadth: Vec<Vec<usize>> = vec![Vec::new(); column_count];
    for (idx, node) in nodes.iter().enumerate() {
        by_breadth[node.breadth].push(idx);
    }

    let ky = column_scale(nodes, &by_breadth, params)?;
    initialize_node_depths(nodes, links, &by_breadth, ky);
    resolve_collisions(nodes, &mut by_breadth, params);

    let mut alpha = 1.0f32;
    for round in 0..params.iterations {
        alpha *= 0.99;
        relax_right_to_left(nodes, links, &by_breadth, alpha);
        resolve_collisions(nodes, &mut by_breadth, params);
        relax_left_to_right(nodes, links, &by_breadth, alpha);
        resolve_collisions(nodes, &mut by_breadth, params);
        tracing::trace!(round, alpha, "sankey relaxation round");
    }

    Ok(ky)
}

/// Smallest per-column scale, so the most crowded column exactly fills the
/// canvas. Columns carrying no flow do not constrain the scale.
fn column_scale(
    nodes: &[SankeyNode],
    by_breadth: &[Vec<usize>],
    params: DepthParams,
) -> Result<f32, LayoutError> {
    let mut ky = f32::INFINITY;
    for (breadth, column) in by_breadth.iter().enumerate() {
        let gaps = column.len().saturating_sub(1) as f32 * params.padding;
        if gaps > params.height {
            return Err(LayoutError::ColumnOverflow {
                breadth,
                nodes: column.len(),
                padding: params.padding,
                height: params.height,
            });
        }
        let total: f32 = column.iter().map(|&idx| nodes[idx].value).sum();
        if total > 0.0 {
            ky = ky.min((params.height - gaps) / total);
        }
    }
    Ok(if ky.is_finite() { ky } else { 0.0 })
}

fn initialize_node_depths(
    nodes: &mut [SankeyNode],
    links: &mut [SankeyLink],
    by_breadth: &[Vec<usize>],
    ky: f32,
) {
    for column in by_breadth {
        for (i, &idx) in column.iter().enumerate() {
            let node = &mut nodes[idx];
            node.y = i as f32;
            node.height = node.value * ky;
        }
    }
    for link in links.iter_mut() {
        link.thickness = link.value * ky;
    }
}

fn weighted_center<'a>(
    nodes: &[SankeyNode],
    links: &[SankeyLink],
    link_ids: impl Iterator<Item = &'a usize>,
    neighbour: impl Fn(&SankeyLink) -> usize,
) -> Option<f32> {
    let mut weighted = 0.0f32;
    let mut total = 0.0f32;
    for &link_idx in link_ids {
        let link = &links[link_idx];
        weighted += nodes[neighbour(link)].center() * link.value;
        total += link.value;
    }
    (total > 0.0).then(|| weighted / total)
}

fn relax_right_to_left(
    nodes: &mut [SankeyNode],
    links: &[SankeyLink],
    by_breadth: &[Vec<usize>],
    alpha: f32,
) {
    for column in by_breadth.iter().rev() {
        for &idx in column {
            let target_center =
                weighted_center(nodes, links, nodes[idx].outgoing.iter(), |link| link.target);
            if let Some(y) = target_center {
                let node = &mut nodes[idx];
                node.y += (y - node.center()) * alpha;
            }
        }
    }
}

fn relax_left_to_right(
    nodes: &mut [SankeyNode],
    links: &[SankeyLink],
    by_breadth: &[Vec<usize>],
    alpha: f32,
) {
    for column in by_breadth {
        for &idx in column {
            let source_center =
                weighted_center(nodes, links, nodes[idx].incoming.iter(), |link| link.source);
            if let Some(y) = source_center {
                let node = &mut nodes[idx];
                node.y += (y - node.center()) * alpha;
            }
        }
    }
}

/// Separates overlapping nodes within each column, keeping `padding` between
/// neighbours and the whole stack inside `[0, height]`.
///
/// Nodes are walked by ascending depth; equal depths keep node array order.
fn resolve_collisions(
    nodes: &mut [SankeyNode],
    by_breadth: &mut [Vec<usize>],
    params: DepthParams,
) {
    for column in by_breadth.iter_mut() {
        column.sort_by(|&a, &b| {
            nodes[a]
                .y
                .partial_cmp(&nodes[b].y)
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });

        // Push any overlapping nodes down.
        let mut y0 = 0.0f32;
        for &idx in column.iter() {
            let node = &mut nodes[idx];
            let dy = y0 - node.y;
            if dy > 0.0 {
                node.y += dy;
            }
            y0 = node.y + node.height + params.padding;
        }

        // If the bottommost node leaves the canvas, push the stack back up.
        let Some((&last, rest)) = column.split_last() else {
            continue;
        };
        let dy = y0 - params.padding - params.height;
        if dy > 0.0 {
            let node = &mut nodes[last];
            node.y = (node.y - dy).max(0.0);
            y0 = node.y;
            for &idx in rest.iter().rev() {
                let node = &mut nodes[idx];
                let dy = node.y + node.height + params.padding - y0;
                if dy > 0.0 {
                    node.y = (node.y - dy).max(0.0);
                }
                y0 = node.y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::breadth::compute_node_breadths;
    use super::super::linker::link_graph;
    use super::super::values::compute_node_values;
    use super::*;
    use crate::ir::SankeyGraph;

    const EPS: f32 = 1e-3;

    fn run(graph: &SankeyGraph, params: DepthParams) -> (Vec<SankeyNode>, Vec<SankeyLink>, f32) {
        let (mut nodes, mut links) = link_graph(graph).unwrap();
        compute_node_values(&mut nodes, &links);
        let max = compute_node_breadths(&mut nodes, &links, 500.0, 10.0).unwrap();
        let ky = compute_node_depths(&mut nodes, &mut links, max + 1, params).unwrap();
        (nodes, links, ky)
    }

    fn params() -> DepthParams {
        DepthParams {
            height: 200.0,
            padding: 10.0,
            iterations: 32,
        }
    }

    #[test]
    fn scale_fits_most_crowded_column() {
        // Column 1 holds B and C (values 6 and 4) plus one gap.
        let graph = SankeyGraph::from_flows([
            ("A", "B", 6.0),
            ("A", "C", 4.0),
            ("B", "D", 6.0),
            ("C", "D", 4.0),
        ]);
        let (nodes, links, ky) = run(&graph, params());
        assert!((ky - 19.0).abs() < EPS, "ky = {ky}");
        let b = &nodes[1];
        assert!((b.height - 6.0 * ky).abs() < EPS);
        assert!((links[0].thickness - 6.0 * ky).abs() < EPS);
    }

    #[test]
    fn same_column_nodes_do_not_overlap() {
        let graph = SankeyGraph::from_flows([
            ("A", "X", 3.0),
            ("A", "Y", 5.0),
            ("A", "Z", 2.0),
            ("B", "X", 4.0),
            ("B", "Z", 6.0),
        ]);
        let p = params();
        let (nodes, _, _) = run(&graph, p);
        let max_breadth = nodes.iter().map(|n| n.breadth).max().unwrap();
        for breadth in 0..=max_breadth {
            let mut column: Vec<&SankeyNode> =
                nodes.iter().filter(|n| n.breadth == breadth).collect();
            column.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
            for pair in column.windows(2) {
                assert!(
                    pair[0].y + pair[0].height + p.padding <= pair[1].y + EPS,
                    "{} overlaps {}",
                    pair[0].id,
                    pair[1].id
                );
            }
            for node in column {
                assert!(node.y >= -EPS);
                assert!(node.y + node.height <= p.height + EPS);
            }
        }
    }

    #[test]
    fn relaxation_aligns_single_chain() {
        let graph = SankeyGraph::from_flows([("A", "B", 5.0), ("B", "C", 5.0)]);
        let (nodes, _, _) = run(&graph, params());
        assert!((nodes[0].center() - nodes[1].center()).abs() < EPS);
        assert!((nodes[1].center() - nodes[2].center()).abs() < EPS);
    }

    #[test]
    fn zero_iterations_only_stacks() {
        let graph = SankeyGraph::from_flows([("A", "B", 1.0), ("A", "C", 1.0)]);
        let p = DepthParams {
            iterations: 0,
            ..params()
        };
        let (nodes, _, _) = run(&graph, p);
        // B starts at depth 0, C is pushed below it.
        assert_eq!(nodes[1].y, 0.0);
        assert!((nodes[2].y - (nodes[1].height + p.padding)).abs() < EPS);
    }

    #[test]
    fn zero_value_graph_has_zero_scale() {
        let mut graph = SankeyGraph::new();
        graph.ensure_node("alone", None);
        let (nodes, _, ky) = run(&graph, params());
        assert_eq!(ky, 0.0);
        assert_eq!(nodes[0].height, 0.0);
        assert_eq!(nodes[0].y, 0.0);
    }

    #[test]
    fn gaps_taller_than_canvas_are_rejected() {
        let flows: Vec<(String, f32)> = (0..10).map(|i| (format!("S{i}"), 1.0)).collect();
        let graph = SankeyGraph::from_flows(flows.iter().map(|(t, v)| ("A", t.as_str(), *v)));
        let (mut nodes, mut links) = link_graph(&graph).unwrap();
        compute_node_values(&mut nodes, &links);
        let max = compute_node_breadths(&mut nodes, &links, 500.0, 10.0).unwrap();
        let p = DepthParams {
            height: 500.0,
            padding: 60.0,
            iterations: 32,
        };
        let err = compute_node_depths(&mut nodes, &mut links, max + 1, p).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ColumnOverflow {
                breadth: 1,
                nodes: 10,
                padding: 60.0,
                height: 500.0
            }
        );
    }

    #[test]
    fn gaps_exactly_filling_canvas_are_accepted() {
        let graph = SankeyGraph::from_flows([("A", "B", 1.0), ("A", "C", 1.0)]);
        let p = DepthParams {
            height: 10.0,
            padding: 10.0,
            iterations: 4,
        };
        let (nodes, _, ky) = run(&graph, p);
        assert_eq!(ky, 0.0);
        let (top, bottom) = if nodes[1].y <= nodes[2].y {
            (&nodes[1], &nodes[2])
        } else {
            (&nodes[2], &nodes[1])
        };
        assert!(top.y.abs() < EPS);
        assert!((bottom.y - 10.0).abs() < EPS);
    }

    #[test]
    fn collision_ties_follow_node_order() {
        let mut nodes: Vec<SankeyNode> = ["P", "Q", "R"]
            .iter()
            .map(|id| {
                let mut node = SankeyNode::new(id.to_string(), id.to_string());
                node.height = 5.0;
                node
            })
            .collect();
        // Column listed out of array order, all nodes at the same depth.
        let mut by_breadth = vec![vec![2, 0, 1]];
        resolve_collisions(&mut nodes, &mut by_breadth, params());
        assert_eq!(by_breadth[0], vec![0, 1, 2]);
        assert_eq!(nodes[0].y, 0.0);
        assert_eq!(nodes[1].y, 15.0);
        assert_eq!(nodes[2].y, 30.0);
    }
}
