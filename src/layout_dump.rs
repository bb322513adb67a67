use crate::layout::{SankeyLayout, curve_path};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub node_width: f32,
    pub curvature: f32,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub value: f32,
    pub breadth: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub source: String,
    pub target: String,
    pub value: f32,
    pub thickness: f32,
    pub source_offset: f32,
    pub target_offset: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub points: Vec<[f32; 2]>,
    pub path: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &SankeyLayout, curvature: f32) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                label: node.label.clone(),
                value: node.value,
                breadth: node.breadth,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
            })
            .collect();

        let links = layout
            .links
            .iter()
            .enumerate()
            .map(|(idx, link)| {
                let curve = curve_path(layout, idx, curvature);
                LinkDump {
                    source: layout.nodes[link.source].id.clone(),
                    target: layout.nodes[link.target].id.clone(),
                    value: link.value,
                    thickness: link.thickness,
                    source_offset: link.source_offset,
                    target_offset: link.target_offset,
                    row: link.row,
                    points: curve
                        .map(|c| c.points().iter().map(|(x, y)| [*x, *y]).collect())
                        .unwrap_or_default(),
                    path: curve.map(|c| c.to_svg_path()).unwrap_or_default(),
                }
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            node_width: layout.node_width,
            curvature,
            nodes,
            links,
        }
    }
}

/// Writes the layout as pretty JSON to `path`, or stdout when `None`.
pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &SankeyLayout,
    curvature: f32,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, curvature);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SankeyConfig;
    use crate::ir::SankeyGraph;
    use crate::layout::compute_sankey_layout;

    #[test]
    fn dump_names_link_endpoints() {
        let graph = SankeyGraph::from_flows([("A", "B", 3.0)]);
        let layout = compute_sankey_layout(&graph, &SankeyConfig::default()).unwrap();
        let dump = LayoutDump::from_layout(&layout, 0.5);
        assert_eq!(dump.links[0].source, "A");
        assert_eq!(dump.links[0].target, "B");
        assert_eq!(dump.links[0].points.len(), 4);
        assert!(dump.links[0].path.starts_with('M'));

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["nodes"][1]["breadth"], 1);
        assert!(json["links"][0].get("row").is_none());
    }
}
