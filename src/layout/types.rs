use serde::Serialize;

/// A node of a laid out diagram. `y` is the node's depth (top edge) and
/// `height` its vertical extent; `x`/`width` come from its column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNode {
    pub id: String,
    pub label: String,
    /// Throughput: the larger of total outgoing and total incoming flow.
    pub value: f32,
    /// Column index, 0-based.
    pub breadth: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Outgoing link indices, in stacking order once laid out.
    pub outgoing: Vec<usize>,
    /// Incoming link indices, in stacking order once laid out.
    pub incoming: Vec<usize>,
}

impl SankeyNode {
    pub(crate) fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            value: 0.0,
            breadth: 0,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    pub fn center(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn is_source(&self) -> bool {
        self.incoming.is_empty()
    }

    pub fn is_sink(&self) -> bool {
        self.outgoing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    /// Index of the source node.
    pub source: usize,
    /// Index of the target node.
    pub target: usize,
    pub value: f32,
    pub thickness: f32,
    /// Offset of this link's band from the source node's top edge.
    pub source_offset: f32,
    /// Offset of this link's band from the target node's top edge.
    pub target_offset: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl SankeyLink {
    pub(crate) fn new(source: usize, target: usize, value: f32, row: Option<usize>) -> Self {
        Self {
            source,
            target,
            value,
            thickness: 0.0,
            source_offset: 0.0,
            target_offset: 0.0,
            row,
        }
    }
}

/// Result of a layout call: the node/link arena enriched with geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLayout {
    pub width: f32,
    pub height: f32,
    pub node_width: f32,
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

impl SankeyLayout {
    pub fn empty(width: f32, height: f32, node_width: f32) -> Self {
        Self {
            width,
            height,
            node_width,
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&SankeyNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn column_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.breadth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Node indices grouped by column, each column in array order.
    pub fn columns(&self) -> Vec<Vec<usize>> {
        let mut columns = vec![Vec::new(); self.column_count()];
        for (idx, node) in self.nodes.iter().enumerate() {
            columns[node.breadth].push(idx);
        }
        columns
    }
}
