use thiserror::Error;

/// Precondition violations detected before or during layout.
///
/// The engine never repairs bad input: a graph that fails here must be fixed
/// by the caller (usually the input adapter) and laid out again.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("link {link}: node index {index} out of range ({node_count} nodes)")]
    NodeIndex {
        link: usize,
        index: usize,
        node_count: usize,
    },
    #[error("link {link}: unknown node '{name}'")]
    UnknownNode { link: usize, name: String },
    #[error("link {link}: self-loop on node '{node}'")]
    SelfLoop { link: usize, node: String },
    #[error("link {link}: value {value} must be finite and non-negative")]
    InvalidValue { link: usize, value: f32 },
    #[error("duplicate node id '{id}'")]
    DuplicateNode { id: String },
    #[error("graph contains a cycle through node '{node}'")]
    Cycle { node: String },
    #[error("invalid layout config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f32 },
    #[error("node index {index} out of range ({node_count} nodes)")]
    NoSuchNode { index: usize, node_count: usize },
    #[error("node {index}: depth {y} must be finite")]
    InvalidDepth { index: usize, y: f32 },
    #[error("column {breadth}: {nodes} nodes with padding {padding} do not fit height {height}")]
    ColumnOverflow {
        breadth: usize,
        nodes: usize,
        padding: f32,
        height: f32,
    },
}
