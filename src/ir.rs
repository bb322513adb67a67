use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference from a link to one of its endpoint nodes, either by position in
/// [`SankeyGraph::nodes`] or by node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Index(usize),
    Name(String),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Index(idx) => write!(f, "#{idx}"),
            Endpoint::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Endpoint {
    fn from(idx: usize) -> Self {
        Endpoint::Index(idx)
    }
}

impl From<&str> for Endpoint {
    fn from(name: &str) -> Self {
        Endpoint::Name(name.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(name: String) -> Self {
        Endpoint::Name(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub source: Endpoint,
    pub target: Endpoint,
    pub value: f32,
    /// Data row this link was read from, when it came from tabular input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

/// Immutable description of a flow graph, as handed to the layout engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyGraph {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

impl SankeyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Returns the index of the node called `id`, appending it if missing.
    /// A label only overrides an existing one when given.
    pub fn ensure_node(&mut self, id: &str, label: Option<String>) -> usize {
        if let Some(idx) = self.node_index(id) {
            if label.is_some() {
                self.nodes[idx].label = label;
            }
            return idx;
        }
        self.nodes.push(NodeSpec {
            id: id.to_string(),
            label,
        });
        self.nodes.len() - 1
    }

    pub fn add_link(
        &mut self,
        source: impl Into<Endpoint>,
        target: impl Into<Endpoint>,
        value: f32,
    ) -> usize {
        self.links.push(LinkSpec {
            source: source.into(),
            target: target.into(),
            value,
            row: None,
        });
        self.links.len() - 1
    }

    /// Builds a graph from `(source, target, value)` triples, creating nodes
    /// in first-seen order.
    pub fn from_flows<'a, I>(flows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, f32)>,
    {
        let mut graph = Self::new();
        for (source, target, value) in flows {
            graph.ensure_node(source, None);
            graph.ensure_node(target, None);
            graph.add_link(source, target, value);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_node_deduplicates_by_id() {
        let mut graph = SankeyGraph::new();
        assert_eq!(graph.ensure_node("A", None), 0);
        assert_eq!(graph.ensure_node("B", None), 1);
        assert_eq!(graph.ensure_node("A", Some("Alpha".to_string())), 0);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].label.as_deref(), Some("Alpha"));
    }

    #[test]
    fn endpoints_accept_numbers_and_names() {
        let json = r#"{
            "nodes": [{"id": "A"}, {"id": "B", "label": "Beta"}],
            "links": [{"source": 0, "target": "B", "value": 3.5}]
        }"#;
        let graph: SankeyGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.links[0].source, Endpoint::Index(0));
        assert_eq!(graph.links[0].target, Endpoint::Name("B".to_string()));
        assert_eq!(graph.links[0].row, None);
        assert_eq!(graph.nodes[1].label.as_deref(), Some("Beta"));
    }

    #[test]
    fn from_flows_keeps_first_seen_order() {
        let graph = SankeyGraph::from_flows([("B", "A", 1.0), ("A", "C", 1.0)]);
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(graph.links.len(), 2);
    }
}
