use crate::ir::{LinkSpec, NodeSpec, SankeyGraph};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^sankey(?:-beta)?\s*$").unwrap());

/// Reads `source,target,value` rows into a graph.
///
/// Nodes are created in first-seen order and deduplicated by name. Rows that
/// cannot become a valid link (missing endpoint, unparsable or negative value,
/// source equal to target) are skipped, so the result always satisfies the
/// layout preconditions except acyclicity.
pub fn parse_sankey(input: &str) -> Result<SankeyGraph> {
    let mut graph = SankeyGraph::new();
    let mut name_to_idx: HashMap<String, usize> = HashMap::new();
    let mut row = 0usize;

    for raw_line in input.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("%%") || HEADER_RE.is_match(line) {
            continue;
        }
        let current_row = row;
        row += 1;

        let fields = split_fields(line)?;
        if fields.len() < 3 {
            tracing::warn!(row = current_row, line, "skipping row with fewer than 3 fields");
            continue;
        }
        let source = fields[0].as_str();
        let target = fields[1].as_str();
        let value = match fields[2].parse::<f32>() {
            Ok(value) if value.is_finite() && value >= 0.0 => value,
            _ => {
                tracing::warn!(
                    row = current_row,
                    value = %fields[2],
                    "skipping row with invalid value"
                );
                continue;
            }
        };
        if source.is_empty() || target.is_empty() {
            tracing::warn!(row = current_row, "skipping row with empty endpoint");
            continue;
        }
        if source == target {
            tracing::warn!(row = current_row, node = source, "skipping self-loop");
            continue;
        }

        let source_idx = intern(&mut graph, &mut name_to_idx, source);
        let target_idx = intern(&mut graph, &mut name_to_idx, target);
        graph.links.push(LinkSpec {
            source: source_idx.into(),
            target: target_idx.into(),
            value,
            row: Some(current_row),
        });
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        rows = row,
        "parsed sankey rows"
    );
    Ok(graph)
}

fn intern(graph: &mut SankeyGraph, name_to_idx: &mut HashMap<String, usize>, name: &str) -> usize {
    if let Some(&idx) = name_to_idx.get(name) {
        return idx;
    }
    let idx = graph.nodes.len();
    graph.nodes.push(NodeSpec {
        id: name.to_string(),
        label: None,
    });
    name_to_idx.insert(name.to_string(), idx);
    idx
}

/// Splits a CSV line on commas. Fields may be double-quoted, with `""`
/// standing for a literal quote; surrounding whitespace is trimmed.
fn split_fields(line: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }
        match ch {
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if in_quotes {
        return Err(anyhow::anyhow!("Unterminated quoted field in row: {}", line));
    }
    fields.push(current.trim().to_string());
    Ok(fields)
}
