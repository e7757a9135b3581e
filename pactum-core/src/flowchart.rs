//! Flowchart graph model for the document-processing pipeline view.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Vertical distance between consecutive nodes when positions are assigned.
pub const NODE_SPACING_Y: f32 = 120.0;

/// Node shape/semantics in the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Process,
    Decision,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Position for the node at `index` in a vertical layout.
    pub fn for_index(index: usize) -> Self {
        Self {
            x: 0.0,
            y: index as f32 * NODE_SPACING_Y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowchartNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowchartEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// A directed graph of typed nodes, generated once per request and never
/// mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flowchart {
    pub nodes: Vec<FlowchartNode>,
    pub edges: Vec<FlowchartEdge>,
    pub description: String,
}

impl Flowchart {
    /// Checks node-id uniqueness and that every edge references known nodes.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(Error::Validation(format!(
                    "duplicate flowchart node id: {}",
                    node.id
                )));
            }
        }
        for edge in &self.edges {
            if !seen.contains(edge.source.as_str()) {
                return Err(Error::Validation(format!(
                    "edge references unknown source node: {}",
                    edge.source
                )));
            }
            if !seen.contains(edge.target.as_str()) {
                return Err(Error::Validation(format!(
                    "edge references unknown target node: {}",
                    edge.target
                )));
            }
        }
        Ok(())
    }
}

/// Fill color used by the SVG page renderer for a node kind.
pub fn node_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Start => "#10b981",
        NodeKind::End => "#ef4444",
        NodeKind::Decision => "#f59e0b",
        NodeKind::Process => "#3b82f6",
    }
}

/// SVG path outlining a node at its position, offset by `padding`.
///
/// Decisions render as diamonds, start/end as rounded rectangles, and
/// process nodes as plain rectangles.
pub fn node_shape_path(node: &FlowchartNode, padding: f32, width: f32, height: f32) -> String {
    let x1 = node.position.x + padding;
    let y1 = node.position.y + padding;

    match node.kind {
        NodeKind::Decision => format!(
            "M {} {} L {} {} L {} {} L {} {} Z",
            x1 + width / 2.0,
            y1,
            x1 + width,
            y1 + height / 2.0,
            x1 + width / 2.0,
            y1 + height,
            x1,
            y1 + height / 2.0,
        ),
        NodeKind::Start | NodeKind::End => {
            let r = 10.0;
            format!(
                "M {} {} L {} {} Q {} {} {} {} L {} {} Q {} {} {} {} L {} {} Q {} {} {} {} L {} {} Q {} {} {} {} Z",
                x1 + r,
                y1,
                x1 + width - r,
                y1,
                x1 + width,
                y1,
                x1 + width,
                y1 + r,
                x1 + width,
                y1 + height - r,
                x1 + width,
                y1 + height,
                x1 + width - r,
                y1 + height,
                x1 + r,
                y1 + height,
                x1,
                y1 + height,
                x1,
                y1 + height - r,
                x1,
                y1 + r,
                x1,
                y1,
                x1 + r,
                y1,
            )
        }
        NodeKind::Process => format!(
            "M {} {} L {} {} L {} {} L {} {} Z",
            x1,
            y1,
            x1 + width,
            y1,
            x1 + width,
            y1 + height,
            x1,
            y1 + height,
        ),
    }
}
