//! Diagram document assembly: one JSON value combining display data and
//! computed positions, consumed by the rendering surface.

use serde::Serialize;
use thiserror::Error;

use crate::flow::{FlowColumn, FlowEdge, FlowGraph};
use crate::layout::{Direction, LayoutEngine};
use crate::schema::SchemaGraph;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode diagram: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct NodeData {
    pub title: String,
    pub columns: Vec<FlowColumn>,
}

#[derive(Debug, Serialize)]
pub struct DiagramNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: NodeData,
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

/// The full document handed to the canvas: positioned nodes, pass-through
/// edges and the overall extent.
#[derive(Debug, Serialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<FlowEdge>,
    pub width: f64,
    pub height: f64,
}

/// Build the positioned diagram for a parsed schema.
pub fn diagram(graph: &SchemaGraph, direction: Direction) -> Diagram {
    let flow = FlowGraph::from_schema(graph);
    let layout = LayoutEngine::default().layout(&flow, direction);
    // layout nodes come back in input order, so the two lists zip cleanly
    let nodes = flow
        .nodes
        .into_iter()
        .zip(layout.nodes)
        .map(|(node, placed)| DiagramNode {
            id: node.id,
            kind: "table",
            data: NodeData {
                title: node.title,
                columns: node.columns,
            },
            position: Point {
                x: placed.x,
                y: placed.y,
            },
            width: placed.width,
            height: placed.height,
        })
        .collect();
    Diagram {
        nodes,
        edges: flow.edges,
        width: layout.width,
        height: layout.height,
    }
}

pub fn to_json(graph: &SchemaGraph, direction: Direction) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(&diagram(graph, direction))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql;

    #[test]
    fn test_diagram_shape() {
        let graph = sql::parse(
            "CREATE TABLE a (id int PRIMARY KEY);\n\
             CREATE TABLE b (id int PRIMARY KEY, a_id int REFERENCES a (id));",
        );
        let doc = diagram(&graph, Direction::LeftToRight);
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.nodes[0].kind, "table");
        assert_eq!(doc.nodes[0].id, doc.nodes[0].data.title);
        assert!(doc.width > 0.0 && doc.height > 0.0);
    }

    #[test]
    fn test_json_contains_positions_and_handles() {
        let graph = sql::parse(
            "CREATE TABLE a (id int PRIMARY KEY);\n\
             CREATE TABLE b (a_id int REFERENCES a (id));",
        );
        let json = to_json(&graph, Direction::TopToBottom).unwrap();
        assert!(json.contains("\"type\":\"table\""));
        assert!(json.contains("\"position\""));
        assert!(json.contains("\"sourceHandle\":\"a_id-source\""));
    }

    #[test]
    fn test_empty_schema_serializes() {
        let json = to_json(&SchemaGraph::default(), Direction::LeftToRight).unwrap();
        assert!(json.contains("\"nodes\":[]"));
        assert!(json.contains("\"edges\":[]"));
    }
}
