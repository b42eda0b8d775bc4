//! Render-facing graph built from a schema graph: table nodes carrying
//! display data and per-column connection flags, plus one edge per foreign
//! key. The rendering surface uses the flags to decide whether a column row
//! gets a connector anchor.

use std::collections::HashMap;

use serde::Serialize;

use crate::schema::SchemaGraph;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub pk: bool,
    pub nullable: bool,
    pub not_null: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Column appears as the source of at least one foreign key.
    pub has_source_handle: bool,
    /// Column appears as the target of at least one foreign key.
    pub has_target_handle: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowNode {
    pub id: String,
    pub title: String,
    pub columns: Vec<FlowColumn>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn from_schema(graph: &SchemaGraph) -> Self {
        // (table, column) -> (is a source, is a target)
        let mut connections: HashMap<(&str, &str), (bool, bool)> = HashMap::new();
        for fk in &graph.fks {
            connections
                .entry((fk.from_table.as_str(), fk.from_column.as_str()))
                .or_default()
                .0 = true;
            connections
                .entry((fk.to_table.as_str(), fk.to_column.as_str()))
                .or_default()
                .1 = true;
        }

        let nodes = graph
            .tables
            .iter()
            .map(|table| FlowNode {
                id: table.name.clone(),
                title: table.name.clone(),
                columns: table
                    .columns
                    .iter()
                    .map(|col| {
                        let (source, target) = connections
                            .get(&(table.name.as_str(), col.name.as_str()))
                            .copied()
                            .unwrap_or_default();
                        FlowColumn {
                            name: col.name.clone(),
                            type_name: col.type_name.clone(),
                            pk: col.pk,
                            nullable: col.nullable,
                            not_null: col.not_null,
                            unique: col.unique,
                            default_value: col.default_value.clone(),
                            has_source_handle: source,
                            has_target_handle: target,
                        }
                    })
                    .collect(),
            })
            .collect();

        let edges = graph
            .fks
            .iter()
            .enumerate()
            .map(|(i, fk)| FlowEdge {
                id: format!(
                    "fk-{}-{}-{}-{}-{}",
                    fk.from_table, fk.from_column, fk.to_table, fk.to_column, i
                ),
                source: fk.from_table.clone(),
                source_handle: format!("{}-source", fk.from_column),
                target: fk.to_table.clone(),
                target_handle: format!("{}-target", fk.to_column),
                label: fk
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{} → {}", fk.from_column, fk.to_column)),
            })
            .collect();

        FlowGraph { nodes, edges }
    }
}
