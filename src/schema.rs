use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaGraph {
    pub tables: Vec<Table>,
    pub fks: Vec<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Canonical name: `schema.table` when a schema was present, else bare.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Declaration order, significant for rendering.
    pub columns: Vec<Column>,
    /// Primary-key column names, table-level constraints first.
    pub pk: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    /// Raw type text as written, precision group included (`numeric(10,2)`).
    #[serde(rename = "type")]
    pub type_name: String,
    pub pk: bool,
    pub nullable: bool,
    pub not_null: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

/// Cascade vocabulary for `ON DELETE` / `ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferentialAction {
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "SET DEFAULT")]
    SetDefault,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl ReferentialAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaStats {
    pub tables: usize,
    pub foreign_keys: usize,
}

impl SchemaGraph {
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            tables: self.tables.len(),
            foreign_keys: self.fks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_rendering() {
        assert_eq!(ReferentialAction::Cascade.to_string(), "CASCADE");
        assert_eq!(ReferentialAction::SetNull.to_string(), "SET NULL");
        assert_eq!(ReferentialAction::NoAction.as_str(), "NO ACTION");
    }

    #[test]
    fn test_fk_json_names() {
        let fk = ForeignKey {
            name: Some("fk_orders_user".to_string()),
            from_table: "orders".to_string(),
            from_column: "user_id".to_string(),
            to_table: "users".to_string(),
            to_column: "id".to_string(),
            on_delete: Some(ReferentialAction::SetNull),
            on_update: None,
        };
        let json = serde_json::to_string(&fk).unwrap();
        assert!(json.contains("\"fromTable\":\"orders\""));
        assert!(json.contains("\"onDelete\":\"SET NULL\""));
        assert!(!json.contains("onUpdate"));
    }

    #[test]
    fn test_stats() {
        let graph = SchemaGraph::default();
        assert_eq!(graph.stats().tables, 0);
        assert_eq!(graph.stats().foreign_keys, 0);
    }
}
