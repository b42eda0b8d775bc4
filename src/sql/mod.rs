//! SQL DDL extraction: free-form CREATE TABLE / ALTER TABLE text to a
//! structured schema graph.

mod clause;
mod ident;
mod refs;
mod scan;
mod segment;

pub use ident::{QualifiedName, normalize};

use crate::schema::{SchemaGraph, Table};

/// Parse DDL text into a schema graph.
///
/// Total over all string inputs: empty or non-SQL text yields an empty
/// graph, malformed statements are skipped, unrecognized clauses dropped.
/// Repeated CREATE TABLE statements for the same name stay separate tables.
/// Foreign keys are ordered ALTER-derived first, inline-derived after.
pub fn parse(ddl: &str) -> SchemaGraph {
    let creates = segment::create_table_blocks(ddl);
    let alters = segment::alter_table_blocks(ddl);

    let mut tables = Vec::with_capacity(creates.len());
    for block in &creates {
        let qualified = normalize(&block.ident);
        let clause::ParsedColumns { mut columns, mut pk } = clause::parse_clauses(&block.body);
        for col in &mut columns {
            if pk.contains(&col.name) {
                col.pk = true;
            }
        }
        for col in &columns {
            if col.pk && !pk.contains(&col.name) {
                pk.push(col.name.clone());
            }
        }
        tables.push(Table {
            name: qualified.canonical(),
            schema: qualified.schema,
            columns,
            pk,
        });
    }

    let mut fks = refs::alter_foreign_keys(&alters);
    fks.extend(refs::inline_foreign_keys(&creates));

    SchemaGraph { tables, fks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ReferentialAction;

    #[test]
    fn test_totality_on_garbage() {
        for input in ["", "   ", "not sql at all", "CREATE TABLE broken (a int", "();;;"] {
            let graph = parse(input);
            assert!(graph.tables.is_empty(), "input: {input:?}");
            assert!(graph.fks.is_empty(), "input: {input:?}");
        }
    }

    #[test]
    fn test_inline_pk_propagates_to_key_set() {
        let graph = parse("CREATE TABLE t (id bigint PRIMARY KEY, name text);");
        let table = &graph.tables[0];
        assert_eq!(table.pk, vec!["id"]);
        let flagged: Vec<&str> = table
            .columns
            .iter()
            .filter(|c| c.pk)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(flagged, vec!["id"]);
    }

    #[test]
    fn test_table_level_pk_marks_columns() {
        let graph = parse("CREATE TABLE t (a int, b int, c int, PRIMARY KEY (a, b));");
        let table = &graph.tables[0];
        assert_eq!(table.pk, vec!["a", "b"]);
        assert!(table.columns[0].pk);
        assert!(table.columns[1].pk);
        assert!(!table.columns[2].pk);
    }

    #[test]
    fn test_duplicate_tables_are_kept() {
        let graph = parse("CREATE TABLE t (a int);\nCREATE TABLE t (b int);");
        assert_eq!(graph.tables.len(), 2);
        assert_eq!(graph.tables[0].name, "t");
        assert_eq!(graph.tables[1].name, "t");
        assert_eq!(graph.tables[0].columns[0].name, "a");
        assert_eq!(graph.tables[1].columns[0].name, "b");
    }

    #[test]
    fn test_alter_fks_precede_inline_fks() {
        let sql = "CREATE TABLE a (id int PRIMARY KEY, b_id int REFERENCES b (id));\n\
                   CREATE TABLE b (id int PRIMARY KEY);\n\
                   ALTER TABLE b ADD CONSTRAINT fk_b_a FOREIGN KEY (a_id) REFERENCES a (id);";
        let graph = parse(sql);
        assert_eq!(graph.fks.len(), 2);
        assert_eq!(graph.fks[0].name.as_deref(), Some("fk_b_a"));
        assert_eq!(graph.fks[1].name, None);
        assert_eq!(graph.fks[1].from_column, "b_id");
    }

    #[test]
    fn test_end_to_end_writer_schema() {
        let sql = r#"
CREATE TABLE writer_schema.sites (
    id bigint PRIMARY KEY,
    code text NOT NULL UNIQUE
);

CREATE TABLE writer_schema.site_releases (
    id bigint PRIMARY KEY,
    site_id bigint NOT NULL
);

ALTER TABLE writer_schema.sites
ADD CONSTRAINT fk_sites_live_release FOREIGN KEY (live_release_id)
REFERENCES writer_schema.site_releases (id) ON DELETE CASCADE;
"#;
        let graph = parse(sql);
        assert_eq!(graph.tables.len(), 2);
        assert_eq!(graph.fks.len(), 1);

        let sites = &graph.tables[0];
        assert_eq!(sites.name, "writer_schema.sites");
        assert_eq!(sites.schema.as_deref(), Some("writer_schema"));
        assert_eq!(sites.columns.len(), 2);
        assert!(sites.columns[1].not_null);
        assert!(sites.columns[1].unique);

        let fk = &graph.fks[0];
        assert_eq!(fk.from_table, "writer_schema.sites");
        assert_eq!(fk.to_table, "writer_schema.site_releases");
        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let sql = "CREATE TABLE a (id int PRIMARY KEY);\n\
                   CREATE TABLE b (a_id int REFERENCES a (id));";
        assert_eq!(parse(sql), parse(sql));
    }
}
