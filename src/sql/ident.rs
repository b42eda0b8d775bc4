//! Identifier normalization for table and column names.

/// A `(schema, name)` pair with surrounding quotes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub schema: Option<String>,
    pub name: String,
}

impl QualifiedName {
    /// The graph key: `schema.name` when a schema was present, else bare.
    pub fn canonical(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

/// Strip leading and trailing double-quote runs.
pub(crate) fn strip_quotes(s: &str) -> &str {
    s.trim_start_matches('"').trim_end_matches('"')
}

/// Normalize a raw, possibly quoted, possibly schema-qualified identifier.
///
/// Accepts `writer_schema.sites`, `"writer_schema"."site_releases"` and
/// backtick quoting. Exactly two dot-separated parts yield a schema; anything
/// else degrades to a single-part name (the first part). Permissive by
/// design: there is no error path.
pub fn normalize(raw: &str) -> QualifiedName {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '`' { '"' } else { c })
        .collect();
    let parts: Vec<&str> = cleaned.split('.').collect();
    if parts.len() == 2 {
        QualifiedName {
            schema: Some(strip_quotes(parts[0]).to_string()),
            name: strip_quotes(parts[1]).to_string(),
        }
    } else {
        QualifiedName {
            schema: None,
            name: strip_quotes(parts[0]).to_string(),
        }
    }
}
