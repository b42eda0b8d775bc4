//! Table-body clause splitting and classification.
//!
//! A body is split into top-level comma-separated clauses (commas inside
//! parentheses never split), and each clause is classified as a table-level
//! constraint or a column definition. A clause matching no rule is dropped
//! without error.

use super::ident::strip_quotes;
use super::scan::{Scanner, contains_keywords};
use crate::schema::Column;

#[derive(Debug, Default, PartialEq)]
pub struct ParsedColumns {
    pub columns: Vec<Column>,
    /// Table-level primary-key column names, in declaration order.
    pub pk: Vec<String>,
}

/// Split a table body into trimmed top-level clauses; empties are dropped.
pub fn split_clauses(body: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, b) in body.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                let item = body[start..i].trim();
                if !item.is_empty() {
                    items.push(item);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = body[start..].trim();
    if !tail.is_empty() {
        items.push(tail);
    }
    items
}

/// Classify every clause of a table body.
pub fn parse_clauses(body: &str) -> ParsedColumns {
    let mut parsed = ParsedColumns::default();
    for clause in split_clauses(body) {
        classify(clause, &mut parsed);
    }
    parsed
}

fn classify(clause: &str, parsed: &mut ParsedColumns) {
    // Named constraint: only a PRIMARY KEY (...) inside it contributes.
    if Scanner::new(clause).eat_keyword("CONSTRAINT") {
        parsed.pk.extend(primary_key_columns(clause));
        return;
    }

    // Table-level PRIMARY KEY (...) without the CONSTRAINT keyword.
    let mut s = Scanner::new(clause);
    if s.eat_keywords(&["PRIMARY", "KEY"]) {
        s.skip_ws();
        if s.peek() == Some(b'(') {
            parsed.pk.extend(primary_key_columns(clause));
            return;
        }
    }

    // CHECK / table-level UNIQUE / FOREIGN KEY clauses carry no structure
    // here. Table-level UNIQUE does not mark any column unique; only the
    // inline form is captured. FOREIGN KEY clauses are left to the
    // inline-REFERENCES pass.
    if opens_group(clause, &["CHECK"])
        || opens_group(clause, &["UNIQUE"])
        || opens_group(clause, &["FOREIGN", "KEY"])
    {
        return;
    }

    if let Some(col) = parse_column(clause) {
        parsed.columns.push(col);
    }
}

/// Does the clause start with `words` followed by `(`?
fn opens_group(clause: &str, words: &[&str]) -> bool {
    let mut s = Scanner::new(clause);
    if !s.eat_keywords(words) {
        return false;
    }
    s.skip_ws();
    s.peek() == Some(b'(')
}

/// Column names of the first `PRIMARY KEY ( ... )` in the clause.
fn primary_key_columns(clause: &str) -> Vec<String> {
    let mut s = Scanner::new(clause);
    if s.seek_keywords(&["PRIMARY", "KEY"]).is_none() {
        return Vec::new();
    }
    s.skip_ws();
    if !s.eat_byte(b'(') {
        return Vec::new();
    }
    let start = s.pos();
    while s.peek().is_some_and(|b| b != b')') {
        s.bump();
    }
    if s.eof() {
        return Vec::new();
    }
    let inner = s.slice(start, s.pos());
    if inner.is_empty() {
        return Vec::new();
    }
    inner
        .split(',')
        .map(|c| strip_quotes(c.trim()).to_string())
        .collect()
}

/// Parse a column definition: leading identifier, a type token (with an
/// optional balanced precision group), then attribute keywords anywhere in
/// the clause.
fn parse_column(clause: &str) -> Option<Column> {
    let mut s = Scanner::new(clause);
    s.eat_byte(b'"');
    let name = s.read_word()?.to_string();
    s.eat_byte(b'"');
    if s.skip_ws() == 0 {
        return None;
    }

    let ty_start = s.pos();
    while s
        .peek()
        .is_some_and(|b| !b.is_ascii_whitespace() && !matches!(b, b',' | b'(' | b')'))
    {
        s.bump();
    }
    let base_end = s.pos();
    s.skip_ws();
    if s.peek() == Some(b'(') {
        if s.read_balanced_body().is_none() {
            s.set_pos(base_end);
        }
    } else {
        s.set_pos(base_end);
    }
    let type_name = s.slice(ty_start, s.pos()).trim();
    if type_name.is_empty() {
        return None;
    }

    let not_null = contains_keywords(clause, &["NOT", "NULL"]);
    Some(Column {
        name,
        type_name: type_name.to_string(),
        pk: contains_keywords(clause, &["PRIMARY", "KEY"]),
        nullable: !not_null,
        not_null,
        unique: contains_keywords(clause, &["UNIQUE"]),
        default_value: default_value(clause),
    })
}

/// Text following DEFAULT, up to whitespace or a comma, plus an optional
/// balanced parenthesized expression.
fn default_value(clause: &str) -> Option<String> {
    let mut s = Scanner::new(clause);
    s.seek_keyword("DEFAULT")?;
    if s.skip_ws() == 0 {
        return None;
    }
    let start = s.pos();
    while let Some(b) = s.peek() {
        if b.is_ascii_whitespace() || b == b',' {
            break;
        }
        if b == b'(' {
            let save = s.pos();
            if s.read_balanced_body().is_none() {
                s.set_pos(save);
                break;
            }
        } else {
            s.bump();
        }
    }
    let mut end = s.pos();
    // one more balanced group may follow after whitespace
    if end > start {
        s.skip_ws();
        if s.peek() == Some(b'(') {
            let save = s.pos();
            if s.read_balanced_body().is_some() {
                end = s.pos();
            } else {
                s.set_pos(save);
            }
        }
    }
    let value = s.slice(start, end).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
