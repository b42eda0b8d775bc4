//! Foreign-key extraction: `ALTER TABLE ... ADD CONSTRAINT` clauses and
//! inline `REFERENCES` occurrences inside CREATE TABLE bodies.

use super::ident::{normalize, strip_quotes};
use super::scan::Scanner;
use super::segment::{AlterBlock, CreateBlock};
use crate::schema::{ForeignKey, ReferentialAction};

struct FkClause {
    name: String,
    from_cols: Vec<String>,
    target: String,
    to_cols: Vec<String>,
    on_delete: Option<ReferentialAction>,
    on_update: Option<ReferentialAction>,
}

/// Extract `ADD CONSTRAINT <name> FOREIGN KEY (...) REFERENCES <ident> (...)`
/// edges from ALTER TABLE blocks. One block may carry several constraints.
///
/// Multi-column constraints expand into one edge per column pair, zipped
/// positionally and truncated to the shorter side.
pub fn alter_foreign_keys(blocks: &[AlterBlock]) -> Vec<ForeignKey> {
    let mut fks = Vec::new();
    for block in blocks {
        let from_table = normalize(&block.ident).canonical();
        let mut s = Scanner::new(&block.body);
        while s.seek_keywords(&["ADD", "CONSTRAINT"]).is_some() {
            let resume = s.pos();
            let Some(fk) = parse_fk_clause(&mut s) else {
                s.set_pos(resume);
                continue;
            };
            let to_table = normalize(&fk.target).canonical();
            let pairs = fk.from_cols.len().min(fk.to_cols.len());
            for i in 0..pairs {
                fks.push(ForeignKey {
                    name: Some(fk.name.clone()),
                    from_table: from_table.clone(),
                    from_column: fk.from_cols[i].clone(),
                    to_table: to_table.clone(),
                    to_column: fk.to_cols[i].clone(),
                    on_delete: fk.on_delete,
                    on_update: fk.on_update,
                });
            }
        }
    }
    fks
}

/// With the cursor just past `ADD CONSTRAINT`, parse one constraint clause.
fn parse_fk_clause(s: &mut Scanner) -> Option<FkClause> {
    if s.skip_ws() == 0 {
        return None;
    }
    let name = strip_quotes(s.read_ident()?).to_string();
    if s.skip_ws() == 0 {
        return None;
    }
    if !s.eat_keywords(&["FOREIGN", "KEY"]) {
        return None;
    }
    s.skip_ws();
    let from_cols = column_list(s)?;
    if s.skip_ws() == 0 {
        return None;
    }
    if !s.eat_keyword("REFERENCES") {
        return None;
    }
    if s.skip_ws() == 0 {
        return None;
    }
    let target = s.read_ident()?.to_string();
    s.skip_ws();
    let to_cols = column_list(s)?;

    let mut on_delete = None;
    let mut on_update = None;
    loop {
        let save = s.pos();
        if s.skip_ws() == 0 || !s.eat_keyword("ON") || s.skip_ws() == 0 {
            s.set_pos(save);
            break;
        }
        let is_delete = if s.eat_keyword("DELETE") {
            true
        } else if s.eat_keyword("UPDATE") {
            false
        } else {
            s.set_pos(save);
            break;
        };
        if s.skip_ws() == 0 {
            s.set_pos(save);
            break;
        }
        let Some(action) = eat_action(s) else {
            s.set_pos(save);
            break;
        };
        if is_delete {
            on_delete.get_or_insert(action);
        } else {
            on_update.get_or_insert(action);
        }
    }

    Some(FkClause {
        name,
        from_cols,
        target,
        to_cols,
        on_delete,
        on_update,
    })
}

/// A `( a, b, ... )` list, captured up to the first closing parenthesis.
fn column_list(s: &mut Scanner) -> Option<Vec<String>> {
    if !s.eat_byte(b'(') {
        return None;
    }
    let start = s.pos();
    while s.peek().is_some_and(|b| b != b')') {
        s.bump();
    }
    if s.eof() {
        return None;
    }
    let inner = s.slice(start, s.pos());
    s.bump();
    Some(
        inner
            .split(',')
            .map(|c| strip_quotes(c.trim()).to_string())
            .collect(),
    )
}

fn eat_action(s: &mut Scanner) -> Option<ReferentialAction> {
    if s.eat_keyword("CASCADE") {
        Some(ReferentialAction::Cascade)
    } else if s.eat_keyword("RESTRICT") {
        Some(ReferentialAction::Restrict)
    } else if s.eat_keywords(&["SET", "NULL"]) {
        Some(ReferentialAction::SetNull)
    } else if s.eat_keywords(&["SET", "DEFAULT"]) {
        Some(ReferentialAction::SetDefault)
    } else if s.eat_keywords(&["NO", "ACTION"]) {
        Some(ReferentialAction::NoAction)
    } else {
        None
    }
}

/// Extract inline `<column> ... REFERENCES <ident> (<column>)` edges from
/// CREATE TABLE bodies. The scan is global across each body: the source
/// column is the first identifier token followed by whitespace inside the
/// comma-free window before the REFERENCES keyword.
pub fn inline_foreign_keys(blocks: &[CreateBlock]) -> Vec<ForeignKey> {
    let mut fks = Vec::new();
    for block in blocks {
        let from_table = normalize(&block.ident).canonical();
        let body = &block.body;
        let mut s = Scanner::new(body);
        let mut resume = 0usize;
        while let Some(ref_start) = s.seek_keyword("REFERENCES") {
            let window_start = body[..ref_start]
                .rfind(',')
                .map(|i| i + 1)
                .unwrap_or(0)
                .max(resume);
            let Some(from_column) = source_column(&body[window_start..ref_start]) else {
                continue;
            };
            if s.skip_ws() == 0 {
                continue;
            }
            let Some(target) = s.read_ident() else {
                continue;
            };
            s.skip_ws();
            if !s.eat_byte(b'(') {
                continue;
            }
            s.skip_ws();
            s.eat_byte(b'"');
            let Some(to_column) = s.read_word() else {
                continue;
            };
            let to_column = to_column.to_string();
            s.eat_byte(b'"');
            s.skip_ws();
            if !s.eat_byte(b')') {
                continue;
            }
            fks.push(ForeignKey {
                name: None,
                from_table: from_table.clone(),
                from_column,
                to_table: normalize(target).canonical(),
                to_column,
                on_delete: None,
                on_update: None,
            });
            resume = s.pos();
        }
    }
    fks
}

/// First `"?<word>"?` token followed by whitespace within the window.
fn source_column(window: &str) -> Option<String> {
    for start in 0..window.len() {
        let mut s = Scanner::new(window);
        s.set_pos(start);
        s.eat_byte(b'"');
        let Some(word) = s.read_word() else { continue };
        let word = word.to_string();
        s.eat_byte(b'"');
        if s.skip_ws() > 0 {
            return Some(word);
        }
    }
    None
}
