//! Statement segmentation: locating CREATE TABLE and ALTER TABLE blocks in
//! free-form DDL text.
//!
//! Grammar the segmenter does not understand is ignored. Statements with
//! unbalanced parentheses or a missing terminator are skipped outright; no
//! partial block is emitted. Comments are not stripped, so commented-out
//! statements are still picked up.

use super::scan::Scanner;

/// A `CREATE TABLE` statement: raw header identifier plus the parenthesized
/// body, terminator excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBlock {
    pub ident: String,
    pub body: String,
}

/// An `ALTER TABLE` statement: raw identifier plus everything up to the
/// next `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterBlock {
    pub ident: String,
    pub body: String,
}

/// Collect `CREATE TABLE [IF NOT EXISTS] <ident> ( <body> );` blocks.
///
/// The body is the text between the `(` after the identifier and its
/// matching `)`, which must be immediately followed by `;`.
pub fn create_table_blocks(sql: &str) -> Vec<CreateBlock> {
    let mut blocks = Vec::new();
    let mut s = Scanner::new(sql);
    while s.seek_keyword("CREATE").is_some() {
        let resume = s.pos();
        if s.skip_ws() == 0 || !s.eat_keyword("TABLE") {
            s.set_pos(resume);
            continue;
        }
        let resume = s.pos();
        s.skip_ws();
        if s.eat_keywords(&["IF", "NOT", "EXISTS"]) {
            s.skip_ws();
        }
        let Some(ident) = s.read_ident() else {
            s.set_pos(resume);
            continue;
        };
        s.skip_ws();
        if s.peek() != Some(b'(') {
            s.set_pos(resume);
            continue;
        }
        let Some(body) = s.read_balanced_body() else {
            // Ran off the end of the input; rescan what was consumed.
            s.set_pos(resume);
            continue;
        };
        if !s.eat_byte(b';') {
            continue;
        }
        blocks.push(CreateBlock {
            ident: ident.to_string(),
            body: body.trim().to_string(),
        });
    }
    blocks
}

/// Collect `ALTER TABLE <ident> <body>;` blocks.
pub fn alter_table_blocks(sql: &str) -> Vec<AlterBlock> {
    let mut blocks = Vec::new();
    let bytes = sql.as_bytes();
    let mut s = Scanner::new(sql);
    while s.seek_keyword("ALTER").is_some() {
        let resume = s.pos();
        if s.skip_ws() == 0 || !s.eat_keyword("TABLE") {
            s.set_pos(resume);
            continue;
        }
        s.skip_ws();
        let Some(ident) = s.read_ident() else {
            s.set_pos(resume);
            continue;
        };
        if s.skip_ws() == 0 {
            s.set_pos(resume);
            continue;
        }
        let body_start = s.pos();
        let mut end = body_start;
        while end < bytes.len() && bytes[end] != b';' {
            end += 1;
        }
        if end >= bytes.len() {
            // Unterminated; nothing after this point can match either.
            break;
        }
        blocks.push(AlterBlock {
            ident: ident.to_string(),
            body: s.slice(body_start, end).to_string(),
        });
        s.set_pos(end + 1);
    }
    blocks
}
