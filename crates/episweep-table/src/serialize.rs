//! Serialization back to delimited text — the tokenizer's algebraic inverse.
//!
//! A field is quoted (with internal quotes doubled) if and only if it
//! contains the delimiter, a quote, a line terminator, or leading/trailing
//! whitespace. Rows are joined by `\n` with no trailing terminator, so
//! `tokenize(serialize(t)) == t` holds for any table this crate produces.

use crate::model::Table;
use crate::tokenizer::{DELIMITER, QUOTE};

/// Serialize a table to delimited text.
pub fn serialize(table: &Table) -> String {
    let mut out = String::new();
    write_row(&mut out, table.headers());
    for row in table.rows() {
        out.push('\n');
        write_row(&mut out, row);
    }
    out
}

fn write_row(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        write_field(out, field);
    }
}

fn write_field(out: &mut String, field: &str) {
    if !needs_quoting(field) {
        out.push_str(field);
        return;
    }
    out.push(QUOTE);
    for ch in field.chars() {
        if ch == QUOTE {
            out.push(QUOTE);
        }
        out.push(ch);
    }
    out.push(QUOTE);
}

fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\n', '\r']) || field != field.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{split_fields, tokenize};

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_fields_unquoted() {
        let table = Table::new(
            strs(&["episode", "name"]),
            vec![strs(&["1", "Pilot"])],
        )
        .unwrap();
        assert_eq!(serialize(&table), "episode,name\n1,Pilot");
    }

    #[test]
    fn no_trailing_terminator() {
        let table = Table::new(strs(&["a"]), vec![strs(&["1"]), strs(&["2"])]).unwrap();
        assert!(!serialize(&table).ends_with('\n'));
    }

    #[test]
    fn quote_escaping() {
        let mut out = String::new();
        write_field(&mut out, "a,b\"c");
        assert_eq!(out, "\"a,b\"\"c\"");
        assert_eq!(split_fields(&out), vec!["a,b\"c"]);
    }

    #[test]
    fn edge_whitespace_forces_quoting() {
        let mut out = String::new();
        write_field(&mut out, " x ");
        assert_eq!(out, "\" x \"");
    }

    #[test]
    fn embedded_newline_quoted() {
        let table = Table::new(
            strs(&["episode", "name"]),
            vec![strs(&["1", "line one\nline two"])],
        )
        .unwrap();
        let text = serialize(&table);
        assert_eq!(text, "episode,name\n1,\"line one\nline two\"");
        let (raw, _) = tokenize(&text);
        assert_eq!(raw.rows[0][1], "line one\nline two");
    }

    #[test]
    fn round_trip() {
        let table = Table::new(
            strs(&["episode", "name", "summary"]),
            vec![
                strs(&["1", "Pilot", "a, plain start"]),
                strs(&["2", "say \"hi\"", " padded "]),
                strs(&["3", "two\nlines", ""]),
            ],
        )
        .unwrap();
        let (raw, diags) = tokenize(&serialize(&table));
        assert!(diags.is_empty());
        assert_eq!(raw.headers, table.headers());
        assert_eq!(raw.rows, table.rows());
    }
}
