//! Character-level tokenizer for delimited export text.
//!
//! A single forward scan with three pieces of state: the fields collected so
//! far in the current row, the current field buffer, and whether a quote is
//! open. The tokenizer never fails; ambiguous input (an unterminated quote
//! at end of input) is resolved best-effort and reported as a
//! [`Diagnostic::ParseAmbiguity`].

use crate::model::{Diagnostic, RawTable};

/// Field delimiter.
pub const DELIMITER: char = ',';
/// Quote character; doubled inside a quoted field to escape itself.
pub const QUOTE: char = '"';

/// Accumulates one field's decoded text.
///
/// Quoted content is preserved verbatim, including edge whitespace. Text
/// outside any quotes is trimmed when the field ends, so ` "a" ` decodes to
/// `a` while `" x "` decodes to ` x `.
#[derive(Default)]
struct FieldBuf {
    buf: String,
    /// The field contained at least one quoted section.
    quoted: bool,
    /// Buffer length when the last quote closed; text past this point sits
    /// outside the quotes and gets trimmed.
    closed_at: Option<usize>,
}

impl FieldBuf {
    fn push(&mut self, ch: char) {
        self.buf.push(ch);
    }

    fn open_quote(&mut self) {
        // Whitespace before an opening quote is not part of the value.
        if !self.quoted && self.buf.trim().is_empty() {
            self.buf.clear();
        }
        self.quoted = true;
        self.closed_at = None;
    }

    fn close_quote(&mut self) {
        self.closed_at = Some(self.buf.len());
    }

    fn is_untouched(&self) -> bool {
        self.buf.is_empty() && !self.quoted
    }

    fn take(&mut self) -> String {
        let quoted = self.quoted;
        let closed_at = self.closed_at.take();
        self.quoted = false;
        let mut buf = std::mem::take(&mut self.buf);
        if !quoted {
            return buf.trim().to_string();
        }
        if let Some(at) = closed_at {
            let tail = buf.split_off(at);
            buf.push_str(tail.trim());
        }
        buf
    }
}

/// Raw scan output: rows of decoded fields plus whether a quote had to be
/// closed implicitly at end of input.
struct Scan {
    rows: Vec<Vec<String>>,
    unterminated_quote: bool,
}

/// Scan `text` into rows of decoded fields.
///
/// Blank rows are dropped. `\r\n` counts as one terminator; a terminator
/// inside quotes is kept verbatim in the field.
fn scan(text: &str) -> Scan {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = FieldBuf::default();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    // Doubled quote: a literal quote character.
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                    field.close_quote();
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            QUOTE => {
                in_quotes = true;
                field.open_quote();
            }
            DELIMITER => {
                fields.push(field.take());
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_row(&mut rows, &mut fields, &mut field);
            }
            '\n' => {
                end_row(&mut rows, &mut fields, &mut field);
            }
            _ => field.push(ch),
        }
    }

    // An unterminated quote closes implicitly at end of input.
    let unterminated_quote = in_quotes;
    if !fields.is_empty() || !field.is_untouched() {
        end_row(&mut rows, &mut fields, &mut field);
    }

    Scan {
        rows,
        unterminated_quote,
    }
}

fn end_row(rows: &mut Vec<Vec<String>>, fields: &mut Vec<String>, field: &mut FieldBuf) {
    fields.push(field.take());
    let row = std::mem::take(fields);
    // Rows consisting only of blank text are dropped.
    if row.len() == 1 && row[0].is_empty() {
        return;
    }
    rows.push(row);
}

/// Tokenize export text into a header row plus data rows.
///
/// Never fails; returns the best-effort table and any ambiguity
/// diagnostics. The first non-blank row becomes the header.
pub fn tokenize(text: &str) -> (RawTable, Vec<Diagnostic>) {
    let scan = scan(text);
    let mut diagnostics = Vec::new();
    if scan.unterminated_quote {
        diagnostics.push(Diagnostic::ParseAmbiguity {
            detail: "unterminated quote at end of input, closed implicitly".to_string(),
        });
    }

    let mut rows = scan.rows.into_iter();
    let headers = rows.next().unwrap_or_default();
    (
        RawTable {
            headers,
            rows: rows.collect(),
        },
        diagnostics,
    )
}

/// Tokenize a single logical line into its fields.
///
/// Used by the repairer to re-validate candidate line merges. Returns an
/// empty vector for blank input.
pub fn split_fields(line: &str) -> Vec<String> {
    scan(line).rows.into_iter().next().unwrap_or_default()
}
