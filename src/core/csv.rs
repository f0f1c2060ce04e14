//! Delimited-text tokenizer and writer for catalogue rows.
//!
//! Reading is lenient: it never fails, honours `"..."` quoting with `""`
//! as an escaped quote, and treats an unterminated quote as closed at the
//! end of the line.

const SEPARATOR: char = ',';
const QUOTE: char = '"';

/// Split one line into trimmed fields.
///
/// An empty line yields a single empty field.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes && chars.peek() == Some(&QUOTE) => {
                field.push(QUOTE);
                chars.next();
            }
            QUOTE => in_quotes = !in_quotes,
            SEPARATOR if !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            _ => field.push(c),
        }
    }

    fields.push(field.trim().to_string());
    fields
}

/// Quote a field if it contains a separator, quote, or newline.
pub fn escape_field(field: &str) -> String {
    if field.contains([SEPARATOR, QUOTE, '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Join fields into one line, escaping each.
pub fn write_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
