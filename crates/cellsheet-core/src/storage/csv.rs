//! CSV reading and writing of raw cell text

use crate::error::{Result, SheetError};
use std::io::Write;
use std::path::Path;

/// Read a CSV file into rows of fields.
///
/// Quoted fields may span lines. An unterminated quote is an error.
pub fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = std::fs::read_to_string(path)?;
    Ok(split_records(&content)?
        .iter()
        .map(|record| parse_csv_line(record))
        .collect())
}

/// Write rows of fields as CSV, quoting where needed.
pub fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    for row in rows {
        let fields: Vec<String> = row.iter().map(|f| escape_csv_field(f)).collect();
        writeln!(file, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Join physical lines into records, keeping newlines that sit inside quotes.
fn split_records(content: &str) -> Result<Vec<String>> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut started_at = 1;

    for (idx, line) in content.lines().enumerate() {
        if current.is_empty() && !in_quotes {
            started_at = idx + 1;
        } else {
            current.push('\n');
        }
        current.push_str(line);
        // Escaped quotes come in pairs, so parity is enough.
        if line.chars().filter(|c| *c == '"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
        if !in_quotes {
            records.push(std::mem::take(&mut current));
        }
    }

    if in_quotes {
        return Err(SheetError::Csv {
            line: started_at,
            message: "unterminated quoted field".to_string(),
        });
    }
    Ok(records)
}

/// Parse a single CSV record, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    fields.push(finish_field(&current, field_was_quoted));
                    current.clear();
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    fields.push(finish_field(&current, field_was_quoted));
    fields
}

fn finish_field(field: &str, quoted: bool) -> String {
    if quoted {
        field.to_string()
    } else {
        field.trim().to_string()
    }
}

/// Escape a field for CSV output.
///
/// Surrounding whitespace is quoted too, since unquoted fields are trimmed on read.
pub(crate) fn escape_csv_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r']) || field.trim() != field;
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_csv_line_simple() {
        assert_eq!(parse_csv_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_csv_line("a,,c"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_parse_csv_line_quoted() {
        assert_eq!(
            parse_csv_line(r#"a,"hello, world",c"#),
            vec!["a", "hello, world", "c"]
        );
    }

    #[test]
    fn test_parse_csv_line_quoted_preserves_whitespace() {
        assert_eq!(
            parse_csv_line(r#""  keep me  ",x"#),
            vec!["  keep me  ", "x"]
        );
    }

    #[test]
    fn test_parse_csv_line_escaped_quotes() {
        assert_eq!(
            parse_csv_line(r#"a,"say ""hello""",c"#),
            vec!["a", r#"say "hello""#, "c"]
        );
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("simple"), "simple");
        assert_eq!(escape_csv_field("=A1+1"), "=A1+1");
        assert_eq!(escape_csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv_field("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv_field(" padded"), "\" padded\"");
    }

    #[test]
    fn test_split_records_keeps_quoted_newlines() {
        let records = split_records("a,\"two\nlines\"\nb,c\n").unwrap();
        assert_eq!(records, vec!["a,\"two\nlines\"", "b,c"]);
        assert_eq!(parse_csv_line(&records[0]), vec!["a", "two\nlines"]);
    }

    #[test]
    fn test_split_records_rejects_unterminated_quote() {
        let err = split_records("a,b\nc,\"open\nd\n").unwrap_err();
        assert!(matches!(err, SheetError::Csv { line: 2, .. }));
    }

    #[test]
    fn test_read_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let rows = vec![
            vec!["1".to_string(), "a, b".to_string()],
            vec![" x ".to_string(), String::new()],
        ];
        write_csv(&path, &rows).unwrap();
        assert_eq!(read_csv(&path).unwrap(), rows);
    }
}
