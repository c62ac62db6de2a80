//! Row codec for the delimited datasets.
//!
//! Fields are comma separated. A double-quoted span may contain commas, and
//! `""` inside it is a literal quote. Fields that were never quoted are
//! stored trimmed; quoted fields keep their content verbatim.

/// Split one line into fields. The caller checks the field count against the
/// dataset schema.
pub fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut was_quoted = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => {
                in_quotes = !in_quotes;
                was_quoted = true;
            }
            ',' if !in_quotes => {
                fields.push(finish_field(current, was_quoted));
                current = String::new();
                was_quoted = false;
            }
            _ => current.push(c),
        }
    }
    fields.push(finish_field(current, was_quoted));
    fields
}

fn finish_field(raw: String, was_quoted: bool) -> String {
    if was_quoted { raw } else { raw.trim().to_string() }
}

/// Join fields into one line, quoting where the content demands it.
pub fn format_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let field = field.as_ref();
        if needs_quoting(field) {
            out.push('"');
            for c in field.chars() {
                if c == '"' {
                    out.push('"');
                }
                out.push(c);
            }
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out
}

fn needs_quoting(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field != field.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_commas() {
        assert_eq!(split_row("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn comma_inside_quotes_is_not_a_delimiter() {
        let fields = split_row("AL100,\"Casa, Grande\",\"Calle 1, Apto 2\",x");
        assert_eq!(fields, vec!["AL100", "Casa, Grande", "Calle 1, Apto 2", "x"]);
    }

    #[test]
    fn escaped_quote_inside_quotes() {
        let fields = split_row("a,\"dijo \"\"hola\"\"\",b");
        assert_eq!(fields, vec!["a", "dijo \"hola\"", "b"]);
    }

    #[test]
    fn unquoted_fields_are_trimmed() {
        assert_eq!(split_row(" a , b ,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn quoted_fields_keep_inner_whitespace() {
        assert_eq!(split_row("\"  a  \",b"), vec!["  a  ", "b"]);
    }

    #[test]
    fn trailing_comma_yields_empty_last_field() {
        assert_eq!(split_row("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn empty_line_is_one_empty_field() {
        assert_eq!(split_row(""), vec![""]);
    }

    #[test]
    fn format_quotes_only_when_needed() {
        let row = format_row(&["plain", "with, comma", "with \"quote\"", " padded "]);
        assert_eq!(row, "plain,\"with, comma\",\"with \"\"quote\"\"\",\" padded \"");
    }

    #[test]
    fn format_then_split_round_trips() {
        let fields = ["RES001", "Casa, Grande", "nota con \"comillas\"", "", " x "];
        let line = format_row(&fields);
        assert_eq!(split_row(&line), fields);
    }

    #[test]
    fn carriage_return_trimmed_from_unquoted_fields() {
        assert_eq!(split_row("a,b\r"), vec!["a", "b"]);
    }
}
