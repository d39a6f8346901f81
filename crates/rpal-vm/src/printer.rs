use rpal_values::Value;

/// Renders the terminal value of a run (§4.7). Scalars print as their
/// payload; tuples print parenthesized and comma-separated, recursively.
pub fn render(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Str(s) => expand_escapes(s),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Nil => "nil".to_string(),
        Value::Dummy => "dummy".to_string(),
        Value::Tuple(elems) => {
            let inner: Vec<String> = elems.iter().map(render).collect();
            format!("({})", inner.join(", "))
        }
        other => other.to_string(),
    }
}

/// `-pretty`: a top-level tuple result renders as a brace-wrapped
/// comma-separated list of its leaf integers (§6).
pub fn render_pretty(value: &Value) -> String {
    match value {
        Value::Tuple(_) => {
            let mut leaves = Vec::new();
            collect_integer_leaves(value, &mut leaves);
            format!("{{{}}}", leaves.join(", "))
        }
        other => render(other),
    }
}

fn collect_integer_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Tuple(elems) => {
            for elem in elems {
                collect_integer_leaves(elem, out);
            }
        }
        Value::Int(n) => out.push(n.to_string()),
        _ => {}
    }
}

/// Expands `\n \t \r \\ \' \"` in that order, as they appear literally in
/// the string payload's source text (§4.7).
fn expand_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n') => {
                    out.push('\n');
                    chars.next();
                }
                Some('t') => {
                    out.push('\t');
                    chars.next();
                }
                Some('r') => {
                    out.push('\r');
                    chars.next();
                }
                Some('\\') => {
                    out.push('\\');
                    chars.next();
                }
                Some('\'') => {
                    out.push('\'');
                    chars.next();
                }
                Some('"') => {
                    out.push('"');
                    chars.next();
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_tuples() {
        let t = Value::Tuple(vec![Value::Int(1), Value::Tuple(vec![Value::Int(2), Value::Int(3)])]);
        assert_eq!(render(&t), "(1, (2, 3))");
    }

    #[test]
    fn pretty_flattens_to_braces() {
        let t = Value::Tuple(vec![Value::Int(1), Value::Tuple(vec![Value::Int(2), Value::Int(3)])]);
        assert_eq!(render_pretty(&t), "{1, 2, 3}");
    }

    #[test]
    fn expands_escape_sequences() {
        assert_eq!(expand_escapes("a\\nb\\tc"), "a\nb\tc");
    }
}
