use core::fmt;

use crate::value::{Function, Value};

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{}", value),
            Value::Symbol(name) => write!(f, "{}", name),
            Value::String(value) => write!(f, "\"{}\"", escape(value)),
            Value::Error(error) => write!(f, "Error: {}", error),
            Value::Function(function) => write!(f, "{}", function),
            Value::SExpr(cells) => write!(f, "({})", join(cells)),
            Value::QExpr(cells) => write!(f, "{{{}}}", join(cells)),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Function::Builtin(_) => write!(f, "<builtin>"),
            Function::Closure(closure) => write!(
                f,
                "\\ {{{}}} {{{}}}",
                closure.formals.join(" "),
                join(&closure.body)
            ),
        }
    }
}

fn join(cells: &[Value]) -> String {
    cells
        .iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Re-applies the backslash escapes the reader decodes.
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for char in input.chars() {
        match char {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\x07' => escaped.push_str("\\a"),
            '\x08' => escaped.push_str("\\b"),
            '\x0c' => escaped.push_str("\\f"),
            '\x0b' => escaped.push_str("\\v"),
            '\0' => escaped.push_str("\\0"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            _ => escaped.push(char),
        }
    }
    escaped
}
