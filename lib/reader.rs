use crate::{
    syntax::SyntaxNode,
    value::{ErrorKind, Value},
};

/// Converts a parse tree into a value tree. The root and any `sexpr` node
/// become S-expressions; `qexpr` nodes become Q-expressions.
pub fn read(node: &SyntaxNode) -> Value {
    if node.tag.contains("number") {
        return read_number(node);
    }
    if node.tag.contains("string") {
        return read_string(node);
    }
    if node.tag.contains("symbol") {
        return Value::Symbol(node.contents.clone());
    }

    let cells = read_forms(node);

    if node.tag.contains("qexpr") {
        Value::QExpr(cells)
    } else {
        Value::SExpr(cells)
    }
}

/// Reads the children of an aggregate node, skipping punctuation, parser
/// scaffolding and comments.
pub fn read_forms(node: &SyntaxNode) -> Vec<Value> {
    node.children
        .iter()
        .filter(|child| !is_scaffolding(child))
        .map(read)
        .collect()
}

fn is_scaffolding(node: &SyntaxNode) -> bool {
    matches!(node.contents.as_str(), "(" | ")" | "{" | "}")
        || node.tag == "regex"
        || node.tag.contains("comment")
}

fn read_number(node: &SyntaxNode) -> Value {
    match node.contents.parse::<i64>() {
        Ok(value) => Value::Number(value),
        Err(_) => Value::error(ErrorKind::InvalidNumber, "Invalid Number."),
    }
}

fn read_string(node: &SyntaxNode) -> Value {
    let contents = &node.contents;
    let inner = contents
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(contents);
    Value::String(unescape(inner))
}

/// Decodes backslash escapes. Unknown escapes are kept as written.
pub fn unescape(input: &str) -> String {
    let mut unescaped = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(char) = chars.next() {
        if char != '\\' {
            unescaped.push(char);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some('r') => unescaped.push('\r'),
            Some('a') => unescaped.push('\x07'),
            Some('b') => unescaped.push('\x08'),
            Some('f') => unescaped.push('\x0c'),
            Some('v') => unescaped.push('\x0b'),
            Some('0') => unescaped.push('\0'),
            Some(escaped @ ('\\' | '"' | '\'' | '?')) => unescaped.push(escaped),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
