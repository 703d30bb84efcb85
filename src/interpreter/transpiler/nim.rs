use crate::{
    ast::{BinaryOperator, Node},
    interpreter::value::core::Value,
};

/// Maps a declared type name to a Nim type.
///
/// Names Nim already understands pass through unchanged.
#[must_use]
pub fn map_type(name: &str) -> &str {
    match name {
        "any" => "auto",
        "str" => "string",
        "none" => "void",
        "array" => "seq[auto]",
        "dict" => "Table[string, auto]",
        "func" => "proc",
        "file" => "File",
        other => other,
    }
}

/// Writes a string literal with Nim escapes.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');

    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }

    quoted.push('"');
    quoted
}

/// Returns the Nim operator for a binary operation.
///
/// `+` with a string literal on either side becomes Nim's `&`, and `/`
/// becomes integer `div`.
#[must_use]
pub const fn operator(op: BinaryOperator, left: &Node, right: &Node) -> &'static str {
    match op {
        BinaryOperator::Add if is_string_literal(left) || is_string_literal(right) => "&",
        BinaryOperator::Add => "+",
        BinaryOperator::Sub => "-",
        BinaryOperator::Mul => "*",
        BinaryOperator::Div => "div",
        BinaryOperator::Equal => "==",
        BinaryOperator::NotEqual => "!=",
        BinaryOperator::Less => "<",
        BinaryOperator::Greater => ">",
        BinaryOperator::LessEqual => "<=",
        BinaryOperator::GreaterEqual => ">=",
        BinaryOperator::In => "in",
        BinaryOperator::And => "and",
        BinaryOperator::Or => "or",
        BinaryOperator::Dot => ".",
        BinaryOperator::Assign => "=",
    }
}

const fn is_string_literal(node: &Node) -> bool {
    matches!(node, Node::Str { .. })
}

/// Returns the text a compile-time value is spliced as. `None` splices as
/// nothing.
#[must_use]
pub fn splice(value: &Value) -> String {
    if value.is_none() { String::new() } else { value.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    #[test]
    fn quotes_escape_specials() {
        assert_eq!(quote("say \"hi\"\n"), r#""say \"hi\"\n""#);
        assert_eq!(quote(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn string_addition_uses_ampersand() {
        let text = Node::Str { value:    "a".to_string(),
                               position: Position::default(), };
        let name = Node::Variable { name:     "x".to_string(),
                                    position: Position::default(), };
        assert_eq!(operator(BinaryOperator::Add, &text, &name), "&");
        assert_eq!(operator(BinaryOperator::Add, &name, &name), "+");
        assert_eq!(operator(BinaryOperator::Div, &name, &name), "div");
    }

    #[test]
    fn types_map_to_nim() {
        assert_eq!(map_type("any"), "auto");
        assert_eq!(map_type("str"), "string");
        assert_eq!(map_type("int"), "int");
    }
}
