use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{argument_type_error, expect_str},
        },
        value::core::Value,
    },
};

/// Splits a string into an array of strings.
///
/// Without a separator the string is split on runs of whitespace and empty
/// pieces are dropped; with one it is split on every occurrence.
///
/// # Errors
/// `InvalidArgument` for an empty separator.
pub fn split(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let text = expect_str("split", &args[0], position)?;

    let pieces: Vec<Value> = match args.get(1) {
        None => text.split_whitespace().map(Value::from).collect(),
        Some(separator) => {
            let separator = expect_str("split", separator, position)?;
            if separator.is_empty() {
                return Err(RuntimeError::InvalidArgument { details: "split(): empty separator".to_string(),
                                                           position });
            }
            text.split(separator).map(Value::from).collect()
        },
    };

    Ok(Value::from(pieces))
}

/// Tests whether a non-empty string consists only of one character class.
///
/// # Parameters
/// - `name`: `is_digit`, `is_alpha` or `is_space`.
pub fn is_class(name: &str, _: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let text = expect_str(name, &args[0], position)?;
    let class: fn(char) -> bool = match name {
        "is_digit" => |c: char| c.is_ascii_digit(),
        "is_alpha" => char::is_alphabetic,
        _ => char::is_whitespace,
    };

    Ok(Value::Bool(!text.is_empty() && text.chars().all(class)))
}

/// Tests whether a string is a valid identifier: a letter or `_` followed
/// by letters, digits or `_`.
pub fn is_ident(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let text = expect_str("is_ident", &args[0], position)?;
    let mut chars = text.chars();

    let valid = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_');
    Ok(Value::Bool(valid))
}

/// Converts any value to its display text.
pub fn to_str(_: &mut Context, args: &[Value], _: Position) -> EvalResult<Value> {
    Ok(Value::Str(args[0].to_string()))
}

/// Converts a value to an integer.
///
/// Integers pass through, booleans become `0` or `1`, and strings are parsed
/// after trimming surrounding whitespace.
pub fn to_int(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        Value::Str(text) => {
            text.trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| RuntimeError::InvalidArgument { details: format!("int(): cannot convert '{text}'"),
                                                             position })
        },
        other => Err(argument_type_error("int", "an int, a bool or a str", other, position)),
    }
}

/// Returns the type name of a value.
pub fn type_of(_: &mut Context, args: &[Value], _: Position) -> EvalResult<Value> {
    Ok(Value::from(args[0].type_name()))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::config::Config;

    fn context() -> Context {
        Context::with_io(Config::default(), Box::new(std::io::empty()), Box::new(std::io::sink()))
    }

    #[test_case("is_digit", "0123", true ; "digits")]
    #[test_case("is_digit", "12a", false ; "digits with letter")]
    #[test_case("is_alpha", "soul", true ; "letters")]
    #[test_case("is_space", " \t", true ; "blanks")]
    #[test_case("is_space", "", false ; "empty string")]
    fn character_classes(name: &str, text: &str, expected: bool) {
        let result = is_class(name, &mut context(), &[Value::from(text)], Position::default());
        assert_eq!(result.unwrap(), Value::Bool(expected));
    }

    #[test_case("_private1", true ; "underscore start")]
    #[test_case("1st", false ; "digit start")]
    #[test_case("a-b", false ; "dash")]
    fn identifiers(text: &str, expected: bool) {
        let result = is_ident(&mut context(), &[Value::from(text)], Position::default());
        assert_eq!(result.unwrap(), Value::Bool(expected));
    }

    #[test]
    fn int_parses_and_rejects() {
        let mut context = context();
        assert_eq!(to_int(&mut context, &[Value::from(" 42 ")], Position::default()).unwrap(),
                   Value::Integer(42));
        assert_eq!(to_int(&mut context, &[Value::Bool(true)], Position::default()).unwrap(),
                   Value::Integer(1));
        assert!(to_int(&mut context, &[Value::from("4x")], Position::default()).is_err());
    }

    #[test]
    fn split_defaults_to_whitespace() {
        let mut context = context();
        let words = split(&mut context, &[Value::from(" a  b ")], Position::default()).unwrap();
        assert_eq!(words.to_string(), "['a', 'b']");
        let fields = split(&mut context, &[Value::from("a,,b"), Value::from(",")], Position::default()).unwrap();
        assert_eq!(fields.to_string(), "['a', '', 'b']");
    }
}
