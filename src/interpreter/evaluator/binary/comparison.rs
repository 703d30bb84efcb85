use std::cmp::Ordering;

use crate::{
    ast::{BinaryOperator, Position},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// `==` and `!=` compare any two values structurally; values of different
    /// types are simply unequal. The relational operators order integers
    /// numerically and strings lexicographically, and reject every other
    /// combination.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    /// - `position`: Position used for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean result.
    ///
    /// # Example
    /// ```
    /// use soul::{
    ///     ast::{BinaryOperator, Position},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Value::from("apple");
    /// let b = Value::from("banana");
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less, &a, &b, Position::default());
    ///
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           position: Position)
                           -> EvalResult<Value> {
        use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        if op == Equal {
            return Ok(Value::Bool(left == right));
        }
        if op == NotEqual {
            return Ok(Value::Bool(left != right));
        }

        let ordering = match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => return Err(Self::unsupported(op, left, right, position)),
        };

        let result = match op {
            Less => ordering == Ordering::Less,
            Greater => ordering == Ordering::Greater,
            LessEqual => ordering != Ordering::Greater,
            GreaterEqual => ordering != Ordering::Less,
            _ => return Err(Self::unsupported(op, left, right, position)),
        };

        Ok(Value::Bool(result))
    }

    /// Evaluates `needle in haystack`.
    ///
    /// Arrays test for an equal element, strings for a substring and dicts
    /// for a key.
    pub fn eval_membership(needle: &Value, haystack: &Value, position: Position) -> EvalResult<Value> {
        let found = match (needle, haystack) {
            (needle, Value::Array(items)) => items.borrow().contains(needle),
            (Value::Str(part), Value::Str(text)) => text.contains(part.as_str()),
            (Value::Str(key), Value::Dict(entries)) => entries.borrow().contains_key(key),
            _ => return Err(Self::unsupported(BinaryOperator::In, needle, haystack, position)),
        };

        Ok(Value::Bool(found))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::RuntimeError;

    const AT: Position = Position::new(1, 1);

    #[test]
    fn equality_spans_types() {
        let result = Context::eval_comparison(BinaryOperator::Equal, &Value::Integer(1), &Value::from("1"), AT);
        assert_eq!(result.unwrap(), Value::Bool(false));
        let result = Context::eval_comparison(BinaryOperator::NotEqual, &Value::None, &Value::None, AT);
        assert_eq!(result.unwrap(), Value::Bool(false));
    }

    #[test]
    fn ordering_needs_matching_types() {
        let result = Context::eval_comparison(BinaryOperator::GreaterEqual,
                                              &Value::Integer(3),
                                              &Value::Integer(3),
                                              AT);
        assert_eq!(result.unwrap(), Value::Bool(true));
        assert!(matches!(Context::eval_comparison(BinaryOperator::Less,
                                                  &Value::Integer(3),
                                                  &Value::from("3"),
                                                  AT),
                         Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn membership_by_container() {
        let items = Value::from(vec![Value::Integer(1), Value::from("two")]);
        assert_eq!(Context::eval_membership(&Value::from("two"), &items, AT).unwrap(),
                   Value::Bool(true));
        assert_eq!(Context::eval_membership(&Value::from("ou"), &Value::from("soul"), AT).unwrap(),
                   Value::Bool(true));

        let mut entries = BTreeMap::new();
        entries.insert("key".to_string(), Value::None);
        assert_eq!(Context::eval_membership(&Value::from("key"), &Value::from(entries), AT).unwrap(),
                   Value::Bool(true));
        assert!(Context::eval_membership(&Value::Integer(1), &Value::Integer(1), AT).is_err());
    }
}
