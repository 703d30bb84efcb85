use crate::{
    ast::{BinaryOperator, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::num::i64_to_usize_checked,
};

impl Context {
    /// Evaluates `+`, `-`, `*` or `/`.
    ///
    /// Integer arithmetic is checked: overflow and division by zero are
    /// errors rather than wrapping or panicking, and `/` truncates toward
    /// zero. `+` also concatenates two strings or two arrays into a new
    /// value, and `*` repeats a string or an array a non-negative number of
    /// times (a negative count yields an empty result).
    ///
    /// # Parameters
    /// - `op`: One of `Add`, `Sub`, `Mul`, `Div`.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `position`: Position of the operator.
    ///
    /// # Example
    /// ```
    /// use soul::{
    ///     ast::{BinaryOperator, Position},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let text = Context::eval_arithmetic(BinaryOperator::Mul,
    ///                                     &Value::from("ab"),
    ///                                     &Value::Integer(3),
    ///                                     Position::default());
    /// assert_eq!(text.unwrap(), Value::from("ababab"));
    ///
    /// let zero = Context::eval_arithmetic(BinaryOperator::Div,
    ///                                     &Value::Integer(1),
    ///                                     &Value::Integer(0),
    ///                                     Position::default());
    /// assert!(zero.is_err());
    /// ```
    pub fn eval_arithmetic(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           position: Position)
                           -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mul, Sub};
        use Value::{Array, Integer, Str};

        let overflow = || RuntimeError::Overflow { position };

        match (op, left, right) {
            (Add, Integer(a), Integer(b)) => a.checked_add(*b).map(Integer).ok_or_else(overflow),
            (Sub, Integer(a), Integer(b)) => a.checked_sub(*b).map(Integer).ok_or_else(overflow),
            (Mul, Integer(a), Integer(b)) => a.checked_mul(*b).map(Integer).ok_or_else(overflow),
            (Div, Integer(_), Integer(0)) => Err(RuntimeError::DivisionByZero { position }),
            (Div, Integer(a), Integer(b)) => a.checked_div(*b).map(Integer).ok_or_else(overflow),

            (Add, Str(a), Str(b)) => Ok(Str(format!("{a}{b}"))),
            (Mul, Str(text), Integer(count)) | (Mul, Integer(count), Str(text)) => {
                let count = repeat_count(*count, text.len(), position)?;
                let mut repeated = String::new();
                repeated.try_reserve_exact(repeated_len(text.len(), count, position)?)
                        .map_err(|_| overflow())?;
                for _ in 0..count {
                    repeated.push_str(text);
                }
                Ok(Str(repeated))
            },

            (Add, Array(a), Array(b)) => {
                let mut items = a.borrow().clone();
                items.extend(b.borrow().iter().cloned());
                Ok(Value::from(items))
            },
            (Mul, Array(items), Integer(count)) | (Mul, Integer(count), Array(items)) => {
                let items = items.borrow();
                let count = repeat_count(*count, items.len(), position)?;
                Ok(Value::from(repeat(&items, count, position)?))
            },

            _ => Err(Self::unsupported(op, left, right, position)),
        }
    }
}

/// Converts a repetition count, clamping negative counts to zero.
///
/// An empty sequence repeats to nothing, so its count is dropped to zero.
fn repeat_count(count: i64, len: usize, position: Position) -> EvalResult<usize> {
    if len == 0 {
        return Ok(0);
    }
    i64_to_usize_checked(count.max(0), position)
}

/// Returns the length of `count` copies of a sequence of length `len`.
fn repeated_len(len: usize, count: usize, position: Position) -> EvalResult<usize> {
    len.checked_mul(count).ok_or(RuntimeError::Overflow { position })
}

/// Concatenates `count` copies of `items`.
///
/// # Errors
/// `Overflow` if the result length overflows or cannot be allocated.
fn repeat<T: Clone>(items: &[T], count: usize, position: Position) -> EvalResult<Vec<T>> {
    let mut repeated = Vec::new();
    repeated.try_reserve_exact(repeated_len(items.len(), count, position)?)
            .map_err(|_| RuntimeError::Overflow { position })?;
    for _ in 0..count {
        repeated.extend_from_slice(items);
    }
    Ok(repeated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic(op: BinaryOperator, left: impl Into<Value>, right: impl Into<Value>) -> EvalResult<Value> {
        Context::eval_arithmetic(op, &left.into(), &right.into(), Position::new(1, 1))
    }

    #[test]
    fn integer_arithmetic_is_checked() {
        assert_eq!(arithmetic(BinaryOperator::Sub, 2_i64, 5_i64).unwrap(), Value::Integer(-3));
        assert_eq!(arithmetic(BinaryOperator::Div, -7_i64, 2_i64).unwrap(), Value::Integer(-3));
        assert!(matches!(arithmetic(BinaryOperator::Add, i64::MAX, 1_i64),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(arithmetic(BinaryOperator::Div, i64::MIN, -1_i64),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(arithmetic(BinaryOperator::Div, 1_i64, 0_i64),
                         Err(RuntimeError::DivisionByZero { .. })));
    }

    #[test]
    fn sequences_concatenate_and_repeat() {
        assert_eq!(arithmetic(BinaryOperator::Add, "so", "ul").unwrap(), Value::from("soul"));
        assert_eq!(arithmetic(BinaryOperator::Mul, "x", -2_i64).unwrap(), Value::from(""));

        let joined = arithmetic(BinaryOperator::Add,
                                vec![Value::Integer(1)],
                                vec![Value::Integer(2)]).unwrap();
        assert_eq!(joined, Value::from(vec![Value::Integer(1), Value::Integer(2)]));

        let repeated = arithmetic(BinaryOperator::Mul, 2_i64, vec![Value::Integer(0)]).unwrap();
        assert_eq!(repeated.to_string(), "[0, 0]");
    }

    #[test]
    fn huge_repetitions_are_overflow_errors() {
        assert!(matches!(arithmetic(BinaryOperator::Mul, "abc", i64::MAX),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(arithmetic(BinaryOperator::Mul, vec![Value::Integer(0)], i64::MAX),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(arithmetic(BinaryOperator::Mul, i64::MAX, vec![Value::from("a"), Value::from("b")]),
                         Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn repeating_empty_sequences_stays_empty() {
        assert_eq!(arithmetic(BinaryOperator::Mul, "", i64::MAX).unwrap(), Value::from(""));
        assert_eq!(arithmetic(BinaryOperator::Mul, Vec::<Value>::new(), i64::MAX).unwrap().to_string(),
                   "[]");
    }

    #[test]
    fn mixed_operands_are_type_errors() {
        assert!(matches!(arithmetic(BinaryOperator::Add, 1_i64, "a"),
                         Err(RuntimeError::TypeError { .. })));
        assert!(matches!(arithmetic(BinaryOperator::Sub, "a", "b"),
                         Err(RuntimeError::TypeError { .. })));
    }
}
