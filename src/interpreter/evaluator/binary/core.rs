use crate::{
    ast::{BinaryOperator, Node, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, flow},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary operation node.
    ///
    /// `and` and `or` evaluate their right operand only when needed, `.`
    /// treats a bare name on its right as a field name, and `=` needs its
    /// left operand as a place rather than a value. Every other operator
    /// evaluates both operands left to right and hands them to
    /// [`eval_binary`](Self::eval_binary).
    ///
    /// # Parameters
    /// - `left`: Left operand.
    /// - `op`: The operator.
    /// - `right`: Right operand.
    /// - `position`: Position of the operator.
    pub fn eval_binary_op(&mut self,
                          left: &Node,
                          op: BinaryOperator,
                          right: &Node,
                          position: Position)
                          -> EvalResult<Flow> {
        match op {
            BinaryOperator::And | BinaryOperator::Or => self.eval_logic(op, left, right),
            BinaryOperator::Dot => self.eval_dot(left, right, position),
            BinaryOperator::Assign => self.eval_assign(left, right, position),
            _ => {
                let left = flow!(self.eval(left));
                let right = flow!(self.eval(right));
                Self::eval_binary(op, &left, &right, position).map(Flow::Normal)
            },
        }
    }

    /// Evaluates a binary operation between two values.
    ///
    /// This function routes the operation to specialized handlers depending on
    /// the operator. Arithmetic goes to `eval_arithmetic`, relational and
    /// equality operators to `eval_comparison`, membership to
    /// `eval_membership` and `.` to `index_value`. `and` and `or` pick an
    /// operand by truthiness.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `position`: Position for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use soul::{
    ///     ast::{BinaryOperator, Position},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let left = Value::Integer(3);
    /// let right = Value::Integer(4);
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add, &left, &right, Position::default());
    /// assert_eq!(result.unwrap(), Value::Integer(7));
    /// ```
    pub fn eval_binary(op: BinaryOperator, left: &Value, right: &Value, position: Position) -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Assign, Div, Dot, Equal, Greater, GreaterEqual, In, Less, LessEqual, Mul,
            NotEqual, Or, Sub,
        };

        match op {
            Add | Sub | Mul | Div => Self::eval_arithmetic(op, left, right, position),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, left, right, position)
            },
            In => Self::eval_membership(left, right, position),
            And => Ok(if left.is_truthy() { right.clone() } else { left.clone() }),
            Or => Ok(if left.is_truthy() { left.clone() } else { right.clone() }),
            Dot => Self::index_value(left, right, position),
            Assign => Err(Self::unsupported(op, left, right, position)),
        }
    }

    /// Builds the error reported when an operator does not apply to the
    /// operand types.
    pub(crate) fn unsupported(op: BinaryOperator,
                              left: &Value,
                              right: &Value,
                              position: Position)
                              -> RuntimeError {
        RuntimeError::TypeError { details: format!("unsupported operand types for '{op}': {} and {}",
                                                   left.type_name(),
                                                   right.type_name()),
                                  position }
    }
}
