use crate::{
    ast::{BinaryOperator, Node},
    interpreter::evaluator::core::{Context, EvalResult, Flow, flow},
};

impl Context {
    /// Evaluates `and` or `or` with short-circuiting.
    ///
    /// The result is one of the operands, not a boolean: `and` yields the
    /// left operand if it is falsy and the right one otherwise, `or` yields
    /// the left operand if it is truthy and the right one otherwise. The
    /// right operand is only evaluated when it is the result.
    ///
    /// # Parameters
    /// - `op`: `And` or `Or`.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    pub fn eval_logic(&mut self, op: BinaryOperator, left: &Node, right: &Node) -> EvalResult<Flow> {
        let left = flow!(self.eval(left));
        let decided = match op {
            BinaryOperator::Or => left.is_truthy(),
            _ => !left.is_truthy(),
        };

        if decided {
            return Ok(Flow::Normal(left));
        }

        self.eval(right)
    }
}
