use crate::{
    ast::Node,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, flow},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a `while` loop.
    ///
    /// The condition is evaluated before every iteration. A `break` ends the
    /// loop and its value becomes the loop's value, even in `ret` mode; a
    /// `return` passes through to the enclosing function.
    ///
    /// # Parameters
    /// - `condition`: Expression tested before each iteration.
    /// - `body`: The loop body.
    /// - `collect`: Whether the loop was written `while ret`.
    ///
    /// # Returns
    /// `None` when the condition turns false, or in `ret` mode the array of
    /// the values of every completed iteration.
    pub fn eval_while(&mut self, condition: &Node, body: &Node, collect: bool) -> EvalResult<Flow> {
        let mut collected = Vec::new();

        while flow!(self.eval(condition)).is_truthy() {
            match self.eval(body)? {
                Flow::Normal(value) => {
                    if collect {
                        collected.push(value);
                    }
                },
                Flow::Break(value, _) => return Ok(Flow::Normal(value)),
                flow @ Flow::Return(..) => return Ok(flow),
            }
        }

        if collect {
            Ok(Flow::Normal(Value::from(collected)))
        } else {
            Ok(Flow::Normal(Value::None))
        }
    }
}
