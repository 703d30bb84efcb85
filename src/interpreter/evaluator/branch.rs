use crate::{
    ast::{Case, Node},
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, flow},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates an `if` with an optional alternative.
    ///
    /// # Returns
    /// The value of the branch taken, or `None` when the condition is false
    /// and there is no `else`.
    pub fn eval_if(&mut self, condition: &Node, then: &Node, otherwise: Option<&Node>) -> EvalResult<Flow> {
        if flow!(self.eval(condition)).is_truthy() {
            return self.eval(then);
        }

        match otherwise {
            Some(otherwise) => self.eval(otherwise),
            None => Ok(Flow::Normal(Value::None)),
        }
    }

    /// Evaluates `try { body } except [filter] { handler }`.
    ///
    /// A runtime error raised by the body runs the handler if it is catchable
    /// and, when a filter is given, if the filter names the error's kind or
    /// the text of a raised value. Bindings the body made before failing are
    /// kept. `return` and `break` are not errors and pass through untouched.
    pub fn eval_try(&mut self, body: &Node, filter: Option<&str>, handler: &Node) -> EvalResult<Flow> {
        match self.eval(body) {
            Err(error) if error.is_catchable() && filter.is_none_or(|f| error.matches_filter(f)) => {
                tracing::debug!(kind = error.kind_name(), %error, "caught runtime error");
                self.eval(handler)
            },
            result => result,
        }
    }

    /// Evaluates the arms of a `match` or `switch`.
    ///
    /// The subject is evaluated once, then the keys in source order; the
    /// result of the first key equal to the subject is evaluated and
    /// returned. Keys after the matching one are not evaluated.
    ///
    /// # Returns
    /// The matching arm's value, or `None` if no key matches.
    pub fn eval_cases(&mut self, subject: &Node, cases: &[Case]) -> EvalResult<Flow> {
        let subject = flow!(self.eval(subject));

        for case in cases {
            if flow!(self.eval(&case.key)) == subject {
                return self.eval(&case.result);
            }
        }

        Ok(Flow::Normal(Value::None))
    }
}
