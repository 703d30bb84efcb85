use std::{collections::BTreeMap, rc::Rc};

use crate::{
    ast::{CategoryDef, Node, Position},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult, Flow, flow},
        value::{
            callable::{Closure, ClosureKind},
            core::Value,
        },
    },
};

impl Context {
    /// Evaluates a category definition.
    ///
    /// The name is bound to a zero-argument callable that builds a fresh
    /// object on every call, then that callable is invoked once.
    ///
    /// # Returns
    /// The first object.
    pub fn eval_category(&mut self, def: &Rc<CategoryDef>) -> EvalResult<Flow> {
        let closure = Rc::new(Closure { kind:     ClosureKind::Category(Rc::clone(def)),
                                        captured: self.env.snapshot(), });
        self.env.bind(def.name.clone(), Value::Function(Rc::clone(&closure)));

        self.instantiate(&closure, def, def.position).map(Flow::Normal)
    }

    /// Builds an object from a category.
    ///
    /// The body runs in a child of the captured snapshot; every name it binds
    /// in that frame becomes a field of the returned dict. A `return` ends the
    /// body early and the object holds whatever was bound by then.
    ///
    /// # Errors
    /// Errors from the body, a `break` escaping it, or exceeding the call
    /// depth limit.
    pub(crate) fn instantiate(&mut self,
                              closure: &Rc<Closure>,
                              def: &CategoryDef,
                              position: Position)
                              -> EvalResult<Value> {
        let mut scope = Environment::child(Rc::clone(&closure.captured));
        scope.bind(def.name.clone(), Value::Function(Rc::clone(closure)));

        let (flow, scope) = self.enter_scope(scope, position, |context| context.eval(&def.body))?;
        if let Flow::Break(_, position) = flow {
            return Err(RuntimeError::BreakOutsideLoop { position });
        }

        let fields: BTreeMap<String, Value> = scope.frame()
                                                   .iter()
                                                   .filter(|(name, _)| **name != def.name)
                                                   .map(|(name, value)| (name.clone(), value.clone()))
                                                   .collect();

        tracing::debug!(category = %def.name, fields = fields.len(), "instantiated category");
        Ok(Value::from(fields))
    }

    /// Evaluates `init`.
    ///
    /// Binds `self` to the value. A callable value is then called without
    /// arguments and the call's result is returned; any other value is
    /// returned as is.
    pub fn eval_init(&mut self, value: &Node, position: Position) -> EvalResult<Flow> {
        let value = flow!(self.eval(value));
        self.env.bind("self", value.clone());

        if value.is_callable() {
            return self.call_value(&value, &[], position).map(Flow::Normal);
        }

        Ok(Flow::Normal(value))
    }
}
