use std::rc::Rc;

use crate::{
    ast::{FunctionDef, Node, Position},
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
    /// Evaluates a function definition.
    ///
    /// The closure captures a snapshot of the current environment and is then
    /// bound under its name. Bindings made afterwards, including later
    /// definitions, are invisible to it; the function's own name is bound
    /// again on every call so that it can recurse.
    ///
    /// # Returns
    /// `None`; a definition has no value.
    pub fn define_function(&mut self, def: &Rc<FunctionDef>) -> Value {
        let closure = Closure { kind:     ClosureKind::Function(Rc::clone(def)),
                                captured: self.env.snapshot(), };
        self.env.bind(def.name.clone(), Value::Function(Rc::new(closure)));
        Value::None
    }

    /// Evaluates a call expression.
    ///
    /// The callee is evaluated first, then the arguments from left to right.
    ///
    /// # Parameters
    /// - `callee`: The called expression.
    /// - `arguments`: Argument expressions.
    /// - `position`: Position of the call.
    pub fn eval_call(&mut self, callee: &Node, arguments: &[Node], position: Position) -> EvalResult<Flow> {
        let function = flow!(self.eval(callee));

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(flow!(self.eval(argument)));
        }

        self.call_value(&function, &args, position).map(Flow::Normal)
    }

    /// Evaluates `receiver.name(arguments)`.
    ///
    /// A dict entry `name` is called with the arguments as given. Otherwise
    /// the builtin `name` is called with the receiver prepended, so
    /// `xs.append(1)` means `append(xs, 1)`.
    ///
    /// # Errors
    /// `UnknownKey` if neither the receiver nor the builtin registry has
    /// `name`; otherwise whatever the call reports.
    pub fn eval_method_call(&mut self,
                            receiver: Value,
                            name: &str,
                            arguments: &[Node],
                            position: Position)
                            -> EvalResult<Flow> {
        let (function, mut args) = self.resolve_method(receiver, name, position)?;

        args.reserve(arguments.len());
        for argument in arguments {
            args.push(flow!(self.eval(argument)));
        }

        self.call_value(&function, &args, position).map(Flow::Normal)
    }

    /// Finds what `receiver.name(...)` calls, and the arguments to put in
    /// front of the explicit ones.
    fn resolve_method(&self,
                      receiver: Value,
                      name: &str,
                      position: Position)
                      -> EvalResult<(Value, Vec<Value>)> {
        if let Value::Dict(entries) = &receiver
           && let Some(member) = entries.borrow().get(name)
        {
            return Ok((member.clone(), Vec::new()));
        }

        match self.builtins().get(name) {
            Some(builtin) => Ok((Value::Builtin(builtin), vec![receiver])),
            None => Err(RuntimeError::UnknownKey { key: name.to_string(),
                                                   position }),
        }
    }

    /// Calls any callable value with already evaluated arguments.
    ///
    /// # Errors
    /// `NotCallable` for values that are neither functions nor builtins;
    /// otherwise whatever the call reports.
    pub fn call_value(&mut self, function: &Value, args: &[Value], position: Position) -> EvalResult<Value> {
        match function {
            Value::Function(closure) => match &closure.kind {
                ClosureKind::Function(def) => self.call_function(closure, def, args, position),
                ClosureKind::Category(def) => {
                    if !args.is_empty() {
                        return Err(RuntimeError::ArgumentCountMismatch { name: def.name.clone(),
                                                                         expected: "0".to_string(),
                                                                         found: args.len(),
                                                                         position });
                    }
                    self.instantiate(closure, def, position)
                },
            },
            Value::Builtin(builtin) => builtin.invoke(self, args, position),
            other => Err(RuntimeError::NotCallable { name: other.to_string(),
                                                     type_name: other.type_name(),
                                                     position }),
        }
    }

    /// Executes a user-defined function.
    ///
    /// The body runs in a fresh child of the captured snapshot in which the
    /// function's own name and its parameters are bound. Its parameter count
    /// must match the number of supplied arguments.
    ///
    /// # Errors
    /// - Wrong number of arguments.
    /// - A `return` whose value does not have the declared return type.
    /// - A `break` escaping the body.
    /// - Call depth exceeding the configured limit.
    ///
    /// # Returns
    /// The returned value, or the value of the body's last statement.
    fn call_function(&mut self,
                     closure: &Rc<Closure>,
                     def: &FunctionDef,
                     args: &[Value],
                     position: Position)
                     -> EvalResult<Value> {
        if args.len() != def.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: def.name.clone(),
                                                             expected: def.params.len().to_string(),
                                                             found: args.len(),
                                                             position });
        }

        let mut scope = Environment::child(Rc::clone(&closure.captured));
        scope.bind(def.name.clone(), Value::Function(Rc::clone(closure)));
        for (param, arg) in def.params.iter().zip(args) {
            scope.bind(param.name.clone(), arg.clone());
        }

        tracing::trace!(function = %def.name, depth = self.depth(), "calling function");

        let (flow, _) = self.enter_scope(scope, position, |context| context.eval(&def.body))?;

        match flow {
            Flow::Normal(value) => Ok(value),
            Flow::Return(value, return_position) => {
                check_return_type(def, &value, return_position)?;
                Ok(value)
            },
            Flow::Break(_, break_position) => {
                Err(RuntimeError::BreakOutsideLoop { position: break_position })
            },
        }
    }
}

/// Checks a returned value against the declared return type. `any` accepts
/// everything.
fn check_return_type(def: &FunctionDef, value: &Value, position: Position) -> EvalResult<()> {
    if def.return_type == "any" || def.return_type == value.type_name() {
        return Ok(());
    }

    Err(RuntimeError::TypeReturn { function: def.name.clone(),
                                   expected: def.return_type.clone(),
                                   found: value.type_name().to_string(),
                                   position })
}
