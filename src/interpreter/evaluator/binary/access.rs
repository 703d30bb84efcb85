use crate::{
    ast::{BinaryOperator, Node, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, flow},
        value::core::Value,
    },
    util::num::resolve_index,
};

impl Context {
    /// Evaluates `object.member`.
    ///
    /// When `member` is a bare name and `object` is a dict, the name itself
    /// is the key: `point.x` reads the field `x`. A member of the form
    /// `name(args)` is a method call, see
    /// [`eval_method_call`](Self::eval_method_call). In every other case the
    /// member is evaluated and used as an index, so `xs.0`, `xs.i` and
    /// `colors."red"` work as well.
    ///
    /// # Errors
    /// `UnknownKey` for a missing dict entry, `IndexOutOfBounds` for a bad
    /// index, or `TypeError` when the object cannot be indexed by the member.
    pub fn eval_dot(&mut self, object: &Node, member: &Node, position: Position) -> EvalResult<Flow> {
        let object = flow!(self.eval(object));

        if let Node::Call { callee,
                            arguments,
                            position: call_position, } = member
           && let Node::Variable { name, .. } = callee.as_ref()
        {
            return self.eval_method_call(object, name, arguments, *call_position);
        }

        if let (Value::Dict(entries), Node::Variable { name, .. }) = (&object, member) {
            return entries.borrow()
                          .get(name)
                          .cloned()
                          .map(Flow::Normal)
                          .ok_or_else(|| RuntimeError::UnknownKey { key: name.clone(),
                                                                    position });
        }

        let key = flow!(self.eval(member));
        Self::index_value(&object, &key, position).map(Flow::Normal)
    }

    /// Reads one element of a container.
    ///
    /// Arrays and strings take an integer index, negative indices counting
    /// from the end; dicts take a string key.
    ///
    /// # Example
    /// ```
    /// use soul::{
    ///     ast::Position,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let text = Value::from("soul");
    /// let last = Context::index_value(&text, &Value::Integer(-1), Position::default());
    /// assert_eq!(last.unwrap(), Value::from("l"));
    /// ```
    pub fn index_value(container: &Value, key: &Value, position: Position) -> EvalResult<Value> {
        match (container, key) {
            (Value::Array(items), Value::Integer(index)) => {
                let items = items.borrow();
                let slot = resolve_index(*index, items.len(), position)?;
                Ok(items[slot].clone())
            },
            (Value::Str(text), Value::Integer(index)) => {
                let length = text.chars().count();
                let slot = resolve_index(*index, length, position)?;
                Ok(text.chars().nth(slot).map_or(Value::None, |c| Value::Str(c.to_string())))
            },
            (Value::Dict(entries), Value::Str(name)) => {
                entries.borrow()
                       .get(name)
                       .cloned()
                       .ok_or_else(|| RuntimeError::UnknownKey { key: name.clone(),
                                                                 position })
            },
            _ => Err(Self::unsupported(BinaryOperator::Dot, container, key, position)),
        }
    }

    /// Evaluates `target = value`.
    ///
    /// A variable target must already be bound; the nearest binding is
    /// replaced. A `container.member` target writes a dict entry or an array
    /// element, using the same key rules as [`eval_dot`](Self::eval_dot).
    /// The value is evaluated before the target's container.
    ///
    /// # Returns
    /// `None`, like `var`.
    pub fn eval_assign(&mut self, target: &Node, value: &Node, position: Position) -> EvalResult<Flow> {
        let value = flow!(self.eval(value));

        match target {
            Node::Variable { name, .. } => {
                if !self.env.assign(name, value) {
                    return Err(RuntimeError::UnknownVariable { name: name.clone(),
                                                               position });
                }
            },
            Node::BinaryOp { left,
                             op: BinaryOperator::Dot,
                             right,
                             .. } => {
                let container = flow!(self.eval(left));
                let key = match (&container, right.as_ref()) {
                    (Value::Dict(_), Node::Variable { name, .. }) => Value::Str(name.clone()),
                    _ => flow!(self.eval(right)),
                };
                Self::store_item(&container, key, value, position)?;
            },
            other => {
                return Err(RuntimeError::TypeError { details: format!("cannot assign to a {} expression",
                                                                      describe_target(other)),
                                                     position });
            },
        }

        Ok(Flow::Normal(Value::None))
    }

    /// Writes one element of a container in place.
    ///
    /// Dict entries are inserted or replaced; array elements must already
    /// exist.
    pub fn store_item(container: &Value, key: Value, value: Value, position: Position) -> EvalResult<()> {
        match (container, key) {
            (Value::Dict(entries), Value::Str(name)) => {
                entries.borrow_mut().insert(name, value);
                Ok(())
            },
            (Value::Array(items), Value::Integer(index)) => {
                let mut items = items.borrow_mut();
                let slot = resolve_index(index, items.len(), position)?;
                items[slot] = value;
                Ok(())
            },
            (container, key) => Err(RuntimeError::TypeError { details: format!("cannot store into {} with a {} key",
                                                                               container.type_name(),
                                                                               key.type_name()),
                                                              position }),
        }
    }
}

const fn describe_target(node: &Node) -> &'static str {
    match node {
        Node::Call { .. } => "call",
        Node::BinaryOp { .. } => "operator",
        _ => "literal",
    }
}
