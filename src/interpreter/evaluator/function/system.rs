use std::collections::BTreeMap;

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
    util::num::usize_to_i64_checked,
};

/// Builds an enumeration: a dict mapping each name to its position.
///
/// Takes the names as separate string arguments or as a single array of
/// strings. Members are read with `.`, as in `Color.red` or `Color."red"`.
pub fn make_enum(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let names = match args {
        [Value::Array(items)] => items.borrow().clone(),
        _ => args.to_vec(),
    };

    let mut members = BTreeMap::new();
    for (ordinal, name) in names.iter().enumerate() {
        let name = expect_str("enum", name, position)?;
        members.insert(name.to_string(), Value::Integer(usize_to_i64_checked(ordinal, position)?));
    }

    Ok(Value::from(members))
}

/// Builds a dict.
///
/// Without arguments the dict is empty. A dict argument is copied; an array
/// argument must hold `[key, value]` pairs with string keys.
pub fn make_dict(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let Some(source) = args.first() else {
        return Ok(Value::from(BTreeMap::new()));
    };

    match source {
        Value::Dict(entries) => Ok(Value::from(entries.borrow().clone())),
        Value::Array(pairs) => {
            let mut entries = BTreeMap::new();
            for pair in pairs.borrow().iter() {
                let (key, value) = split_pair(pair, position)?;
                entries.insert(key, value);
            }
            Ok(Value::from(entries))
        },
        other => Err(argument_type_error("dict", "a dict or an array of pairs", other, position)),
    }
}

fn split_pair(pair: &Value, position: Position) -> EvalResult<(String, Value)> {
    if let Value::Array(items) = pair
       && let [key, value] = items.borrow().as_slice()
    {
        return Ok((expect_str("dict", key, position)?.to_string(), value.clone()));
    }

    Err(RuntimeError::InvalidArgument { details: format!("dict(): expected a [key, value] pair, found {}",
                                                         pair.repr()),
                                        position })
}

/// Returns every visible binding as a dict.
pub fn env(context: &mut Context, _: &[Value], _: Position) -> EvalResult<Value> {
    Ok(Value::from(context.env.bindings()))
}

/// Requests termination of the program with the given exit code, `0` by
/// default. The request is an error that `try` never catches.
pub fn exit(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let code = match args.first() {
        Some(code) => code.as_integer("exit() code", position)?,
        None => 0,
    };

    let code = i32::try_from(code).map_err(|_| RuntimeError::Overflow { position })?;
    Err(RuntimeError::Exit { code })
}
