use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{argument_type_error, expect_array, expect_dict},
        },
        value::core::Value,
    },
    util::num::{resolve_index, usize_to_i64_checked},
};

/// Appends a value to the end of an array.
///
/// # Returns
/// `None`; the array is modified in place.
pub fn append(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let items = expect_array("append", &args[0], position)?;
    items.borrow_mut().push(args[1].clone());
    Ok(Value::None)
}

/// Inserts a value before the given index.
///
/// As with slicing, the index is clamped to the array: anything past the end
/// appends, and negative indices count from the end.
pub fn insert(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let items = expect_array("insert", &args[0], position)?;
    let index = args[1].as_integer("insert() index", position)?;

    let mut items = items.borrow_mut();
    let length = usize_to_i64_checked(items.len(), position)?;
    let clamped = if index < 0 { (index + length).max(0) } else { index.min(length) };
    let slot = usize::try_from(clamped).map_err(|_| RuntimeError::Overflow { position })?;

    items.insert(slot, args[2].clone());
    Ok(Value::None)
}

/// Removes the first element equal to the given value.
///
/// # Errors
/// `InvalidArgument` if no element is equal.
pub fn remove(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let items = expect_array("remove", &args[0], position)?;
    let found = items.borrow().iter().position(|item| *item == args[1]);

    match found {
        Some(slot) => {
            items.borrow_mut().remove(slot);
            Ok(Value::None)
        },
        None => Err(RuntimeError::InvalidArgument { details: format!("remove(): {} is not in the array",
                                                                     args[1].repr()),
                                                    position }),
    }
}

/// Removes and returns an element, the last one by default.
pub fn pop(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let items = expect_array("pop", &args[0], position)?;
    let index = match args.get(1) {
        Some(index) => index.as_integer("pop() index", position)?,
        None => -1,
    };

    let mut items = items.borrow_mut();
    let slot = resolve_index(index, items.len(), position)?;
    Ok(items.remove(slot))
}

/// Finds the position of a value.
///
/// Arrays are searched for an equal element; strings for a substring, the
/// result counting characters.
///
/// # Errors
/// `InvalidArgument` if the value does not occur.
pub fn index(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let found = match (&args[0], &args[1]) {
        (Value::Array(items), needle) => items.borrow().iter().position(|item| item == needle),
        (Value::Str(text), Value::Str(part)) => text.find(part.as_str()).map(|byte| text[..byte].chars().count()),
        (other, _) => return Err(argument_type_error("index", "an array or a str", other, position)),
    };

    match found {
        Some(slot) => usize_to_i64_checked(slot, position).map(Value::Integer),
        None => Err(RuntimeError::InvalidArgument { details: format!("index(): {} not found",
                                                                     args[1].repr()),
                                                    position }),
    }
}

/// Empties an array or a dict in place.
pub fn clear(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    match &args[0] {
        Value::Array(items) => items.borrow_mut().clear(),
        Value::Dict(entries) => entries.borrow_mut().clear(),
        other => return Err(argument_type_error("clear", "an array or a dict", other, position)),
    }

    Ok(Value::None)
}

/// Copies every entry of the second dict into the first.
pub fn update(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let target = expect_dict("update", &args[0], position)?;
    let source = expect_dict("update", &args[1], position)?;

    let entries: Vec<(String, Value)> = source.borrow()
                                              .iter()
                                              .map(|(key, value)| (key.clone(), value.clone()))
                                              .collect();
    target.borrow_mut().extend(entries);
    Ok(Value::None)
}

/// Returns the number of characters of a string, elements of an array or
/// entries of a dict.
pub fn len(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let length = match &args[0] {
        Value::Str(text) => text.chars().count(),
        Value::Array(items) => items.borrow().len(),
        Value::Dict(entries) => entries.borrow().len(),
        other => return Err(argument_type_error("len", "a str, an array or a dict", other, position)),
    };

    usize_to_i64_checked(length, position).map(Value::Integer)
}
