use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{core::Value, file::FileHandle},
    },
};

/// Shared storage of an array value.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared storage of a dict value.
pub type DictRef = Rc<RefCell<BTreeMap<String, Value>>>;

/// Builds the type error reported when a builtin argument has the wrong type.
///
/// # Parameters
/// - `function`: Name of the builtin.
/// - `expected`: Description of the accepted type(s).
/// - `found`: The offending value.
/// - `position`: Position of the call.
#[must_use]
pub fn argument_type_error(function: &str,
                           expected: &str,
                           found: &Value,
                           position: Position)
                           -> RuntimeError {
    RuntimeError::TypeError { details: format!("{function}() expects {expected}, found {}",
                                               found.type_name()),
                              position }
}

/// Extracts the shared storage of an array argument.
pub fn expect_array(function: &str, value: &Value, position: Position) -> EvalResult<ArrayRef> {
    match value {
        Value::Array(items) => Ok(Rc::clone(items)),
        other => Err(argument_type_error(function, "an array", other, position)),
    }
}

/// Extracts the shared storage of a dict argument.
pub fn expect_dict(function: &str, value: &Value, position: Position) -> EvalResult<DictRef> {
    match value {
        Value::Dict(entries) => Ok(Rc::clone(entries)),
        other => Err(argument_type_error(function, "a dict", other, position)),
    }
}

/// Extracts a string argument.
pub fn expect_str<'v>(function: &str, value: &'v Value, position: Position) -> EvalResult<&'v str> {
    match value {
        Value::Str(text) => Ok(text),
        other => Err(argument_type_error(function, "a str", other, position)),
    }
}

/// Extracts a file handle argument.
pub fn expect_file(function: &str, value: &Value, position: Position) -> EvalResult<Rc<FileHandle>> {
    match value {
        Value::File(handle) => Ok(Rc::clone(handle)),
        other => Err(argument_type_error(function, "a file", other, position)),
    }
}

/// Checks that every element of an array literal has the declared type.
///
/// The element type `any` accepts everything.
///
/// # Errors
/// `ArrayType` naming the first element whose type differs.
pub fn check_element_types(element_type: &str, elements: &[Value], position: Position) -> EvalResult<()> {
    if element_type == "any" {
        return Ok(());
    }

    match elements.iter().find(|value| value.type_name() != element_type) {
        Some(value) => Err(RuntimeError::ArrayType { declared: element_type.to_string(),
                                                     found: value.type_name().to_string(),
                                                     position }),
        None => Ok(()),
    }
}
