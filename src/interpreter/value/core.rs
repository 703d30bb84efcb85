use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::builtin::Builtin},
        value::{callable::Closure, file::FileHandle},
    },
};

/// Represents a runtime value in the interpreter.
///
/// Arrays and dicts are shared, mutable containers: copying a `Value` copies
/// the handle, so every alias observes mutations made through builtins such
/// as `append` or through element assignment.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A string.
    Str(String),
    /// `True` or `False`.
    Bool(bool),
    /// The absence of a value.
    None,
    /// A shared, mutable sequence.
    Array(Rc<RefCell<Vec<Self>>>),
    /// A shared, mutable string-keyed mapping. Category objects are dicts.
    Dict(Rc<RefCell<BTreeMap<String, Self>>>),
    /// A user function or category.
    Function(Rc<Closure>),
    /// A function from the builtin registry.
    Builtin(Builtin),
    /// A file opened with `open`.
    File(Rc<FileHandle>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(v)))
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(v: BTreeMap<String, Self>) -> Self {
        Self::Dict(Rc::new(RefCell::new(v)))
    }
}

impl PartialEq for Value {
    /// Data values compare structurally; functions and files compare by
    /// identity, builtins by name.
    fn eq(&self, other: &Self) -> bool {
        self.eq_within(other, &mut Vec::new())
    }
}

impl Value {
    /// Returns the type name used by `type()`, typed arrays and return type
    /// annotations.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "int",
            Self::Str(_) => "str",
            Self::Bool(_) => "bool",
            Self::None => "none",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Function(_) | Self::Builtin(_) => "func",
            Self::File(_) => "file",
        }
    }

    /// Whether the value counts as true in a condition.
    ///
    /// Zero, the empty string, empty containers, `False` and `None` are false;
    /// everything else is true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(n) => *n != 0,
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::None => false,
            Self::Array(items) => !items.borrow().is_empty(),
            Self::Dict(entries) => !entries.borrow().is_empty(),
            Self::Function(_) | Self::Builtin(_) | Self::File(_) => true,
        }
    }

    /// Returns `true` if the value can be called.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Builtin(_))
    }

    /// Returns `true` if the value is [`None`](Value::None).
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the value as written inside a container: strings are quoted,
    /// everything else displays as usual.
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            Self::Str(s) => format!("'{s}'"),
            other => other.to_string(),
        }
    }

    /// Extracts an integer, or fails with a type error naming `what` was
    /// expected to be one.
    ///
    /// # Parameters
    /// - `what`: Description of the operand, used in the error message.
    /// - `position`: Source position for error reporting.
    pub fn as_integer(&self, what: &str, position: Position) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            other => Err(RuntimeError::TypeError { details: format!("{what} must be int, found {}",
                                                                    other.type_name()),
                                                   position }),
        }
    }

    /// Structural equality that treats a pair of containers already being
    /// compared further up as equal, so self-referencing containers
    /// terminate.
    fn eq_within(&self, other: &Self, active: &mut Vec<(*const (), *const ())>) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::None, Self::None) => true,
            (Self::Array(a), Self::Array(b)) => {
                let pair = (Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>());
                if Rc::ptr_eq(a, b) || active.contains(&pair) {
                    return true;
                }

                active.push(pair);
                let (a, b) = (a.borrow(), b.borrow());
                let equal = a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_within(y, active));
                active.pop();
                equal
            },
            (Self::Dict(a), Self::Dict(b)) => {
                let pair = (Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>());
                if Rc::ptr_eq(a, b) || active.contains(&pair) {
                    return true;
                }

                active.push(pair);
                let (a, b) = (a.borrow(), b.borrow());
                let equal = a.len() == b.len()
                            && a.iter()
                                .zip(b.iter())
                                .all(|((ka, va), (kb, vb))| ka == kb && va.eq_within(vb, active));
                active.pop();
                equal
            },
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a.name() == b.name(),
            (Self::File(a), Self::File(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Writes the value, printing a container that is already being written
    /// further up as `[...]` or `{...}`.
    fn write_within(&self,
                    f: &mut std::fmt::Formatter<'_>,
                    quoted: bool,
                    active: &mut Vec<*const ()>)
                    -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Str(s) if quoted => write!(f, "'{s}'"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::None => write!(f, "None"),
            Self::Array(items) => {
                let id = Rc::as_ptr(items).cast::<()>();
                if active.contains(&id) {
                    return write!(f, "[...]");
                }

                active.push(id);
                write!(f, "[")?;

                for (index, value) in items.borrow().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    value.write_within(f, true, active)?;
                }

                active.pop();
                write!(f, "]")
            },
            Self::Dict(entries) => {
                let id = Rc::as_ptr(entries).cast::<()>();
                if active.contains(&id) {
                    return write!(f, "{{...}}");
                }

                active.push(id);
                write!(f, "{{")?;

                for (index, (key, value)) in entries.borrow().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "'{key}': ")?;
                    value.write_within(f, true, active)?;
                }

                active.pop();
                write!(f, "}}")
            },
            Self::Function(closure) => write!(f, "{closure}"),
            Self::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name()),
            Self::File(handle) => write!(f, "<file '{}'>", handle.path().display()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_within(f, false, &mut Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_emptiness() {
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Integer(-3).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(Vec::new()).is_truthy());
        assert!(Value::from(vec![Value::None]).is_truthy());
        assert!(!Value::None.is_truthy());
    }

    #[test]
    fn containers_compare_structurally() {
        let a = Value::from(vec![Value::Integer(1), Value::from("x")]);
        let b = Value::from(vec![Value::Integer(1), Value::from("x")]);
        assert_eq!(a, b);
        assert_ne!(a, Value::from(vec![Value::Integer(1)]));
        assert_ne!(Value::Integer(1), Value::Bool(true));
    }

    #[test]
    fn self_containing_containers_print_and_compare() {
        let items = Value::from(vec![Value::Integer(1)]);
        let Value::Array(cell) = &items else { unreachable!() };
        cell.borrow_mut().push(items.clone());
        assert_eq!(items.to_string(), "[1, [...]]");

        let twin = Value::from(vec![Value::Integer(1)]);
        let Value::Array(twin_cell) = &twin else { unreachable!() };
        twin_cell.borrow_mut().push(twin.clone());
        assert_eq!(items, twin);
        assert_eq!(items, items.clone());

        let object = Value::from(BTreeMap::new());
        let Value::Dict(entries) = &object else { unreachable!() };
        entries.borrow_mut().insert("me".to_string(), object.clone());
        assert_eq!(object.to_string(), "{'me': {...}}");

        cell.borrow_mut().clear();
        twin_cell.borrow_mut().clear();
        entries.borrow_mut().clear();
    }

    #[test]
    fn display_quotes_nested_strings() {
        let mut entries = BTreeMap::new();
        entries.insert("name".to_string(), Value::from("soul"));
        entries.insert("tags".to_string(), Value::from(vec![Value::from("a"), Value::Integer(2)]));
        assert_eq!(Value::from(entries).to_string(), "{'name': 'soul', 'tags': ['a', 2]}");
        assert_eq!(Value::Bool(false).to_string(), "False");
        assert_eq!(Value::from("plain").to_string(), "plain");
    }
}
