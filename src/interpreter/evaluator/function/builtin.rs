use std::collections::BTreeMap;

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::{array, file, string, system},
        },
        value::core::Value,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the evaluation context, a slice of evaluated argument
/// values and the position of the call.
pub type BuiltinFn = fn(&mut Context, &[Value], Position) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `Any` accepts any number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    Any,
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// Returns `true` if the count is permitted, `false` otherwise.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::Any => true,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(counts) => {
                let counts: Vec<String> = counts.iter().map(ToString::to_string).collect();
                write!(f, "{}", counts.join(" or "))
            },
            Self::Any => write!(f, "any number of"),
        }
    }
}

/// A function provided by the host.
#[derive(Clone, Copy)]
pub struct Builtin {
    name:  &'static str,
    arity: Arity,
    func:  BuiltinFn,
}

impl Builtin {
    /// Creates a builtin from its name, arity and handler.
    #[must_use]
    pub const fn new(name: &'static str, arity: Arity, func: BuiltinFn) -> Self {
        Self { name, arity, func }
    }

    /// Returns the name the builtin is registered under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the accepted argument counts.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Checks the argument count, then runs the handler.
    ///
    /// # Errors
    /// `ArgumentCountMismatch` if the arity does not allow `args.len()`
    /// arguments; otherwise whatever the handler reports.
    pub fn invoke(&self, context: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
        if !self.arity.check(args.len()) {
            return Err(RuntimeError::ArgumentCountMismatch { name: self.name.to_string(),
                                                             expected: self.arity.to_string(),
                                                             found: args.len(),
                                                             position });
        }

        tracing::trace!(builtin = self.name, arguments = args.len(), "calling builtin");
        (self.func)(context, args, position)
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .finish_non_exhaustive()
    }
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (static table the standard registry is built from),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[Builtin] = &[
            $(
                Builtin { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every builtin in the standard registry.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "append"   => { arity: Arity::Exact(2), func: array::append },
    "insert"   => { arity: Arity::Exact(3), func: array::insert },
    "remove"   => { arity: Arity::Exact(2), func: array::remove },
    "pop"      => { arity: Arity::OneOf(&[1, 2]), func: array::pop },
    "index"    => { arity: Arity::Exact(2), func: array::index },
    "clear"    => { arity: Arity::Exact(1), func: array::clear },
    "update"   => { arity: Arity::Exact(2), func: array::update },
    "len"      => { arity: Arity::Exact(1), func: array::len },
    "split"    => { arity: Arity::OneOf(&[1, 2]), func: string::split },
    "is_digit" => { arity: Arity::Exact(1), func: |ctx, args, position| string::is_class("is_digit", ctx, args, position) },
    "is_alpha" => { arity: Arity::Exact(1), func: |ctx, args, position| string::is_class("is_alpha", ctx, args, position) },
    "is_space" => { arity: Arity::Exact(1), func: |ctx, args, position| string::is_class("is_space", ctx, args, position) },
    "is_ident" => { arity: Arity::Exact(1), func: string::is_ident },
    "str"      => { arity: Arity::Exact(1), func: string::to_str },
    "int"      => { arity: Arity::Exact(1), func: string::to_int },
    "type"     => { arity: Arity::Exact(1), func: string::type_of },
    "open"     => { arity: Arity::OneOf(&[1, 2]), func: file::open },
    "read"     => { arity: Arity::Exact(1), func: file::read },
    "write"    => { arity: Arity::Exact(2), func: file::write },
    "close"    => { arity: Arity::Exact(1), func: file::close },
    "enum"     => { arity: Arity::Any, func: system::make_enum },
    "dict"     => { arity: Arity::OneOf(&[0, 1]), func: system::make_dict },
    "env"      => { arity: Arity::Exact(0), func: system::env },
    "exit"     => { arity: Arity::OneOf(&[0, 1]), func: system::exit },
}

/// The builtins a context resolves names against after user bindings.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<&'static str, Builtin>,
}

impl Registry {
    /// Creates a registry with every standard builtin.
    #[must_use]
    pub fn standard() -> Self {
        Self { entries: BUILTIN_TABLE.iter().map(|builtin| (builtin.name, *builtin)).collect() }
    }

    /// Creates a registry without any builtins.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds or replaces a builtin.
    pub fn register(&mut self, builtin: Builtin) {
        self.entries.insert(builtin.name, builtin);
    }

    /// Looks a builtin up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.entries.get(name).copied()
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_matches_table() {
        let registry = Registry::standard();
        assert_eq!(registry.names().count(), BUILTIN_FUNCTIONS.len());
        for name in BUILTIN_FUNCTIONS {
            assert_eq!(registry.get(name).map(|builtin| builtin.name()), Some(*name));
        }
        assert!(registry.get("print").is_none());
    }

    #[test]
    fn arity_display_and_check() {
        assert!(Arity::OneOf(&[1, 2]).check(2));
        assert!(!Arity::Exact(0).check(1));
        assert!(Arity::Any.check(7));
        assert_eq!(Arity::OneOf(&[1, 2]).to_string(), "1 or 2");
    }
}
