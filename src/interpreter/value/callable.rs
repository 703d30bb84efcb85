use std::rc::Rc;

use crate::{
    ast::{CategoryDef, FunctionDef},
    interpreter::environment::Environment,
};

/// What a user callable runs.
#[derive(Debug, Clone)]
pub enum ClosureKind {
    /// A function: parameters are bound and the body's value is returned.
    Function(Rc<FunctionDef>),
    /// A category: the body runs and its bindings become a dict.
    Category(Rc<CategoryDef>),
}

/// A user callable together with the environment it was defined in.
///
/// The environment is a snapshot: bindings made in the defining scope after
/// the definition are not visible to the callable.
pub struct Closure {
    /// The definition.
    pub kind:     ClosureKind,
    /// The defining environment as it was at definition time.
    pub captured: Rc<Environment>,
}

impl Closure {
    /// Returns the callable's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            ClosureKind::Function(def) => &def.name,
            ClosureKind::Category(def) => &def.name,
        }
    }
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure").field("name", &self.name()).finish_non_exhaustive()
    }
}

impl std::fmt::Display for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ClosureKind::Function(def) => write!(f, "<function {}>", def.name),
            ClosureKind::Category(def) => write!(f, "<category {}>", def.name),
        }
    }
}
