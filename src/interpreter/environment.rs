use std::{
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use crate::interpreter::value::core::Value;

/// A scope of name bindings.
///
/// Each environment owns one frame and points at the (immutable) snapshot of
/// its parent. Frames are copy-on-write: taking a [`snapshot`](Self::snapshot)
/// is O(1), and the first binding made after a snapshot copies only the
/// current frame. A closure therefore sees the scope exactly as it was when it
/// was defined, while the defining scope keeps evolving independently.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    frame:  Rc<HashMap<String, Value>>,
    parent: Option<Rc<Self>>,
}

impl Environment {
    /// Creates an empty root environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty environment whose lookups fall back to `parent`.
    #[must_use]
    pub fn child(parent: Rc<Self>) -> Self {
        Self { frame:  Rc::new(HashMap::new()),
               parent: Some(parent), }
    }

    /// Freezes the current bindings for capture by a closure.
    #[must_use]
    pub fn snapshot(&self) -> Rc<Self> {
        Rc::new(self.clone())
    }

    /// Looks `name` up in this frame, then in the parents.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.frame.get(name) {
                return Some(value);
            }
            scope = scope.parent.as_deref()?;
        }
    }

    /// Whether `name` is bound in this frame or a parent.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Binds `name` in the current frame, shadowing any parent binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        Rc::make_mut(&mut self.frame).insert(name.into(), value);
    }

    /// Rebinds `name` where it is visible.
    ///
    /// Bindings in the current frame are replaced in place. A binding that
    /// only exists in a parent snapshot is shadowed in the current frame,
    /// since snapshots are immutable.
    ///
    /// # Returns
    /// `false` if `name` is not bound anywhere.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if !self.contains(name) {
            return false;
        }
        self.bind(name, value);
        true
    }

    /// Removes `name` from the current frame.
    pub fn unbind(&mut self, name: &str) -> Option<Value> {
        if !self.frame.contains_key(name) {
            return None;
        }
        Rc::make_mut(&mut self.frame).remove(name)
    }

    /// Returns the bindings of the current frame only.
    #[must_use]
    pub fn frame(&self) -> &HashMap<String, Value> {
        &self.frame
    }

    /// Returns every visible binding, inner frames shadowing outer ones.
    #[must_use]
    pub fn bindings(&self) -> BTreeMap<String, Value> {
        let mut bindings = self.parent
                               .as_deref()
                               .map(Self::bindings)
                               .unwrap_or_default();
        for (name, value) in self.frame.iter() {
            bindings.insert(name.clone(), value.clone());
        }
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_ignores_later_bindings() {
        let mut env = Environment::new();
        env.bind("x", Value::Integer(1));
        let captured = env.snapshot();
        env.bind("x", Value::Integer(2));
        env.bind("y", Value::Integer(3));

        assert_eq!(captured.lookup("x"), Some(&Value::Integer(1)));
        assert_eq!(captured.lookup("y"), None);
        assert_eq!(env.lookup("x"), Some(&Value::Integer(2)));
    }

    #[test]
    fn child_shadows_parent() {
        let mut root = Environment::new();
        root.bind("x", Value::Integer(1));
        root.bind("y", Value::Integer(2));
        let mut child = Environment::child(root.snapshot());
        child.bind("x", Value::Integer(10));

        assert_eq!(child.lookup("x"), Some(&Value::Integer(10)));
        assert_eq!(child.lookup("y"), Some(&Value::Integer(2)));
        assert_eq!(child.bindings().len(), 2);
        assert_eq!(child.frame().len(), 1);
    }

    #[test]
    fn assign_requires_existing_binding() {
        let mut env = Environment::new();
        assert!(!env.assign("x", Value::Integer(1)));
        env.bind("x", Value::Integer(1));
        assert!(env.assign("x", Value::Integer(5)));
        assert_eq!(env.lookup("x"), Some(&Value::Integer(5)));
    }

    #[test]
    fn unbind_only_touches_current_frame() {
        let mut root = Environment::new();
        root.bind("x", Value::Integer(1));
        let mut child = Environment::child(root.snapshot());
        assert_eq!(child.unbind("x"), None);
        assert!(child.contains("x"));
        assert_eq!(root.unbind("x"), Some(Value::Integer(1)));
        assert!(!root.contains("x"));
    }
}
