use crate::{
    builtins::Builtins,
    value::{Function, LispError, Value},
};
use std::{cell::RefCell, rc::Rc};

pub type Env = Rc<RefCell<Environment>>;

/// One frame of bindings, kept in insertion order, with an optional link
/// to the enclosing frame.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Environment {
    store: Vec<(String, Value)>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// The root frame with every builtin installed. Create it once per
    /// interpreter and hand it to [`crate::eval`].
    pub fn new_global() -> Env {
        let mut global = Environment::default();
        for builtin in Builtins::get() {
            global.set_local(builtin.name, Value::Function(Function::Builtin(*builtin)));
        }
        Rc::new(RefCell::new(global))
    }

    pub fn new_enclosed_environment(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: Vec::new(),
            outer: Some(outer),
        }))
    }

    /// Copies a closure's captured frame into a live frame whose outer link
    /// is `caller`. The copy lives for one call; the captured frame itself
    /// never gains a parent.
    pub fn relinked(captured: &Environment, caller: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: captured.store.clone(),
            outer: Some(caller),
        }))
    }

    /// Turns a detached frame into a live one nested inside `outer`.
    pub fn with_outer(self, outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: self.store,
            outer: Some(outer),
        }))
    }

    /// Moves every binding of `other` into this frame, overwriting on clash.
    pub fn merge(&mut self, other: Environment) {
        for (name, value) in other.store {
            self.set_local(&name, value);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        match self.store.iter().find(|(key, _)| key == name) {
            Some((_, value)) => Some(value.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().lookup(name),
                None => None,
            },
        }
    }

    /// Resolves `name` through the frame chain, or returns an unbound
    /// symbol error value.
    pub fn get(&self, name: &str) -> Value {
        self.lookup(name)
            .unwrap_or_else(|| Value::Error(LispError::unbound(name)))
    }

    pub fn set_local(&mut self, name: &str, value: Value) {
        match self.store.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.store.push((name.to_string(), value)),
        }
    }

    pub fn define_global(env: &Env, name: &str, value: Value) {
        Self::root(env).borrow_mut().set_local(name, value);
    }

    pub fn root(env: &Env) -> Env {
        let mut current = env.clone();
        loop {
            let outer = current.borrow().outer.clone();
            match outer {
                Some(outer) => current = outer,
                None => return current,
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.store.iter().map(|(name, _)| name.as_str())
    }
}
