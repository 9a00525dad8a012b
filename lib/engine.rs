use std::path::Path;

use anyhow::Result;
use tracing::trace;

use crate::{
    builtins::Builtins,
    environment::{Env, Environment},
    evaluator, parser, reader,
    value::Value,
};

pub trait Engine {
    /// Parses `input` and evaluates it as a single S-expression, the way a
    /// REPL line is treated: `+ 1 2` needs no surrounding parentheses.
    fn run(&mut self, input: &str) -> Result<Value>;

    /// Loads a source file, evaluating its top-level forms one by one.
    fn load(&mut self, path: &Path) -> Value;
}

pub fn new_engine() -> Box<dyn Engine> {
    Box::new(Interpreter::new())
}

/// Owns the root environment for one session.
pub struct Interpreter {
    env: Env,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            env: Environment::new_global(),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Interpreter {
    fn run(&mut self, input: &str) -> Result<Value> {
        let program = parser::parse(input)?;
        trace!(tree = %program, "parsed input");
        Ok(evaluator::eval(&self.env, reader::read(&program)))
    }

    fn load(&mut self, path: &Path) -> Value {
        Builtins::load(&self.env, &path.to_string_lossy())
    }
}
