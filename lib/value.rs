use core::fmt;
use std::rc::Rc;

use crate::environment::{Env, Environment};

/// Signature shared by every native primitive. Validation failures come
/// back as `Err` and are turned into [`Value::Error`] at the call site.
pub type BuiltinFn = fn(&Env, Vec<Value>) -> Result<Value, LispError>;

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Number(i64),
    Symbol(String),
    String(String),
    Error(LispError),
    Function(Function),
    SExpr(Vec<Value>),
    QExpr(Vec<Value>),
}

impl Value {
    /// The empty S-expression, `()`, returned by side-effecting builtins.
    pub fn unit() -> Self {
        Value::SExpr(Vec::new())
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Value::Error(LispError::new(kind, message))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Symbol(_) => "Symbol",
            Value::String(_) => "String",
            Value::Error(_) => "Error",
            Value::Function(_) => "Function",
            Value::SExpr(_) => "S-Expression",
            Value::QExpr(_) => "Q-Expression",
        }
    }
}

impl From<Result<Value, LispError>> for Value {
    fn from(result: Result<Value, LispError>) -> Self {
        result.unwrap_or_else(Value::Error)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Function {
    Builtin(Builtin),
    Closure(Closure),
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Builtin {
    pub const fn new(name: &'static str, func: BuiltinFn) -> Self {
        Self { name, func }
    }
}

// Builtins are registered once under a unique name, so the name stands in
// for pointer identity.
impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({:?})", self.name)
    }
}

/// A user-defined function.
///
/// `env` holds the arguments bound so far by partial application. It is
/// never mutated once the closure exists; applying fewer arguments than
/// `formals` asks for produces a new closure instead.
#[derive(Debug, PartialEq, Clone)]
pub struct Closure {
    pub env: Rc<Environment>,
    pub formals: Vec<String>,
    pub body: Vec<Value>,
}

impl Closure {
    pub fn new(formals: Vec<String>, body: Vec<Value>) -> Self {
        Self {
            env: Rc::new(Environment::default()),
            formals,
            body,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    UnboundSymbol,
    Arity,
    Type,
    EmptyList,
    DivisionByZero,
    MalformedLambda,
    InvalidNumber,
    Overflow,
    Parse,
    User,
}

#[derive(Debug, PartialEq, Clone)]
pub struct LispError {
    pub kind: ErrorKind,
    pub message: String,
}

impl LispError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unbound(name: &str) -> Self {
        Self::new(ErrorKind::UnboundSymbol, format!("Unbound Symbol '{name}'"))
    }

    pub fn arity(func: &str, got: usize, expected: usize) -> Self {
        Self::new(
            ErrorKind::Arity,
            format!(
                "Function '{func}' passed incorrect number of arguments. Got {got}, expected {expected}."
            ),
        )
    }

    pub fn type_mismatch(func: &str, index: usize, got: &Value, expected: &str) -> Self {
        Self::new(
            ErrorKind::Type,
            format!(
                "Function '{func}' passed incorrect type for argument {index}. Got {}, expected {expected}.",
                got.type_name()
            ),
        )
    }

    pub fn empty_list(func: &str, index: usize) -> Self {
        Self::new(
            ErrorKind::EmptyList,
            format!("Function '{func}' passed {{}} for argument {index}."),
        )
    }

    pub fn malformed_rest() -> Self {
        Self::new(
            ErrorKind::MalformedLambda,
            "Function format invalid. Symbol '&' not followed by single symbol.",
        )
    }
}

impl fmt::Display for LispError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LispError {}
