mod builtins;
mod engine;
mod environment;
mod evaluator;
mod lexer;
mod parser;
mod printer;
mod reader;
mod syntax;
mod token;
mod value;

pub use builtins::Builtins;
pub use engine::{new_engine, Engine, Interpreter};
pub use environment::{Env, Environment};
pub use evaluator::{call, eval};
pub use lexer::Lexer;
pub use parser::{parse, parse_file, Parser};
pub use printer::escape;
pub use reader::{read, read_forms, unescape};
pub use syntax::{SyntaxNode, ROOT_TAG};
pub use token::Token;
pub use value::{Builtin, BuiltinFn, Closure, ErrorKind, Function, LispError, Value};
