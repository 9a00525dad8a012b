use lazy_static::lazy_static;
use tracing::{debug, trace};

use crate::{
    environment::{Env, Environment},
    evaluator, parser, reader,
    value::{Builtin, Closure, ErrorKind, Function, LispError, Value},
};

lazy_static! {
    static ref BUILTINS: Vec<Builtin> = vec![
        // variables
        Builtin::new("\\", Builtins::lambda_fn),
        Builtin::new("def", Builtins::def_fn),
        Builtin::new("=", Builtins::put_fn),
        // lists
        Builtin::new("list", Builtins::list_fn),
        Builtin::new("head", Builtins::head_fn),
        Builtin::new("tail", Builtins::tail_fn),
        Builtin::new("eval", Builtins::eval_fn),
        Builtin::new("join", Builtins::join_fn),
        // arithmetic
        Builtin::new("+", Builtins::add_fn),
        Builtin::new("-", Builtins::sub_fn),
        Builtin::new("*", Builtins::mul_fn),
        Builtin::new("/", Builtins::div_fn),
        // comparison
        Builtin::new("if", Builtins::if_fn),
        Builtin::new("==", Builtins::eq_fn),
        Builtin::new("!=", Builtins::ne_fn),
        Builtin::new(">", Builtins::gt_fn),
        Builtin::new("<", Builtins::lt_fn),
        Builtin::new(">=", Builtins::ge_fn),
        Builtin::new("<=", Builtins::le_fn),
        // strings and files
        Builtin::new("load", Builtins::load_fn),
        Builtin::new("error", Builtins::error_fn),
        Builtin::new("print", Builtins::print_fn),
    ];
}

type BuiltinResult = Result<Value, LispError>;

pub struct Builtins;

impl Builtins {
    pub fn get() -> &'static [Builtin] {
        &BUILTINS
    }

    /// Parses the file at `path` and evaluates its top-level forms in order.
    /// A form that evaluates to an error is printed and the next form runs
    /// anyway; only a failure to read or parse the file aborts the load.
    #[tracing::instrument(level = "debug", skip(env))]
    pub fn load(env: &Env, path: &str) -> Value {
        let program = match parser::parse_file(path) {
            Ok(program) => program,
            Err(err) => {
                debug!(error = %format!("{err:#}"), "load failed");
                return Value::error(ErrorKind::Parse, format!("Could not load library {err:#}"));
            }
        };

        let forms = reader::read_forms(&program);
        debug!(forms = forms.len(), "evaluating source unit");
        for form in forms {
            let result = evaluator::eval(env, form);
            if result.is_error() {
                println!("{}", result);
            }
        }

        Value::unit()
    }

    fn lambda_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [formals, body] = expect_args("\\", args)?;
        let formals = expect_qexpr("\\", 0, formals)?;
        let body = expect_qexpr("\\", 1, body)?;

        let formals = formals
            .into_iter()
            .map(|formal| match formal {
                Value::Symbol(name) => Ok(name),
                other => Err(LispError::new(
                    ErrorKind::MalformedLambda,
                    format!(
                        "Cannot define non-symbol. Got {}, expected Symbol.",
                        other.type_name()
                    ),
                )),
            })
            .collect::<Result<Vec<String>, LispError>>()?;

        if let Some(position) = formals.iter().position(|formal| formal == "&") {
            if formals.len() != position + 2 {
                return Err(LispError::malformed_rest());
            }
        }

        Ok(Value::Function(Function::Closure(Closure::new(formals, body))))
    }

    fn def_fn(env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::var_fn(env, "def", args, |env, name, value| {
            debug!(name, "defining global");
            Environment::define_global(env, name, value);
        })
    }

    fn put_fn(env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::var_fn(env, "=", args, |env, name, value| {
            trace!(name, "binding local");
            env.borrow_mut().set_local(name, value);
        })
    }

    fn var_fn(
        env: &Env,
        func: &str,
        args: Vec<Value>,
        bind: fn(&Env, &str, Value),
    ) -> BuiltinResult {
        let mut args = args.into_iter();
        let symbols = match args.next() {
            Some(symbols) => expect_qexpr(func, 0, symbols)?,
            None => return Err(LispError::arity(func, 0, 1)),
        };

        let names = symbols
            .into_iter()
            .map(|symbol| match symbol {
                Value::Symbol(name) => Ok(name),
                other => Err(LispError::new(
                    ErrorKind::Type,
                    format!(
                        "Function '{func}' cannot define non-symbol. Got {}, expected Symbol.",
                        other.type_name()
                    ),
                )),
            })
            .collect::<Result<Vec<String>, LispError>>()?;

        let values: Vec<Value> = args.collect();
        if names.len() != values.len() {
            return Err(LispError::new(
                ErrorKind::Arity,
                format!(
                    "Function '{func}' passed mismatched number of values for symbols. Got {}, expected {}.",
                    values.len(),
                    names.len()
                ),
            ));
        }

        for (name, value) in names.iter().zip(values) {
            bind(env, name, value);
        }
        Ok(Value::unit())
    }

    fn list_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        Ok(Value::QExpr(args))
    }

    fn head_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [list] = expect_args("head", args)?;
        let mut cells = expect_non_empty("head", 0, list)?;
        cells.truncate(1);
        Ok(Value::QExpr(cells))
    }

    fn tail_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [list] = expect_args("tail", args)?;
        let mut cells = expect_non_empty("tail", 0, list)?;
        cells.remove(0);
        Ok(Value::QExpr(cells))
    }

    fn eval_fn(env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [list] = expect_args("eval", args)?;
        let cells = expect_qexpr("eval", 0, list)?;
        Ok(evaluator::eval(env, Value::SExpr(cells)))
    }

    fn join_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        let mut joined = Vec::new();
        for (index, arg) in args.into_iter().enumerate() {
            joined.extend(expect_qexpr("join", index, arg)?);
        }
        Ok(Value::QExpr(joined))
    }

    fn add_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::fold_numbers("+", args, |x, y| x.checked_add(y).ok_or_else(overflow))
    }

    fn sub_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        if let [Value::Number(value)] = args.as_slice() {
            return value.checked_neg().map(Value::Number).ok_or_else(overflow);
        }
        Self::fold_numbers("-", args, |x, y| x.checked_sub(y).ok_or_else(overflow))
    }

    fn mul_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::fold_numbers("*", args, |x, y| x.checked_mul(y).ok_or_else(overflow))
    }

    fn div_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::fold_numbers("/", args, |x, y| {
            if y == 0 {
                return Err(LispError::new(ErrorKind::DivisionByZero, "Division by zero."));
            }
            x.checked_div(y).ok_or_else(overflow)
        })
    }

    fn fold_numbers(
        func: &str,
        args: Vec<Value>,
        op: fn(i64, i64) -> Result<i64, LispError>,
    ) -> BuiltinResult {
        let numbers = args
            .into_iter()
            .enumerate()
            .map(|(index, arg)| expect_number(func, index, arg))
            .collect::<Result<Vec<i64>, LispError>>()?;

        let mut numbers = numbers.into_iter();
        let first = numbers.next().ok_or_else(|| {
            LispError::new(
                ErrorKind::Arity,
                format!("Function '{func}' passed no arguments."),
            )
        })?;

        numbers.try_fold(first, op).map(Value::Number)
    }

    fn gt_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::ord(">", args, |x, y| x > y)
    }

    fn lt_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::ord("<", args, |x, y| x < y)
    }

    fn ge_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::ord(">=", args, |x, y| x >= y)
    }

    fn le_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        Self::ord("<=", args, |x, y| x <= y)
    }

    fn ord(func: &str, args: Vec<Value>, cmp: fn(i64, i64) -> bool) -> BuiltinResult {
        let [left, right] = expect_args(func, args)?;
        let left = expect_number(func, 0, left)?;
        let right = expect_number(func, 1, right)?;
        Ok(truth(cmp(left, right)))
    }

    fn eq_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [left, right] = expect_args("==", args)?;
        Ok(truth(left == right))
    }

    fn ne_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [left, right] = expect_args("!=", args)?;
        Ok(truth(left != right))
    }

    fn if_fn(env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [condition, consequence, alternative] = expect_args("if", args)?;
        let condition = expect_number("if", 0, condition)?;
        let consequence = expect_qexpr("if", 1, consequence)?;
        let alternative = expect_qexpr("if", 2, alternative)?;

        let branch = if condition != 0 {
            consequence
        } else {
            alternative
        };
        Ok(evaluator::eval(env, Value::SExpr(branch)))
    }

    fn load_fn(env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [path] = expect_args("load", args)?;
        let path = expect_string("load", 0, path)?;
        Ok(Self::load(env, &path))
    }

    fn error_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        let [message] = expect_args("error", args)?;
        let message = expect_string("error", 0, message)?;
        Ok(Value::error(ErrorKind::User, message))
    }

    fn print_fn(_env: &Env, args: Vec<Value>) -> BuiltinResult {
        let line = args
            .iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        println!("{}", line);
        Ok(Value::unit())
    }
}

fn truth(value: bool) -> Value {
    Value::Number(value as i64)
}

fn overflow() -> LispError {
    LispError::new(ErrorKind::Overflow, "Integer overflow.")
}

fn expect_args<const N: usize>(func: &str, args: Vec<Value>) -> Result<[Value; N], LispError> {
    args.try_into()
        .map_err(|args: Vec<Value>| LispError::arity(func, args.len(), N))
}

fn expect_number(func: &str, index: usize, value: Value) -> Result<i64, LispError> {
    match value {
        Value::Number(value) => Ok(value),
        other => Err(LispError::type_mismatch(func, index, &other, "Number")),
    }
}

fn expect_string(func: &str, index: usize, value: Value) -> Result<String, LispError> {
    match value {
        Value::String(value) => Ok(value),
        other => Err(LispError::type_mismatch(func, index, &other, "String")),
    }
}

fn expect_qexpr(func: &str, index: usize, value: Value) -> Result<Vec<Value>, LispError> {
    match value {
        Value::QExpr(cells) => Ok(cells),
        other => Err(LispError::type_mismatch(func, index, &other, "Q-Expression")),
    }
}

fn expect_non_empty(func: &str, index: usize, value: Value) -> Result<Vec<Value>, LispError> {
    let cells = expect_qexpr(func, index, value)?;
    if cells.is_empty() {
        return Err(LispError::empty_list(func, index));
    }
    Ok(cells)
}
