use std::rc::Rc;

use tracing::trace;

use crate::{
    environment::{Env, Environment},
    value::{Closure, ErrorKind, Function, LispError, Value},
};

const REST_MARKER: &str = "&";

/// Reduces `value` in `env`. Symbols resolve through the frame chain,
/// S-expressions are applied, and everything else evaluates to itself.
pub fn eval(env: &Env, value: Value) -> Value {
    match value {
        Value::Symbol(name) => env.borrow().get(&name),
        Value::SExpr(cells) => eval_sexpr(env, cells),
        other => other,
    }
}

fn eval_sexpr(env: &Env, cells: Vec<Value>) -> Value {
    let mut evaluated = Vec::with_capacity(cells.len());
    for cell in cells {
        let value = eval(env, cell);
        if value.is_error() {
            return value;
        }
        evaluated.push(value);
    }

    let mut evaluated = evaluated.into_iter();
    let Some(first) = evaluated.next() else {
        return Value::unit();
    };
    if evaluated.len() == 0 {
        return eval(env, first);
    }

    match first {
        Value::Function(function) => call(env, function, evaluated.collect()),
        other => Value::error(
            ErrorKind::Type,
            format!(
                "S-Expression does not start with a function. Got {}, expected Function.",
                other.type_name()
            ),
        ),
    }
}

/// Applies `function` to already evaluated arguments. `env` is the calling
/// environment: builtins act on it directly, closures see it as the outer
/// scope of their body for the length of the call.
pub fn call(env: &Env, function: Function, args: Vec<Value>) -> Value {
    match function {
        Function::Builtin(builtin) => {
            trace!(builtin = builtin.name, args = args.len(), "calling builtin");
            (builtin.func)(env, args).into()
        }
        Function::Closure(closure) => apply_closure(env, closure, args),
    }
}

fn apply_closure(env: &Env, closure: Closure, args: Vec<Value>) -> Value {
    let Closure {
        env: captured,
        formals,
        body,
    } = closure;

    let given = args.len();
    let total = formals.len();
    let mut bound = Environment::default();
    let mut remaining = formals.as_slice();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let Some((formal, rest)) = remaining.split_first() else {
            return Value::error(
                ErrorKind::Arity,
                format!("Function passed too many arguments. Got {given}, expected {total}."),
            );
        };

        if formal == REST_MARKER {
            let [name] = rest else {
                return Value::Error(LispError::malformed_rest());
            };
            let values = std::iter::once(arg).chain(args.by_ref()).collect();
            bound.set_local(name, Value::QExpr(values));
            remaining = &[];
            break;
        }

        bound.set_local(formal, arg);
        remaining = rest;
    }

    // A trailing `& name` that received nothing still binds the empty list.
    if remaining.first().is_some_and(|formal| formal == REST_MARKER) {
        let [_, name] = remaining else {
            return Value::Error(LispError::malformed_rest());
        };
        bound.set_local(name, Value::QExpr(Vec::new()));
        remaining = &[];
    }

    if !remaining.is_empty() {
        trace!(given, remaining = remaining.len(), "partially applied closure");
        let mut partial = (*captured).clone();
        partial.merge(bound);
        return Value::Function(Function::Closure(Closure {
            env: Rc::new(partial),
            formals: remaining.to_vec(),
            body,
        }));
    }

    trace!(given, "applying closure");
    let frame = bound.with_outer(Environment::relinked(&captured, env.clone()));
    eval(&frame, Value::SExpr(body))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{parser::parse, reader::read_forms};

    fn run(env: &Env, input: &str) -> Value {
        let program = parse(input).unwrap();
        read_forms(&program)
            .into_iter()
            .fold(Value::unit(), |_, form| eval(env, form))
    }

    fn test_eval(input: &str) -> Value {
        run(&Environment::new_global(), input)
    }

    fn error_kind(value: Value) -> ErrorKind {
        match value {
            Value::Error(error) => error.kind,
            other => panic!("expected an error, found {other}"),
        }
    }

    #[test]
    fn test_fibonacci() {
        let input = r#"
        (def {fib} (\ {n} {
            if (<= n 1) {n} {+ (fib (- n 1)) (fib (- n 2))}
        }))
        (fib 10)
        "#;
        assert_eq!(test_eval(input), Value::Number(55));
    }

    #[test]
    fn test_self_evaluating() {
        let tests = vec![
            ("5", "5"),
            ("\"hi\"", "\"hi\""),
            ("{1 (+ 1 1) x}", "{1 (+ 1 1) x}"),
            ("()", "()"),
            ("(5)", "5"),
            ("((((5))))", "5"),
            ("+", "<builtin>"),
            ("(error \"e\")", "Error: e"),
        ];

        for (input, expected) in tests {
            assert_eq!(test_eval(input).to_string(), expected, "{input}");
        }
    }

    #[test]
    fn test_sexpr_errors() {
        assert_eq!(error_kind(test_eval("(1 2 3)")), ErrorKind::Type);
        assert_eq!(
            test_eval("(1 2)").to_string(),
            "Error: S-Expression does not start with a function. Got Number, expected Function."
        );
        assert_eq!(error_kind(test_eval("nothing")), ErrorKind::UnboundSymbol);
        assert_eq!(
            test_eval("(+ 1 (head {}) (/ 1 0))").to_string(),
            "Error: Function 'head' passed {} for argument 0."
        );
    }

    #[test]
    fn first_error_stops_evaluation() {
        let env = Environment::new_global();
        let result = run(&env, "(list (error \"first\") (def {late} 1))");
        assert_eq!(result.to_string(), "Error: first");
        assert!(env.borrow().lookup("late").is_none());
    }

    #[test]
    fn test_function_application() {
        let tests = vec![
            ("((\\ {x y} {+ x y}) 1 2)", 3),
            ("(def {add1} (\\ {x} {+ x 1})) (add1 5)", 6),
            ("(def {f} (\\ {x y} {+ x y})) ((f 1) 2)", 3),
            ("(def {f} (\\ {x y z} {+ x y z})) (((f 1) 2) 3)", 6),
            ("(def {f} (\\ {x y z} {- x y z})) ((f 10 1) 2)", 7),
            ("(def {x} 5) ((\\ {x} {x}) 1)", 1),
            ("(def {y} 5) ((\\ {x} {+ x y}) 1)", 6),
        ];

        for (input, expected) in tests {
            assert_eq!(test_eval(input), Value::Number(expected), "{input}");
        }
    }

    #[test]
    fn partial_application_returns_function() {
        let env = Environment::new_global();
        run(&env, "(def {f} (\\ {x y} {+ x y}))");

        let partial = run(&env, "(f 1)");
        match &partial {
            Value::Function(Function::Closure(closure)) => {
                assert_eq!(closure.formals, vec!["y".to_string()]);
                assert_eq!(closure.env.get("x"), Value::Number(1));
            }
            other => panic!("expected a closure, found {other}"),
        }
        assert_eq!(partial.to_string(), "\\ {y} {+ x y}");

        // `f` itself is untouched and can be partially applied again.
        assert_eq!(run(&env, "(f 10 20)"), Value::Number(30));
        assert_eq!(run(&env, "((f 100) 1)"), Value::Number(101));
        assert_eq!(run(&env, "f").to_string(), "\\ {x y} {+ x y}");
    }

    #[test]
    fn stored_partials_are_independent() {
        let env = Environment::new_global();
        run(&env, "(def {add} (\\ {x y} {+ x y}))");
        run(&env, "(def {inc} (add 1))");
        run(&env, "(def {dec} (add -1))");
        assert_eq!(run(&env, "(inc 10)"), Value::Number(11));
        assert_eq!(run(&env, "(dec 10)"), Value::Number(9));
        assert_eq!(run(&env, "(inc 10)"), Value::Number(11));
    }

    #[test]
    fn test_variadic() {
        let tests = vec![
            ("((\\ {x & xs} {list x xs}) 1 2 3)", "{1 {2 3}}"),
            ("((\\ {x & xs} {list x xs}) 1)", "{1 {}}"),
            ("((\\ {& xs} {xs}) 1 2)", "{1 2}"),
            ("(def {f} (\\ {a b & rest} {list a b rest})) ((f 1) 2 3 4)", "{1 2 {3 4}}"),
            ("(def {f} (\\ {a & rest} {rest})) (f 1)", "{}"),
        ];

        for (input, expected) in tests {
            assert_eq!(test_eval(input).to_string(), expected, "{input}");
        }
    }

    #[test]
    fn test_arity_errors() {
        assert_eq!(
            test_eval("((\\ {x} {x}) 1 2)").to_string(),
            "Error: Function passed too many arguments. Got 2, expected 1."
        );

        let env = Environment::new_global();
        let malformed = Value::Function(Function::Closure(Closure::new(
            vec!["x".to_string(), REST_MARKER.to_string()],
            vec![Value::Symbol("x".to_string())],
        )));
        let args = vec![Value::Number(1), Value::Number(2)];
        assert_eq!(
            error_kind(eval(&env, Value::SExpr([vec![malformed], args].concat()))),
            ErrorKind::MalformedLambda
        );
    }

    #[test]
    fn local_binding_does_not_leak() {
        let env = Environment::new_global();
        run(&env, "(def {set-local} (\\ {v} {= {hidden} v}))");
        run(&env, "(set-local 5)");
        assert_eq!(error_kind(run(&env, "hidden")), ErrorKind::UnboundSymbol);
    }

    #[test]
    fn global_binding_escapes_closure() {
        let env = Environment::new_global();
        run(&env, "(def {set-global} (\\ {v} {def {shared} v}))");
        run(&env, "(set-global 5)");
        assert_eq!(run(&env, "shared"), Value::Number(5));
    }

    #[test]
    fn caller_scope_is_not_retained() {
        let env = Environment::new_global();
        run(&env, "(def {get-y} (\\ {_} {y}))");
        run(&env, "(def {with-y} (\\ {y} {get-y 0}))");
        assert_eq!(run(&env, "(with-y 7)"), Value::Number(7));
        assert_eq!(error_kind(run(&env, "(get-y 0)")), ErrorKind::UnboundSymbol);

        match run(&env, "get-y") {
            Value::Function(Function::Closure(closure)) => {
                assert_eq!(closure.env.names().count(), 0);
            }
            other => panic!("expected a closure, found {other}"),
        }
    }

    #[test]
    fn higher_order_functions() {
        let input = r#"
        (def {map} (\ {f l} {
            if (== l {}) {{}} {join (list (f (eval (head l)))) (map f (tail l))}
        }))
        (def {sum} (\ {l} {if (== l {}) {0} {+ (eval (head l)) (sum (tail l))}}))
        (sum (map (\ {x} {* x x}) {1 2 3}))
        "#;
        assert_eq!(test_eval(input), Value::Number(14));
    }
}
